use obsoleter_core::{Release, ReleaseSet};

#[test]
fn test_fedora_release_channels() {
    let f34 = Release::fedora(34);
    assert_eq!(f34.id, "f34");
    assert_eq!(f34.releasever, "34");
    assert_eq!(f34.channels, ["fedora", "updates", "updates-testing"]);
}

#[test]
fn test_rawhide_release() {
    let rawhide = Release::rawhide(35);
    assert_eq!(rawhide.to_string(), "rawhide");
    assert_eq!(rawhide.channels, ["rawhide"]);
}

#[test]
fn test_release_set_keeps_legacy_order() {
    let set = ReleaseSet::new(
        vec![Release::fedora(33), Release::fedora(34)],
        Release::rawhide(35),
    );
    let ids: Vec<&str> = set.legacy.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, ["f33", "f34"]);
    assert_eq!(set.current.id, "rawhide");
}
