use std::cmp::Ordering;
use std::path::Path;

use obsoleter_evr::NativeVercmp;
use obsoleter_ops::ops_compare::{compare, read_listing, CompareOptions};
use tempfile::TempDir;

fn write(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn options(dir: &Path) -> CompareOptions {
    CompareOptions {
        packages: write(dir, "python39.pkgs", "python3-a\npython3-b\npython3-c\npython3-missing\n\n"),
        baseline: write(
            dir,
            "koji.repoquery",
            "python3-a-1.0-2.fc35.src\npython3-b-0:2.0-1.fc35.src\npython3-c-1:0.1-1.fc35.src\n",
        ),
        candidate: write(
            dir,
            "koji-python3.10.repoquery",
            "python3-a-1.0-1.fc35.src\npython3-b-2.0-1.fc35.src\npython3-c-0.1-1.fc35.src\nnot a nevra\n",
        ),
    }
}

#[test]
fn report_lines_and_todo_list() {
    let tmp = TempDir::new().unwrap();
    let mut out = Vec::new();
    let report = compare(&options(tmp.path()), &NativeVercmp, &mut out).unwrap();

    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines,
        [
            format!("{:<30} 0:1.0-2.fc35 > 0:1.0-1.fc35", "python3-a").as_str(),
            format!("{:<30} 0:2.0-1.fc35 == 0:2.0-1.fc35", "python3-b").as_str(),
            format!("{:<30} 1:0.1-1.fc35 > 0:0.1-1.fc35", "python3-c").as_str(),
            "",
            "python3-a",
            "python3-c",
        ]
    );
    assert_eq!(report.lines.len(), 3);
    assert_eq!(report.lines[1].ordering, Ordering::Equal);
}

#[test]
fn listing_keeps_newest_build() {
    let tmp = TempDir::new().unwrap();
    let path = write(
        tmp.path(),
        "listing",
        "foo-1.0-3.fc35.x86_64\nfoo-1.0-10.fc35.x86_64\nfoo-1.0-4.fc35.x86_64\n",
    );
    let listing = read_listing(&path, &NativeVercmp).unwrap();
    assert_eq!(listing["foo"].release, "10.fc35");
}

#[test]
fn unreadable_input_is_error() {
    let tmp = TempDir::new().unwrap();
    let mut opts = options(tmp.path());
    opts.baseline = tmp.path().join("nope");
    let mut out = Vec::new();
    assert!(compare(&opts, &NativeVercmp, &mut out).is_err());
    assert!(out.is_empty());
}
