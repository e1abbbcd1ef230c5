use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn obsoleter_cmd() -> Command {
    let mut cmd = Command::cargo_bin("obsoleter").unwrap();
    cmd.env_remove("RUST_LOG").env_remove("OBSOLETER_CONFIG");
    cmd
}

const CONFIG: &str = r#"
cache-dir = "repos"

[current]
id = "rawhide"
releasever = 35
channels = ["rawhide"]

[[legacy]]
id = "f34"
releasever = 34
channels = ["fedora"]
"#;

const F34_PRIMARY: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<metadata xmlns="http://linux.duke.edu/metadata/common" xmlns:rpm="http://linux.duke.edu/metadata/rpm" packages="3">
<package type="rpm">
  <name>libfoo-compat</name>
  <arch>x86_64</arch>
  <version epoch="0" ver="2.0" rel="3.fc39"/>
  <format>
    <rpm:provides>
      <rpm:entry name="libfoo-compat" flags="EQ" epoch="0" ver="2.0" rel="3.fc39"/>
      <rpm:entry name="libfoo.so.2()(64bit)"/>
    </rpm:provides>
    <rpm:requires>
      <rpm:entry name="python(abi)" flags="EQ" ver="3.9"/>
    </rpm:requires>
  </format>
</package>
<package type="rpm">
  <name>bar</name>
  <arch>x86_64</arch>
  <version epoch="0" ver="1.0" rel="1.fc34"/>
  <format>
    <rpm:requires>
      <rpm:entry name="libfoo.so.2()(64bit)"/>
    </rpm:requires>
  </format>
</package>
<package type="rpm">
  <name>python3-old</name>
  <arch>noarch</arch>
  <version epoch="0" ver="0.5" rel="2.fc34"/>
  <format>
    <rpm:requires>
      <rpm:entry name="python(abi)" flags="EQ" ver="3.9"/>
    </rpm:requires>
  </format>
</package>
</metadata>"#;

const RAWHIDE_PRIMARY: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<metadata xmlns="http://linux.duke.edu/metadata/common" xmlns:rpm="http://linux.duke.edu/metadata/rpm" packages="2">
<package type="rpm">
  <name>bar</name>
  <arch>x86_64</arch>
  <version epoch="0" ver="1.0" rel="2.fc35"/>
  <format/>
</package>
<package type="rpm">
  <name>python3-new</name>
  <arch>noarch</arch>
  <version epoch="0" ver="1.0" rel="1.fc35"/>
  <format>
    <rpm:obsoletes>
      <rpm:entry name="python3-old" flags="LT" epoch="0" ver="0.6"/>
    </rpm:obsoletes>
  </format>
</package>
</metadata>"#;

fn mirror(cache: &Path, repo_id: &str, primary: &str) {
    let repodata = cache.join(repo_id).join("repodata");
    fs::create_dir_all(&repodata).unwrap();
    fs::write(
        repodata.join("repomd.xml"),
        r#"<repomd><data type="primary"><location href="repodata/primary.xml"/></data></repomd>"#,
    )
    .unwrap();
    fs::write(repodata.join("primary.xml"), primary).unwrap();
}

fn project() -> TempDir {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("obsoleter.toml"), CONFIG).unwrap();
    let cache = tmp.path().join("repos");
    mirror(&cache, "fedora34", F34_PRIMARY);
    mirror(&cache, "rawhide", RAWHIDE_PRIMARY);
    tmp
}

#[test]
fn test_run_prints_directives_on_stdout() {
    let tmp = project();

    obsoleter_cmd()
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout("%obsolete libfoo-compat 2.0-4\n")
        .stderr(predicate::str::contains(
            "# python3-old 0.5-2 obsoleted by python3-new",
        ));
}

#[test]
fn test_run_persists_indices() {
    let tmp = project();

    obsoleter_cmd().current_dir(tmp.path()).assert().success();

    let indices = tmp.path().join("repos").join("indices");
    assert!(indices.join("f34-x86_64.json").is_file());
    assert!(indices.join("rawhide-x86_64.json").is_file());

    // a second run is served from the store
    fs::remove_dir_all(tmp.path().join("repos").join("fedora34")).unwrap();
    obsoleter_cmd()
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout("%obsolete libfoo-compat 2.0-4\n");
}

#[test]
fn test_config_found_from_subdirectory() {
    let tmp = project();
    let nested = tmp.path().join("out");
    fs::create_dir_all(&nested).unwrap();

    obsoleter_cmd()
        .current_dir(&nested)
        .args(["--cache-dir", tmp.path().join("repos").to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("%obsolete libfoo-compat"));
}

#[test]
fn test_missing_repodata_fails_with_metalink() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("obsoleter.toml"), CONFIG).unwrap();

    obsoleter_cmd()
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains(
            "https://mirrors.fedoraproject.org/metalink?repo=fedora-34&arch=x86_64",
        ));
}

#[test]
fn test_explicit_config_flag() {
    let tmp = project();
    let elsewhere = TempDir::new().unwrap();

    obsoleter_cmd()
        .current_dir(elsewhere.path())
        .args([
            "--config",
            tmp.path().join("obsoleter.toml").to_str().unwrap(),
            "--cache-dir",
            tmp.path().join("repos").to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout("%obsolete libfoo-compat 2.0-4\n");
}

#[test]
fn test_invalid_config_is_reported() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("obsoleter.toml"), "legacy = []\n").unwrap();

    obsoleter_cmd()
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration error"));
}
