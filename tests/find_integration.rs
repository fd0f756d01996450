//! Integration tests for --find-large and --find-old.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs::{self, File};
use std::path::Path;
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

const MB: u64 = 1024 * 1024;

fn mac_sweeper(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("mac-sweeper").unwrap();
    cmd.env("HOME", home)
        .env_remove("SUDO_USER")
        .env_remove("XDG_CONFIG_HOME")
        .env_remove("RUST_LOG");
    cmd
}

/// Sparse file of the given apparent size.
fn sparse(path: &Path, len: u64) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    File::create(path).unwrap().set_len(len).unwrap();
}

fn aged(path: &Path, days: u64) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, "old data").unwrap();
    File::options()
        .write(true)
        .open(path)
        .unwrap()
        .set_modified(SystemTime::now() - Duration::from_secs(days * 86_400))
        .unwrap();
}

#[test]
fn find_large_reports_only_files_over_threshold() {
    let tmp = TempDir::new().unwrap();
    sparse(&tmp.path().join("data/fifty.bin"), 50 * MB);
    sparse(&tmp.path().join("data/one-fifty.bin"), 150 * MB);

    mac_sweeper(tmp.path())
        .args(["--find-large", "--min-size", "100", "--paths"])
        .arg(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("one-fifty.bin"))
        .stdout(predicate::str::contains("/fifty.bin").not())
        .stdout(predicate::str::contains("Found 1 large files"));
}

#[test]
fn find_large_unit_suffix() {
    let tmp = TempDir::new().unwrap();
    sparse(&tmp.path().join("iso/installer.dmg"), 2 * 1024 * MB);

    mac_sweeper(tmp.path())
        .args(["--find-large", "--min-size", "1.5GB", "--paths"])
        .arg(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("installer.dmg"));
}

#[test]
fn find_large_limit_keeps_largest() {
    let tmp = TempDir::new().unwrap();
    for i in 1..=5u64 {
        sparse(&tmp.path().join(format!("file{}.bin", i)), i * 10 * MB);
    }

    mac_sweeper(tmp.path())
        .args(["--find-large", "--min-size", "1", "--limit", "2", "--paths"])
        .arg(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("file5.bin"))
        .stdout(predicate::str::contains("file4.bin"))
        .stdout(predicate::str::contains("file3.bin").not())
        .stdout(predicate::str::contains("3 more matched"));
}

#[test]
fn find_large_skips_library_in_home() {
    let home = TempDir::new().unwrap();
    sparse(&home.path().join("Movies/film.mov"), 200 * MB);
    sparse(&home.path().join("Library/Caches/blob.db"), 200 * MB);
    sparse(&home.path().join(".Trash/deleted.iso"), 200 * MB);

    mac_sweeper(home.path())
        .args(["--find-large"])
        .assert()
        .success()
        .stdout(predicate::str::contains("film.mov"))
        .stdout(predicate::str::contains("blob.db").not())
        .stdout(predicate::str::contains("deleted.iso").not());
}

#[test]
fn find_large_json() {
    let tmp = TempDir::new().unwrap();
    sparse(&tmp.path().join("big.bin"), 120 * MB);

    let output = mac_sweeper(tmp.path())
        .args(["--find-large", "--json", "--paths"])
        .arg(tmp.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["kind"], "large");
    assert_eq!(report["matched"], 1);
    assert_eq!(report["total_bytes"], 120 * MB);
    assert_eq!(report["files"].as_array().unwrap().len(), 1);
}

#[test]
fn find_old_reports_oldest_first() {
    let tmp = TempDir::new().unwrap();
    aged(&tmp.path().join("notes/fresh.txt"), 2);
    aged(&tmp.path().join("notes/stale.txt"), 90);
    aged(&tmp.path().join("archive/ancient.txt"), 1000);

    let output = mac_sweeper(tmp.path())
        .args(["--find-old", "--days", "30", "--paths"])
        .arg(tmp.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Found 2 old files"));
    assert!(!stdout.contains("fresh.txt"));
    assert!(stdout.find("ancient.txt").unwrap() < stdout.find("stale.txt").unwrap());
}

#[test]
fn find_over_several_roots() {
    let a = TempDir::new().unwrap();
    let b = TempDir::new().unwrap();
    sparse(&a.path().join("a.bin"), 5 * MB);
    sparse(&b.path().join("b.bin"), 6 * MB);

    mac_sweeper(a.path())
        .args(["--find-large", "--min-size", "1", "--paths"])
        .arg(a.path())
        .arg(b.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("a.bin"))
        .stdout(predicate::str::contains("b.bin"));
}

#[test]
fn find_never_deletes() {
    let tmp = TempDir::new().unwrap();
    let file = tmp.path().join("keep.bin");
    sparse(&file, 300 * MB);

    mac_sweeper(tmp.path())
        .args(["--find-large", "--yes", "--paths"])
        .arg(tmp.path())
        .assert()
        .success();

    assert!(file.exists());
}
