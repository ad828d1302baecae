use dupescan::duplicates::{DuplicateFinder, WorkerPool};
use dupescan::scanner::{probe, HashError, Hasher, ScanConfig, ScanError};
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

#[test]
fn test_vanished_files_are_collected_not_fatal() {
    let dir = tempdir().unwrap();
    let present = dir.path().join("present.txt");
    fs::write(&present, b"here").unwrap();
    let gone = dir.path().join("gone.txt");

    let output = WorkerPool::new("size", &ScanConfig::default())
        .run(vec![present.clone(), gone.clone()], |path: PathBuf| {
            let file = probe(&path)?;
            Ok((file.size, file))
        });

    assert_eq!(output.value_count(), 1);
    assert_eq!(output.errors.len(), 1);
    assert_eq!(output.errors[0].path(), gone.as_path());
    assert_eq!(output.errors[0].kind(), std::io::ErrorKind::NotFound);
}

#[test]
fn test_file_removed_before_hashing() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("a.txt");
    fs::write(&a, b"same").unwrap();
    let b = dir.path().join("b.txt");
    fs::write(&b, b"same").unwrap();
    let size_a = probe(&a).unwrap();
    let size_b = probe(&b).unwrap();
    fs::remove_file(&b).unwrap();

    let hasher = Hasher::new();
    let output = WorkerPool::new("hash", &ScanConfig::default()).run(
        vec![size_a, size_b],
        |file| {
            let digest = hasher.digest_hex(&file.path)?;
            Ok((digest.clone(), file.with_digest(digest)))
        },
    );

    assert_eq!(output.value_count(), 1);
    assert!(matches!(
        &output.errors[..],
        [ScanError::Digest(HashError::NotFound(p))] if p == &b
    ));
}

#[test]
#[cfg(unix)]
fn test_unreadable_file_isolated() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    for name in ["a.txt", "b.txt", "c.txt"] {
        fs::write(dir.path().join(name), b"duplicate").unwrap();
    }
    let locked = dir.path().join("c.txt");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
    let denied = fs::File::open(&locked).is_err();

    let report = DuplicateFinder::with_defaults().scan(dir.path()).unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o644)).unwrap();

    let groups = report.duplicates();
    assert_eq!(groups.len(), 1);
    if denied {
        assert_eq!(groups[0].len(), 2);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].path(), locked.as_path());
        assert_eq!(report.stats.digest_errors, 1);
    } else {
        // Running as root: permissions are not enforced.
        assert_eq!(groups[0].len(), 3);
    }
}

#[test]
#[cfg(unix)]
fn test_unreadable_directory_isolated() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), b"dup").unwrap();
    fs::write(dir.path().join("b.txt"), b"dup").unwrap();
    let locked = dir.path().join("locked");
    fs::create_dir(&locked).unwrap();
    fs::write(locked.join("c.txt"), b"dup").unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
    let denied = fs::read_dir(&locked).is_err();

    let report = DuplicateFinder::with_defaults().scan(dir.path()).unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    let group = &report.duplicates()[0];
    assert!(group.paths().contains(&dir.path().join("a.txt")));
    assert!(group.paths().contains(&dir.path().join("b.txt")));
    if denied {
        assert_eq!(group.len(), 2);
        assert!(report
            .errors
            .iter()
            .any(|e| matches!(e, ScanError::Walk { .. })));
        assert!(report.stats.walk_errors >= 1);
    }
}
