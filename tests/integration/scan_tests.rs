use dupescan::duplicates::{detect, DuplicateFinder, FinderError};
use dupescan::scanner::{ExclusionSet, Hasher, ScanConfig};
use filetime::FileTime;
use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tempfile::tempdir;

fn write(root: &Path, rel: &str, content: &[u8]) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    File::create(&path).unwrap().write_all(content).unwrap();
}

/// Duplicate groups as sorted sets of root-relative paths.
fn duplicate_sets(root: &Path, workers: usize) -> BTreeSet<Vec<String>> {
    detect(root, workers)
        .unwrap()
        .into_values()
        .filter(|files| files.len() > 1)
        .map(|files| {
            let mut rels: Vec<String> = files
                .iter()
                .map(|f| {
                    f.path
                        .strip_prefix(root)
                        .unwrap()
                        .to_string_lossy()
                        .replace('\\', "/")
                })
                .collect();
            rels.sort();
            rels
        })
        .collect()
}

fn set(groups: &[&[&str]]) -> BTreeSet<Vec<String>> {
    groups
        .iter()
        .map(|g| g.iter().map(|s| s.to_string()).collect())
        .collect()
}

#[test]
fn test_scan_empty_directory() {
    let dir = tempdir().unwrap();

    let report = DuplicateFinder::with_defaults().scan(dir.path()).unwrap();

    assert!(report.groups.is_empty());
    assert!(report.errors.is_empty());
    assert_eq!(report.stats.files_probed, 0);
    assert_eq!(report.stats.duplicate_groups, 0);
}

#[test]
fn test_scan_unique_files() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.txt", b"content a");
    write(dir.path(), "b.txt", b"content bb");
    write(dir.path(), "c.txt", b"content ccc");

    let report = DuplicateFinder::with_defaults().scan(dir.path()).unwrap();

    // Every size is unique, so nothing is read at all.
    assert!(report.groups.is_empty());
    assert_eq!(report.stats.files_probed, 3);
    assert_eq!(report.stats.digests_attempted, 0);
}

#[test]
fn test_scan_same_size_different_content() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.txt", b"aaaa");
    write(dir.path(), "b.txt", b"bbbb");

    let report = DuplicateFinder::with_defaults().scan(dir.path()).unwrap();

    assert_eq!(report.stats.digests_attempted, 2);
    assert_eq!(report.groups.len(), 2);
    assert!(report.duplicates().is_empty());
}

#[test]
fn test_scan_nested_duplicates() {
    let dir = tempdir().unwrap();
    write(dir.path(), "top.txt", b"shared");
    write(dir.path(), "one/two/deep.txt", b"shared");
    write(dir.path(), "one/other.txt", b"shared");
    write(dir.path(), "one/two/three/x.bin", b"xx");
    write(dir.path(), "y.bin", b"xx");
    write(dir.path(), "lonely.txt", b"nobody else");

    assert_eq!(
        duplicate_sets(dir.path(), 3),
        set(&[
            &["one/other.txt", "one/two/deep.txt", "top.txt"],
            &["one/two/three/x.bin", "y.bin"],
        ])
    );
}

#[test]
fn test_scan_is_idempotent() {
    let dir = tempdir().unwrap();
    for i in 0..40 {
        write(
            dir.path(),
            &format!("dir{}/file{}.dat", i % 5, i),
            format!("payload {}", i % 9).as_bytes(),
        );
    }

    let first = duplicate_sets(dir.path(), 2);
    let second = duplicate_sets(dir.path(), 2);
    let wide = duplicate_sets(dir.path(), 16);

    assert_eq!(first, second);
    assert_eq!(first, wide);
    assert_eq!(first.len(), 9);
}

#[test]
fn test_large_duplicates_span_many_chunks() {
    let dir = tempdir().unwrap();
    let big: Vec<u8> = (0..3 * 1024 * 1024 + 17).map(|i| (i % 251) as u8).collect();
    let mut tail_differs = big.clone();
    *tail_differs.last_mut().unwrap() ^= 0xff;

    write(dir.path(), "big1.bin", &big);
    write(dir.path(), "big2.bin", &big);
    write(dir.path(), "big3.bin", &tail_differs);

    assert_eq!(
        duplicate_sets(dir.path(), 2),
        set(&[&["big1.bin", "big2.bin"]])
    );
}

#[test]
fn test_digest_matches_whole_file_hash() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a", b"hello");
    write(dir.path(), "b", b"hello");

    let groups = detect(dir.path(), 2).unwrap();

    let expected = blake3::hash(b"hello").to_hex().to_string();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[&expected].len(), 2);
    assert_eq!(
        Hasher::new().digest_hex(&dir.path().join("a")).unwrap(),
        expected
    );
}

#[test]
fn test_mtime_reported_per_file() {
    let dir = tempdir().unwrap();
    write(dir.path(), "old.txt", b"same");
    write(dir.path(), "new.txt", b"same");
    filetime::set_file_mtime(
        dir.path().join("old.txt"),
        FileTime::from_unix_time(1_000_000_000, 0),
    )
    .unwrap();
    filetime::set_file_mtime(
        dir.path().join("new.txt"),
        FileTime::from_unix_time(1_700_000_000, 0),
    )
    .unwrap();

    let report = DuplicateFinder::with_defaults().scan(dir.path()).unwrap();
    let group = &report.duplicates()[0];

    assert_eq!(group.files[0].path, dir.path().join("new.txt"));
    assert_eq!(group.files[0].mtime, 1_700_000_000);
    assert_eq!(group.files[1].mtime, 1_000_000_000);
}

#[test]
fn test_custom_exclusions_prune_subtrees() {
    let dir = tempdir().unwrap();
    write(dir.path(), "keep/a.txt", b"dup");
    write(dir.path(), "keep/b.txt", b"dup");
    write(dir.path(), "node_modules/pkg/c.txt", b"dup");

    let config = ScanConfig::default().with_excludes(ExclusionSet::new(["node_modules"]));
    let report = DuplicateFinder::new(config).scan(dir.path()).unwrap();

    assert_eq!(report.stats.files_probed, 2);
    assert_eq!(report.duplicates()[0].len(), 2);
}

#[test]
fn test_root_is_file() {
    let dir = tempdir().unwrap();
    write(dir.path(), "file.txt", b"x");

    let err = detect(&dir.path().join("file.txt"), 2).unwrap_err();

    assert!(matches!(err, FinderError::InvalidRoot(_)));
    assert!(err.to_string().contains("file.txt is not a directory"));
}

#[test]
fn test_report_stats_are_consistent() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a", b"12345");
    write(dir.path(), "b", b"12345");
    write(dir.path(), "c", b"12345");
    write(dir.path(), "d", b"54321");
    write(dir.path(), "e", b"1");

    let report = DuplicateFinder::with_defaults().scan(dir.path()).unwrap();
    let stats = &report.stats;

    assert_eq!(stats.files_found, 5);
    assert_eq!(stats.files_probed, 5);
    assert_eq!(stats.total_size, 21);
    assert_eq!(stats.candidates, 4);
    assert_eq!(stats.eliminated_by_size, 1);
    assert_eq!(stats.hashed_files, 4);
    assert_eq!(stats.digest_groups, 2);
    assert_eq!(stats.duplicate_groups, 1);
    assert_eq!(stats.duplicate_files, 2);
    assert_eq!(stats.reclaimable_space, 10);
}
