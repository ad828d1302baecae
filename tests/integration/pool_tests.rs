use crossbeam_channel::bounded;
use dupescan::duplicates::{group_by_size, WorkerPool};
use dupescan::scanner::{probe, ScanConfig, Walker};
use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tempfile::tempdir;

#[test]
fn test_producer_is_throttled_by_queue_capacity() {
    let config = ScanConfig::default()
        .with_workers(1)
        .with_queue_capacity(2);
    let pulled = Arc::new(AtomicUsize::new(0));
    let (gate_tx, gate_rx) = bounded::<()>(0);

    let observer = {
        let pulled = Arc::clone(&pulled);
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(200));
            let seen = pulled.load(Ordering::SeqCst);
            gate_tx.send(()).unwrap();
            seen
        })
    };

    let counter = Arc::clone(&pulled);
    let source = (0..50u32).inspect(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    let output = WorkerPool::new("gated", &config).run(source, |n| {
        if n == 0 {
            gate_rx.recv().unwrap();
        }
        Ok((n, n))
    });

    let seen_while_blocked = observer.join().unwrap();
    // One item in the worker, two queued, one held by the blocked producer.
    assert!(seen_while_blocked <= 4, "pulled {seen_while_blocked} items");
    assert_eq!(output.processed, 50);
}

#[test]
fn test_pool_matches_sequential_grouping() {
    let dir = tempdir().unwrap();
    for i in 0..60 {
        let content = "x".repeat(i % 11);
        fs::write(dir.path().join(format!("f{i}")), content).unwrap();
    }

    let walker = Walker::new(dir.path(), &ScanConfig::default());
    let sequential: Vec<_> = walker
        .walk()
        .filter_map(Result::ok)
        .map(|p| probe(&p).unwrap())
        .collect();
    let (expected, _) = group_by_size(sequential);

    let config = ScanConfig::default().with_workers(6).with_queue_capacity(3);
    let output = WorkerPool::new("size", &config).run(
        walker.walk().filter_map(Result::ok),
        |path| {
            let file = probe(&path)?;
            Ok((file.size, file))
        },
    );

    assert!(output.errors.is_empty());
    assert_eq!(output.reports, 6);
    for (size, files) in &expected {
        let mut want: Vec<_> = files.iter().map(|f| f.path.clone()).collect();
        let mut got: Vec<_> = output.groups[size].iter().map(|f| f.path.clone()).collect();
        want.sort();
        got.sort();
        assert_eq!(want, got);
    }
}
