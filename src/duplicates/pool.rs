//! Fixed-size worker pool fed by a bounded work queue.
//!
//! # Overview
//!
//! [`WorkerPool::run`] drives one phase of the pipeline:
//!
//! ```text
//! source (calling thread) ──► bounded queue ──► worker 0 ─┐
//!                                           ├─► worker 1 ─┼─► completion channel ──► reducer
//!                                           └─► worker N ─┘
//! ```
//!
//! Every worker owns a private `HashMap<K, Vec<V>>` and never touches
//! another worker's state. When the queue is closed and drained, each worker
//! sends its partial map on a completion channel and exits; the calling
//! thread is the only reducer and appends the partial lists key by key.
//!
//! The producer blocks while the queue is full, so a fast source cannot
//! outrun the workers. The completion channel holds one report per worker,
//! so a finished worker never blocks. Workers are scoped threads and cannot
//! outlive [`WorkerPool::run`].

use std::collections::HashMap;
use std::hash::Hash;
use std::thread;

use crossbeam_channel::{bounded, Receiver};

use crate::scanner::{ScanConfig, ScanError};

/// Merged result of one pool run.
#[derive(Debug)]
pub struct PoolOutput<K, V> {
    /// Values grouped by key, merged across all workers
    pub groups: HashMap<K, Vec<V>>,
    /// Per-item errors reported by the workers
    pub errors: Vec<ScanError>,
    /// Number of items the workers dequeued
    pub processed: usize,
    /// Number of workers that reported back
    pub reports: usize,
}

impl<K, V> Default for PoolOutput<K, V> {
    fn default() -> Self {
        Self {
            groups: HashMap::new(),
            errors: Vec::new(),
            processed: 0,
            reports: 0,
        }
    }
}

impl<K: Eq + Hash, V> PoolOutput<K, V> {
    /// Fold one worker's partial result into this output.
    fn merge(&mut self, report: WorkerReport<K, V>) {
        for (key, mut values) in report.groups {
            self.groups.entry(key).or_default().append(&mut values);
        }
        self.errors.extend(report.errors);
        self.processed += report.processed;
        self.reports += 1;
    }

    /// Total number of values across all groups.
    #[must_use]
    pub fn value_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }
}

/// What a single worker sends back when its queue is drained.
struct WorkerReport<K, V> {
    groups: HashMap<K, Vec<V>>,
    errors: Vec<ScanError>,
    processed: usize,
}

/// A fixed number of workers consuming a bounded queue.
#[derive(Debug, Clone)]
pub struct WorkerPool {
    /// Phase name used in log lines
    name: &'static str,
    /// Number of workers (at least 1)
    workers: usize,
    /// Capacity of the work queue (at least 1)
    queue_capacity: usize,
}

impl WorkerPool {
    /// Create a pool sized from the scan configuration.
    #[must_use]
    pub fn new(name: &'static str, config: &ScanConfig) -> Self {
        Self {
            name,
            workers: config.workers.max(1),
            queue_capacity: config.queue_capacity.max(1),
        }
    }

    /// Number of workers this pool starts.
    #[must_use]
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Feed every item of `source` through `work` and merge the results.
    ///
    /// Workers start before the first item is queued. `source` is consumed
    /// on the calling thread, which blocks whenever the queue is full. An
    /// `Err` from `work` is logged and collected; the worker carries on
    /// with the next item.
    ///
    /// # Panics
    ///
    /// Propagates a panic raised inside `work`.
    pub fn run<I, T, K, V, F>(&self, source: I, work: F) -> PoolOutput<K, V>
    where
        I: IntoIterator<Item = T>,
        T: Send,
        K: Eq + Hash + Send,
        V: Send,
        F: Fn(T) -> Result<(K, V), ScanError> + Sync,
    {
        let name = self.name;
        let (task_tx, task_rx) = bounded::<T>(self.queue_capacity);
        let (done_tx, done_rx) = bounded::<WorkerReport<K, V>>(self.workers);
        let work = &work;

        thread::scope(|scope| {
            for id in 0..self.workers {
                let task_rx = task_rx.clone();
                let done_tx = done_tx.clone();
                scope.spawn(move || {
                    let report = worker_loop(name, id, &task_rx, work);
                    if done_tx.send(report).is_err() {
                        log::debug!("{name} worker {id}: nobody is collecting results");
                    }
                });
            }
            drop(task_rx);
            drop(done_tx);

            let mut queued = 0usize;
            for item in source {
                if task_tx.send(item).is_err() {
                    log::error!("{name}: every worker exited early, stopping the queue");
                    break;
                }
                queued += 1;
            }
            // Closing the queue tells the workers to drain and stop.
            drop(task_tx);
            log::debug!("{name}: queued {queued} items for {} workers", self.workers);

            let mut output = PoolOutput::default();
            for report in done_rx.iter() {
                output.merge(report);
            }
            output
        })
    }
}

fn worker_loop<T, K, V, F>(
    name: &str,
    id: usize,
    tasks: &Receiver<T>,
    work: &F,
) -> WorkerReport<K, V>
where
    K: Eq + Hash,
    F: Fn(T) -> Result<(K, V), ScanError>,
{
    log::debug!("{name} worker {id}: starting up");

    let mut report = WorkerReport {
        groups: HashMap::new(),
        errors: Vec::new(),
        processed: 0,
    };

    for item in tasks.iter() {
        report.processed += 1;
        match work(item) {
            Ok((key, value)) => report.groups.entry(key).or_default().push(value),
            Err(e) => {
                if e.kind() == std::io::ErrorKind::NotFound {
                    log::debug!("{name} worker {id}: skipping vanished file: {e}");
                } else {
                    log::warn!("{name} worker {id}: {e}");
                }
                report.errors.push(e);
            }
        }
    }

    log::debug!(
        "{name} worker {id}: sending back {} groups from {} items",
        report.groups.len(),
        report.processed
    );
    report
}
