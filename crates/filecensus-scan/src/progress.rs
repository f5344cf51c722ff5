//! Census progress reporting.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use tokio::sync::broadcast;

/// Receives progress from a census.
///
/// `set_total` is called once after the counting pass, `increment` once per
/// file decision during aggregation, from many worker threads.
pub trait ProgressSink: Send + Sync {
    /// Set the number of file decisions the aggregation pass will make.
    fn set_total(&self, total: u64);

    /// Record one file decision.
    fn increment(&self);
}

/// Sink that ignores all progress.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn set_total(&self, _total: u64) {}

    fn increment(&self) {}
}

/// Sink that just counts, handy for checking totals.
#[derive(Debug, Default)]
pub struct CountingProgress {
    total: AtomicU64,
    done: AtomicU64,
}

impl CountingProgress {
    /// Create a new counter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total announced by the counting pass.
    pub fn total(&self) -> u64 {
        self.total.load(Ordering::Acquire)
    }

    /// File decisions recorded so far.
    pub fn done(&self) -> u64 {
        self.done.load(Ordering::Acquire)
    }
}

impl ProgressSink for CountingProgress {
    fn set_total(&self, total: u64) {
        self.total.store(total, Ordering::Release);
    }

    fn increment(&self) {
        self.done.fetch_add(1, Ordering::AcqRel);
    }
}

/// Progress snapshot published by [`BroadcastProgress`].
#[derive(Debug, Clone, PartialEq)]
pub struct ScanProgress {
    /// File decisions made so far.
    pub files_processed: u64,
    /// Total expected file decisions (0 until the counting pass ends).
    pub total_files: u64,
    /// Time elapsed since the sink was created.
    pub elapsed: Duration,
}

impl ScanProgress {
    /// Create initial progress state.
    pub fn new() -> Self {
        Self {
            files_processed: 0,
            total_files: 0,
            elapsed: Duration::ZERO,
        }
    }

    /// Completed fraction in `0.0..=1.0`.
    pub fn fraction(&self) -> f64 {
        if self.total_files == 0 {
            0.0
        } else {
            (self.files_processed as f64 / self.total_files as f64).min(1.0)
        }
    }

    /// Check if every expected file decision has been made.
    pub fn is_complete(&self) -> bool {
        self.total_files > 0 && self.files_processed >= self.total_files
    }
}

impl Default for ScanProgress {
    fn default() -> Self {
        Self::new()
    }
}

/// Sink publishing snapshots over a tokio broadcast channel.
///
/// A snapshot goes out when the total is set, every `every` decisions, and
/// on the final decision. Sends never block; lagging receivers just miss
/// intermediate snapshots.
#[derive(Debug)]
pub struct BroadcastProgress {
    tx: broadcast::Sender<ScanProgress>,
    start_time: Instant,
    every: u64,
    total: AtomicU64,
    done: AtomicU64,
}

impl BroadcastProgress {
    /// Create a sink publishing every 1000 decisions.
    pub fn new() -> Self {
        Self::with_interval(1000)
    }

    /// Create a sink publishing every `every` decisions.
    pub fn with_interval(every: u64) -> Self {
        let (tx, _) = broadcast::channel(100);
        Self {
            tx,
            start_time: Instant::now(),
            every: every.max(1),
            total: AtomicU64::new(0),
            done: AtomicU64::new(0),
        }
    }

    /// Subscribe to progress updates.
    pub fn subscribe(&self) -> broadcast::Receiver<ScanProgress> {
        self.tx.subscribe()
    }

    fn publish(&self, files_processed: u64) {
        let _ = self.tx.send(ScanProgress {
            files_processed,
            total_files: self.total.load(Ordering::Acquire),
            elapsed: self.start_time.elapsed(),
        });
    }
}

impl Default for BroadcastProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for BroadcastProgress {
    fn set_total(&self, total: u64) {
        self.total.store(total, Ordering::Release);
        self.publish(self.done.load(Ordering::Acquire));
    }

    fn increment(&self) {
        let done = self.done.fetch_add(1, Ordering::AcqRel) + 1;
        if done % self.every == 0 || done == self.total.load(Ordering::Acquire) {
            self.publish(done);
        }
    }
}
