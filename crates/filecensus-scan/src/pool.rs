//! Worker pool sizing.

use rayon::{ThreadPool, ThreadPoolBuilder};

use filecensus_core::ScanError;

/// Number of worker slots for a configured thread count (0 = one per CPU).
pub fn worker_slots(threads: usize) -> usize {
    match threads {
        0 => num_cpus::get().max(1),
        n => n,
    }
}

/// Build a dedicated pool with a fixed number of worker slots.
pub(crate) fn build_pool(threads: usize, label: &'static str) -> Result<ThreadPool, ScanError> {
    ThreadPoolBuilder::new()
        .num_threads(worker_slots(threads))
        .thread_name(move |i| format!("census-{label}-{i}"))
        .build()
        .map_err(|e| ScanError::WorkerPool {
            message: e.to_string(),
        })
}
