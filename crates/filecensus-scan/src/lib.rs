//! Concurrent traversal and aggregation engine for filecensus.
//!
//! # Overview
//!
//! A census runs in two passes over a [`DirLister`]:
//!
//! - **Counting pass**: a read-only parallel walk on a fixed-size worker
//!   pool that totals the in-scope files, used to size progress reporting
//! - **Aggregation pass**: one rayon task per directory; each task
//!   accumulates a local tally and merges it into the shared aggregate
//!   under a single lock once its directory is done
//!
//! Failures during aggregation never abort the scan: access-denied directories
//! are skipped silently, everything else is collected and returned next to
//! the partial result.
//!
//! # Example
//!
//! ```rust,no_run
//! use filecensus_scan::{CensusScanner, FileCategory, ScanConfig};
//!
//! let config = ScanConfig::builder()
//!     .root("/path/to/scan")
//!     .category(FileCategory::Video)
//!     .build()
//!     .unwrap();
//!
//! let result = CensusScanner::new().scan(&config).unwrap();
//! for row in &result.rows {
//!     println!("{}: {} files, {} bytes", row.key.display(), row.tally.count, row.tally.bytes);
//! }
//! if let Some(err) = &result.error {
//!     eprintln!("partial result: {err}");
//! }
//! ```
//!
//! # Progress Monitoring
//!
//! ```rust,no_run
//! use filecensus_scan::{BroadcastProgress, CensusScanner, ScanConfig};
//!
//! let progress = BroadcastProgress::new();
//! let mut progress_rx = progress.subscribe();
//!
//! // Handle progress in a separate task
//! tokio::spawn(async move {
//!     while let Ok(update) = progress_rx.recv().await {
//!         println!("{}/{} files", update.files_processed, update.total_files);
//!     }
//! });
//!
//! let config = ScanConfig::new("/path/to/scan");
//! let result = CensusScanner::new().scan_with_progress(&config, &progress);
//! ```

mod aggregator;
mod collector;
mod counter;
mod fs;
mod pool;
mod progress;
mod scanner;

pub use aggregator::aggregate;
pub use collector::{DEFAULT_ERROR_BUFFER, ErrorCollector};
pub use counter::count_in_scope;
pub use fs::{DirLister, EntryKind, FsLister, ListedEntry};
pub use pool::worker_slots;
pub use progress::{BroadcastProgress, CountingProgress, NoProgress, ProgressSink, ScanProgress};
pub use scanner::{CensusScanner, normalize_path};

// Re-export core types for convenience
pub use filecensus_core::{
    Aggregate, CensusRow, DEFAULT_SCOPE_ANCHOR, FileCategory, FileTally, GroupingMode,
    IncompleteScan, ScanConfig, ScanError, ScanResult, ScanWarning, SortColumn, SortDirection,
    WarningKind,
};
