//! Census orchestration: validation, counting, aggregation, assembly.

use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::info;

use filecensus_core::{ScanConfig, ScanError, ScanResult};

use crate::aggregator::aggregate;
use crate::counter::count_in_scope;
use crate::fs::{DirLister, FsLister};
use crate::progress::{NoProgress, ProgressSink};

/// Runs both census passes over a [`DirLister`].
pub struct CensusScanner<L = FsLister> {
    lister: L,
}

impl CensusScanner<FsLister> {
    /// Create a scanner over the local filesystem.
    pub fn new() -> Self {
        Self { lister: FsLister }
    }
}

impl Default for CensusScanner<FsLister> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: DirLister> CensusScanner<L> {
    /// Create a scanner over a custom directory lister.
    pub fn with_lister(lister: L) -> Self {
        Self { lister }
    }

    /// Perform a census without progress reporting.
    pub fn scan(&self, config: &ScanConfig) -> Result<ScanResult, ScanError> {
        self.scan_with_progress(config, &NoProgress)
    }

    /// Perform a census, reporting progress to `progress`.
    ///
    /// Invalid configurations and unusable roots are rejected before any
    /// traversal. A failing counting pass is fatal. Failures during
    /// aggregation end up in [`ScanResult::error`] next to whatever was
    /// aggregated successfully.
    pub fn scan_with_progress(
        &self,
        config: &ScanConfig,
        progress: &dyn ProgressSink,
    ) -> Result<ScanResult, ScanError> {
        let start = Instant::now();
        config.validate()?;

        let config = ScanConfig {
            root: normalize_path(&config.root),
            ..config.clone()
        };

        match self.lister.is_dir(&config.root) {
            Ok(true) => {}
            Ok(false) => return Err(ScanError::NotADirectory { path: config.root }),
            Err(err) => return Err(ScanError::io(&config.root, err)),
        }

        info!(
            root = %config.root.display(),
            category = %config.category,
            grouping = %config.grouping,
            scoped = config.is_scoped(),
            "starting census"
        );

        let total = count_in_scope(&self.lister, &config)?;
        progress.set_total(total);

        let (aggregate, error) = aggregate(&self.lister, &config, progress)?;

        Ok(ScanResult::new(aggregate, &config, start.elapsed(), error))
    }
}

/// Lexically normalize a path: drop `.` segments and trailing separators.
pub fn normalize_path(path: &Path) -> PathBuf {
    let normalized: PathBuf = path.components().collect();
    if normalized.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        normalized
    }
}
