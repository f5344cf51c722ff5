//! Aggregation pass: the authoritative parallel walk.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use std::time::Instant;

use rayon::Scope;
use tracing::{debug, info, warn};

use filecensus_core::{
    Aggregate, FileTally, IncompleteScan, ScanConfig, ScanError, enters_scope, file_in_scope,
    resolve_key, root_in_scope, should_count, should_descend,
};

use crate::collector::ErrorCollector;
use crate::fs::{DirLister, EntryKind};
use crate::pool::build_pool;
use crate::progress::ProgressSink;

/// Walk the tree under `config.root` and build the keyed aggregate.
///
/// Each directory is its own task; every task is joined before the
/// aggregate is read. Reportable failures are collected rather than
/// propagated, so a bad subtree never stops its siblings. The outer
/// `Result` only fails when a worker pool cannot be started.
pub fn aggregate<L>(
    lister: &L,
    config: &ScanConfig,
    progress: &dyn ProgressSink,
) -> Result<(Aggregate, Option<IncompleteScan>), ScanError>
where
    L: DirLister + ?Sized,
{
    let start = Instant::now();
    let pass = AggregationPass {
        lister,
        config,
        progress,
        aggregate: Mutex::new(Aggregate::new()),
        errors: ErrorCollector::new(),
    };

    let walk = || rayon::scope(|s| pass.visit_dir(s, config.root.clone(), root_in_scope(config)));
    match config.threads {
        0 => walk(),
        n => build_pool(n, "aggregate")?.install(walk),
    }

    let AggregationPass {
        aggregate, errors, ..
    } = pass;
    let aggregate = aggregate.into_inner().unwrap_or_else(PoisonError::into_inner);
    let errors = errors.finish();

    info!(
        keys = aggregate.len(),
        errors = errors.as_ref().map_or(0, IncompleteScan::len),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "aggregation pass complete"
    );
    Ok((aggregate, errors))
}

/// Shared state of one aggregation pass.
struct AggregationPass<'a, L: ?Sized> {
    lister: &'a L,
    config: &'a ScanConfig,
    progress: &'a dyn ProgressSink,
    aggregate: Mutex<Aggregate>,
    errors: ErrorCollector,
}

impl<'a, L> AggregationPass<'a, L>
where
    L: DirLister + ?Sized,
{
    fn visit_dir<'s>(&'s self, scope: &Scope<'s>, dir: PathBuf, in_scope: bool) {
        let entries = match self.lister.list(&dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::PermissionDenied => {
                debug!(path = %dir.display(), "permission denied, skipping");
                return;
            }
            Err(err) => {
                warn!(path = %dir.display(), error = %err, "failed to read directory");
                self.errors.report(ScanError::read_dir(&dir, err));
                return;
            }
        };

        let mut local = FileTally::default();
        let mut subdirs = Vec::new();

        for entry in entries {
            let name = entry.name.to_string_lossy();
            match entry.kind {
                EntryKind::Directory => {
                    if should_descend(&name, in_scope, self.config) {
                        let child_in_scope = enters_scope(&name, in_scope, self.config);
                        subdirs.push((dir.join(&entry.name), child_in_scope));
                    }
                }
                EntryKind::File => {
                    if !file_in_scope(&name, in_scope, self.config) {
                        continue;
                    }
                    let path = dir.join(&entry.name);
                    let recorded = self.record_file(&path, &mut local);
                    self.progress.increment();
                    if let Err(err) = recorded {
                        // the whole subtree is abandoned, nothing of it is merged
                        warn!(path = %path.display(), error = %err, "failed to read file metadata");
                        self.errors.report(ScanError::metadata(&path, err));
                        return;
                    }
                }
            }
        }

        for (path, child_in_scope) in subdirs {
            scope.spawn(move |s| self.visit_dir(s, path, child_in_scope));
        }

        if !local.is_empty() {
            let key = resolve_key(&dir, self.config);
            self.aggregate
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .merge(key, local);
        }
    }

    /// Apply the filters to one in-scope file and add it to the task tally.
    fn record_file(&self, path: &Path, local: &mut FileTally) -> io::Result<()> {
        if should_count(path, self.config.category, self.config.name_filter()) {
            local.record_file(self.lister.file_size(path)?);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::FsLister;
    use crate::progress::{CountingProgress, NoProgress};
    use filecensus_core::{FileCategory, GroupingMode};
    use std::fs;
    use tempfile::TempDir;

    fn create_test_tree() -> TempDir {
        let temp = TempDir::new().unwrap();
        let root = temp.path();

        fs::create_dir_all(root.join("dir1/subdir")).unwrap();
        fs::create_dir(root.join("dir2")).unwrap();

        fs::write(root.join("file1.txt"), "hello").unwrap();
        fs::write(root.join("dir1/file2.txt"), "world world world").unwrap();
        fs::write(root.join("dir1/clip.mp4"), "0123456789").unwrap();
        fs::write(root.join("dir1/subdir/file3.txt"), "test").unwrap();
        fs::write(root.join("dir2/file4.txt"), "another file here").unwrap();

        temp
    }

    #[test]
    fn test_basic_aggregate() {
        let temp = create_test_tree();
        let config = ScanConfig::new(temp.path());

        let (aggregate, errors) = aggregate(&FsLister, &config, &NoProgress).unwrap();

        assert!(errors.is_none());
        assert_eq!(aggregate.len(), 4);
        assert_eq!(aggregate.total(), FileTally::new(5, 53));
        assert_eq!(
            aggregate.get(&temp.path().join("dir1")),
            Some(&FileTally::new(2, 27))
        );
    }

    #[test]
    fn test_type_filter() {
        let temp = create_test_tree();
        let config = ScanConfig::builder()
            .root(temp.path())
            .category(FileCategory::Video)
            .build()
            .unwrap();

        let (aggregate, _) = aggregate(&FsLister, &config, &NoProgress).unwrap();

        // directories without matches produce no rows
        assert_eq!(aggregate.len(), 1);
        assert_eq!(aggregate.total(), FileTally::new(1, 10));
    }

    #[test]
    fn test_progress_counts_every_decision() {
        let temp = create_test_tree();
        let config = ScanConfig::builder()
            .root(temp.path())
            .category(FileCategory::Video)
            .threads(2usize)
            .build()
            .unwrap();

        let progress = CountingProgress::new();
        aggregate(&FsLister, &config, &progress).unwrap();

        // filtered-out files still advance progress
        assert_eq!(progress.done(), 5);
    }

    #[test]
    fn test_parent_collapsed_grouping() {
        let temp = create_test_tree();
        let config = ScanConfig::builder()
            .root(temp.path())
            .grouping(GroupingMode::ParentCollapsed)
            .build()
            .unwrap();

        let (aggregate, _) = aggregate(&FsLister, &config, &NoProgress).unwrap();

        // dir1/subdir folds into dir1; dir1, dir2 and the root fold into the root
        assert_eq!(aggregate.len(), 2);
        assert_eq!(
            aggregate.get(&temp.path().join("dir1")),
            Some(&FileTally::new(1, 4))
        );
        assert_eq!(aggregate.get(temp.path()), Some(&FileTally::new(4, 49)));
    }
}
