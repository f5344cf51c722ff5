//! Counting pass: sizes the progress indicator before aggregation.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use rayon::prelude::*;
use tracing::{debug, info};

use filecensus_core::{
    ScanConfig, ScanError, enters_scope, file_in_scope, root_in_scope, should_descend,
};

use crate::fs::{DirLister, EntryKind};
use crate::pool::build_pool;

/// Count the files the aggregation pass will make a decision on.
///
/// Scope and hidden-entry rules are honored so the total matches the
/// aggregation pass exactly; type and name filters are left to aggregation.
/// The walk runs on its own pool with one worker slot per CPU (or the
/// configured thread count). A directory that cannot be read for lack of
/// permission counts as zero; any other read failure aborts the pass.
pub fn count_in_scope<L>(lister: &L, config: &ScanConfig) -> Result<u64, ScanError>
where
    L: DirLister + ?Sized,
{
    let start = Instant::now();
    let pool = build_pool(config.threads, "count")?;
    let total = pool.install(|| count_dir(lister, &config.root, root_in_scope(config), config))?;

    info!(
        total,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "counting pass complete"
    );
    Ok(total)
}

fn count_dir<L>(lister: &L, dir: &Path, in_scope: bool, config: &ScanConfig) -> Result<u64, ScanError>
where
    L: DirLister + ?Sized,
{
    let entries = match lister.list(dir) {
        Ok(entries) => entries,
        Err(err) if err.kind() == io::ErrorKind::PermissionDenied => {
            debug!(path = %dir.display(), "permission denied, not counted");
            return Ok(0);
        }
        Err(err) => return Err(ScanError::read_dir(dir, err)),
    };

    let mut files = 0u64;
    let mut subdirs: Vec<(PathBuf, bool)> = Vec::new();

    for entry in entries {
        let name = entry.name.to_string_lossy();
        match entry.kind {
            EntryKind::Directory => {
                if should_descend(&name, in_scope, config) {
                    let child_in_scope = enters_scope(&name, in_scope, config);
                    subdirs.push((dir.join(&entry.name), child_in_scope));
                }
            }
            EntryKind::File => {
                if file_in_scope(&name, in_scope, config) {
                    files += 1;
                }
            }
        }
    }

    let nested = subdirs
        .into_par_iter()
        .map(|(path, child_in_scope)| count_dir(lister, &path, child_in_scope, config))
        .try_reduce(|| 0, |a, b| Ok(a + b))?;

    Ok(files + nested)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::FsLister;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_tree() -> TempDir {
        let temp = TempDir::new().unwrap();
        let root = temp.path();

        fs::create_dir_all(root.join("Videos/Sub")).unwrap();
        fs::create_dir_all(root.join("Other/.hidden")).unwrap();

        fs::write(root.join("top.txt"), "x").unwrap();
        fs::write(root.join("Videos/a.mp4"), "aaaa").unwrap();
        fs::write(root.join("Videos/Sub/b.mp4"), "bb").unwrap();
        fs::write(root.join("Other/c.mp4"), "c").unwrap();
        fs::write(root.join("Other/.hidden/d.mp4"), "d").unwrap();

        temp
    }

    #[test]
    fn test_counts_every_file() {
        let temp = create_test_tree();
        let config = ScanConfig::new(temp.path());
        assert_eq!(count_in_scope(&FsLister, &config).unwrap(), 5);
    }

    #[test]
    fn test_counts_only_scoped_files() {
        let temp = create_test_tree();
        let config = ScanConfig::builder()
            .root(temp.path())
            .scope_anchor("Videos")
            .build()
            .unwrap();
        assert_eq!(count_in_scope(&FsLister, &config).unwrap(), 2);
    }

    #[test]
    fn test_skips_hidden_when_excluded() {
        let temp = create_test_tree();
        let config = ScanConfig::builder()
            .root(temp.path())
            .include_hidden(false)
            .threads(2usize)
            .build()
            .unwrap();
        assert_eq!(count_in_scope(&FsLister, &config).unwrap(), 4);
    }

    #[test]
    fn test_missing_root_is_fatal() {
        let temp = TempDir::new().unwrap();
        let config = ScanConfig::new(temp.path().join("missing"));
        assert!(matches!(
            count_in_scope(&FsLister, &config),
            Err(ScanError::ReadDir { .. })
        ));
    }
}
