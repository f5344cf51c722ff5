//! Grouping modes and aggregation key resolution.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::config::ScanConfig;

/// Key identifying one row of the final report.
pub type AggregateKey = PathBuf;

/// How file locations collapse into report rows.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
#[serde(rename_all = "kebab-case")]
pub enum GroupingMode {
    /// One row per directory that directly contains counted files.
    #[default]
    PerDirectory,
    /// One row per parent of the containing directory.
    ParentCollapsed,
    /// A single row for the whole tree, keyed by the scan root.
    RootSummary,
}

/// Resolve the aggregation key for files found directly in `file_dir`.
///
/// Parent collapsing never climbs above the scan root, so files sitting
/// directly in the root (or one level below it) are grouped under the root.
pub fn resolve_key(file_dir: &Path, config: &ScanConfig) -> AggregateKey {
    match config.grouping {
        GroupingMode::PerDirectory => file_dir.to_path_buf(),
        GroupingMode::RootSummary => config.root.clone(),
        GroupingMode::ParentCollapsed => {
            if file_dir == config.root {
                return config.root.clone();
            }
            file_dir
                .parent()
                .filter(|parent| parent.starts_with(&config.root))
                .map(Path::to_path_buf)
                .unwrap_or_else(|| config.root.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(grouping: GroupingMode) -> ScanConfig {
        ScanConfig::builder()
            .root("/media")
            .grouping(grouping)
            .build()
            .unwrap()
    }

    #[test]
    fn test_per_directory_key_is_unchanged() {
        let config = config(GroupingMode::PerDirectory);
        assert_eq!(
            resolve_key(Path::new("/media/shows/s01"), &config),
            PathBuf::from("/media/shows/s01")
        );
    }

    #[test]
    fn test_root_summary_collapses_everything() {
        let config = config(GroupingMode::RootSummary);
        assert_eq!(
            resolve_key(Path::new("/media/shows/s01/extras"), &config),
            PathBuf::from("/media")
        );
        assert_eq!(resolve_key(Path::new("/media"), &config), PathBuf::from("/media"));
    }

    #[test]
    fn test_parent_collapsed_groups_siblings() {
        let config = config(GroupingMode::ParentCollapsed);
        assert_eq!(
            resolve_key(Path::new("/media/shows/s01"), &config),
            PathBuf::from("/media/shows")
        );
        assert_eq!(
            resolve_key(Path::new("/media/shows/s02"), &config),
            PathBuf::from("/media/shows")
        );
        assert_eq!(resolve_key(Path::new("/media/shows"), &config), PathBuf::from("/media"));
        assert_eq!(resolve_key(Path::new("/media"), &config), PathBuf::from("/media"));
    }

    #[test]
    fn test_grouping_mode_names() {
        assert_eq!(GroupingMode::ParentCollapsed.to_string(), "parent-collapsed");
        assert_eq!(
            "Root-Summary".parse::<GroupingMode>().unwrap(),
            GroupingMode::RootSummary
        );
    }
}
