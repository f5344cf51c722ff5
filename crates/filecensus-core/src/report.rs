//! Census results: row assembly, sorting and the final report.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::config::ScanConfig;
use crate::error::IncompleteScan;
use crate::grouping::{AggregateKey, GroupingMode};
use crate::tally::{Aggregate, FileTally};

/// Column used to order report rows.
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
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum SortColumn {
    /// Aggregation key (directory path), compared byte-wise.
    #[strum(to_string = "name", serialize = "directory", serialize = "directories")]
    Name,
    /// Number of counted files.
    #[default]
    Count,
    /// Total size in bytes.
    Size,
}

/// Direction used to order report rows.
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
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Smallest first.
    #[default]
    #[strum(to_string = "ascending", serialize = "asc")]
    Ascending,
    /// Largest first.
    #[strum(to_string = "descending", serialize = "desc")]
    Descending,
}

impl SortDirection {
    /// Pick a direction from a "descending" flag.
    pub fn from_descending(descending: bool) -> Self {
        if descending {
            Self::Descending
        } else {
            Self::Ascending
        }
    }

    /// Reverse the current direction.
    pub fn reverse(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

/// One row of the census report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CensusRow {
    /// Directory (or root) this row groups.
    pub key: AggregateKey,
    /// Files counted under this key.
    pub tally: FileTally,
}

impl CensusRow {
    /// Create a new row.
    pub fn new(key: impl Into<AggregateKey>, tally: FileTally) -> Self {
        Self {
            key: key.into(),
            tally,
        }
    }
}

fn key_order(a: &Path, b: &Path) -> Ordering {
    a.as_os_str()
        .as_encoded_bytes()
        .cmp(b.as_os_str().as_encoded_bytes())
}

/// Sort rows by a column and direction.
///
/// Ties on the chosen column always fall back to ascending key order, so
/// the output is reproducible regardless of the aggregate's iteration order.
pub fn sort_rows(rows: &mut [CensusRow], column: SortColumn, direction: SortDirection) {
    rows.sort_by(|a, b| {
        let primary = match column {
            SortColumn::Name => key_order(&a.key, &b.key),
            SortColumn::Count => a.tally.count.cmp(&b.tally.count),
            SortColumn::Size => a.tally.bytes.cmp(&b.tally.bytes),
        };
        let primary = match direction {
            SortDirection::Ascending => primary,
            SortDirection::Descending => primary.reverse(),
        };
        primary.then_with(|| key_order(&a.key, &b.key))
    });
}

/// Turn a frozen aggregate into sorted rows and grand totals.
///
/// Under [`GroupingMode::RootSummary`] exactly one row keyed by the root is
/// produced, whatever the aggregate holds internally.
pub fn assemble(aggregate: Aggregate, config: &ScanConfig) -> (Vec<CensusRow>, FileTally) {
    let total = aggregate.total();

    let mut rows: Vec<CensusRow> = match config.grouping {
        GroupingMode::RootSummary => vec![CensusRow::new(config.root.clone(), total)],
        GroupingMode::PerDirectory | GroupingMode::ParentCollapsed => aggregate
            .into_iter()
            .map(|(key, tally)| CensusRow::new(key, tally))
            .collect(),
    };

    sort_rows(&mut rows, config.sort_column, config.sort_direction);
    (rows, total)
}

/// Complete census result.
#[derive(Debug)]
pub struct ScanResult {
    /// Sorted report rows.
    pub rows: Vec<CensusRow>,

    /// Sum of every row.
    pub total: FileTally,

    /// Root path that was scanned.
    pub root_path: PathBuf,

    /// When this scan was performed.
    pub scanned_at: SystemTime,

    /// Duration of the scan.
    pub scan_duration: Duration,

    /// Reportable failures collected while scanning, if any.
    pub error: Option<IncompleteScan>,
}

impl ScanResult {
    /// Assemble a result from a frozen aggregate.
    pub fn new(
        aggregate: Aggregate,
        config: &ScanConfig,
        scan_duration: Duration,
        error: Option<IncompleteScan>,
    ) -> Self {
        let (rows, total) = assemble(aggregate, config);
        Self {
            rows,
            total,
            root_path: config.root.clone(),
            scanned_at: SystemTime::now(),
            scan_duration,
            error,
        }
    }

    /// Total number of counted files.
    pub fn total_files(&self) -> u64 {
        self.total.count
    }

    /// Total size of counted files in bytes.
    pub fn total_size(&self) -> u64 {
        self.total.bytes
    }

    /// Check if no file was counted.
    pub fn is_empty(&self) -> bool {
        self.total.count == 0
    }

    /// Check if any subtree failed while scanning.
    pub fn is_partial(&self) -> bool {
        self.error.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Aggregate {
        vec![
            (PathBuf::from("/m/b"), FileTally::new(3, 10)),
            (PathBuf::from("/m/a"), FileTally::new(1, 30)),
            (PathBuf::from("/m/c"), FileTally::new(2, 20)),
        ]
        .into_iter()
        .collect()
    }

    fn keys(rows: &[CensusRow]) -> Vec<&str> {
        rows.iter().map(|r| r.key.to_str().unwrap()).collect()
    }

    #[test]
    fn test_sort_by_each_column() {
        let mut config = ScanConfig::new("/m");

        config.sort_column = SortColumn::Count;
        let (rows, _) = assemble(sample(), &config);
        assert_eq!(keys(&rows), ["/m/a", "/m/c", "/m/b"]);

        config.sort_column = SortColumn::Size;
        let (rows, _) = assemble(sample(), &config);
        assert_eq!(keys(&rows), ["/m/b", "/m/c", "/m/a"]);

        config.sort_column = SortColumn::Name;
        config.sort_direction = SortDirection::Descending;
        let (rows, _) = assemble(sample(), &config);
        assert_eq!(keys(&rows), ["/m/c", "/m/b", "/m/a"]);
    }

    #[test]
    fn test_ties_fall_back_to_key() {
        let aggregate: Aggregate = vec![
            (PathBuf::from("/m/z"), FileTally::new(1, 1)),
            (PathBuf::from("/m/y"), FileTally::new(1, 2)),
            (PathBuf::from("/m/x"), FileTally::new(5, 3)),
        ]
        .into_iter()
        .collect();

        let mut rows: Vec<CensusRow> = aggregate
            .into_iter()
            .map(|(k, t)| CensusRow::new(k, t))
            .collect();

        sort_rows(&mut rows, SortColumn::Count, SortDirection::Descending);
        assert_eq!(keys(&rows), ["/m/x", "/m/y", "/m/z"]);

        sort_rows(&mut rows, SortColumn::Count, SortDirection::Ascending);
        assert_eq!(keys(&rows), ["/m/y", "/m/z", "/m/x"]);
    }

    #[test]
    fn test_root_summary_single_row() {
        let config = ScanConfig::builder()
            .root("/m")
            .grouping(GroupingMode::RootSummary)
            .build()
            .unwrap();
        let (rows, total) = assemble(sample(), &config);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].key, PathBuf::from("/m"));
        assert_eq!(rows[0].tally, FileTally::new(6, 60));
        assert_eq!(total, FileTally::new(6, 60));
    }

    #[test]
    fn test_result_partial_only_with_errors() {
        let config = ScanConfig::new("/m");
        let complete = ScanResult::new(sample(), &config, Duration::ZERO, None);
        assert!(!complete.is_partial());
        assert_eq!(complete.total_files(), 6);

        let error = IncompleteScan::from_errors(vec![crate::error::ScanError::read_dir(
            "/m/d",
            std::io::Error::other("bad"),
        )]);
        let partial = ScanResult::new(sample(), &config, Duration::ZERO, error);
        assert!(partial.is_partial());
        assert_eq!(partial.total, complete.total);
    }

    #[test]
    fn test_sort_column_aliases() {
        assert_eq!("Directory".parse::<SortColumn>().unwrap(), SortColumn::Name);
        assert_eq!("SIZE".parse::<SortColumn>().unwrap(), SortColumn::Size);
        assert!("modified".parse::<SortColumn>().is_err());
        assert_eq!(SortDirection::Ascending.reverse(), SortDirection::Descending);
    }
}
