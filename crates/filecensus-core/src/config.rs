//! Census configuration types.

use std::path::PathBuf;

use compact_str::CompactString;
use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::error::ScanError;
use crate::filter::FileCategory;
use crate::grouping::GroupingMode;
use crate::report::{SortColumn, SortDirection};

/// Directory name that conventionally anchors the scoped census.
pub const DEFAULT_SCOPE_ANCHOR: &str = "Videos";

/// Configuration for a census run.
///
/// Immutable for the duration of a scan and threaded explicitly through
/// every pass.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct ScanConfig {
    /// Root path to scan.
    pub root: PathBuf,

    /// Type category of files to count.
    #[builder(default)]
    #[serde(default)]
    pub category: FileCategory,

    /// Case-insensitive substring the full path must contain.
    #[builder(default, setter(into, strip_option))]
    #[serde(default)]
    pub name_filter: Option<CompactString>,

    /// How file locations collapse into report rows.
    #[builder(default)]
    #[serde(default)]
    pub grouping: GroupingMode,

    /// Only count files at or below a directory with this exact name.
    #[builder(default, setter(into, strip_option))]
    #[serde(default)]
    pub scope_anchor: Option<CompactString>,

    /// Column used to order the rows.
    #[builder(default)]
    #[serde(default)]
    pub sort_column: SortColumn,

    /// Direction used to order the rows.
    #[builder(default)]
    #[serde(default)]
    pub sort_direction: SortDirection,

    /// Number of threads for scanning (0 = auto-detect).
    #[builder(default = "0")]
    #[serde(default)]
    pub threads: usize,

    /// Include hidden files and directories (starting with .).
    #[builder(default = "true")]
    #[serde(default = "default_true")]
    pub include_hidden: bool,
}

fn default_true() -> bool {
    true
}

/// Check the option combinations that cannot be honored together.
fn check_exclusive(
    grouping: GroupingMode,
    scope_anchor: Option<&str>,
    name_filter: Option<&str>,
) -> Result<(), String> {
    let Some(anchor) = scope_anchor else {
        return Ok(());
    };
    if anchor.is_empty() {
        return Err("Scope anchor cannot be empty".to_string());
    }
    if anchor.contains(std::path::is_separator) {
        return Err(format!("Scope anchor must be a directory name, got {anchor:?}"));
    }
    if grouping == GroupingMode::RootSummary {
        return Err("Root summary and scope anchor are mutually exclusive".to_string());
    }
    if name_filter.is_some_and(|f| !f.is_empty()) {
        return Err("Scope anchor and name filter are mutually exclusive".to_string());
    }
    Ok(())
}

impl ScanConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(ref root) = self.root {
            if root.as_os_str().is_empty() {
                return Err("Root path cannot be empty".to_string());
            }
        } else {
            return Err("Root path is required".to_string());
        }

        check_exclusive(
            self.grouping.unwrap_or_default(),
            self.scope_anchor.as_ref().and_then(|a| a.as_deref()),
            self.name_filter.as_ref().and_then(|f| f.as_deref()),
        )
    }
}

impl ScanConfig {
    /// Create a new scan config builder.
    pub fn builder() -> ScanConfigBuilder {
        ScanConfigBuilder::default()
    }

    /// Create a simple config for scanning a path.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            category: FileCategory::Any,
            name_filter: None,
            grouping: GroupingMode::PerDirectory,
            scope_anchor: None,
            sort_column: SortColumn::Count,
            sort_direction: SortDirection::Ascending,
            threads: 0,
            include_hidden: true,
        }
    }

    /// Re-check the invariants for configs assembled without the builder.
    pub fn validate(&self) -> Result<(), ScanError> {
        if self.root.as_os_str().is_empty() {
            return Err(ScanError::invalid_config("Root path cannot be empty"));
        }
        check_exclusive(
            self.grouping,
            self.scope_anchor.as_deref(),
            self.name_filter.as_deref(),
        )
        .map_err(ScanError::invalid_config)
    }

    /// Name filter as a plain string slice, if one is set.
    pub fn name_filter(&self) -> Option<&str> {
        self.name_filter.as_deref()
    }

    /// Check if a scope anchor restricts counting.
    pub fn is_scoped(&self) -> bool {
        self.scope_anchor.is_some()
    }

    /// Check if hidden files should be skipped.
    pub fn should_skip_hidden(&self, name: &str) -> bool {
        !self.include_hidden && name.starts_with('.')
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self::new(".")
    }
}
