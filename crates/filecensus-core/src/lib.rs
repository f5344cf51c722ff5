//! Core types and policies for filecensus.
//!
//! This crate provides the pure building blocks shared by both scan passes:
//! configuration, the filter policy, grouping key resolution, tallies and
//! the sorted report.

mod config;
mod error;
pub mod filter;
pub mod grouping;
mod report;
mod tally;

pub use config::{DEFAULT_SCOPE_ANCHOR, ScanConfig, ScanConfigBuilder, ScanConfigBuilderError};
pub use error::{IncompleteScan, ScanError, ScanWarning, WarningKind};
pub use filter::{
    FileCategory, enters_scope, file_in_scope, root_in_scope, should_count, should_descend,
};
pub use grouping::{AggregateKey, GroupingMode, resolve_key};
pub use report::{CensusRow, ScanResult, SortColumn, SortDirection, assemble, sort_rows};
pub use tally::{Aggregate, FileTally};
