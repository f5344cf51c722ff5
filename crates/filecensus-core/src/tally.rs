//! File tallies and the keyed aggregate.

use std::collections::HashMap;
use std::iter::Sum;
use std::ops::{Add, AddAssign};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::grouping::AggregateKey;

/// File count and cumulative byte size for one aggregation key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileTally {
    /// Number of counted files.
    pub count: u64,
    /// Total size of counted files in bytes.
    pub bytes: u64,
}

impl FileTally {
    /// Create a tally from raw values.
    pub fn new(count: u64, bytes: u64) -> Self {
        Self { count, bytes }
    }

    /// Record a single file.
    pub fn record_file(&mut self, size: u64) {
        self.count += 1;
        self.bytes += size;
    }

    /// Merge another tally into this one.
    pub fn merge(&mut self, other: FileTally) {
        self.count += other.count;
        self.bytes += other.bytes;
    }

    /// Check if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.count == 0 && self.bytes == 0
    }
}

impl Add for FileTally {
    type Output = FileTally;

    fn add(mut self, rhs: FileTally) -> FileTally {
        self.merge(rhs);
        self
    }
}

impl AddAssign for FileTally {
    fn add_assign(&mut self, rhs: FileTally) {
        self.merge(rhs);
    }
}

impl Sum for FileTally {
    fn sum<I: Iterator<Item = FileTally>>(iter: I) -> Self {
        iter.fold(FileTally::default(), Add::add)
    }
}

impl<'a> Sum<&'a FileTally> for FileTally {
    fn sum<I: Iterator<Item = &'a FileTally>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

/// Mapping from aggregation key to tally for one scan.
///
/// Not synchronized itself; the aggregation pass owns it behind a single
/// lock and hands it out only after every worker has joined.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aggregate {
    entries: HashMap<AggregateKey, FileTally>,
}

impl Aggregate {
    /// Create an empty aggregate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tally to the entry for `key`, creating it if absent.
    pub fn merge(&mut self, key: AggregateKey, tally: FileTally) {
        *self.entries.entry(key).or_default() += tally;
    }

    /// Look up the tally for a key.
    pub fn get(&self, key: &Path) -> Option<&FileTally> {
        self.entries.get(key)
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no key has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of every entry.
    pub fn total(&self) -> FileTally {
        self.entries.values().sum()
    }

    /// Iterate over all entries in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&AggregateKey, &FileTally)> {
        self.entries.iter()
    }
}

impl IntoIterator for Aggregate {
    type Item = (AggregateKey, FileTally);
    type IntoIter = std::collections::hash_map::IntoIter<AggregateKey, FileTally>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl FromIterator<(AggregateKey, FileTally)> for Aggregate {
    fn from_iter<I: IntoIterator<Item = (AggregateKey, FileTally)>>(iter: I) -> Self {
        let mut aggregate = Aggregate::new();
        for (key, tally) in iter {
            aggregate.merge(key, tally);
        }
        aggregate
    }
}
