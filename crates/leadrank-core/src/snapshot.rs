//! Immutable in-memory lead table.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::LeadRecord;

/// The full lead table as loaded from the backing file.
///
/// Cloning is cheap and shares the same records. There is no way to mutate a
/// snapshot; filters and rankings borrow from it and return new views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    records: Arc<[LeadRecord]>,
}

impl Snapshot {
    pub fn new(records: Vec<LeadRecord>) -> Self {
        Self {
            records: records.into(),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn records(&self) -> &[LeadRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct non-blank state codes, sorted.
    pub fn states(&self) -> Vec<&str> {
        self.records
            .iter()
            .map(|r| r.state.as_str())
            .filter(|s| !s.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Smallest and largest participant counts, or `None` when empty.
    pub fn participant_range(&self) -> Option<(u64, u64)> {
        let min = self.records.iter().map(|r| r.participant_count).min()?;
        let max = self.records.iter().map(|r| r.participant_count).max()?;
        Some((min, max))
    }
}
