//! Deterministic ordering of aggregated methods.

use crate::aggregator::{AggregateTable, MethodKey, MethodStats};
use std::cmp::Ordering;

/// A call site in ranked position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedEntry {
    pub key: MethodKey,
    pub stats: MethodStats,
}

/// Most calls first, then by method label, then by call site key
pub fn compare(a: &RankedEntry, b: &RankedEntry) -> Ordering {
    b.stats
        .calls
        .cmp(&a.stats.calls)
        .then_with(|| a.stats.method.cmp(&b.stats.method))
        .then_with(|| a.key.cmp(&b.key))
}

/// Sort a table into ranked entries
pub fn rank(table: &AggregateTable) -> Vec<RankedEntry> {
    let mut entries: Vec<RankedEntry> = table
        .iter()
        .map(|(key, stats)| RankedEntry {
            key: key.clone(),
            stats: stats.clone(),
        })
        .collect();

    entries.sort_by(compare);
    entries
}

/// Keep the first `limit` entries; `0` keeps everything
pub fn top<T>(entries: &[T], limit: usize) -> &[T] {
    if limit > 0 {
        &entries[..entries.len().min(limit)]
    } else {
        entries
    }
}
