//! Per-method call statistics.
//!
//! One [`AggregateTable`] is built per trace file by [`aggregate`]; a global
//! table is the fold of those per-file tables under [`AggregateTable::merge`].
//!
//! # Algorithm
//! 1. Skip everything but call events with a defining class
//! 2. Resolve the call site key and the parameter signature
//! 3. Seed stats on first sight of a key
//! 4. Count the call and its signature

use super::method_key::{self, MethodKey};
use super::signature;
use crate::parser::TraceEvent;
use log::debug;
use std::collections::hash_map::{Entry, Iter};
use std::collections::{BTreeMap, HashMap};

/// Aggregate for one call site
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodStats {
    /// `Class#method` / `Class.method`, without the line
    pub method: String,

    /// Source file of the method, if recorded
    pub path: Option<String>,

    pub lineno: i64,

    /// Number of calls seen
    pub calls: u64,

    /// Parameter count at first sight of the call site
    pub num_params: usize,

    /// Signature -> occurrences
    pub param_counts: BTreeMap<String, u64>,
}

impl MethodStats {
    fn seed(event: &TraceEvent) -> Self {
        Self {
            method: method_key::method_label(event),
            path: event.path.clone().filter(|p| !p.is_empty()),
            lineno: event.lineno,
            calls: 0,
            num_params: event.parameters.len(),
            param_counts: BTreeMap::new(),
        }
    }

    /// Number of distinct parameter signatures
    pub fn distinct_signatures(&self) -> usize {
        self.param_counts.len()
    }

    fn absorb(&mut self, other: &MethodStats) {
        self.calls += other.calls;
        self.num_params = self.num_params.max(other.num_params);
        self.path = match (self.path.take(), &other.path) {
            (Some(mine), Some(theirs)) => Some(mine.min(theirs.clone())),
            (mine, theirs) => mine.or_else(|| theirs.clone()),
        };
        for (sig, count) in &other.param_counts {
            *self.param_counts.entry(sig.clone()).or_insert(0) += count;
        }
    }
}

/// Call site -> statistics
///
/// Iteration order is unspecified; ordering is applied at render time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregateTable {
    methods: HashMap<MethodKey, MethodStats>,
}

impl AggregateTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&MethodStats> {
        self.methods.get(key)
    }

    pub fn iter(&self) -> Iter<'_, MethodKey, MethodStats> {
        self.methods.iter()
    }

    /// Sum of calls across all call sites
    pub fn total_calls(&self) -> u64 {
        self.methods.values().map(|s| s.calls).sum()
    }

    /// Record one aggregated call event
    fn record(&mut self, event: &TraceEvent) {
        let key = method_key::resolve(event);
        let sig = signature::build(&event.parameters);

        let stats = self
            .methods
            .entry(key)
            .or_insert_with(|| MethodStats::seed(event));
        stats.calls += 1;
        *stats.param_counts.entry(sig).or_insert(0) += 1;
    }

    /// Merge another table into this one
    ///
    /// Calls and signature counts add up; call sites missing here are
    /// copied in. The operation is associative and commutative.
    pub fn merge(&mut self, other: &AggregateTable) {
        for (key, stats) in &other.methods {
            match self.methods.entry(key.clone()) {
                Entry::Occupied(mut existing) => existing.get_mut().absorb(stats),
                Entry::Vacant(slot) => {
                    slot.insert(stats.clone());
                }
            }
        }
    }
}

impl<'a> IntoIterator for &'a AggregateTable {
    type Item = (&'a MethodKey, &'a MethodStats);
    type IntoIter = Iter<'a, MethodKey, MethodStats>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Aggregate one file's events
///
/// **Public** - main entry point for aggregation
///
/// # Returns
/// The per-call-site table and the number of calls counted
pub fn aggregate(events: &[TraceEvent]) -> (AggregateTable, u64) {
    let mut table = AggregateTable::new();
    let mut total_calls = 0u64;

    for event in events.iter().filter(|e| method_key::is_aggregated(e)) {
        table.record(event);
        total_calls += 1;
    }

    debug!(
        "Aggregated {} call(s) over {} method(s)",
        total_calls,
        table.len()
    );

    (table, total_calls)
}

/// Fold per-file tables into a global table
pub fn fold<'a>(tables: impl IntoIterator<Item = &'a AggregateTable>) -> AggregateTable {
    tables.into_iter().fold(AggregateTable::new(), |mut acc, t| {
        acc.merge(t);
        acc
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parameter;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn call(class: &str, method: &str, lineno: i64, values: &[Option<&str>]) -> TraceEvent {
        TraceEvent {
            kind: "call".to_string(),
            defined_class: class.to_string(),
            method_id: method.to_string(),
            lineno,
            parameters: values
                .iter()
                .map(|v| Parameter {
                    name: "arg".to_string(),
                    value: v.map(|s| json!(s)),
                })
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_single_call_without_parameters() {
        let (table, total) = aggregate(&[call("Foo", "bar", 10, &[])]);

        assert_eq!(total, 1);
        let stats = table.get("Foo#bar:10").unwrap();
        assert_eq!(stats.calls, 1);
        assert_eq!(stats.num_params, 0);
        assert_eq!(stats.param_counts, BTreeMap::from([(String::new(), 1)]));
    }

    #[test]
    fn test_empty_events() {
        let (table, total) = aggregate(&[]);
        assert!(table.is_empty());
        assert_eq!(total, 0);
    }

    #[test]
    fn test_skips_non_calls_and_classless_events() {
        let mut ret = call("Foo", "bar", 10, &[]);
        ret.kind = "return".to_string();
        let events = vec![ret, call("", "lambda", 3, &[]), call("Foo", "bar", 10, &[])];

        let (table, total) = aggregate(&events);
        assert_eq!(total, 1);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_counts_signatures() {
        let events = vec![
            call("Foo", "bar", 10, &[Some("x")]),
            call("Foo", "bar", 10, &[Some("y")]),
            call("Foo", "bar", 10, &[Some("x")]),
            call("Foo", "bar", 10, &[None]),
        ];

        let (table, _) = aggregate(&events);
        let stats = table.get("Foo#bar:10").unwrap();
        assert_eq!(stats.calls, 4);
        assert_eq!(stats.num_params, 1);
        assert_eq!(stats.distinct_signatures(), 3);
        assert_eq!(stats.param_counts["x"], 2);
        assert_eq!(stats.param_counts["<nil>"], 1);
    }

    #[test]
    fn test_merge_copies_missing_and_sums_existing() {
        let (a, _) = aggregate(&[call("Foo", "bar", 10, &[Some("x")])]);
        let (b, _) = aggregate(&[
            call("Foo", "bar", 10, &[Some("x")]),
            call("Baz", "qux", 1, &[]),
        ]);

        let mut global = AggregateTable::new();
        global.merge(&a);
        global.merge(&b);

        assert_eq!(global.len(), 2);
        assert_eq!(global.get("Foo#bar:10").unwrap().calls, 2);
        assert_eq!(global.get("Foo#bar:10").unwrap().param_counts["x"], 2);
        assert_eq!(global.get("Baz#qux:1").unwrap().calls, 1);

        // the file table is untouched by merging
        assert_eq!(a.get("Foo#bar:10").unwrap().calls, 1);
    }

    #[test]
    fn test_merge_commutes_on_differing_first_sight_facts() {
        let mut with_path = call("Foo", "bar", 10, &[Some("x")]);
        with_path.path = Some("app/foo.rb".to_string());
        let (a, _) = aggregate(&[with_path]);
        let (b, _) = aggregate(&[call("Foo", "bar", 10, &[])]);

        assert_eq!(fold([&a, &b]), fold([&b, &a]));
        let merged = fold([&b, &a]);
        let stats = merged.get("Foo#bar:10").unwrap();
        assert_eq!(stats.num_params, 1);
        assert_eq!(stats.path.as_deref(), Some("app/foo.rb"));
    }
}
