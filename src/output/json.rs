//! Machine-readable statistics output.
//!
//! Ranked entries are projected into [`MethodRecord`]s; whether parameter
//! detail is included is a property of the run, not of the data.

use super::rank::{top, RankedEntry};
use super::RenderOptions;
use crate::utils::error::RenderError;
use log::debug;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;

/// One method in JSON output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodRecord {
    pub method: String,

    /// Source file; empty when unknown
    pub path: String,

    pub lineno: i64,

    pub calls: u64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_params: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub param_counts: Option<BTreeMap<String, u64>>,
}

/// Statistics for a single input file
#[derive(Debug, Clone, Serialize)]
pub struct FileTotals {
    pub name: String,
    pub totals: Vec<MethodRecord>,
}

/// Complete JSON document written by `stats --json`
#[derive(Debug, Clone, Default, Serialize)]
pub struct StatsDocument {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<FileTotals>>,

    pub totals: Vec<MethodRecord>,
}

/// Project ranked entries into records, honouring limit and parameter options
pub fn records(entries: &[RankedEntry], options: &RenderOptions) -> Vec<MethodRecord> {
    let shown = top(entries, options.limit);

    shown
        .iter()
        .map(|entry| {
            let stats = &entry.stats;
            MethodRecord {
                method: stats.method.clone(),
                path: stats.path.clone().unwrap_or_default(),
                lineno: stats.lineno,
                calls: stats.calls,
                num_params: options.include_params.then_some(stats.num_params),
                param_counts: options
                    .include_params
                    .then(|| stats.param_counts.clone()),
            }
        })
        .collect()
}

/// Serialize a value as compact JSON onto `writer`
///
/// # Errors
/// * `RenderError::SerializationFailed` - value could not be encoded or written
pub fn write_json<T: Serialize>(writer: impl Write, value: &T) -> Result<(), RenderError> {
    serde_json::to_writer(writer, value)?;
    debug!("JSON statistics written");
    Ok(())
}
