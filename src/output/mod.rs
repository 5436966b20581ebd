//! Ranking and rendering of method statistics.
//!
//! This module handles:
//! - Deterministic ranking (calls, then label, then call site)
//! - JSON records with optional parameter detail
//! - Text summaries

pub mod json;
pub mod rank;
pub mod text;

// Re-export main functions
pub use json::{records, write_json, FileTotals, MethodRecord, StatsDocument};
pub use rank::{rank, top, RankedEntry};
pub use text::write_text;

/// Render-time options, shared by both output formats
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Maximum number of methods shown; `0` shows all
    pub limit: usize,

    /// Include parameter counts and distinct signatures
    pub include_params: bool,
}
