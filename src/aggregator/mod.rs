//! Aggregation of trace events into per-method statistics.
//!
//! This module transforms parsed trace events into:
//! - Call site keys (`Class#method:line`)
//! - Parameter signatures for distinct-argument counting
//! - Per-file and global call count tables

pub mod method_key;
pub mod signature;
pub mod table;

// Re-export main types and functions
pub use method_key::{is_aggregated, method_label, resolve, MethodKey};
pub use table::{aggregate, fold, AggregateTable, MethodStats};
