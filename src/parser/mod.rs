//! Trace parsing and schema definitions.
//!
//! This module handles:
//! - Decoding AppMap JSON documents
//! - Tolerating missing or `null` event fields
//! - Exposing recording metadata used by uploads

pub mod appmap;
pub mod schema;

// Re-export main types
pub use appmap::{parse_trace, read_trace};
pub use schema::{GitMetadata, Parameter, TraceEvent, TraceFile, TraceMetadata};
