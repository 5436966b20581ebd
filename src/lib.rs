//! AppLand CLI
//!
//! Command line client for AppLand. The heart of the crate is the trace
//! statistics engine: AppMap files are parsed, call events are aggregated
//! per call site and per parameter signature, per-file tables are merged
//! into global totals, and the result is ranked and rendered as text or
//! JSON.
//!
//! The remaining modules cover uploads, server contexts and remote
//! recording.
//!
//! ## Getting Started
//!
//! ```bash
//! appland stats --params --limit 10 tmp/appmap
//! appland upload --app myorg/myapp tmp/appmap
//! ```

pub mod aggregator;
pub mod api;
pub mod commands;
pub mod context;
pub mod files;
pub mod output;
pub mod parser;
pub mod utils;
