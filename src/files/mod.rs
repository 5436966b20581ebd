//! Locating trace files on disk.

pub mod discovery;

pub use discovery::{find_trace_files, max_size, Validator};
