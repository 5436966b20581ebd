//! Trace file decoder.
//!
//! Turns raw file content into a [`TraceFile`]. Decoding failures are
//! returned to the caller, which decides whether they are fatal; the stats
//! command skips the file and keeps going.

use super::schema::TraceFile;
use crate::utils::error::ParseError;
use log::debug;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Decode trace content already held in memory
///
/// **Public** - main entry point for parsing
///
/// # Errors
/// * `ParseError::JsonError` - content is not a well-formed trace document
pub fn parse_trace(content: &[u8]) -> Result<TraceFile, ParseError> {
    let trace: TraceFile = serde_json::from_slice(content)?;
    debug!("Decoded trace with {} event(s)", trace.events().len());
    Ok(trace)
}

/// Open and decode a trace file
///
/// # Errors
/// * `ParseError::Io` - the file cannot be opened
/// * `ParseError::JsonError` - content is not a well-formed trace document
pub fn read_trace(path: impl AsRef<Path>) -> Result<TraceFile, ParseError> {
    let path = path.as_ref();

    let file = File::open(path).map_err(|source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let trace: TraceFile = serde_json::from_reader(BufReader::new(file))?;
    debug!("{}: {} event(s)", path.display(), trace.events().len());

    Ok(trace)
}
