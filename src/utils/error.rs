//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading a trace file
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Failed opening {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed decoding trace: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Errors that prevent building the list of input files
#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error("Cannot access {path}: {source}")]
    Stat {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot list directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that can occur while writing statistics
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Failed to write output: {0}")]
    WriteFailed(#[from] std::io::Error),
}

/// Errors that can occur during API communication
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("{url}, got status {status}:\n{body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    #[error("Invalid API response: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    /// HTTP status carried by the error, if the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::RequestFailed(e) => e.status().map(|s| s.as_u16()),
            ApiError::InvalidResponse(_) => None,
        }
    }
}

/// Errors raised by the context store
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file: {0}")]
    InvalidFormat(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    SerializationFailed(#[from] toml::ser::Error),

    #[error("cannot retrieve unnamed context")]
    UnnamedContext,

    #[error("context '{0}' does not exist")]
    UnknownContext(String),

    #[error("a context named '{0}' already exists")]
    DuplicateContext(String),

    #[error("unknown key '{0}'")]
    UnknownVariable(String),

    #[error("no config path is set")]
    NoPath,
}
