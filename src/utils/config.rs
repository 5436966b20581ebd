//! Configuration and constants for the CLI.

use std::time::Duration;

/// Default timeout for API requests
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Server used when no context has been configured
pub const DEFAULT_URL: &str = "https://app.land";

/// Name of the context created when no config file exists
pub const DEFAULT_CONTEXT_NAME: &str = "default";

/// File name of the context store, looked up in the working and home directories
pub const CONFIG_FILE_NAME: &str = ".appland.toml";

// Environment overrides
pub const CONFIG_PATH_ENV: &str = "APPLAND_CONFIG";
pub const URL_ENV: &str = "APPLAND_URL";
pub const API_KEY_ENV: &str = "APPLAND_API_KEY";

/// Suffix identifying trace files inside a directory
pub const TRACE_FILE_SUFFIX: &str = ".appmap.json";

/// Signature token for a parameter recorded without a value
pub const NIL_MARKER: &str = "<nil>";

/// Number of methods shown by `stats` unless overridden
pub const DEFAULT_STATS_LIMIT: usize = 20;

/// Largest trace file accepted for upload
pub const MAX_UPLOAD_BYTES: u64 = 50 * 1024 * 1024; // 50 MiB

/// Endpoint path of the remote recording agent
pub const RECORDING_PATH: &str = "/_appmap/record";
