//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the various library components to perform user tasks.

pub mod context;
pub mod models;
pub mod recording;
pub mod session;
pub mod stats;
pub mod upload;

// Re-export main command functions
pub use models::{StatsOptions, UploadArgs, UploadReport};
pub use session::{execute_login, execute_logout, Credentials};
pub use stats::{execute_stats, run_stats, StatsSummary};
pub use upload::execute_upload;
