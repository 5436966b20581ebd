use crate::output::RenderOptions;
use std::path::PathBuf;

/// Options of the stats command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatsOptions {
    /// Log per-file progress
    pub verbose: bool,

    /// Render a breakdown for each file before the totals
    pub files: bool,

    /// Include distinct parameter signatures
    pub params: bool,

    /// Maximum number of methods shown; `0` shows all
    pub limit: usize,

    /// Machine-readable output
    pub json: bool,
}

impl StatsOptions {
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            limit: self.limit,
            include_params: self.params,
        }
    }
}

/// Arguments for the upload command
#[derive(Debug, Clone, Default)]
pub struct UploadArgs {
    /// Trace files or directories containing them
    pub paths: Vec<PathBuf>,

    /// Owning application; falls back to the first file's `metadata.app`
    pub app: Option<String>,

    /// Branch override
    pub branch: Option<String>,

    pub environment: Option<String>,

    pub version: Option<String>,
}

/// Result of a successful upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReport {
    pub scenarios: usize,
    pub mapset_id: u64,
    pub app_id: u64,

    /// Page showing the new mapset
    pub url: String,
}
