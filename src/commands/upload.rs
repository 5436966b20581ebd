//! Upload command implementation.
//!
//! The upload command:
//! 1. Finds trace files (skipping oversized ones)
//! 2. Uploads each file as a scenario
//! 3. Groups the scenarios into a mapset tagged with git state
//!
//! Any failure aborts the upload.

use super::models::{UploadArgs, UploadReport};
use crate::api::{Api, MapSet};
use crate::files::{find_trace_files, max_size};
use crate::parser::{parse_trace, GitMetadata};
use crate::utils::config::MAX_UPLOAD_BYTES;
use anyhow::{bail, Context, Result};
use log::{debug, info};
use std::fs;

/// Execute the upload command against `api`
///
/// **Public** - main entry point called from main.rs
pub fn execute_upload(api: &dyn Api, args: &UploadArgs) -> Result<UploadReport> {
    // Step 1: Find files
    info!("Step 1/3: Finding AppMaps...");
    let fnames = find_trace_files(&args.paths, &[max_size(MAX_UPLOAD_BYTES)])
        .context("Failed finding AppMaps")?;
    if fnames.is_empty() {
        bail!("No AppMaps to upload");
    }

    let mut app = args.app.clone().filter(|a| !a.is_empty());
    let mut git: Option<GitMetadata> = None;
    let mut scenarios = Vec::with_capacity(fnames.len());

    // Step 2: Upload scenarios
    info!("Step 2/3: Uploading {} scenario(s)...", fnames.len());
    for fname in &fnames {
        let data = fs::read(fname).with_context(|| format!("Failed reading {}", fname.display()))?;

        // Metadata is best effort; the server validates the document itself
        if app.is_none() || git.is_none() {
            match parse_trace(&data) {
                Ok(trace) => {
                    if app.is_none() {
                        app = trace.app().map(str::to_string);
                    }
                    if git.is_none() {
                        git = trace.git().cloned();
                    }
                }
                Err(e) => debug!("{}: no metadata ({})", fname.display(), e),
            }
        }

        let Some(app_name) = app.as_deref() else {
            bail!(
                "No application name for {}; pass --app or record metadata.app",
                fname.display()
            );
        };

        let response = api
            .create_scenario(app_name, data)
            .with_context(|| format!("Failed uploading {}", fname.display()))?;
        debug!("{} -> scenario {}", fname.display(), response.uuid);
        scenarios.push(response.uuid);
    }

    // Step 3: Create mapset
    info!("Step 3/3: Creating mapset...");
    let count = scenarios.len();
    let mapset = MapSet::new(app.unwrap_or_default(), scenarios)
        .with_git(git.as_ref())
        .with_branch(args.branch.as_deref())
        .with_version(args.version.as_deref())
        .with_environment(args.environment.as_deref());

    let created = api
        .create_mapset(&mapset)
        .context("Failed creating mapset")?;

    let page = format!("{}?mapset={}", created.app_id, created.id);
    let url = api.build_url(&["applications", &page]);

    Ok(UploadReport {
        scenarios: count,
        mapset_id: created.id,
        app_id: created.app_id,
        url,
    })
}
