//! Remote recording commands.

use crate::api::{RecordingClient, StartOutcome};
use anyhow::{Context, Result};
use log::info;
use std::io::Write;
use std::path::Path;

pub fn start_recording(app_url: &str) -> Result<String> {
    let client = RecordingClient::new(app_url)?;
    let outcome = client
        .start()
        .with_context(|| format!("Failed to start recording at {}", client.url()))?;

    Ok(match outcome {
        StartOutcome::Started => "A new recording session has started".to_string(),
        StartOutcome::AlreadyRecording => {
            "An existing recording session is already in progress".to_string()
        }
    })
}

pub fn check_recording(app_url: &str) -> Result<String> {
    let client = RecordingClient::new(app_url)?;
    let enabled = client
        .check()
        .with_context(|| format!("Failed to check recording at {}", client.url()))?;

    Ok(status_message(enabled).to_string())
}

fn status_message(enabled: bool) -> &'static str {
    if enabled {
        "Appmap recording is currently enabled"
    } else {
        "Appmap recording is currently disabled"
    }
}

/// Stop recording and write the AppMap to `output`, or to `stdout`
///
/// # Returns
/// `false` when there was no active session
pub fn stop_recording(app_url: &str, output: Option<&Path>, mut stdout: impl Write) -> Result<bool> {
    let client = RecordingClient::new(app_url)?;
    let Some(appmap) = client
        .stop()
        .with_context(|| format!("Failed to stop recording at {}", client.url()))?
    else {
        return Ok(false);
    };

    match output {
        Some(path) => {
            std::fs::write(path, &appmap)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("✓ AppMap written to: {}", path.display());
        }
        None => writeln!(stdout, "{}", appmap).context("Failed to write AppMap")?,
    }

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_message() {
        assert_eq!(status_message(true), "Appmap recording is currently enabled");
        assert_eq!(status_message(false), "Appmap recording is currently disabled");
    }

    #[test]
    fn test_check_unreachable_agent_fails() {
        // nothing listens on the discard port
        let err = check_recording("http://127.0.0.1:9").unwrap_err();
        assert!(err.to_string().starts_with("Failed to check recording at"));
    }
}
