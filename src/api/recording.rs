//! Remote recording control for an instrumented application.
//!
//! The agent exposes `/_appmap/record`: POST starts a session, DELETE stops
//! it and returns the recorded AppMap, GET reports whether one is running.

use super::client::build_url;
use crate::utils::config::{DEFAULT_HTTP_TIMEOUT, RECORDING_PATH};
use crate::utils::error::ApiError;
use log::debug;
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::Deserialize;

/// Outcome of a start request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    Started,
    AlreadyRecording,
}

/// Body of a status request
#[derive(Debug, Deserialize)]
struct RecordingStatus {
    #[serde(default)]
    enabled: bool,
}

pub struct RecordingClient {
    client: Client,
    url: String,
}

impl RecordingClient {
    /// Client for the agent running at `app_url`
    pub fn new(app_url: &str) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(ApiError::RequestFailed)?;

        Ok(Self {
            client,
            url: recording_url(app_url),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn start(&self) -> Result<StartOutcome, ApiError> {
        debug!("POST {}", self.url);
        let response = self.client.post(&self.url).send()?;

        match response.status() {
            StatusCode::OK => Ok(StartOutcome::Started),
            StatusCode::CONFLICT => Ok(StartOutcome::AlreadyRecording),
            status => Err(ApiError::Status {
                url: self.url.clone(),
                status: status.as_u16(),
                body: response.text().unwrap_or_default(),
            }),
        }
    }

    /// Stop the session, returning the AppMap, or `None` if nothing was recording
    pub fn stop(&self) -> Result<Option<String>, ApiError> {
        debug!("DELETE {}", self.url);
        let response = self.client.delete(&self.url).send()?;

        match response.status() {
            StatusCode::OK => Ok(Some(response.text()?)),
            StatusCode::NOT_FOUND => Ok(None),
            status => Err(ApiError::Status {
                url: self.url.clone(),
                status: status.as_u16(),
                body: response.text().unwrap_or_default(),
            }),
        }
    }

    /// Whether a recording session is currently active
    pub fn check(&self) -> Result<bool, ApiError> {
        debug!("GET {}", self.url);
        let response = self.client.get(&self.url).send()?;

        let status = response.status();
        let body = response.text()?;
        if status != StatusCode::OK {
            return Err(ApiError::Status {
                url: self.url.clone(),
                status: status.as_u16(),
                body,
            });
        }
        parse_status(&self.url, &body)
    }
}

fn parse_status(url: &str, body: &str) -> Result<bool, ApiError> {
    serde_json::from_str::<RecordingStatus>(body)
        .map(|status| status.enabled)
        .map_err(|e| ApiError::InvalidResponse(format!("{}: {}", url, e)))
}

fn recording_url(app_url: &str) -> String {
    build_url(app_url, &[RECORDING_PATH.trim_start_matches('/')])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    /// Serve one canned HTTP response on a local port, returning its base URL
    fn serve_once(status: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = [0u8; 4096];
            let _ = stream.read(&mut request).unwrap();
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).unwrap();
        });
        format!("http://{}", addr)
    }

    #[test]
    fn test_parse_status() {
        assert!(parse_status("u", r#"{"enabled": true}"#).unwrap());
        assert!(!parse_status("u", r#"{"enabled": false}"#).unwrap());
        assert!(!parse_status("u", "{}").unwrap());
        assert!(matches!(
            parse_status("u", "enabled"),
            Err(ApiError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_check_reports_enabled() {
        let url = serve_once("200 OK", r#"{"enabled": true}"#);
        assert!(RecordingClient::new(&url).unwrap().check().unwrap());
    }

    #[test]
    fn test_check_rejects_unexpected_status() {
        let url = serve_once("500 Internal Server Error", "{}");
        let err = RecordingClient::new(&url).unwrap().check().unwrap_err();
        assert_eq!(err.status(), Some(500));
    }

    #[test]
    fn test_recording_url() {
        assert_eq!(
            recording_url("http://localhost:3000"),
            "http://localhost:3000/_appmap/record"
        );
        assert_eq!(
            recording_url("http://localhost:3000/"),
            "http://localhost:3000/_appmap/record"
        );
    }
}
