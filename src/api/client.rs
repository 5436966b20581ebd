//! HTTP client for the AppLand API.

use super::types::{CreateMapSetResponse, MapSet, ScenarioResponse};
use crate::utils::config::DEFAULT_HTTP_TIMEOUT;
use crate::utils::error::ApiError;
use log::{debug, info};
use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Operations the upload command needs from the server
pub trait Api {
    /// URL of a page or resource on the server
    fn build_url(&self, parts: &[&str]) -> String;

    fn create_scenario(&self, app: &str, data: Vec<u8>) -> Result<ScenarioResponse, ApiError>;

    fn create_mapset(&self, mapset: &MapSet) -> Result<CreateMapSetResponse, ApiError>;
}

/// Blocking AppLand API client bound to one server and API key
pub struct ApplandClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl ApplandClient {
    /// Create a new API client
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(ApiError::RequestFailed)?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request.bearer_auth(&self.api_key)
    }

    /// Fetch a scenario by id
    pub fn get_scenario(&self, id: u64) -> Result<ScenarioResponse, ApiError> {
        let url = self.build_url(&["api", "scenarios", &id.to_string()]);
        let response = self.authorized(self.client.get(&url)).send()?;
        read_json(&url, response, StatusCode::OK)
    }

    /// Exchange a login and password for a new API key
    pub fn login(&self, login: &str, password: &str) -> Result<String, ApiError> {
        #[derive(Deserialize)]
        struct ApiKeyResponse {
            api_key: String,
        }

        let url = self.build_url(&["api", "api_keys"]);
        info!("Requesting API key from {}", self.base_url);

        let response = self
            .client
            .post(&url)
            .basic_auth(login, Some(password))
            .json(&serde_json::json!({ "description": key_description() }))
            .send()?;

        let body: ApiKeyResponse = read_json(&url, response, StatusCode::OK)?;
        Ok(body.api_key)
    }

    /// Revoke the API key this client authenticates with
    pub fn delete_api_key(&self) -> Result<(), ApiError> {
        let url = self.build_url(&["api", "api_keys"]);
        let response = self.authorized(self.client.delete(&url)).send()?;
        expect_status(&url, response, StatusCode::OK)?;
        Ok(())
    }

    /// Check whether the client's API key is accepted
    ///
    /// Probes a scenario that never exists: "not found" means the key was
    /// accepted, "unauthorized" means it was not.
    pub fn test_api_key(&self) -> Result<bool, ApiError> {
        match self.get_scenario(0) {
            Ok(_) => Err(ApiError::InvalidResponse(
                "found scenario with id 0".to_string(),
            )),
            Err(e) => match e.status() {
                Some(404) => Ok(true),
                Some(401) => Ok(false),
                _ => Err(e),
            },
        }
    }
}

impl Api for ApplandClient {
    fn build_url(&self, parts: &[&str]) -> String {
        build_url(&self.base_url, parts)
    }

    fn create_scenario(&self, app: &str, data: Vec<u8>) -> Result<ScenarioResponse, ApiError> {
        let url = self.build_url(&["api", "scenarios"]);
        debug!("Uploading {} bytes to {}", data.len(), url);

        let metadata = serde_json::json!({ "app": app }).to_string();
        let form = Form::new()
            .part("metadata", Part::text(metadata).mime_str("application/json")?)
            .part(
                "data",
                Part::bytes(data)
                    .file_name("data")
                    .mime_str("application/json")?,
            );

        let response = self.authorized(self.client.post(&url)).multipart(form).send()?;
        read_json(&url, response, StatusCode::CREATED)
    }

    fn create_mapset(&self, mapset: &MapSet) -> Result<CreateMapSetResponse, ApiError> {
        let url = self.build_url(&["api", "mapsets"]);
        debug!("Creating mapset with {} scenario(s)", mapset.scenarios.len());

        let response = self.authorized(self.client.post(&url)).json(mapset).send()?;
        read_json(&url, response, StatusCode::CREATED)
    }
}

/// Join path parts onto a base URL with `/`
pub fn build_url(base: &str, parts: &[&str]) -> String {
    let mut url = base.trim_end_matches('/').to_string();
    for part in parts {
        url.push('/');
        url.push_str(part);
    }
    url
}

/// Description attached to API keys created by `login`
fn key_description() -> String {
    std::env::var("HOSTNAME")
        .or_else(|_| std::env::var("COMPUTERNAME"))
        .unwrap_or_else(|_| "appland CLI".to_string())
}

/// Fail with `ApiError::Status` unless the response has the expected status
fn expect_status(url: &str, response: Response, expected: StatusCode) -> Result<Response, ApiError> {
    if response.status() == expected {
        return Ok(response);
    }

    Err(ApiError::Status {
        url: url.to_string(),
        status: response.status().as_u16(),
        body: response.text().unwrap_or_default(),
    })
}

fn read_json<T: DeserializeOwned>(
    url: &str,
    response: Response,
    expected: StatusCode,
) -> Result<T, ApiError> {
    let body = expect_status(url, response, expected)?.text()?;
    serde_json::from_str(&body)
        .map_err(|e| ApiError::InvalidResponse(format!("{}: {}", url, e)))
}
