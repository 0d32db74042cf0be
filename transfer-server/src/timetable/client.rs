//! Route-query HTTP client.

use std::time::Duration;

use reqwest::Url;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use tracing::debug;

use crate::domain::ConnectionsResponse;

use super::convert::parse_connections_response;
use super::error::TimetableError;
use super::request::ConnectionsRequest;

/// Default base URL for the timetable API.
pub const DEFAULT_BASE_URL: &str = "https://search.ch/fahrplan/api";

/// Path of the route endpoint below the base URL.
const ROUTE_PATH: &str = "route.json";

/// Configuration for the timetable client.
#[derive(Debug, Clone)]
pub struct TimetableConfig {
    /// Base URL for the API (defaults to the public endpoint)
    pub base_url: String,
    /// Request timeout in seconds; `None` waits indefinitely
    pub timeout_secs: Option<u64>,
}

impl TimetableConfig {
    /// Create a config for the public API with no timeout.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: None,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Resolve a file below the base URL, e.g. `route.json`.
    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, TimetableError> {
        let raw = format!("{}/{}", self.base_url.trim_end_matches('/'), path);
        Url::parse(&raw).map_err(|e| TimetableError::InvalidBaseUrl {
            url: self.base_url.clone(),
            message: e.to_string(),
        })
    }

    /// Build an HTTP client that asks for JSON.
    pub(crate) fn http_client(&self) -> Result<reqwest::Client, TimetableError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(secs) = self.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        Ok(builder.build()?)
    }
}

impl Default for TimetableConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Route-query client.
#[derive(Debug, Clone)]
pub struct TimetableClient {
    http: reqwest::Client,
    route_url: Url,
}

impl TimetableClient {
    /// Create a new client with the given configuration.
    pub fn new(config: TimetableConfig) -> Result<Self, TimetableError> {
        Ok(Self {
            http: config.http_client()?,
            route_url: config.endpoint(ROUTE_PATH)?,
        })
    }

    /// Full query URL for a request.
    pub fn route_url(&self, request: &ConnectionsRequest) -> Url {
        request.url(&self.route_url)
    }

    /// Run a route query.
    ///
    /// Non-success statuses fail with [`TimetableError::Http`]; the body is
    /// not read in that case.
    pub async fn get_connections(
        &self,
        request: &ConnectionsRequest,
    ) -> Result<ConnectionsResponse, TimetableError> {
        let url = self.route_url(request);
        self.get_connections_at(url).await
    }

    /// Run a route query against a prebuilt URL.
    pub(crate) async fn get_connections_at(
        &self,
        url: Url,
    ) -> Result<ConnectionsResponse, TimetableError> {
        debug!(%url, "route query");

        let response = self.http.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TimetableError::Http {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let body = response.text().await?;

        let value: serde_json::Value =
            serde_json::from_str(&body).map_err(|e| TimetableError::Json {
                message: e.to_string(),
                body: Some(body.chars().take(500).collect()),
            })?;

        Ok(parse_connections_response(&value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_builder() {
        let config = TimetableConfig::new()
            .with_base_url("http://localhost:8080/api/")
            .with_timeout(10);

        assert_eq!(config.base_url, "http://localhost:8080/api/");
        assert_eq!(config.timeout_secs, Some(10));
        assert_eq!(
            config.endpoint("route.json").unwrap().as_str(),
            "http://localhost:8080/api/route.json"
        );
    }

    #[test]
    fn config_defaults() {
        let config = TimetableConfig::new();

        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout_secs, None);
    }

    #[test]
    fn bad_base_url() {
        let config = TimetableConfig::new().with_base_url("not a url");
        assert!(matches!(
            TimetableClient::new(config),
            Err(TimetableError::InvalidBaseUrl { .. })
        ));
    }

    #[test]
    fn route_url_uses_endpoint() {
        let client = TimetableClient::new(TimetableConfig::new()).unwrap();
        let request = ConnectionsRequest::new("Bern", "Thun").unwrap();
        let url = client.route_url(&request);

        assert!(url
            .as_str()
            .starts_with("https://search.ch/fahrplan/api/route.json?from=Bern&to=Thun"));
    }
}
