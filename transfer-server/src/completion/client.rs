//! Completion endpoint client.

use reqwest::Url;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::timetable::{TimetableConfig, TimetableError};

/// Path of the completion endpoint below the base URL.
const COMPLETION_PATH: &str = "completion.json";

/// Optional request flags. Each is sent as `name=1` only when set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
pub struct CompletionOptions {
    /// Exclude the API's own favourite places
    #[serde(default)]
    pub nofavorites: bool,
    /// Include stop ids in the suggestions
    #[serde(default)]
    pub show_ids: bool,
    /// Include coordinates in the suggestions
    #[serde(default)]
    pub show_coordinates: bool,
}

/// One completion result.
///
/// Only `label` is interpreted; every other field is carried through as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub label: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Suggestion {
    /// A suggestion with only a label.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            extra: Map::new(),
        }
    }
}

/// Completion endpoint client.
#[derive(Debug, Clone)]
pub struct CompletionClient {
    http: reqwest::Client,
    endpoint: Url,
}

impl CompletionClient {
    /// Create a new client against the same API as the route client.
    ///
    /// Only configuration errors can fail here.
    pub fn new(config: TimetableConfig) -> Result<Self, TimetableError> {
        Ok(Self {
            http: config.http_client()?,
            endpoint: config.endpoint(COMPLETION_PATH)?,
        })
    }

    /// Query URL for an already-trimmed term.
    pub fn completion_url(&self, term: &str, options: &CompletionOptions) -> Url {
        let mut url = self.endpoint.clone();
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("term", term);
            if options.nofavorites {
                query.append_pair("nofavorites", "1");
            }
            if options.show_ids {
                query.append_pair("show_ids", "1");
            }
            if options.show_coordinates {
                query.append_pair("show_coordinates", "1");
            }
        }
        url
    }

    /// Look up suggestions for a term.
    ///
    /// A term that is empty after trimming returns immediately without a
    /// request. Transport errors, error statuses and bodies that are not a
    /// JSON array all yield an empty list.
    pub async fn fetch_completions(
        &self,
        term: &str,
        options: &CompletionOptions,
    ) -> Vec<Suggestion> {
        let term = term.trim();
        if term.is_empty() {
            return Vec::new();
        }

        let url = self.completion_url(term, options);
        debug!(%url, "completion query");

        match self.try_fetch(url).await {
            Ok(suggestions) => suggestions,
            Err(reason) => {
                warn!(term, %reason, "completion lookup failed");
                Vec::new()
            }
        }
    }

    async fn try_fetch(&self, url: Url) -> Result<Vec<Suggestion>, String> {
        let response = self.http.get(url).send().await.map_err(|e| e.to_string())?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("HTTP {status}"));
        }

        let value: Value = response.json().await.map_err(|e| e.to_string())?;
        parse_suggestions(value)
    }
}

/// Keep array elements that carry a string label.
fn parse_suggestions(value: Value) -> Result<Vec<Suggestion>, String> {
    let Value::Array(items) = value else {
        return Err("response is not an array".to_string());
    };

    Ok(items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect())
}
