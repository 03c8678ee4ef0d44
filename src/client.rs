//! Blocking HTTP access to the facility service.
//!
//! Requires the `remote` feature (enabled by default).

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT};
use reqwest::StatusCode;
use serde_json::Value;
use tracing::debug;

use crate::entity::self_link_id;
use crate::error::EntityError;
use crate::normalize::trailing_segment;
use crate::types::EntityKind;

/// Production facility-service host.
pub const DEFAULT_BASE_URL: &str = "https://api.wdpro.disney.go.com";

/// Default timeout for HTTP requests (10 seconds).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Options for the facility-service client.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Scheme and host of the API, without trailing slash.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Headers sent with every request (authorization and friends).
    pub headers: Vec<(String, String)>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            headers: Vec::new(),
        }
    }
}

impl ClientOptions {
    /// Create options pointing at the production API with no extra headers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Point the client at another host (trailing slashes are dropped).
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Add a header sent with every request.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// Thin JSON client over `reqwest::blocking`.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    /// Build a client from options.
    ///
    /// # Errors
    ///
    /// Returns `EntityError::InvalidHeader` for a header name or value that
    /// isn't valid HTTP, or `EntityError::Network` if the TLS backend fails to
    /// initialize.
    pub fn new(options: ClientOptions) -> Result<Self, EntityError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        for (name, value) in &options.headers {
            let invalid = || EntityError::InvalidHeader { name: name.clone() };
            let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| invalid())?;
            let header_value = HeaderValue::from_str(value).map_err(|_| invalid())?;
            headers.insert(header_name, header_value);
        }

        let http = Client::builder()
            .timeout(options.timeout)
            .default_headers(headers)
            .build()
            .map_err(|source| EntityError::Network {
                url: options.base_url.clone(),
                source,
            })?;

        Ok(Self {
            http,
            base_url: options.base_url,
        })
    }

    /// URL of a single entity.
    pub fn entity_url(&self, kind: EntityKind, id: &str) -> String {
        format!(
            "{}/facility-service/{}/{}",
            self.base_url,
            kind.collection(),
            id
        )
    }

    /// URL of the collection listing for a kind.
    pub fn collection_url(&self, kind: EntityKind) -> String {
        format!("{}/facility-service/{}", self.base_url, kind.collection())
    }

    /// Fetch the raw record of one entity.
    ///
    /// # Errors
    ///
    /// Returns `EntityError::NotFound` on HTTP 404, `EntityError::Network`
    /// for other failures, or `EntityError::InvalidJson` if the body isn't JSON.
    pub fn fetch(&self, kind: EntityKind, id: &str) -> Result<Value, EntityError> {
        self.fetch_href(&self.entity_url(kind, id))
            .map_err(|e| e.with_requested_id(id))
    }

    /// Fetch any facility-service href, such as one taken from a `links` object.
    pub fn fetch_href(&self, url: &str) -> Result<Value, EntityError> {
        debug!(url, "fetching");
        let network = |source: reqwest::Error| EntityError::Network {
            url: url.to_string(),
            source,
        };

        let response = self.http.get(url).send().map_err(network)?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(EntityError::NotFound {
                id: trailing_segment(url).map(String::from),
            });
        }

        // Check for HTTP errors before parsing
        let response = response.error_for_status().map_err(network)?;
        let body = response.text().map_err(network)?;

        serde_json::from_str(&body).map_err(|source| EntityError::InvalidJson {
            url: url.to_string(),
            source,
        })
    }

    /// Ids listed in a collection response (`entries[].links.self.href`).
    ///
    /// Entries without a self link are skipped.
    pub fn list_ids(&self, url: &str) -> Result<Vec<String>, EntityError> {
        let listing = self.fetch_href(url)?;
        Ok(entry_ids(&listing))
    }
}

/// Collect the ids of `entries[]` in a collection response.
pub(crate) fn entry_ids(listing: &Value) -> Vec<String> {
    listing
        .get("entries")
        .and_then(Value::as_array)
        .map(|entries| entries.iter().filter_map(self_link_id).collect())
        .unwrap_or_default()
}
