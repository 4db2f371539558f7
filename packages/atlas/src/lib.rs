#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Clients for the NBN Atlas services the species map talks to.
//!
//! Every call is a single `GET` whose JSON body is validated by
//! deserialising it into a typed struct. A body that does not match is
//! [`AtlasError::Schema`]. Nothing is retried or cached.
//!
//! - [`occurrences`]: occurrence summaries near a point, occurrence detail
//!   and the paged [`occurrences::OccurrencePopup`].
//! - [`vc`]: vice-county lookup by coordinate and boundary polygons.
//! - [`locate`]: turning a postcode, grid reference or region name into a
//!   coordinate.
//! - [`search`]: occurrence-search URL validation.

pub mod locate;
pub mod occurrences;
pub mod search;
pub mod vc;

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from the NBN Atlas clients.
#[derive(Debug, Error)]
pub enum AtlasError {
    /// The request could not be sent or the body could not be read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("Unexpected status {status} from {url}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },

    /// The body did not match the expected shape.
    #[error("Data validation error: {0}")]
    Schema(#[from] serde_json::Error),

    /// The body was JSON but not usable `GeoJSON`.
    #[error("Invalid GeoJSON: {0}")]
    GeoJson(#[from] geojson::Error),

    /// The `GeoJSON` held no polygon.
    #[error("Boundary {pid} has no polygon geometry")]
    NoPolygon { pid: String },

    /// The service had no answer for the query.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The request cannot be served outside a browser.
    #[error("Unsupported: {0}")]
    Unsupported(String),

    /// A URL supplied by the caller was rejected.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Service locations and the request timeout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtlasConfig {
    /// Records web service root.
    #[serde(default = "default_records_url")]
    pub records_url: String,
    /// Public records site, used for "view full record" links.
    #[serde(default = "default_records_site_url")]
    pub records_site_url: String,
    /// Spatial layers service root.
    #[serde(default = "default_layers_url")]
    pub layers_url: String,
    /// Postcode lookup root.
    #[serde(default = "default_postcodes_url")]
    pub postcodes_url: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_records_url() -> String {
    "https://records-ws.nbnatlas.org".to_string()
}

fn default_records_site_url() -> String {
    "https://records.nbnatlas.org".to_string()
}

fn default_layers_url() -> String {
    "https://layers.nbnatlas.org".to_string()
}

fn default_postcodes_url() -> String {
    "https://api.postcodes.io".to_string()
}

const fn default_timeout_secs() -> u64 {
    30
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            records_url: default_records_url(),
            records_site_url: default_records_site_url(),
            layers_url: default_layers_url(),
            postcodes_url: default_postcodes_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// A configured HTTP client for the NBN Atlas services.
#[derive(Debug, Clone)]
pub struct AtlasClient {
    client: reqwest::Client,
    config: AtlasConfig,
}

impl AtlasClient {
    /// Builds a client whose requests time out after
    /// [`AtlasConfig::timeout_secs`].
    ///
    /// # Errors
    ///
    /// Returns [`AtlasError::Http`] if the HTTP client cannot be built.
    pub fn new(config: AtlasConfig) -> Result<Self, AtlasError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    #[must_use]
    pub const fn config(&self) -> &AtlasConfig {
        &self.config
    }

    /// Fetches `url` and validates the body as `T`.
    ///
    /// # Errors
    ///
    /// Returns [`AtlasError::Http`] or [`AtlasError::Status`] if the request
    /// fails, and [`AtlasError::Schema`] if the body does not match `T`.
    pub async fn fetch<T: DeserializeOwned>(&self, url: &str) -> Result<T, AtlasError> {
        let body = self.fetch_text(url).await?;
        parse_json(&body)
    }

    async fn fetch_text(&self, url: &str) -> Result<String, AtlasError> {
        log::debug!("GET {url}");
        let resp = self.client.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(AtlasError::Status {
                status,
                url: url.to_string(),
            });
        }
        Ok(resp.text().await?)
    }
}

/// Validates a response body as `T`.
///
/// # Errors
///
/// Returns [`AtlasError::Schema`] if the body does not match `T`.
pub fn parse_json<T: DeserializeOwned>(body: &str) -> Result<T, AtlasError> {
    serde_json::from_str(body).map_err(|e| {
        log::error!("Data validation error: {e}");
        AtlasError::Schema(e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Count {
        count: u64,
    }

    #[test]
    fn config_defaults_fill_missing_fields() {
        let config: AtlasConfig =
            serde_json::from_str(r#"{ "timeout_secs": 5 }"#).unwrap();
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.records_url, "https://records-ws.nbnatlas.org");
        assert_eq!(config.layers_url, "https://layers.nbnatlas.org");
        assert_eq!(config.postcodes_url, "https://api.postcodes.io");
    }

    #[test]
    fn schema_mismatch_is_distinguishable() {
        let ok: Count = parse_json(r#"{ "count": 3 }"#).unwrap();
        assert_eq!(ok.count, 3);

        let err = parse_json::<Count>(r#"{ "count": "three" }"#).unwrap_err();
        assert!(matches!(err, AtlasError::Schema(_)));
    }

    #[test]
    fn client_builds_from_default_config() {
        let client = AtlasClient::new(AtlasConfig::default()).unwrap();
        assert_eq!(client.config(), &AtlasConfig::default());
    }
}
