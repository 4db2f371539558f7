//! Occurrence-search URLs supplied by callers.

use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::{AtlasClient, AtlasError};

const ALLOWED_PARAMS: &[&str] = &["nbn_loading", "q", "fq"];

/// Checks a caller-supplied occurrence-search URL and strips
/// `nbn_loading` from it.
///
/// # Errors
///
/// Returns [`AtlasError::InvalidUrl`] if the URL does not parse or carries
/// any parameter other than `nbn_loading`, `q` and `fq`.
pub fn validate_occurrence_search_url(api_url: &str) -> Result<String, AtlasError> {
    let mut url = Url::parse(api_url).map_err(|e| AtlasError::InvalidUrl(format!("{api_url}: {e}")))?;

    let mut invalid: Vec<String> = Vec::new();
    for (key, _) in url.query_pairs() {
        if !ALLOWED_PARAMS.contains(&key.as_ref()) && !invalid.iter().any(|k| *k == key) {
            invalid.push(key.into_owned());
        }
    }
    if !invalid.is_empty() {
        return Err(AtlasError::InvalidUrl(format!(
            "Invalid URL parameters: {}",
            invalid.join(", ")
        )));
    }

    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != "nbn_loading")
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();
    if kept.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(&kept);
    }
    Ok(url.into())
}

/// One row of an occurrence search.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OccurrenceRow {
    pub uuid: String,
    #[serde(rename = "occurrenceID")]
    pub occurrence_id: String,
    #[serde(default)]
    pub scientific_name: Option<String>,
    #[serde(default)]
    pub vernacular_name: Option<String>,
    #[serde(default)]
    pub taxon_rank: Option<String>,
    /// Milliseconds since the Unix epoch.
    #[serde(default)]
    pub event_date: Option<i64>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub state_province: Option<String>,
    #[serde(default)]
    pub grid_reference: Option<String>,
    #[serde(default)]
    pub data_resource_name: Option<String>,
    #[serde(default)]
    pub basis_of_record: Option<String>,
}

/// A page of occurrence search results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OccurrenceSearchResult {
    pub page_size: u64,
    pub start_index: u64,
    pub total_records: u64,
    pub sort: String,
    pub dir: String,
    pub status: String,
    pub occurrences: Vec<OccurrenceRow>,
}

impl AtlasClient {
    /// Runs a caller-supplied occurrence search after validating its URL.
    ///
    /// # Errors
    ///
    /// Returns [`AtlasError::InvalidUrl`] if the URL is rejected, or any
    /// fetch error.
    pub async fn occurrence_search(&self, api_url: &str) -> Result<OccurrenceSearchResult, AtlasError> {
        let url = validate_occurrence_search_url(api_url)?;
        self.fetch(&url).await
    }
}
