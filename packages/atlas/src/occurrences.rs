//! Occurrence records near a clicked point.

use html_escape::{encode_double_quoted_attribute, encode_text};
use serde::{Deserialize, Serialize};
use species_map_params_models::ExploreMap;

use crate::{AtlasClient, AtlasConfig, AtlasError};

/// Element id of the popup's "Next" button.
pub const NEXT_BUTTON_ID: &str = "next-occurrence-button";
/// Element id of the popup's "Previous" button.
pub const PREVIOUS_BUTTON_ID: &str = "previous-occurrence-button";

const BUTTON_CLASS: &str =
    "w-24 bg-blue-500 hover:bg-blue-700 text-white font-bold py-2 px-4 rounded";

/// Longest unbroken value shown in a popup before it is cut short.
const MAX_UNBROKEN_CHARS: usize = 40;

/// Records within this many kilometres of a click are returned. Shrinks as
/// the map zooms in.
#[must_use]
pub fn search_radius_km(zoom: f64) -> f64 {
    250.0 * (-0.61 * zoom).exp()
}

impl AtlasConfig {
    /// Summary of the occurrences near a point, over every taxon or just
    /// the explore target's.
    #[must_use]
    pub fn occurrences_summary_url(
        &self,
        lat: f64,
        lon: f64,
        zoom: f64,
        explore: Option<&ExploreMap>,
    ) -> String {
        let taxon = explore.map_or_else(
            || "&fq=species_group:*&fq=taxon_name:*".to_string(),
            |explore| {
                let group = if explore.is_all_species() {
                    "*".to_string()
                } else {
                    urlencoding::encode(&explore.group_name).into_owned()
                };
                let mut taxon = format!("&fq=species_group:{group}");
                if explore.filters_species() {
                    taxon.push_str(&format!(
                        "&fq=taxon_name:%22{}%22",
                        urlencoding::encode(&explore.species_name)
                    ));
                }
                taxon
            },
        );
        format!(
            "{}/occurrences/info?q=*%3A*{taxon}&lat={lat}&lon={lon}&radius={}&format=json",
            self.records_url,
            search_radius_km(zoom)
        )
    }

    #[must_use]
    pub fn occurrence_detail_url(&self, uuid: &str) -> String {
        format!("{}/occurrences/{uuid}", self.records_url)
    }

    /// The public page for one record.
    #[must_use]
    pub fn occurrence_record_url(&self, uuid: &str) -> String {
        format!("{}/occurrences/{uuid}", self.records_site_url)
    }
}

/// How many records lie near a point, and their ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccurrenceSummary {
    pub count: u64,
    #[serde(default)]
    pub occurrences: Option<Vec<String>>,
}

/// One occurrence record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccurrenceDetail {
    #[serde(default)]
    pub processed: Option<Processed>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Processed {
    pub attribution: Attribution,
    #[serde(default)]
    pub classification: Option<Classification>,
    #[serde(default)]
    pub event: Option<Event>,
    #[serde(default)]
    pub location: Option<RecordLocation>,
    #[serde(default)]
    pub occurrence: Option<RecordDetail>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attribution {
    #[serde(default)]
    pub data_provider_name: Option<String>,
    #[serde(default)]
    pub data_resource_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    #[serde(default)]
    pub scientific_name: Option<String>,
    #[serde(default)]
    pub vernacular_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(default)]
    pub event_date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordLocation {
    #[serde(default)]
    pub decimal_latitude: Option<String>,
    #[serde(default)]
    pub decimal_longitude: Option<String>,
    #[serde(default)]
    pub grid_reference: Option<String>,
    #[serde(default)]
    pub locality: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordDetail {
    #[serde(default)]
    pub basis_of_record: Option<String>,
    #[serde(default)]
    pub recorded_by: Option<String>,
    #[serde(default)]
    pub occurrence_status: Option<String>,
}

/// Pages through the records near a clicked point.
///
/// Nothing is selected until the summary is loaded and a record is asked
/// for. [`next`](Self::next) and [`previous`](Self::previous) wrap around.
#[derive(Debug, Clone)]
pub struct OccurrencePopup {
    summary_url: String,
    summary: Option<OccurrenceSummary>,
    index: Option<usize>,
}

impl OccurrencePopup {
    #[must_use]
    pub fn new(
        config: &AtlasConfig,
        lat: f64,
        lon: f64,
        zoom: f64,
        explore: Option<&ExploreMap>,
    ) -> Self {
        Self {
            summary_url: config.occurrences_summary_url(lat, lon, zoom, explore),
            summary: None,
            index: None,
        }
    }

    #[must_use]
    pub fn summary_url(&self) -> &str {
        &self.summary_url
    }

    /// Fetches the summary. Returns `true` if any records were found.
    ///
    /// # Errors
    ///
    /// Returns [`AtlasError`] if the summary cannot be fetched or validated.
    pub async fn init(&mut self, client: &AtlasClient) -> Result<bool, AtlasError> {
        let summary = client.fetch(&self.summary_url).await?;
        Ok(self.load(summary))
    }

    /// Installs a summary fetched elsewhere. Returns `true` if it holds any
    /// records.
    pub fn load(&mut self, summary: OccurrenceSummary) -> bool {
        let found = summary.count > 0;
        self.summary = Some(summary);
        self.index = None;
        found
    }

    /// Zero-based position of the current record, once one is selected.
    #[must_use]
    pub const fn index(&self) -> Option<usize> {
        self.index
    }

    /// Total records reported by the summary.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.summary.as_ref().map_or(0, |summary| summary.count)
    }

    /// Number of records that can be paged through: the ids actually
    /// returned, never more than the reported count.
    fn pages(&self) -> usize {
        self.summary.as_ref().map_or(0, |summary| {
            let ids = summary.occurrences.as_ref().map_or(0, Vec::len);
            usize::try_from(summary.count).map_or(ids, |count| ids.min(count))
        })
    }

    /// Id of the current record.
    #[must_use]
    pub fn current_id(&self) -> Option<&str> {
        let index = self.index?;
        self.summary
            .as_ref()?
            .occurrences
            .as_ref()?
            .get(index)
            .map(String::as_str)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) {
        if self.summary.is_none() {
            return;
        }
        let pages = self.pages();
        self.index = Some(match self.index {
            Some(index) if pages > 0 => (index + 1) % pages,
            _ => 0,
        });
    }

    pub fn previous(&mut self) {
        if self.summary.is_none() {
            return;
        }
        let pages = self.pages();
        self.index = Some(match self.index {
            Some(0) if pages > 0 => pages - 1,
            Some(index) if pages > 0 => index - 1,
            _ => 0,
        });
    }

    /// Fetches the current record, selecting the first if none is.
    ///
    /// # Errors
    ///
    /// Returns [`AtlasError`] if the record cannot be fetched or validated.
    pub async fn fetch_detail(
        &mut self,
        client: &AtlasClient,
    ) -> Result<Option<OccurrenceDetail>, AtlasError> {
        if self.count() == 0 {
            return Ok(None);
        }
        self.index.get_or_insert(0);
        let Some(id) = self.current_id() else {
            return Ok(None);
        };
        let url = client.config().occurrence_detail_url(id);
        client.fetch(&url).await.map(Some)
    }

    /// Fetches the current record and renders it.
    ///
    /// # Errors
    ///
    /// Returns [`AtlasError`] if the record cannot be fetched or validated.
    pub async fn popup_content(&mut self, client: &AtlasClient) -> Result<Option<String>, AtlasError> {
        let detail = self.fetch_detail(client).await?;
        Ok(detail.map(|detail| self.render(client.config(), &detail)))
    }

    /// HTML body of the popup for `detail`, the current record.
    #[must_use]
    pub fn render(&self, config: &AtlasConfig, detail: &OccurrenceDetail) -> String {
        let count = self.count();
        let position = self.index.unwrap_or(0) + 1;

        let mut html = String::from(r#"<div style="font-weight: normal;">"#);
        if count > 1 {
            html.push_str(&format!("<b>Viewing {position} of {count} occurrences</b><br><br>"));
        }

        if let Some(processed) = &detail.processed {
            let classification = processed.classification.as_ref();
            if let Some(name) = classification.and_then(|c| c.vernacular_name.as_deref()) {
                html.push_str(&format!("{}<br>", encode_text(name)));
            }
            if let Some(name) = classification.and_then(|c| c.scientific_name.as_deref()) {
                html.push_str(&format!("<i>{}</i><br>", encode_text(name)));
            }
            html.push_str("<br>");

            let fields = [
                (
                    "Data resource",
                    processed.attribution.data_resource_name.as_deref(),
                ),
                (
                    "Collector",
                    processed
                        .occurrence
                        .as_ref()
                        .and_then(|o| o.recorded_by.as_deref()),
                ),
                (
                    "Event date",
                    processed.event.as_ref().and_then(|e| e.event_date.as_deref()),
                ),
            ];
            for (label, value) in fields {
                if let Some(value) = value.filter(|v| !v.is_empty()) {
                    html.push_str(&format!(
                        "<b>{label}:</b> {}<br>",
                        encode_text(&truncate(value))
                    ));
                }
            }

            if let Some(id) = self.current_id() {
                html.push_str(&format!(
                    r#"<a href="{}" target="_blank">View full record</a>"#,
                    encode_double_quoted_attribute(&config.occurrence_record_url(id))
                ));
            }
        }
        html.push_str("<br></div>");

        if count > 1 {
            html.push_str(&format!(
                "<button class='{BUTTON_CLASS}' id={PREVIOUS_BUTTON_ID}>Previous</button>\
                 <button class='{BUTTON_CLASS}' id={NEXT_BUTTON_ID}>Next</button>"
            ));
        }
        html
    }
}

/// Cuts a long value with no spaces to fit the popup.
fn truncate(text: &str) -> String {
    if text.chars().count() > MAX_UNBROKEN_CHARS && !text.contains(' ') {
        let mut cut: String = text.chars().take(MAX_UNBROKEN_CHARS - 1).collect();
        cut.push_str("...");
        cut
    } else {
        text.to_string()
    }
}
