//! Search-location resolution.
//!
//! A search term is tried, in order, as a UK postcode, then as a grid
//! reference, then as the name of a region or vice-county in the boundary
//! table. The first that resolves wins.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use species_map_boundary::BoundaryIndex;
use species_map_params_models::LatLng;

use crate::{AtlasClient, AtlasConfig, AtlasError};

/// Search term asking for the device's own position.
pub const CURRENT_LOCATION: &str = "current";

impl AtlasConfig {
    #[must_use]
    pub fn grid_ref_url(&self, grid_ref: &str) -> String {
        format!(
            "{}/osgrid/lookup.json?q={}",
            self.records_url,
            urlencoding::encode(grid_ref)
        )
    }

    #[must_use]
    pub fn postcode_url(&self, postcode: &str) -> String {
        format!(
            "{}/postcodes/{}",
            self.postcodes_url,
            urlencoding::encode(postcode)
        )
    }
}

/// Grid reference lookup response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridRefLookup {
    pub valid: bool,
    #[serde(default)]
    pub decimal_latitude: Option<String>,
    #[serde(default)]
    pub decimal_longitude: Option<String>,
    #[serde(default)]
    pub max_lat: Option<String>,
    #[serde(default)]
    pub max_long: Option<String>,
    #[serde(default)]
    pub min_lat: Option<String>,
    #[serde(default)]
    pub min_long: Option<String>,
}

impl GridRefLookup {
    /// Centre of the referenced square, when the service resolved it.
    #[must_use]
    pub fn location(&self) -> Option<LatLng> {
        let lat = self.decimal_latitude.as_deref()?.trim().parse().ok()?;
        let lng = self.decimal_longitude.as_deref()?.trim().parse().ok()?;
        Some(LatLng::new(lat, lng))
    }
}

/// Postcode lookup response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostcodeLookup {
    pub status: u16,
    #[serde(default)]
    pub result: Option<PostcodeResult>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostcodeResult {
    pub postcode: String,
    pub country: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

impl PostcodeLookup {
    #[must_use]
    pub fn location(&self) -> Option<LatLng> {
        let result = self.result.as_ref()?;
        Some(LatLng::new(result.latitude?, result.longitude?))
    }
}

/// Which lookup resolved a search term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationSource {
    Postcode,
    GridReference,
    Region,
}

/// A resolved search term.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Located {
    pub location: LatLng,
    pub source: LocationSource,
}

/// The remote lookups tried before the boundary table.
#[async_trait]
pub trait LocationLookup: Send + Sync {
    /// # Errors
    ///
    /// Returns [`AtlasError`] if the lookup fails.
    async fn postcode(&self, postcode: &str) -> Result<PostcodeLookup, AtlasError>;

    /// # Errors
    ///
    /// Returns [`AtlasError`] if the lookup fails.
    async fn grid_ref(&self, grid_ref: &str) -> Result<GridRefLookup, AtlasError>;
}

#[async_trait]
impl LocationLookup for AtlasClient {
    async fn postcode(&self, postcode: &str) -> Result<PostcodeLookup, AtlasError> {
        self.fetch(&self.config().postcode_url(postcode)).await
    }

    async fn grid_ref(&self, grid_ref: &str) -> Result<GridRefLookup, AtlasError> {
        self.fetch(&self.config().grid_ref_url(grid_ref)).await
    }
}

/// Resolves a search term to a coordinate.
///
/// # Errors
///
/// Returns [`AtlasError::Unsupported`] for [`CURRENT_LOCATION`] and
/// [`AtlasError::NotFound`] if nothing resolves the term.
pub async fn locate(
    lookup: &dyn LocationLookup,
    boundaries: &BoundaryIndex,
    query: &str,
) -> Result<Located, AtlasError> {
    let query = query.trim();
    if query.eq_ignore_ascii_case(CURRENT_LOCATION) {
        return Err(AtlasError::Unsupported(
            "The current device location is only available in a browser".to_string(),
        ));
    }

    match lookup.postcode(query).await {
        Ok(response) => {
            if let Some(location) = response.location() {
                return Ok(Located {
                    location,
                    source: LocationSource::Postcode,
                });
            }
            log::debug!("'{query}' is not a valid postcode");
        }
        Err(e) => log::debug!("Postcode lookup for '{query}' failed: {e}"),
    }

    match lookup.grid_ref(query).await {
        Ok(response) => {
            if let Some(location) = response.location() {
                return Ok(Located {
                    location,
                    source: LocationSource::GridReference,
                });
            }
            log::debug!("'{query}' is not a valid grid reference");
        }
        Err(e) => log::debug!("Grid reference lookup for '{query}' failed: {e}"),
    }

    boundaries
        .region_centroid(query)
        .map(|location| Located {
            location,
            source: LocationSource::Region,
        })
        .ok_or_else(|| AtlasError::NotFound(format!("Failed to locate search term: {query}")))
}

impl AtlasClient {
    /// [`locate`] against the live services.
    ///
    /// # Errors
    ///
    /// See [`locate`].
    pub async fn locate(&self, boundaries: &BoundaryIndex, query: &str) -> Result<Located, AtlasError> {
        locate(self, boundaries, query).await
    }
}
