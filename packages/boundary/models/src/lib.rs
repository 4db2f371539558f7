#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Boundary record types.
//!
//! Defines the TOML schema of the embedded boundary table: one record per
//! vice-county or named region, each a lat/lon box.

use serde::{Deserialize, Serialize};
use species_map_params_models::{LatLng, LatLngBounds};
use strum_macros::{AsRefStr, Display, EnumString};

/// What kind of area a boundary record describes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum BoundaryKind {
    /// A Watsonian vice-county, keyed by its number.
    ViceCounty,
    /// A named region such as `england` or `uk`.
    Region,
}

/// A named lat/lon box, deserialized from TOML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundaryRecord {
    /// Lookup key: the vice-county number (e.g. `"39"`) or region key
    /// (e.g. `"sco-mainland"`).
    pub id: String,
    /// Human-readable name (e.g. `"Staffordshire"`).
    pub name: String,
    pub kind: BoundaryKind,
    /// Latitude of the south-west corner.
    pub llat: f64,
    /// Longitude of the south-west corner.
    pub llon: f64,
    /// Latitude of the north-east corner.
    pub ulat: f64,
    /// Longitude of the north-east corner.
    pub ulon: f64,
}

impl BoundaryRecord {
    #[must_use]
    pub fn bounds(&self) -> LatLngBounds {
        LatLngBounds::from_corners(
            LatLng::new(self.llat, self.llon),
            LatLng::new(self.ulat, self.ulon),
        )
    }

    /// Midpoint of the box.
    #[must_use]
    pub fn centroid(&self) -> LatLng {
        LatLng::new(
            f64::midpoint(self.llat, self.ulat),
            f64::midpoint(self.llon, self.ulon),
        )
    }
}

/// The whole boundary table as stored on disk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundaryTable {
    #[serde(rename = "boundary", default)]
    pub boundaries: Vec<BoundaryRecord>,
}
