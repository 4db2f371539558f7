//! Enumerated parameter domains.
//!
//! Each enum's `strum` serialization is the exact lower-case token a caller
//! supplies, so the sanitisers can validate against
//! [`strum::VariantNames`] and parse with [`std::str::FromStr`].

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString, VariantNames};

/// Grid square size of the occurrence grid layers.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    VariantNames,
)]
pub enum GridResolution {
    /// 50 km squares.
    #[strum(serialize = "50km")]
    #[serde(rename = "50km")]
    Km50,
    /// 10 km squares (hectads).
    #[default]
    #[strum(serialize = "10km")]
    #[serde(rename = "10km")]
    Km10,
    /// 2 km squares (tetrads).
    #[strum(serialize = "2km")]
    #[serde(rename = "2km")]
    Km2,
    /// 1 km squares (monads).
    #[strum(serialize = "1km")]
    #[serde(rename = "1km")]
    Km1,
    /// 100 m squares.
    #[strum(serialize = "100m")]
    #[serde(rename = "100m")]
    M100,
}

impl GridResolution {
    /// The WMS `gridres` value, e.g. `fixed_10km`.
    #[must_use]
    pub fn grid_size(self) -> String {
        format!("fixed_{self}")
    }
}

/// Where NBN and base-map credits are shown.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    VariantNames,
)]
pub enum LogoMode {
    /// No credits.
    #[strum(serialize = "0")]
    #[serde(rename = "0")]
    Hidden,
    /// Credits rendered in slots below the map.
    #[default]
    #[strum(serialize = "1")]
    #[serde(rename = "1")]
    External,
    /// Credits rendered by the map's own attribution control.
    #[strum(serialize = "2")]
    #[serde(rename = "2")]
    Internal,
}

/// Named regions a map can be zoomed to.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    VariantNames,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum NamedRegion {
    /// England.
    England,
    /// Scotland.
    Scotland,
    /// Wales.
    Wales,
    /// The Scottish Highlands.
    Highland,
    /// Mainland Scotland, excluding the islands.
    ScoMainland,
    /// The Outer Hebrides.
    OuterHeb,
    /// The whole United Kingdom. Used when no boundary is supplied.
    Uk,
}

/// Background overlays that can be drawn under the occurrence layers.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    VariantNames,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum BackgroundLayer {
    /// Vice-county boundary containing the search location.
    Vc,
}

/// Which caller input produced the resolved map bounds.
///
/// Variants are declared in precedence order: when several sources
/// resolve, the first one wins.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display,
)]
#[serde(rename_all = "camelCase")]
pub enum BoundarySource {
    /// `bl` + `tr` grid references.
    #[strum(serialize = "[bl,tr]")]
    GridReference,
    /// `blCoord` + `trCoord` easting/northing pairs.
    #[strum(serialize = "[blCoord,trCoord]")]
    NorthingEasting,
    /// `vc` vice-county number.
    #[strum(serialize = "vc")]
    ViceCounty,
    /// `zoom` named region.
    #[strum(serialize = "zoom")]
    Region,
    /// Nothing resolved; the `uk` region is used.
    #[strum(serialize = "default")]
    Default,
}
