//! Named WMS layers and the search-area shapes drawn with them.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{LatLng, LatLngBounds};

/// Layer name requested from the WMS reflect endpoint.
pub const WMS_LAYERS: &str = "ALA:occurrences";
/// Image format requested from the WMS reflect endpoint.
pub const WMS_FORMAT: &str = "image/png";
/// Map pane that occurrence layers are drawn into, above the base map.
pub const DATA_PANE: &str = "DataPane";

/// Equatorial circumference used to turn metres into degrees of latitude.
const EARTH_CIRCUMFERENCE_M: f64 = 40_075_017.0;

/// A layer title that was already taken within one composition pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Duplicate layer title: {title}")]
pub struct DuplicateLayerTitle {
    pub title: String,
}

/// A titled WMS query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamedLayer {
    /// Legend title. Unique within one [`LayerSet`].
    pub name: String,
    /// Base WMS URL including the reflect query string.
    pub query_url: String,
}

impl NamedLayer {
    #[must_use]
    pub fn new(name: impl Into<String>, query_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            query_url: query_url.into(),
        }
    }
}

/// An ordered collection of layers with unique titles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerSet {
    layers: Vec<NamedLayer>,
}

impl LayerSet {
    #[must_use]
    pub const fn new() -> Self {
        Self { layers: Vec::new() }
    }

    /// Appends a layer.
    ///
    /// # Errors
    ///
    /// Returns [`DuplicateLayerTitle`] if a layer with the same title is
    /// already present. The set is left unchanged.
    pub fn insert(&mut self, layer: NamedLayer) -> Result<(), DuplicateLayerTitle> {
        if self.get(&layer.name).is_some() {
            return Err(DuplicateLayerTitle { title: layer.name });
        }
        self.layers.push(layer);
        Ok(())
    }

    /// Looks a layer up by title.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&NamedLayer> {
        self.layers.iter().find(|layer| layer.name == name)
    }

    /// Layer titles in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.layers.iter().map(|layer| layer.name.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NamedLayer> {
        self.layers.iter()
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.layers.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl<'a> IntoIterator for &'a LayerSet {
    type Item = &'a NamedLayer;
    type IntoIter = std::slice::Iter<'a, NamedLayer>;

    fn into_iter(self) -> Self::IntoIter {
        self.layers.iter()
    }
}

impl IntoIterator for LayerSet {
    type Item = NamedLayer;
    type IntoIter = std::vec::IntoIter<NamedLayer>;

    fn into_iter(self) -> Self::IntoIter {
        self.layers.into_iter()
    }
}

/// Outline of the area an explore search is restricted to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Shape {
    /// Square search area.
    Rectangle {
        /// Extent of the square.
        bounds: LatLngBounds,
    },
    /// Circular search area.
    Circle {
        /// Centre of the circle.
        center: LatLng,
        /// Radius in metres.
        radius_m: f64,
    },
}

impl Shape {
    /// Box enclosing the shape.
    ///
    /// Circles use a spherical approximation: the latitude extent is the
    /// radius as a fraction of the equatorial circumference, and the
    /// longitude extent is widened by `1 / cos(latitude)`.
    #[must_use]
    pub fn bounds(&self) -> LatLngBounds {
        match *self {
            Self::Rectangle { bounds } => bounds,
            Self::Circle { center, radius_m } => {
                let lat_r = radius_m / EARTH_CIRCUMFERENCE_M * 360.0;
                let lng_r = lat_r / center.lat.to_radians().cos();
                LatLngBounds::from_corners(
                    LatLng::new(center.lat - lat_r, center.lng - lng_r),
                    LatLng::new(center.lat + lat_r, center.lng + lng_r),
                )
            }
        }
    }
}
