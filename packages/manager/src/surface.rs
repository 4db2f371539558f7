//! The rendering surface a [`MapManager`](crate::MapManager) drives.

use species_map_atlas::vc::VcBoundary;
use species_map_params_models::{
    AttributionLink, AttributionSlots, BaseLayer, LatLngBounds, NamedLayer, Shape,
};

/// Identifies a layer on the surface.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LayerKey {
    Base(BaseLayer),
    /// A WMS overlay, by title.
    Wms(String),
    /// The explore search area outline.
    SearchArea,
    /// The vice-county outline around the explore target.
    VcBoundary,
}

/// What a layer draws.
#[derive(Debug, Clone, PartialEq)]
pub enum MapLayer {
    Base(BaseLayer),
    Wms(NamedLayer),
    Shape(Shape),
    Boundary(VcBoundary),
}

/// Ids of the elements that hold the map and its external attribution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementIds {
    pub map: String,
    pub attr1: String,
    pub attr2: String,
    pub attr3: String,
    pub attr4: String,
    pub pipe3: String,
}

impl ElementIds {
    /// Derives every id from the map element's id.
    #[must_use]
    pub fn new(map_id: &str) -> Self {
        Self {
            map: map_id.to_string(),
            attr1: format!("{map_id}-attr1"),
            attr2: format!("{map_id}-attr2"),
            attr3: format!("{map_id}-attr3"),
            attr4: format!("{map_id}-attr4"),
            pipe3: format!("{map_id}-pipe3"),
        }
    }

    /// Pairs each attribution slot with the id of its element.
    #[must_use]
    pub fn slots<'a>(&'a self, slots: &'a AttributionSlots) -> [(&'a str, &'a AttributionLink); 4] {
        [
            (&self.attr1, &slots.attr1),
            (&self.attr2, &slots.attr2),
            (&self.attr3, &slots.attr3),
            (&self.attr4, &slots.attr4),
        ]
    }
}

/// A map that layers can be drawn on.
pub trait MapSurface {
    fn add_layer(&mut self, key: LayerKey, layer: MapLayer);

    fn remove_layer(&mut self, key: &LayerKey);

    fn fit_bounds(&mut self, bounds: LatLngBounds);

    /// Fills the external attribution elements.
    fn set_attribution(&mut self, ids: &ElementIds, slots: &AttributionSlots);
}
