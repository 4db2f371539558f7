//! A [`MapSurface`] that writes each operation as a line of text.

use species_map_manager::{ElementIds, LayerKey, MapLayer, MapSurface};
use species_map_params::GetMapUrl;
use species_map_params_models::{AttributionSlots, LatLngBounds, Shape};

/// Records surface operations as printable lines.
#[derive(Debug, Default)]
pub struct TextSurface {
    /// Tile bbox used to sample a GetMap URL for each WMS layer.
    sample_bbox: Option<(LatLngBounds, u32)>,
    lines: Vec<String>,
}

impl TextSurface {
    #[must_use]
    pub const fn with_sample(bbox: LatLngBounds, tile_size: u32) -> Self {
        Self {
            sample_bbox: Some((bbox, tile_size)),
            lines: Vec::new(),
        }
    }

    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

fn key_label(key: &LayerKey) -> String {
    match key {
        LayerKey::Base(layer) => format!("base '{}'", layer.display_name()),
        LayerKey::Wms(title) => format!("wms '{title}'"),
        LayerKey::SearchArea => "search area".to_string(),
        LayerKey::VcBoundary => "vice-county boundary".to_string(),
    }
}

fn bounds_label(bounds: &LatLngBounds) -> String {
    format!(
        "[{}, {}] to [{}, {}]",
        bounds.south(),
        bounds.west(),
        bounds.north(),
        bounds.east()
    )
}

impl MapSurface for TextSurface {
    fn add_layer(&mut self, key: LayerKey, layer: MapLayer) {
        let detail = match &layer {
            MapLayer::Base(base) => base.tile_url().to_string(),
            MapLayer::Wms(wms) => self.sample_bbox.as_ref().map_or_else(
                || wms.query_url.clone(),
                |(bbox, tile_size)| wms.get_map_url(bbox, *tile_size),
            ),
            MapLayer::Shape(Shape::Rectangle { bounds }) => {
                format!("rectangle {}", bounds_label(bounds))
            }
            MapLayer::Shape(Shape::Circle { center, radius_m }) => {
                format!("circle at [{}, {}] radius {radius_m} m", center.lat, center.lng)
            }
            MapLayer::Boundary(boundary) => format!(
                "vice-county {} {}",
                boundary.pid,
                bounds_label(&boundary.bounds)
            ),
        };
        self.lines
            .push(format!("add {}: {detail}", key_label(&key)));
    }

    fn remove_layer(&mut self, key: &LayerKey) {
        self.lines.push(format!("remove {}", key_label(key)));
    }

    fn fit_bounds(&mut self, bounds: LatLngBounds) {
        self.lines.push(format!("fit {}", bounds_label(&bounds)));
    }

    fn set_attribution(&mut self, ids: &ElementIds, slots: &AttributionSlots) {
        for (id, link) in ids.slots(slots) {
            if !link.is_empty() {
                self.lines
                    .push(format!("attribution #{id}: {} <{}>", link.text, link.href));
            }
        }
        if slots.pipe3_visible {
            self.lines.push(format!("attribution #{}: shown", ids.pipe3));
        }
    }
}
