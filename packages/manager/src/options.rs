//! Map construction options derived from parameters.

use species_map_params::{MapDimensions, Params};
use species_map_params_models::LatLng;

/// Initial view centre before any bounds are fitted.
pub const DEFAULT_CENTER: LatLng = LatLng::new(54.59, -1.45);
pub const DEFAULT_ZOOM: f64 = 6.0;
/// Stacking order of the pane WMS layers are drawn in, above base tiles.
pub const DATA_PANE_Z_INDEX: u32 = 600;

/// How the map should be created.
#[derive(Debug, Clone, PartialEq)]
#[allow(clippy::struct_excessive_bools)]
pub struct MapOptions {
    pub center: LatLng,
    pub zoom: f64,
    /// Zoom is continuous rather than snapped to integer levels.
    pub zoom_snap: f64,
    /// Credits go in the map's own attribution control.
    pub attribution_control: bool,
    pub box_zoom: bool,
    pub double_click_zoom: bool,
    pub dragging: bool,
    pub keyboard: bool,
    pub scroll_wheel_zoom: bool,
    pub touch_zoom: bool,
    pub zoom_control: bool,
    /// A layer switcher is shown.
    pub layer_control: bool,
    /// Clicking fetches nearby occurrences.
    pub clickable: bool,
    /// The cursor shows a pointer over the map.
    pub pointer_cursor: bool,
    pub dimensions: MapDimensions,
}

impl MapOptions {
    #[must_use]
    pub fn from_params(params: &Params) -> Self {
        let interactive = params.show_interactive();
        let clickable = params.show_clickable();
        Self {
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
            zoom_snap: 0.0,
            attribution_control: params.show_internal_attrib(),
            box_zoom: interactive,
            double_click_zoom: interactive,
            dragging: interactive,
            keyboard: interactive,
            scroll_wheel_zoom: params.show_scroll_zoom(),
            touch_zoom: interactive,
            zoom_control: interactive,
            layer_control: interactive,
            clickable,
            pointer_cursor: clickable && !params.show_region(),
            dimensions: params.map_dimensions(),
        }
    }
}
