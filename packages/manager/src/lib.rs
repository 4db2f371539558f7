#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Keeps a [`MapSurface`] in step with the current search.
//!
//! A [`MapManager`] owns the resolved [`Params`] and the surface they are
//! drawn on. Each [`MapManager::show`] swaps the overlay layers for the new
//! target and returns a [`SearchTicket`]. Results that arrive later, such as
//! the vice-county outline, are applied only while their ticket is current.

pub mod options;
pub mod surface;

use std::sync::Arc;

use species_map_atlas::{AtlasConfig, AtlasError};
use species_map_atlas::occurrences::OccurrencePopup;
use species_map_atlas::vc::{VcBoundary, VcBoundarySource};
use species_map_params::{ParamWarning, Params, Reporter};
use species_map_params_models::{BaseLayer, LatLng, LatLngBounds, Search};

pub use options::{DATA_PANE_Z_INDEX, DEFAULT_CENTER, DEFAULT_ZOOM, MapOptions};
pub use surface::{ElementIds, LayerKey, MapLayer, MapSurface};

/// Fraction the search area is padded by when the view is fitted to it.
const SHAPE_PADDING: f64 = 0.1;

/// Identifies one [`MapManager::show`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SearchTicket(u64);

/// Drives a [`MapSurface`] from [`Params`].
pub struct MapManager<S: MapSurface> {
    params: Params,
    ids: ElementIds,
    surface: S,
    reporter: Arc<dyn Reporter>,
    base: BaseLayer,
    wms: Vec<String>,
    shape: bool,
    boundary: bool,
    generation: u64,
}

impl<S: MapSurface> MapManager<S> {
    /// Adds the first configured base layer to `surface` and fills in its
    /// attribution. No overlays are drawn until [`Self::show`].
    pub fn new(params: Params, map_id: &str, mut surface: S, reporter: Arc<dyn Reporter>) -> Self {
        let ids = ElementIds::new(map_id);
        let base = params.base().first().copied().unwrap_or(BaseLayer::Simple);
        surface.add_layer(LayerKey::Base(base), MapLayer::Base(base));
        surface.set_attribution(&ids, &base.attribution_slots());

        Self {
            params,
            ids,
            surface,
            reporter,
            base,
            wms: Vec::new(),
            shape: false,
            boundary: false,
            generation: 0,
        }
    }

    /// How the map should be created.
    #[must_use]
    pub fn options(&self) -> MapOptions {
        MapOptions::from_params(&self.params)
    }

    #[must_use]
    pub const fn params(&self) -> &Params {
        &self.params
    }

    #[must_use]
    pub const fn ids(&self) -> &ElementIds {
        &self.ids
    }

    #[must_use]
    pub const fn base_layer(&self) -> BaseLayer {
        self.base
    }

    #[must_use]
    pub const fn surface(&self) -> &S {
        &self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    /// Whether `ticket` came from the latest [`Self::show`].
    #[must_use]
    pub const fn is_current(&self, ticket: SearchTicket) -> bool {
        ticket.0 == self.generation
    }

    /// Shows `search`, replacing whatever was shown before.
    ///
    /// Every overlay of the previous search is removed before any new one
    /// is added. The view is fitted to the padded search area when there is
    /// one, else to the resolved parameter bounds.
    pub fn show(&mut self, search: impl Into<Search>) -> SearchTicket {
        match search.into() {
            Search::Tvk(tvk) => self.params.set_tvk(&tvk),
            Search::Explore(explore) => self.params.set_explore(explore),
        }
        self.generation += 1;

        self.clear_overlays();

        for layer in self.params.derive_layers(self.reporter.as_ref()) {
            self.wms.push(layer.name.clone());
            self.surface
                .add_layer(LayerKey::Wms(layer.name.clone()), MapLayer::Wms(layer));
        }

        let bounds = if let Some(shape) = self.params.make_shape() {
            self.surface
                .add_layer(LayerKey::SearchArea, MapLayer::Shape(shape));
            self.shape = true;
            shape.bounds().pad(SHAPE_PADDING)
        } else {
            self.params.bounds()
        };
        self.surface.fit_bounds(bounds);

        log::debug!(
            "Showing '{}' with {} overlay(s), search {}",
            self.params.identifier(),
            self.wms.len(),
            self.generation
        );
        SearchTicket(self.generation)
    }

    fn clear_overlays(&mut self) {
        for title in self.wms.drain(..) {
            self.surface.remove_layer(&LayerKey::Wms(title));
        }
        if std::mem::take(&mut self.shape) {
            self.surface.remove_layer(&LayerKey::SearchArea);
        }
        if std::mem::take(&mut self.boundary) {
            self.surface.remove_layer(&LayerKey::VcBoundary);
        }
    }

    /// Where to look up the vice-county outline for the current search, if
    /// one should be drawn.
    #[must_use]
    pub fn boundary_request(&self) -> Option<(SearchTicket, LatLng)> {
        if !self.params.show_vcs() {
            return None;
        }
        let location = self.params.explore()?.location;
        Some((
            SearchTicket(self.generation),
            LatLng::new(location.latitude, location.longitude),
        ))
    }

    /// Applies a vice-county lookup issued for `ticket`.
    ///
    /// Returns `true` if the outline was drawn. A result for a superseded
    /// search is discarded.
    pub fn apply_boundary(
        &mut self,
        ticket: SearchTicket,
        result: Result<VcBoundary, AtlasError>,
    ) -> bool {
        if !self.is_current(ticket) {
            log::debug!(
                "Discarding vice-county result for search {}, current is {}",
                ticket.0,
                self.generation
            );
            return false;
        }

        if std::mem::take(&mut self.boundary) {
            self.surface.remove_layer(&LayerKey::VcBoundary);
        }

        match result {
            Ok(boundary) => {
                log::debug!("Drawing vice-county {}", boundary.pid);
                self.surface
                    .add_layer(LayerKey::VcBoundary, MapLayer::Boundary(boundary));
                self.boundary = true;
                true
            }
            Err(e) => {
                log::error!("Failed to load vice-county boundary: {e}");
                false
            }
        }
    }

    /// Looks up and draws the vice-county outline for the current search.
    pub async fn load_boundary(&mut self, source: &dyn VcBoundarySource) -> bool {
        let Some((ticket, location)) = self.boundary_request() else {
            return false;
        };
        let result = source.vc_boundary_at(location).await;
        self.apply_boundary(ticket, result)
    }

    /// Switches the base layer by display name.
    ///
    /// An unknown name is reported and leaves the map untouched.
    pub fn select_base_layer(&mut self, name: &str) -> bool {
        let Some(layer) = BaseLayer::from_name(name) else {
            self.reporter.report(ParamWarning::UnknownBaseLayer {
                name: name.to_string(),
            });
            return false;
        };
        if layer != self.base {
            self.surface.remove_layer(&LayerKey::Base(self.base));
            self.surface.add_layer(LayerKey::Base(layer), MapLayer::Base(layer));
            self.base = layer;
        }
        self.surface
            .set_attribution(&self.ids, &layer.attribution_slots());
        true
    }

    /// The occurrence popup for a click at `lat`, `lon`, when clicking is
    /// enabled.
    #[must_use]
    pub fn popup_at(
        &self,
        config: &AtlasConfig,
        lat: f64,
        lon: f64,
        zoom: f64,
    ) -> Option<OccurrencePopup> {
        self.params
            .show_clickable()
            .then(|| OccurrencePopup::new(config, lat, lon, zoom, self.params.explore()))
    }

    /// Resolved parameter bounds, fitted when a search has no area.
    #[must_use]
    pub const fn default_bounds(&self) -> LatLngBounds {
        self.params.bounds()
    }
}
