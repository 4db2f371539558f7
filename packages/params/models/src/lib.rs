#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Map parameter, search target, base layer and WMS layer types.
//!
//! These types are shared between the parameter engine, the map manager
//! and the command-line front end. They carry no validation logic of their
//! own: a [`RawMapParams`] is whatever the caller supplied, and it is the
//! `species_map_params` crate that turns it into something trustworthy.

pub mod base_layer;
pub mod bounds;
pub mod colour;
pub mod layer;
pub mod options;
pub mod raw;
pub mod search;

pub use base_layer::{AttributionLink, AttributionSlots, BaseLayer};
pub use bounds::{LatLng, LatLngBounds};
pub use colour::Colour;
pub use layer::{DuplicateLayerTitle, LayerSet, NamedLayer, Shape};
pub use options::{BackgroundLayer, BoundarySource, GridResolution, LogoMode, NamedRegion};
pub use raw::RawMapParams;
pub use search::{ExploreMap, Location, Search};
