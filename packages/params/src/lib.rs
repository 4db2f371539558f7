#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! The map parameter engine.
//!
//! Takes an untrusted bag of URL-style parameters and a search target and
//! produces a [`Params`]: every field sanitised, the map extent resolved
//! from whichever boundary parameter has the highest precedence, and the
//! WMS overlay layers ready to derive with [`Params::derive_layers`].
//!
//! Nothing here fails on bad input. Problems are reported to a
//! [`Reporter`] as [`ParamWarning`]s and the field falls back to its
//! default.

pub mod diagnostics;
pub mod layers;
pub mod params;
pub mod raw;
pub mod sanitise;

pub use diagnostics::{CollectingReporter, LogReporter, NullReporter, ParamWarning, Reporter};
pub use layers::{ACCEPTED_TITLE, GetMapUrl, UNCONFIRMED_TITLE, WMS_BASE_URL};
pub use params::{DEFAULT_HEIGHT, DateBand, MapDimensions, Params, Resolvers, clean_tvk};
pub use raw::{raw_from_pairs, set_param};
