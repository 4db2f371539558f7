#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Geometry used to build map queries.
//!
//! Two unrelated jobs live here:
//!
//! - [`calc_bounding_rectangle`] and [`bounding_rectangle_wkt`] turn a
//!   centre and a size in metres into the lat/lon box and WKT polygon the
//!   records service expects for square searches.
//! - [`CoordinateConverter`] turns Ordnance Survey grid references and
//!   EPSG:27700 eastings/northings into WGS84. [`OsConverter`] is the
//!   built-in implementation.

pub mod grid;
pub mod projection;
pub mod rectangle;

use species_map_params_models::LatLng;
use thiserror::Error;

pub use grid::{GridReference, GridSystem, parse_easting_northing};
pub use projection::{Ellipsoid, Helmert, TransverseMercator};
pub use rectangle::{BoundingRectangle, bounding_rectangle_wkt, calc_bounding_rectangle};

/// Errors from grid reference parsing and coordinate conversion.
#[derive(Debug, Error)]
pub enum GeometryError {
    /// The text is not a British or Irish grid reference.
    #[error("Invalid grid reference: {0}")]
    InvalidGridReference(String),

    /// An easting/northing pair could not be read.
    #[error("Invalid easting/northing pair: {0}")]
    InvalidCoordinate(String),

    /// The conversion produced a non-finite result.
    #[error("Coordinate out of range: easting {easting}, northing {northing}")]
    OutOfRange { easting: f64, northing: f64 },
}

/// Converts projected British coordinates to WGS84.
pub trait CoordinateConverter: Send + Sync {
    /// Returns the WGS84 centroid of the square a grid reference names.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError`] if the reference cannot be parsed or
    /// converted.
    fn grid_ref_to_lat_lng(&self, grid_ref: &str) -> Result<LatLng, GeometryError>;

    /// Converts an EPSG:27700 easting/northing to WGS84.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError`] if the conversion does not produce a
    /// finite point.
    fn easting_northing_to_lat_lng(
        &self,
        easting: f64,
        northing: f64,
    ) -> Result<LatLng, GeometryError>;
}

/// Ordnance Survey conversions for the British National Grid and the
/// Irish Grid.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsConverter;

impl OsConverter {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn to_wgs84(
        system: GridSystem,
        easting: f64,
        northing: f64,
    ) -> Result<LatLng, GeometryError> {
        let (projection, datum) = match system {
            GridSystem::British => (TransverseMercator::NATIONAL_GRID, Helmert::OSGB36_TO_WGS84),
            GridSystem::Irish => (TransverseMercator::IRISH_GRID, Helmert::IRELAND65_TO_WGS84),
        };
        let local = projection.inverse(easting, northing);
        let point = datum.apply(projection.ellipsoid, local, Ellipsoid::WGS84);
        if point.is_finite() {
            Ok(point)
        } else {
            Err(GeometryError::OutOfRange { easting, northing })
        }
    }
}

impl CoordinateConverter for OsConverter {
    fn grid_ref_to_lat_lng(&self, grid_ref: &str) -> Result<LatLng, GeometryError> {
        let parsed = GridReference::parse(grid_ref)?;
        let (easting, northing) = parsed.centroid();
        log::trace!("Grid reference {grid_ref} centroid is {easting},{northing}");
        Self::to_wgs84(parsed.system, easting, northing)
    }

    fn easting_northing_to_lat_lng(
        &self,
        easting: f64,
        northing: f64,
    ) -> Result<LatLng, GeometryError> {
        Self::to_wgs84(GridSystem::British, easting, northing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: LatLng, lat: f64, lng: f64, tolerance: f64) {
        assert!(
            (actual.lat - lat).abs() < tolerance && (actual.lng - lng).abs() < tolerance,
            "expected ({lat}, {lng}), got ({}, {})",
            actual.lat,
            actual.lng
        );
    }

    #[test]
    fn converts_national_grid_to_wgs84() {
        let point = OsConverter
            .easting_northing_to_lat_lng(651_409.903, 313_177.270)
            .unwrap();
        assert_close(point, 52.657_979, 1.716_052, 1e-5);
    }

    #[test]
    fn converts_grid_reference_centroid() {
        let point = OsConverter.grid_ref_to_lat_lng("SJ49").unwrap();
        assert_close(point, 53.448_877, -2.829_611, 1e-5);

        let spaced = OsConverter.grid_ref_to_lat_lng("sj 4 9").unwrap();
        assert_eq!(point, spaced);
    }

    #[test]
    fn converts_irish_grid_reference() {
        let point = OsConverter.grid_ref_to_lat_lng("O150340").unwrap();
        assert_close(point, 53.344_405, -6.273_292, 1e-5);
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            OsConverter.grid_ref_to_lat_lng("not a grid ref"),
            Err(GeometryError::InvalidGridReference(_))
        ));
    }
}
