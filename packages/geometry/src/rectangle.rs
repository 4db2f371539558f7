//! Bounding rectangles around a point, for square area searches.

use std::f64::consts::PI;

use geo::{Polygon, Rect, coord};

/// Earth radius used by the records service for square searches.
const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// A latitude/longitude box in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingRectangle {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingRectangle {
    /// The box as a `geo` rectangle with x = longitude, y = latitude.
    #[must_use]
    pub fn to_rect(&self) -> Rect<f64> {
        Rect::new(
            coord! { x: self.min_lon, y: self.min_lat },
            coord! { x: self.max_lon, y: self.max_lat },
        )
    }

    #[must_use]
    pub fn to_polygon(&self) -> Polygon<f64> {
        self.to_rect().to_polygon()
    }

    /// Closed WKT polygon, anticlockwise from the south-west corner.
    #[must_use]
    pub fn to_wkt(&self) -> String {
        let Self {
            min_lat,
            max_lat,
            min_lon,
            max_lon,
        } = self;
        format!(
            "POLYGON(({min_lon} {min_lat},{max_lon} {min_lat},{max_lon} {max_lat},\
             {min_lon} {max_lat},{min_lon} {min_lat}))"
        )
    }
}

impl From<BoundingRectangle> for Rect<f64> {
    fn from(value: BoundingRectangle) -> Self {
        value.to_rect()
    }
}

/// Box of `width_m` by `height_m` metres either side of a centre point.
///
/// Offsets are flat-earth on a sphere of radius 6 378 137 m.
#[must_use]
pub fn calc_bounding_rectangle(
    lat: f64,
    lon: f64,
    width_m: f64,
    height_m: f64,
) -> BoundingRectangle {
    let d_lat = height_m / EARTH_RADIUS_M * (180.0 / PI);
    let d_lon = width_m / (EARTH_RADIUS_M * (PI * lat / 180.0).cos()) * (180.0 / PI);

    BoundingRectangle {
        min_lat: lat - d_lat,
        max_lat: lat + d_lat,
        min_lon: lon - d_lon,
        max_lon: lon + d_lon,
    }
}

/// WKT polygon of [`calc_bounding_rectangle`].
#[must_use]
pub fn bounding_rectangle_wkt(lat: f64, lon: f64, width_m: f64, height_m: f64) -> String {
    calc_bounding_rectangle(lat, lon, width_m, height_m).to_wkt()
}
