//! Latitude/longitude points and boxes.

use serde::{Deserialize, Serialize};

/// A WGS84 point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
}

impl LatLng {
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Returns `true` if both coordinates are finite numbers.
    #[must_use]
    pub const fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

/// An axis-aligned latitude/longitude box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatLngBounds {
    /// Minimum latitude and longitude.
    pub south_west: LatLng,
    /// Maximum latitude and longitude.
    pub north_east: LatLng,
}

impl LatLngBounds {
    /// Builds the smallest box containing both corners, in either order.
    #[must_use]
    pub fn from_corners(a: LatLng, b: LatLng) -> Self {
        Self {
            south_west: LatLng::new(a.lat.min(b.lat), a.lng.min(b.lng)),
            north_east: LatLng::new(a.lat.max(b.lat), a.lng.max(b.lng)),
        }
    }

    #[must_use]
    pub const fn south(&self) -> f64 {
        self.south_west.lat
    }

    #[must_use]
    pub const fn west(&self) -> f64 {
        self.south_west.lng
    }

    #[must_use]
    pub const fn north(&self) -> f64 {
        self.north_east.lat
    }

    #[must_use]
    pub const fn east(&self) -> f64 {
        self.north_east.lng
    }

    /// Midpoint of the box.
    #[must_use]
    pub fn center(&self) -> LatLng {
        LatLng::new(
            f64::midpoint(self.south(), self.north()),
            f64::midpoint(self.west(), self.east()),
        )
    }

    /// Grows the box on every side by `ratio` of its height and width.
    #[must_use]
    pub fn pad(&self, ratio: f64) -> Self {
        let height_buffer = (self.north() - self.south()).abs() * ratio;
        let width_buffer = (self.east() - self.west()).abs() * ratio;
        Self {
            south_west: LatLng::new(self.south() - height_buffer, self.west() - width_buffer),
            north_east: LatLng::new(self.north() + height_buffer, self.east() + width_buffer),
        }
    }

    /// Returns `true` if the point lies inside or on the edge of the box.
    #[must_use]
    pub fn contains(&self, point: LatLng) -> bool {
        (self.south()..=self.north()).contains(&point.lat)
            && (self.west()..=self.east()).contains(&point.lng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_corners_normalises_order() {
        let bounds = LatLngBounds::from_corners(LatLng::new(55.0, -1.0), LatLng::new(54.0, -3.0));
        assert_eq!(bounds.south_west, LatLng::new(54.0, -3.0));
        assert_eq!(bounds.north_east, LatLng::new(55.0, -1.0));
    }

    #[test]
    fn pad_grows_each_side() {
        let bounds = LatLngBounds::from_corners(LatLng::new(50.0, -4.0), LatLng::new(52.0, 0.0));
        let padded = bounds.pad(0.1);
        assert!((padded.south() - 49.8).abs() < 1e-9);
        assert!((padded.north() - 52.2).abs() < 1e-9);
        assert!((padded.west() - -4.4).abs() < 1e-9);
        assert!((padded.east() - 0.4).abs() < 1e-9);
        assert_eq!(padded.center(), bounds.center());
    }

    #[test]
    fn contains_edges() {
        let bounds = LatLngBounds::from_corners(LatLng::new(50.0, -4.0), LatLng::new(52.0, 0.0));
        assert!(bounds.contains(LatLng::new(50.0, 0.0)));
        assert!(!bounds.contains(LatLng::new(49.9, -1.0)));
    }
}
