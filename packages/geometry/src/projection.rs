//! Inverse transverse Mercator projection and Helmert datum shifts.
//!
//! Formulae follow the Ordnance Survey's "A guide to coordinate systems in
//! Great Britain". Angles are radians internally and degrees at the edges.

use species_map_params_models::LatLng;

const ARC_SECONDS_TO_RADIANS: f64 = std::f64::consts::PI / (180.0 * 3600.0);

/// A reference ellipsoid given by its semi-major and semi-minor axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipsoid {
    pub a: f64,
    pub b: f64,
}

impl Ellipsoid {
    /// Airy 1830, used by OSGB36.
    pub const AIRY_1830: Self = Self {
        a: 6_377_563.396,
        b: 6_356_256.909,
    };
    /// Airy Modified, used by Ireland 1965.
    pub const AIRY_MODIFIED: Self = Self {
        a: 6_377_340.189,
        b: 6_356_034.447,
    };
    /// WGS84 (b derived from f = 1/298.257223563).
    pub const WGS84: Self = Self {
        a: 6_378_137.0,
        b: 6_356_752.314_245,
    };

    /// First eccentricity squared.
    #[must_use]
    pub fn e2(self) -> f64 {
        1.0 - (self.b * self.b) / (self.a * self.a)
    }

    fn cartesian(self, point: LatLng) -> [f64; 3] {
        let (lat, lng) = (point.lat.to_radians(), point.lng.to_radians());
        let e2 = self.e2();
        let nu = self.a / lat.sin().mul_add(-(e2 * lat.sin()), 1.0).sqrt();
        [
            nu * lat.cos() * lng.cos(),
            nu * lat.cos() * lng.sin(),
            (1.0 - e2) * nu * lat.sin(),
        ]
    }

    fn geodetic(self, [x, y, z]: [f64; 3]) -> LatLng {
        let e2 = self.e2();
        let p = x.hypot(y);
        let mut lat = z.atan2(p * (1.0 - e2));
        for _ in 0..10 {
            let nu = self.a / lat.sin().mul_add(-(e2 * lat.sin()), 1.0).sqrt();
            let next = (e2 * nu).mul_add(lat.sin(), z).atan2(p);
            if (next - lat).abs() < 1e-12 {
                lat = next;
                break;
            }
            lat = next;
        }
        LatLng::new(lat.to_degrees(), y.atan2(x).to_degrees())
    }
}

/// A transverse Mercator grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransverseMercator {
    pub ellipsoid: Ellipsoid,
    /// Scale factor on the central meridian.
    pub scale: f64,
    /// True origin latitude, degrees.
    pub lat0: f64,
    /// True origin longitude, degrees.
    pub lon0: f64,
    /// False easting of the true origin.
    pub false_easting: f64,
    /// False northing of the true origin.
    pub false_northing: f64,
}

impl TransverseMercator {
    /// British National Grid (EPSG:27700).
    pub const NATIONAL_GRID: Self = Self {
        ellipsoid: Ellipsoid::AIRY_1830,
        scale: 0.999_601_271_7,
        lat0: 49.0,
        lon0: -2.0,
        false_easting: 400_000.0,
        false_northing: -100_000.0,
    };

    /// Irish Grid (EPSG:29902).
    pub const IRISH_GRID: Self = Self {
        ellipsoid: Ellipsoid::AIRY_MODIFIED,
        scale: 1.000_035,
        lat0: 53.5,
        lon0: -8.0,
        false_easting: 200_000.0,
        false_northing: 250_000.0,
    };

    /// Meridional arc from the true origin latitude to `lat`.
    fn meridional_arc(&self, lat: f64) -> f64 {
        let Ellipsoid { a, b } = self.ellipsoid;
        let n = (a - b) / (a + b);
        let (n2, n3) = (n * n, n * n * n);
        let lat0 = self.lat0.to_radians();
        let (d, s) = (lat - lat0, lat + lat0);

        b * self.scale
            * ((1.0 + n + 1.25 * n2 + 1.25 * n3) * d
                - (3.0 * n + 3.0 * n2 + 21.0 / 8.0 * n3) * d.sin() * s.cos()
                + (15.0 / 8.0) * (n2 + n3) * (2.0 * d).sin() * (2.0 * s).cos()
                - (35.0 / 24.0) * n3 * (3.0 * d).sin() * (3.0 * s).cos())
    }

    /// Projects grid coordinates back to latitude and longitude on this
    /// grid's own ellipsoid.
    #[must_use]
    pub fn inverse(&self, easting: f64, northing: f64) -> LatLng {
        let Ellipsoid { a, .. } = self.ellipsoid;
        let af0 = a * self.scale;
        let e2 = self.ellipsoid.e2();
        let dn = northing - self.false_northing;

        let mut lat = self.lat0.to_radians();
        let mut m = 0.0;
        for _ in 0..32 {
            lat += (dn - m) / af0;
            m = self.meridional_arc(lat);
            if (dn - m).abs() < 1e-5 {
                break;
            }
        }

        let sin2 = lat.sin() * lat.sin();
        let nu = af0 / (1.0 - e2 * sin2).sqrt();
        let rho = af0 * (1.0 - e2) / (1.0 - e2 * sin2).powf(1.5);
        let eta2 = nu / rho - 1.0;
        let tan = lat.tan();
        let (t2, t4, t6) = (tan.powi(2), tan.powi(4), tan.powi(6));
        let sec = lat.cos().recip();

        let vii = tan / (2.0 * rho * nu);
        let viii = tan / (24.0 * rho * nu.powi(3)) * (5.0 + 3.0 * t2 + eta2 - 9.0 * t2 * eta2);
        let ix = tan / (720.0 * rho * nu.powi(5)) * (61.0 + 90.0 * t2 + 45.0 * t4);
        let x = sec / nu;
        let xi = sec / (6.0 * nu.powi(3)) * (nu / rho + 2.0 * t2);
        let xii = sec / (120.0 * nu.powi(5)) * (5.0 + 28.0 * t2 + 24.0 * t4);
        let xiia = sec / (5040.0 * nu.powi(7)) * (61.0 + 662.0 * t2 + 1320.0 * t4 + 720.0 * t6);

        let de = easting - self.false_easting;
        let lat = lat - vii * de.powi(2) + viii * de.powi(4) - ix * de.powi(6);
        let lng = self.lon0.to_radians() + x * de - xi * de.powi(3) + xii * de.powi(5)
            - xiia * de.powi(7);

        LatLng::new(lat.to_degrees(), lng.to_degrees())
    }
}

/// A seven-parameter position-vector Helmert transformation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Helmert {
    /// Translations in metres.
    pub tx: f64,
    pub ty: f64,
    pub tz: f64,
    /// Rotations in arc seconds.
    pub rx: f64,
    pub ry: f64,
    pub rz: f64,
    /// Scale change in parts per million.
    pub s: f64,
}

impl Helmert {
    /// OSGB36 to WGS84.
    pub const OSGB36_TO_WGS84: Self = Self {
        tx: 446.448,
        ty: -125.157,
        tz: 542.06,
        rx: 0.15,
        ry: 0.247,
        rz: 0.842,
        s: -20.489,
    };

    /// Ireland 1965 to WGS84.
    pub const IRELAND65_TO_WGS84: Self = Self {
        tx: 482.5,
        ty: -130.6,
        tz: 564.6,
        rx: -1.042,
        ry: -0.214,
        rz: -0.631,
        s: 8.15,
    };

    /// Moves a point from the `from` datum to the `to` datum.
    #[must_use]
    pub fn apply(&self, from: Ellipsoid, point: LatLng, to: Ellipsoid) -> LatLng {
        let [x, y, z] = from.cartesian(point);
        let scale = self.s / 1e6 + 1.0;
        let rx = self.rx * ARC_SECONDS_TO_RADIANS;
        let ry = self.ry * ARC_SECONDS_TO_RADIANS;
        let rz = self.rz * ARC_SECONDS_TO_RADIANS;

        let shifted = [
            self.tx + x * scale - y * rz + z * ry,
            self.ty + x * rz + y * scale - z * rx,
            self.tz - x * ry + y * rx + z * scale,
        ];
        to.geodetic(shifted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inverse_matches_ordnance_survey_worked_example() {
        let point = TransverseMercator::NATIONAL_GRID.inverse(651_409.903, 313_177.270);
        assert!((point.lat - 52.657_570_30).abs() < 1e-7, "{point:?}");
        assert!((point.lng - 1.717_921_58).abs() < 1e-7, "{point:?}");
    }

    #[test]
    fn central_meridian_keeps_origin_longitude() {
        let grid = TransverseMercator::NATIONAL_GRID;
        let point = grid.inverse(grid.false_easting, 0.0);
        assert!(point.lat > 49.0 && point.lat < 50.0);
        assert!((point.lng - -2.0).abs() < 1e-12);
    }

    #[test]
    fn cartesian_round_trip_on_wgs84() {
        let point = LatLng::new(54.5, -3.25);
        let back = Ellipsoid::WGS84.geodetic(Ellipsoid::WGS84.cartesian(point));
        assert!((back.lat - point.lat).abs() < 1e-9);
        assert!((back.lng - point.lng).abs() < 1e-9);
    }
}
