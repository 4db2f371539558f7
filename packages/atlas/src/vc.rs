//! Vice-county lookups against the spatial layers service.

use async_trait::async_trait;
use geo::{BoundingRect, MultiPolygon};
use geojson::GeoJson;
use serde::{Deserialize, Serialize};
use species_map_params_models::{LatLng, LatLngBounds};

use crate::{AtlasClient, AtlasConfig, AtlasError};

/// The layers service field holding vice-county polygons.
pub const VICE_COUNTY_FIELD: &str = "cl14";

impl AtlasConfig {
    /// Which vice-county contains a point.
    #[must_use]
    pub fn vc_intersect_url(&self, lat: f64, lon: f64) -> String {
        format!(
            "{}/ws/intersect/{VICE_COUNTY_FIELD}/{lat}/{lon}",
            self.layers_url
        )
    }

    #[must_use]
    pub fn vc_object_url(&self, pid: &str) -> String {
        format!("{}/ws/object/{pid}", self.layers_url)
    }

    #[must_use]
    pub fn vc_boundary_url(&self, pid: &str) -> String {
        format!("{}/ws/shape/geojson/{pid}", self.layers_url)
    }
}

/// One field value at an intersected point.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VcIntersection {
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub layername: Option<String>,
    #[serde(default)]
    pub pid: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
}

/// A vice-county object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VcObject {
    #[serde(default)]
    pub area_km: Option<f64>,
    #[serde(default)]
    pub bbox: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub fid: Option<String>,
    #[serde(default)]
    pub fieldname: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub pid: Option<String>,
    #[serde(default)]
    pub wmsurl: Option<String>,
}

/// A vice-county outline.
#[derive(Debug, Clone, PartialEq)]
pub struct VcBoundary {
    pub pid: String,
    pub polygon: MultiPolygon<f64>,
    pub bounds: LatLngBounds,
}

/// Parses the `GeoJSON` outline of vice-county `pid`.
///
/// Accepts a bare geometry, a feature or the first polygon feature of a
/// collection.
///
/// # Errors
///
/// Returns [`AtlasError::GeoJson`] if the body is not `GeoJSON` and
/// [`AtlasError::NoPolygon`] if it holds no polygon.
pub fn parse_vc_boundary(pid: &str, body: &str) -> Result<VcBoundary, AtlasError> {
    let geojson: GeoJson = body.parse()?;
    let geometries = match geojson {
        GeoJson::Geometry(geometry) => vec![geometry],
        GeoJson::Feature(feature) => feature.geometry.into_iter().collect(),
        GeoJson::FeatureCollection(collection) => collection
            .features
            .into_iter()
            .filter_map(|feature| feature.geometry)
            .collect(),
    };

    let no_polygon = || AtlasError::NoPolygon {
        pid: pid.to_string(),
    };

    let polygon = geometries
        .into_iter()
        .find_map(|geometry| match geo::Geometry::<f64>::try_from(geometry) {
            Ok(geo::Geometry::MultiPolygon(mp)) => Some(mp),
            Ok(geo::Geometry::Polygon(p)) => Some(MultiPolygon(vec![p])),
            _ => None,
        })
        .ok_or_else(no_polygon)?;

    let rect = polygon.bounding_rect().ok_or_else(no_polygon)?;
    let bounds = LatLngBounds::from_corners(
        LatLng::new(rect.min().y, rect.min().x),
        LatLng::new(rect.max().y, rect.max().x),
    );

    Ok(VcBoundary {
        pid: pid.to_string(),
        polygon,
        bounds,
    })
}

/// Anything that can find the vice-county outline around a point.
#[async_trait]
pub trait VcBoundarySource: Send + Sync {
    /// Outline of the vice-county containing `location`.
    ///
    /// # Errors
    ///
    /// Returns [`AtlasError`] if no vice-county contains the point or the
    /// outline cannot be fetched.
    async fn vc_boundary_at(&self, location: LatLng) -> Result<VcBoundary, AtlasError>;
}

impl AtlasClient {
    /// Vice-county fields at a point.
    ///
    /// # Errors
    ///
    /// Returns [`AtlasError`] if the lookup fails.
    pub async fn vc_at(&self, lat: f64, lon: f64) -> Result<Vec<VcIntersection>, AtlasError> {
        self.fetch(&self.config().vc_intersect_url(lat, lon)).await
    }

    /// Vice-county object by layer pid.
    ///
    /// # Errors
    ///
    /// Returns [`AtlasError`] if the lookup fails.
    pub async fn vc_object(&self, pid: &str) -> Result<VcObject, AtlasError> {
        self.fetch(&self.config().vc_object_url(pid)).await
    }

    /// Vice-county outline by layer pid.
    ///
    /// # Errors
    ///
    /// Returns [`AtlasError`] if the outline cannot be fetched or parsed.
    pub async fn vc_boundary(&self, pid: &str) -> Result<VcBoundary, AtlasError> {
        let body = self.fetch_text(&self.config().vc_boundary_url(pid)).await?;
        parse_vc_boundary(pid, &body)
    }
}

#[async_trait]
impl VcBoundarySource for AtlasClient {
    async fn vc_boundary_at(&self, location: LatLng) -> Result<VcBoundary, AtlasError> {
        let intersections = self.vc_at(location.lat, location.lng).await?;
        let pid = first_pid(&intersections).ok_or_else(|| {
            AtlasError::NotFound(format!(
                "No vice-county at {}, {}",
                location.lat, location.lng
            ))
        })?;
        log::debug!("Vice-county at {location:?} is {pid}");
        self.vc_boundary(pid).await
    }
}

fn first_pid(intersections: &[VcIntersection]) -> Option<&str> {
    intersections
        .first()?
        .pid
        .as_deref()
        .filter(|pid| !pid.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_json;

    #[test]
    fn urls() {
        let config = AtlasConfig::default();
        assert_eq!(
            config.vc_intersect_url(53.2356, -2.545),
            "https://layers.nbnatlas.org/ws/intersect/cl14/53.2356/-2.545"
        );
        assert_eq!(
            config.vc_object_url("2694"),
            "https://layers.nbnatlas.org/ws/object/2694"
        );
        assert_eq!(
            config.vc_boundary_url("2694"),
            "https://layers.nbnatlas.org/ws/shape/geojson/2694"
        );
    }

    #[test]
    fn intersect_fixture() {
        let body = serde_json::json!([{
            "field": "cl14",
            "description": "",
            "layername": "Vice Counties",
            "pid": "2694",
            "value": "Cheshire"
        }])
        .to_string();
        let rows: Vec<VcIntersection> = parse_json(&body).unwrap();
        assert_eq!(first_pid(&rows), Some("2694"));
        assert_eq!(first_pid(&[]), None);
        assert_eq!(first_pid(&[VcIntersection::default()]), None);
    }

    #[test]
    fn object_fixture() {
        let body = serde_json::json!({
            "area_km": 2_759.7,
            "name": "Cheshire",
            "pid": "2694",
            "fieldname": "Vice Counties"
        })
        .to_string();
        let object: VcObject = parse_json(&body).unwrap();
        assert_eq!(object.name.as_deref(), Some("Cheshire"));
        assert!(object.bbox.is_none());
    }

    #[test]
    fn boundary_from_multipolygon() {
        let body = serde_json::json!({
            "type": "MultiPolygon",
            "coordinates": [
                [[[-3.1, 53.0], [-2.0, 53.0], [-2.0, 53.5], [-3.1, 53.5], [-3.1, 53.0]]],
                [[[-1.9, 53.2], [-1.8, 53.2], [-1.8, 53.6], [-1.9, 53.2]]]
            ]
        })
        .to_string();
        let boundary = parse_vc_boundary("2694", &body).unwrap();
        assert_eq!(boundary.polygon.0.len(), 2);
        assert_eq!(
            boundary.bounds,
            LatLngBounds::from_corners(LatLng::new(53.0, -3.1), LatLng::new(53.6, -1.8))
        );
    }

    #[test]
    fn boundary_from_feature_polygon() {
        let body = serde_json::json!({
            "type": "Feature",
            "properties": {},
            "geometry": {
                "type": "Polygon",
                "coordinates": [[[-1.0, 51.0], [0.0, 51.0], [0.0, 52.0], [-1.0, 51.0]]]
            }
        })
        .to_string();
        let boundary = parse_vc_boundary("1", &body).unwrap();
        assert_eq!(boundary.polygon.0.len(), 1);
        assert!((boundary.bounds.north() - 52.0).abs() < f64::EPSILON);
    }

    #[test]
    fn boundary_rejects_non_polygons() {
        let point = r#"{ "type": "Point", "coordinates": [-1.0, 51.0] }"#;
        assert!(matches!(
            parse_vc_boundary("9", point),
            Err(AtlasError::NoPolygon { .. })
        ));
        assert!(matches!(
            parse_vc_boundary("9", "not json"),
            Err(AtlasError::GeoJson(_))
        ));
    }
}
