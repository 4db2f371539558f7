//! WMS overlay composition.
//!
//! Turns resolved [`Params`] into the ordered set of named WMS layers the
//! map shows. Exactly one of four shapes applies, checked in this order:
//!
//! 1. a custom `query` URL, used verbatim as a single layer;
//! 2. one grid layer per resolved date band;
//! 3. two point layers, accepted and unconfirmed records;
//! 4. a single grid layer coloured with band 0's fill.

use std::f64::consts::PI;

use species_map_geometry::bounding_rectangle_wkt;
use species_map_params_models::layer::{WMS_FORMAT, WMS_LAYERS};
use species_map_params_models::{Colour, ExploreMap, LatLngBounds, LayerSet, NamedLayer, Search};

use crate::diagnostics::{ParamWarning, Reporter};
use crate::params::Params;

/// The occurrence WMS endpoint, query string open.
pub const WMS_BASE_URL: &str = "https://records-ws.nbnatlas.org/ogc/wms/reflect?";

/// Title of the verified records layer.
pub const ACCEPTED_TITLE: &str = "Accepted";
/// Title of the unverified records layer.
pub const UNCONFIRMED_TITLE: &str = "Unconfirmed";

const ACCEPTED_STATUSES: &str =
    r#"("Accepted" OR "Accepted - considered correct" OR "Accepted - correct" OR "verified")"#;
const UNCONFIRMED_STATUSES: &str =
    r#"("Unconfirmed" OR "Unconfirmed - plausible" OR "Unconfirmed - not reviewed")"#;

const PRESENT_AND_KOSHER: &str = "(geospatial_kosher%3Atrue%20AND%20-occurrence_status%3Aabsent)";

/// Spherical mercator earth radius used by web map tiles.
const MERCATOR_RADIUS: f64 = 6_378_137.0;
const MERCATOR_MAX_LATITUDE: f64 = 85.051_128_779_8;

impl Params {
    /// Builds the overlay layers for the current target.
    ///
    /// A title that is already taken is reported and the later layer is
    /// skipped. An explore target with neither group nor species yields no
    /// layers.
    #[must_use]
    pub fn derive_layers(&self, reporter: &dyn Reporter) -> LayerSet {
        let mut layers = LayerSet::new();
        let identifier = self.identifier();

        if let Some(query) = self.query() {
            add(&mut layers, NamedLayer::new(identifier, query), reporter);
            return layers;
        }

        if self.explore().is_some_and(ExploreMap::is_empty) {
            reporter.report(ParamWarning::EmptyExploreTarget);
            return layers;
        }

        if self.has_date_bands() {
            for band in self.bands() {
                let Some((from, to)) = band.years else {
                    continue;
                };
                let layer = NamedLayer::new(
                    format!("{identifier}: {from}-{to}"),
                    self.grid_url(&band.fragment(), &band.fill),
                );
                add(&mut layers, layer, reporter);
            }
        } else if self.show_unconfirmed() {
            add(
                &mut layers,
                NamedLayer::new(ACCEPTED_TITLE, self.point_url(ACCEPTED_STATUSES, &Colour::FUSCHIA)),
                reporter,
            );
            add(
                &mut layers,
                NamedLayer::new(
                    UNCONFIRMED_TITLE,
                    self.point_url(UNCONFIRMED_STATUSES, &Colour::ORANGE),
                ),
                reporter,
            );
        } else {
            let layer = NamedLayer::new(identifier, self.grid_url("", &self.bands()[0].fill));
            add(&mut layers, layer, reporter);
        }

        log::debug!(
            "Derived {} layer(s) for '{identifier}': {:?}",
            layers.len(),
            layers.names().collect::<Vec<_>>()
        );
        layers
    }

    /// A grid-square layer, filtered by `range` and the datasets.
    fn grid_url(&self, range: &str, fill: &Colour) -> String {
        let filters = format!("{range}{}", self.dataset_fragment());
        let query = match self.search() {
            Search::Tvk(tvk) => format!("{WMS_BASE_URL}q=*:*&fq=lsid:{tvk}{filters}"),
            Search::Explore(explore) => self.explore_query(explore, &filters),
        };
        format!(
            "{query}&ENV=colourmode:osgrid;gridlabels:false;opacity:0.8;color:{fill};gridres:{}",
            self.grid_size()
        )
    }

    /// A point layer restricted to the given verification statuses.
    fn point_url(&self, statuses: &str, fill: &Colour) -> String {
        let query = match self.search() {
            Search::Tvk(tvk) => {
                format!("{WMS_BASE_URL}q=*:*&fq=-occurrence_status%3Aabsent&fq=lsid:{tvk}")
            }
            Search::Explore(explore) => self.explore_query(explore, ""),
        };
        format!(
            "{query}&fq=identification_verification_status:{statuses}\
             &OUTLINE=false&ENV=size:{};opacity:0.8;color:{fill}",
            self.point_size()
        )
    }

    /// The explore base query. `filters` extends the presence filter and
    /// the search area follows it when regions are shown.
    fn explore_query(&self, explore: &ExploreMap, filters: &str) -> String {
        let group = if explore.is_all_species() {
            "*".to_string()
        } else {
            urlencoding::encode(&explore.group_name).into_owned()
        };
        let species = if explore.filters_species() {
            format!("%22{}%22", urlencoding::encode(&explore.species_name))
        } else {
            "*".to_string()
        };

        let mut query = format!(
            "{WMS_BASE_URL}q=taxon_name%3A{species}&fq=species_group%3A{group}\
             &fq={PRESENT_AND_KOSHER}{filters}"
        );

        if self.show_region() {
            let location = explore.location;
            let distance = location.radius * 1000.0;
            if location.is_square {
                query.push_str("&wkt=");
                query.push_str(&bounding_rectangle_wkt(
                    location.latitude,
                    location.longitude,
                    distance,
                    distance,
                ));
            } else {
                query.push_str(&format!(
                    "&lat={}&lon={}&radius={}",
                    location.latitude, location.longitude, location.radius
                ));
            }
        }
        query
    }
}

fn add(layers: &mut LayerSet, layer: NamedLayer, reporter: &dyn Reporter) {
    if let Err(e) = layers.insert(layer) {
        reporter.report(ParamWarning::DuplicateLayer { title: e.title });
    }
}

/// Spherical mercator projection of a point, in metres.
fn project(lat: f64, lng: f64) -> (f64, f64) {
    let d = PI / 180.0;
    let lat = lat.clamp(-MERCATOR_MAX_LATITUDE, MERCATOR_MAX_LATITUDE);
    let sin = (lat * d).sin();
    (
        MERCATOR_RADIUS * lng * d,
        MERCATOR_RADIUS * ((1.0 + sin) / (1.0 - sin)).ln() / 2.0,
    )
}

/// Builds WMS `GetMap` tile requests.
pub trait GetMapUrl {
    /// The full `GetMap` URL for one `tile_size` square tile covering
    /// `bbox`, in EPSG:3857.
    fn get_map_url(&self, bbox: &LatLngBounds, tile_size: u32) -> String;
}

impl GetMapUrl for NamedLayer {
    fn get_map_url(&self, bbox: &LatLngBounds, tile_size: u32) -> String {
        let (min_x, min_y) = project(bbox.south(), bbox.west());
        let (max_x, max_y) = project(bbox.north(), bbox.east());
        let params = [
            ("SERVICE", "WMS"),
            ("REQUEST", "GetMap"),
            ("LAYERS", WMS_LAYERS),
            ("STYLES", ""),
            ("FORMAT", WMS_FORMAT),
            ("TRANSPARENT", "false"),
            ("VERSION", "1.1.1"),
        ];

        let mut url = self.query_url.clone();
        for (key, value) in params {
            url.push_str(&format!("&{key}={}", urlencoding::encode(value)));
        }
        url.push_str(&format!(
            "&WIDTH={tile_size}&HEIGHT={tile_size}&SRS={}&BBOX={min_x},{min_y},{max_x},{max_y}",
            urlencoding::encode("EPSG:3857")
        ));
        url
    }
}

#[cfg(test)]
mod tests {
    use species_map_params_models::{LatLng, Location, RawMapParams};

    use super::*;
    use crate::diagnostics::{CollectingReporter, NullReporter};

    const TVK: &str = "NHMSYS0000530739";

    fn raw(pairs: &[(&str, &str)]) -> RawMapParams {
        pairs.iter().copied().collect()
    }

    fn tvk_layers(pairs: &[(&str, &str)]) -> (LayerSet, Vec<ParamWarning>) {
        let reporter = CollectingReporter::new();
        let params = Params::new(&raw(pairs), TVK, &NullReporter);
        let layers = params.derive_layers(&reporter);
        (layers, reporter.take())
    }

    fn explore(is_square: bool) -> ExploreMap {
        ExploreMap {
            is_group: false,
            location: Location {
                is_square,
                latitude: 54.0,
                longitude: -2.0,
                radius: 10.0,
            },
            group_name: "birds".into(),
            species_name: "Turdus merula".into(),
        }
    }

    fn explore_layers(pairs: &[(&str, &str)], target: ExploreMap) -> (LayerSet, Vec<ParamWarning>) {
        let reporter = CollectingReporter::new();
        let params = Params::new(&raw(pairs), target, &NullReporter);
        let layers = params.derive_layers(&reporter);
        (layers, reporter.take())
    }

    #[test]
    fn default_single_grid_layer() {
        let (layers, warnings) = tvk_layers(&[]);
        assert!(warnings.is_empty());
        assert_eq!(layers.len(), 1);
        let layer = layers.get(TVK).unwrap();
        assert_eq!(
            layer.query_url,
            "https://records-ws.nbnatlas.org/ogc/wms/reflect?q=*:*&fq=lsid:NHMSYS0000530739\
             &ENV=colourmode:osgrid;gridlabels:false;opacity:0.8;color:FFFF00;gridres:fixed_10km"
        );
    }

    #[test]
    fn layers_serialise_as_ordered_json_array() {
        let (layers, _) = tvk_layers(&[("unconfirmed", "1")]);
        let json = serde_json::to_value(&layers).unwrap();
        let entries = json.as_array().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["name"], ACCEPTED_TITLE);
        assert_eq!(entries[1]["name"], UNCONFIRMED_TITLE);
        assert_eq!(
            entries[0]["queryUrl"].as_str(),
            Some(layers.get(ACCEPTED_TITLE).unwrap().query_url.as_str())
        );

        let back: LayerSet = serde_json::from_value(json).unwrap();
        assert_eq!(back, layers);
    }

    #[test]
    fn single_layer_uses_band_zero_fill_and_datasets() {
        let (layers, _) = tvk_layers(&[("b0fill", "123456"), ("ds", "dr1,dr2"), ("res", "2km")]);
        assert_eq!(
            layers.get(TVK).unwrap().query_url,
            "https://records-ws.nbnatlas.org/ogc/wms/reflect?q=*:*&fq=lsid:NHMSYS0000530739\
             +AND+(data_resource_uid:dr1+OR+data_resource_uid:dr2)\
             &ENV=colourmode:osgrid;gridlabels:false;opacity:0.8;color:123456;gridres:fixed_2km"
        );
    }

    #[test]
    fn one_layer_per_date_band() {
        let (layers, _) = tvk_layers(&[
            ("b0from", "1600"),
            ("b0to", "1986"),
            ("b2from", "1987"),
            ("b2to", "2030"),
            ("b2fill", "00ff00"),
        ]);
        let names: Vec<&str> = layers.names().collect();
        assert_eq!(
            names,
            [
                "NHMSYS0000530739: 1600-1986",
                "NHMSYS0000530739: 1987-2030"
            ]
        );
        assert_eq!(
            layers.get("NHMSYS0000530739: 1987-2030").unwrap().query_url,
            "https://records-ws.nbnatlas.org/ogc/wms/reflect?q=*:*&fq=lsid:NHMSYS0000530739\
             +AND+year:[1987+TO+2030]\
             &ENV=colourmode:osgrid;gridlabels:false;opacity:0.8;color:00FF00;gridres:fixed_10km"
        );
    }

    #[test]
    fn date_bands_take_precedence_over_unconfirmed() {
        let (layers, _) = tvk_layers(&[("b0from", "1990"), ("b0to", "2000"), ("unconfirmed", "1")]);
        assert_eq!(layers.len(), 1);
        assert!(layers.get("NHMSYS0000530739: 1990-2000").is_some());
    }

    #[test]
    fn custom_query_wins_over_everything() {
        let query = "https://example.org/wms?q=anything&x=\"quoted\"";
        let (layers, _) = tvk_layers(&[
            ("query", query),
            ("b0from", "1990"),
            ("b0to", "2000"),
            ("unconfirmed", "1"),
        ]);
        assert_eq!(layers.len(), 1);
        assert_eq!(layers.get(TVK).unwrap().query_url, query);
    }

    #[test]
    fn unconfirmed_gives_two_point_layers() {
        let (layers, _) = tvk_layers(&[("unconfirmed", "1"), ("pointSize", "6")]);
        let names: Vec<&str> = layers.names().collect();
        assert_eq!(names, [ACCEPTED_TITLE, UNCONFIRMED_TITLE]);
        assert_eq!(
            layers.get(ACCEPTED_TITLE).unwrap().query_url,
            "https://records-ws.nbnatlas.org/ogc/wms/reflect?q=*:*&fq=-occurrence_status%3Aabsent\
             &fq=lsid:NHMSYS0000530739&fq=identification_verification_status:(\"Accepted\" OR \
             \"Accepted - considered correct\" OR \"Accepted - correct\" OR \"verified\")\
             &OUTLINE=false&ENV=size:6;opacity:0.8;color:FF00FF"
        );
        assert_eq!(
            layers.get(UNCONFIRMED_TITLE).unwrap().query_url,
            "https://records-ws.nbnatlas.org/ogc/wms/reflect?q=*:*&fq=-occurrence_status%3Aabsent\
             &fq=lsid:NHMSYS0000530739&fq=identification_verification_status:(\"Unconfirmed\" OR \
             \"Unconfirmed - plausible\" OR \"Unconfirmed - not reviewed\")\
             &OUTLINE=false&ENV=size:6;opacity:0.8;color:E6704C"
        );
    }

    #[test]
    fn explore_square_appends_wkt() {
        let (layers, warnings) = explore_layers(&[], explore(true));
        assert!(warnings.is_empty());
        let layer = layers.get("Turdus merula").unwrap();
        let wkt = bounding_rectangle_wkt(54.0, -2.0, 10_000.0, 10_000.0);
        assert_eq!(
            layer.query_url,
            format!(
                "https://records-ws.nbnatlas.org/ogc/wms/reflect?q=taxon_name%3A%22Turdus%20merula%22\
                 &fq=species_group%3Abirds\
                 &fq=(geospatial_kosher%3Atrue%20AND%20-occurrence_status%3Aabsent)&wkt={wkt}\
                 &ENV=colourmode:osgrid;gridlabels:false;opacity:0.8;color:FFFF00;gridres:fixed_10km"
            )
        );
    }

    #[test]
    fn explore_circle_appends_radius() {
        let (layers, _) = explore_layers(&[("b0from", "1990"), ("b0to", "2000")], explore(false));
        let layer = layers.get("Turdus merula: 1990-2000").unwrap();
        assert!(
            layer.query_url.contains(
                "&fq=(geospatial_kosher%3Atrue%20AND%20-occurrence_status%3Aabsent)\
                 +AND+year:[1990+TO+2000]&lat=54&lon=-2&radius=10&ENV="
            ),
            "{}",
            layer.query_url
        );
    }

    #[test]
    fn explore_without_region_has_no_area() {
        let (layers, _) = explore_layers(&[("region", "0")], explore(false));
        let url = &layers.get("Turdus merula").unwrap().query_url;
        assert!(!url.contains("&lat="));
        assert!(!url.contains("&wkt="));
    }

    #[test]
    fn explore_group_uses_wildcards() {
        let mut target = explore(true);
        target.is_group = true;
        target.group_name = "ALL_SPECIES".into();
        let (layers, _) = explore_layers(&[("region", "0")], target);
        let layer = layers.get("ALL_SPECIES").unwrap();
        assert!(layer.query_url.starts_with(
            "https://records-ws.nbnatlas.org/ogc/wms/reflect?q=taxon_name%3A*&fq=species_group%3A*&fq="
        ));
    }

    #[test]
    fn empty_explore_target_has_no_layers() {
        let mut target = explore(true);
        target.group_name.clear();
        target.species_name.clear();
        let (layers, warnings) = explore_layers(&[], target);
        assert!(layers.is_empty());
        assert_eq!(warnings, vec![ParamWarning::EmptyExploreTarget]);
    }

    #[test]
    fn duplicate_band_titles_are_skipped() {
        let (layers, warnings) = tvk_layers(&[
            ("b0from", "1990"),
            ("b0to", "2000"),
            ("b1from", "1990"),
            ("b1to", "2000"),
        ]);
        assert_eq!(layers.len(), 1);
        assert!(layers.get("NHMSYS0000530739: 1990-2000").unwrap().query_url.contains("FFFF00"));
        assert_eq!(
            warnings,
            vec![ParamWarning::DuplicateLayer {
                title: "NHMSYS0000530739: 1990-2000".into()
            }]
        );
    }

    #[test]
    fn get_map_url_appends_wms_parameters() {
        let layer = NamedLayer::new("x", "https://records-ws.nbnatlas.org/ogc/wms/reflect?q=*:*");
        let bbox = LatLngBounds::from_corners(LatLng::new(0.0, 0.0), LatLng::new(0.0, 0.0));
        assert_eq!(
            layer.get_map_url(&bbox, 256),
            "https://records-ws.nbnatlas.org/ogc/wms/reflect?q=*:*&SERVICE=WMS&REQUEST=GetMap\
             &LAYERS=ALA%3Aoccurrences&STYLES=&FORMAT=image%2Fpng&TRANSPARENT=false&VERSION=1.1.1\
             &WIDTH=256&HEIGHT=256&SRS=EPSG%3A3857&BBOX=0,0,0,0"
        );
    }

    #[test]
    fn get_map_url_projects_to_mercator() {
        let layer = NamedLayer::new("x", "https://example.org/wms?");
        let bbox = LatLngBounds::from_corners(LatLng::new(-90.0, -180.0), LatLng::new(90.0, 180.0));
        let url = layer.get_map_url(&bbox, 512);
        assert!(url.contains("&WIDTH=512&HEIGHT=512&"));
        let bbox: Vec<f64> = url
            .rsplit("&BBOX=")
            .next()
            .unwrap()
            .split(',')
            .map(|v| v.parse().unwrap())
            .collect();
        let half_world = 20_037_508.342_789_244;
        for (value, expected) in bbox.iter().zip([-half_world, -half_world, half_world, half_world]) {
            assert!((value - expected).abs() < 1e-3, "{value} vs {expected}");
        }
    }
}
