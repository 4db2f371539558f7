//! The resolved parameter model.

use std::sync::LazyLock;

use regex::Regex;
use species_map_boundary::BoundaryIndex;
use species_map_geometry::{
    CoordinateConverter, GeometryError, OsConverter, calc_bounding_rectangle,
    parse_easting_northing,
};
use species_map_params_models::{
    BackgroundLayer, BaseLayer, BoundarySource, Colour, ExploreMap, GridResolution, LatLng,
    LatLngBounds, LogoMode, NamedRegion, RawMapParams, Search, Shape,
};

use crate::diagnostics::{ParamWarning, Reporter};
use crate::sanitise::{
    sanitise_enum_as, sanitise_fill, sanitise_flag, sanitise_free_text, sanitise_url,
    sanitise_year,
};

static NOT_ALPHANUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[^a-zA-Z0-9]").unwrap_or_else(|_| unreachable!()));
static NOT_COORDINATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[^0-9,]").unwrap_or_else(|_| unreachable!()));
static NOT_DIGIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[^0-9]").unwrap_or_else(|_| unreachable!()));
static NOT_DATASET_LIST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[^a-zA-Z0-9,]").unwrap_or_else(|_| unreachable!()));
static NOT_BASE_LIST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[^a-zA-Z,]").unwrap_or_else(|_| unreachable!()));

/// Parameters that are accepted but have no effect.
const NOT_IMPLEMENTED: &[&str] = &["gd", "b0bord", "b1bord", "b2bord", "cachedays", "retina"];

/// Used only if the boundary table has no `uk` record.
const UK_FALLBACK: LatLngBounds = LatLngBounds {
    south_west: LatLng::new(49.8, -8.7),
    north_east: LatLng::new(60.9, 1.8),
};

/// Default map height in pixels when `h` is not given.
pub const DEFAULT_HEIGHT: u32 = 350;
/// Height of the attribution line below the map.
const ATTRIBUTION_FONT_PX: u32 = 12;

/// Strips a taxon version key to `[a-zA-Z0-9]`.
#[must_use]
pub fn clean_tvk(tvk: &str) -> String {
    NOT_ALPHANUMERIC.replace_all(tvk, "").into_owned()
}

/// One of the three date bands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateBand {
    /// Both years, when the band resolved.
    pub years: Option<(u16, u16)>,
    pub fill: Colour,
}

impl DateBand {
    /// The `+AND+year:[from+TO+to]` query fragment, empty if unresolved.
    #[must_use]
    pub fn fragment(&self) -> String {
        self.years
            .map(|(from, to)| format!("+AND+year:[{from}+TO+{to}]"))
            .unwrap_or_default()
    }

    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        self.years.is_some()
    }
}

/// Size of the element hosting the map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapDimensions {
    /// CSS width: `<w>px`, or `100%` when no width was given.
    pub width: String,
    /// Height in pixels, less the attribution line when it is shown.
    pub height: u32,
}

/// Lookups used to resolve boundaries.
#[derive(Clone, Copy)]
pub struct Resolvers<'a> {
    pub converter: &'a dyn CoordinateConverter,
    pub boundaries: &'a BoundaryIndex,
}

impl Default for Resolvers<'static> {
    fn default() -> Self {
        static OS: OsConverter = OsConverter::new();
        Self {
            converter: &OS,
            boundaries: BoundaryIndex::embedded(),
        }
    }
}

/// Validated, canonical map parameters.
///
/// Built once from a [`RawMapParams`]. Only the search target can change
/// afterwards, through [`Params::set_tvk`] and [`Params::set_explore`].
#[derive(Debug, Clone)]
pub struct Params {
    search: Search,
    bounds: LatLngBounds,
    boundary_source: BoundarySource,
    bands: [DateBand; 3],
    bg: Option<BackgroundLayer>,
    datasets: Vec<String>,
    h: String,
    w: String,
    logo: LogoMode,
    res: Option<GridResolution>,
    unconfirmed: bool,
    base: Vec<BaseLayer>,
    clickable: bool,
    interactive: bool,
    point_size: String,
    query: Option<String>,
    region: bool,
    scroll_zoom: bool,
}

impl Params {
    /// Resolves a parameter bag with the built-in converter and the
    /// embedded boundary table.
    pub fn new(raw: &RawMapParams, search: impl Into<Search>, reporter: &dyn Reporter) -> Self {
        Self::with_resolvers(raw, search, reporter, Resolvers::default())
    }

    /// Resolves a parameter bag.
    ///
    /// Never fails: every problem is reported and the offending field
    /// falls back to its default.
    pub fn with_resolvers(
        raw: &RawMapParams,
        search: impl Into<Search>,
        reporter: &dyn Reporter,
        resolvers: Resolvers<'_>,
    ) -> Self {
        let search = normalise_search(search.into());

        let candidates = resolve_boundaries(raw, reporter, resolvers);

        let bg = sanitise_enum_as::<BackgroundLayer>("bg", raw.bg.as_deref(), reporter);
        let ds = sanitise_free_text("ds", raw.ds.as_deref(), &NOT_DATASET_LIST, "", reporter);
        let datasets = ds
            .split(',')
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect();
        let h = sanitise_free_text("h", raw.h.as_deref(), &NOT_DIGIT, "", reporter);
        let w = sanitise_free_text("w", raw.w.as_deref(), &NOT_DIGIT, "", reporter);
        let logo = sanitise_enum_as::<LogoMode>("logo", raw.logo.as_deref(), reporter)
            .unwrap_or_default();
        let res = sanitise_enum_as::<GridResolution>("res", raw.res.as_deref(), reporter);
        let unconfirmed = sanitise_flag("unconfirmed", raw.unconfirmed.as_deref(), false, reporter);
        let clickable = sanitise_flag("clickable", raw.clickable.as_deref(), true, reporter);
        let interactive = sanitise_flag("interactive", raw.interactive.as_deref(), false, reporter);
        let point_size =
            sanitise_free_text("pointSize", raw.point_size.as_deref(), &NOT_DIGIT, "4", reporter);
        let query = sanitise_url("query", raw.query.as_deref(), reporter);
        let region = sanitise_flag("region", raw.region.as_deref(), true, reporter);
        let scroll_zoom = sanitise_flag("scrollZoom", raw.scroll_zoom.as_deref(), false, reporter);

        let (boundary_source, bounds) = choose_boundary(&candidates, reporter, resolvers);

        let bands = [
            date_band(raw, 0, &Colour::YELLOW, reporter),
            date_band(raw, 1, &Colour::MAGENTA, reporter),
            date_band(raw, 2, &Colour::CYAN, reporter),
        ];

        let base = base_layers(raw.base.as_deref(), reporter);

        for name in NOT_IMPLEMENTED {
            if raw.get(name).is_some() {
                reporter.report(ParamWarning::NotImplemented {
                    name: (*name).to_string(),
                });
            }
        }

        log::debug!(
            "Resolved map parameters for '{}': bounds from {boundary_source}",
            search.identifier()
        );

        Self {
            search,
            bounds,
            boundary_source,
            bands,
            bg,
            datasets,
            h,
            w,
            logo,
            res,
            unconfirmed,
            base,
            clickable,
            interactive,
            point_size,
            query,
            region,
            scroll_zoom,
        }
    }

    /// Switches to taxon version key mode, dropping any explore target.
    pub fn set_tvk(&mut self, tvk: &str) {
        self.search = Search::Tvk(clean_tvk(tvk));
    }

    /// Switches to explore mode, dropping any taxon version key.
    pub fn set_explore(&mut self, explore: ExploreMap) {
        self.search = Search::Explore(explore);
    }

    #[must_use]
    pub const fn search(&self) -> &Search {
        &self.search
    }

    /// The taxon version key, in TVK mode.
    #[must_use]
    pub fn tvk(&self) -> Option<&str> {
        match &self.search {
            Search::Tvk(tvk) => Some(tvk),
            Search::Explore(_) => None,
        }
    }

    /// The explore target, in explore mode.
    #[must_use]
    pub const fn explore(&self) -> Option<&ExploreMap> {
        self.search.explore()
    }

    /// Title given to layers of the current target.
    #[must_use]
    pub fn identifier(&self) -> &str {
        self.search.identifier()
    }

    /// The resolved map extent.
    #[must_use]
    pub const fn bounds(&self) -> LatLngBounds {
        self.bounds
    }

    /// Which parameter the extent came from.
    #[must_use]
    pub const fn boundary_source(&self) -> BoundarySource {
        self.boundary_source
    }

    #[must_use]
    pub const fn bands(&self) -> &[DateBand; 3] {
        &self.bands
    }

    /// Returns `true` if any date band resolved.
    #[must_use]
    pub fn has_date_bands(&self) -> bool {
        self.bands.iter().any(DateBand::is_resolved)
    }

    /// The `+AND+(data_resource_uid:a+OR+...)` fragment, empty if no
    /// datasets were given.
    #[must_use]
    pub fn dataset_fragment(&self) -> String {
        if self.datasets.is_empty() {
            return String::new();
        }
        format!(
            "+AND+(data_resource_uid:{})",
            self.datasets.join("+OR+data_resource_uid:")
        )
    }

    #[must_use]
    pub fn datasets(&self) -> &[String] {
        &self.datasets
    }

    /// The WMS `gridres` value.
    #[must_use]
    pub fn grid_size(&self) -> String {
        self.res.unwrap_or_default().grid_size()
    }

    /// Base layers in the order the caller asked for them.
    #[must_use]
    pub fn base(&self) -> &[BaseLayer] {
        &self.base
    }

    #[must_use]
    pub const fn logo(&self) -> LogoMode {
        self.logo
    }

    #[must_use]
    pub fn point_size(&self) -> &str {
        &self.point_size
    }

    /// The custom WMS query, exactly as supplied.
    #[must_use]
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    #[must_use]
    pub const fn show_unconfirmed(&self) -> bool {
        self.unconfirmed
    }

    /// Whether clicking the map fetches occurrence records.
    #[must_use]
    pub const fn show_clickable(&self) -> bool {
        self.clickable
    }

    /// Whether zoom and layer controls are shown.
    #[must_use]
    pub const fn show_interactive(&self) -> bool {
        self.interactive
    }

    /// Whether credits go in the map's own attribution control.
    #[must_use]
    pub fn show_internal_attrib(&self) -> bool {
        self.logo == LogoMode::Internal
    }

    /// Whether explore results are restricted to the search area.
    #[must_use]
    pub const fn show_region(&self) -> bool {
        self.region
    }

    #[must_use]
    pub const fn show_scroll_zoom(&self) -> bool {
        self.scroll_zoom
    }

    /// Whether the vice-county boundary overlay is drawn.
    #[must_use]
    pub fn show_vcs(&self) -> bool {
        self.bg == Some(BackgroundLayer::Vc)
    }

    /// Size of the element hosting the map.
    #[must_use]
    pub fn map_dimensions(&self) -> MapDimensions {
        let font = if self.show_internal_attrib() {
            0
        } else {
            ATTRIBUTION_FONT_PX
        };
        let height = self.h.parse::<u32>().unwrap_or(DEFAULT_HEIGHT);
        MapDimensions {
            width: if self.w.is_empty() {
                "100%".to_string()
            } else {
                format!("{}px", self.w)
            },
            height: height.saturating_sub(font * 2),
        }
    }

    /// Outline of the explore search area, when results are restricted to
    /// it.
    #[must_use]
    pub fn make_shape(&self) -> Option<Shape> {
        let explore = self.explore()?;
        if !self.show_region() {
            return None;
        }
        let location = explore.location;
        let distance = location.radius * 1000.0;
        Some(if location.is_square {
            let rect =
                calc_bounding_rectangle(location.latitude, location.longitude, distance, distance);
            Shape::Rectangle {
                bounds: LatLngBounds::from_corners(
                    LatLng::new(rect.min_lat, rect.min_lon),
                    LatLng::new(rect.max_lat, rect.max_lon),
                ),
            }
        } else {
            Shape::Circle {
                center: LatLng::new(location.latitude, location.longitude),
                radius_m: distance,
            }
        })
    }
}

fn normalise_search(search: Search) -> Search {
    match search {
        Search::Tvk(tvk) => Search::Tvk(clean_tvk(&tvk)),
        explore @ Search::Explore(_) => explore,
    }
}

/// Warns if exactly one of a pair was supplied. Returns both only when
/// both were.
fn pair<'a>(
    first: (&str, Option<&'a str>),
    second: (&str, Option<&'a str>),
    reporter: &dyn Reporter,
) -> Option<(&'a str, &'a str)> {
    match (first.1, second.1) {
        (Some(a), Some(b)) => Some((a, b)),
        (None, None) => None,
        _ => {
            reporter.report(ParamWarning::IncompletePair {
                first: first.0.to_string(),
                second: second.0.to_string(),
            });
            None
        }
    }
}

/// Resolves every boundary source that was supplied, in precedence order.
fn resolve_boundaries(
    raw: &RawMapParams,
    reporter: &dyn Reporter,
    resolvers: Resolvers<'_>,
) -> Vec<(BoundarySource, LatLngBounds)> {
    let mut candidates = Vec::new();
    let unresolved = |boundary: BoundarySource, value: String, reason: String| {
        reporter.report(ParamWarning::UnresolvedBoundary {
            boundary,
            value,
            reason,
        });
    };

    if let Some((bl, tr)) = pair(("bl", raw.bl.as_deref()), ("tr", raw.tr.as_deref()), reporter) {
        let bl = sanitise_free_text("bl", Some(bl), &NOT_ALPHANUMERIC, "", reporter);
        let tr = sanitise_free_text("tr", Some(tr), &NOT_ALPHANUMERIC, "", reporter);
        let converter = resolvers.converter;
        match corners(converter.grid_ref_to_lat_lng(&bl), converter.grid_ref_to_lat_lng(&tr)) {
            Ok(bounds) => candidates.push((BoundarySource::GridReference, bounds)),
            Err(e) => unresolved(BoundarySource::GridReference, format!("{bl},{tr}"), e.to_string()),
        }
    }

    if let Some((bl, tr)) = pair(
        ("blCoord", raw.bl_coord.as_deref()),
        ("trCoord", raw.tr_coord.as_deref()),
        reporter,
    ) {
        let bl = sanitise_free_text("blCoord", Some(bl), &NOT_COORDINATE, "", reporter);
        let tr = sanitise_free_text("trCoord", Some(tr), &NOT_COORDINATE, "", reporter);
        let convert = |text: &str| -> Result<LatLng, GeometryError> {
            let (easting, northing) = parse_easting_northing(text)?;
            resolvers.converter.easting_northing_to_lat_lng(easting, northing)
        };
        match corners(convert(&bl), convert(&tr)) {
            Ok(bounds) => candidates.push((BoundarySource::NorthingEasting, bounds)),
            Err(e) => unresolved(
                BoundarySource::NorthingEasting,
                format!("{bl} {tr}"),
                e.to_string(),
            ),
        }
    }

    let vc = sanitise_free_text("vc", raw.vc.as_deref(), &NOT_ALPHANUMERIC, "", reporter);
    if !vc.is_empty() {
        match resolvers.boundaries.bounds(&vc) {
            Ok(bounds) => candidates.push((BoundarySource::ViceCounty, bounds)),
            Err(e) => unresolved(BoundarySource::ViceCounty, vc, e.to_string()),
        }
    }

    if let Some(zoom) = sanitise_enum_as::<NamedRegion>("zoom", raw.zoom.as_deref(), reporter) {
        match resolvers.boundaries.region_bounds(zoom) {
            Ok(bounds) => candidates.push((BoundarySource::Region, bounds)),
            Err(e) => unresolved(BoundarySource::Region, zoom.to_string(), e.to_string()),
        }
    }

    candidates
}

fn corners(
    a: Result<LatLng, GeometryError>,
    b: Result<LatLng, GeometryError>,
) -> Result<LatLngBounds, GeometryError> {
    Ok(LatLngBounds::from_corners(a?, b?))
}

/// Picks the highest precedence candidate, or the `uk` region if none.
fn choose_boundary(
    candidates: &[(BoundarySource, LatLngBounds)],
    reporter: &dyn Reporter,
    resolvers: Resolvers<'_>,
) -> (BoundarySource, LatLngBounds) {
    if let [(source, bounds), rest @ ..] = candidates {
        if !rest.is_empty() {
            let supplied = candidates
                .iter()
                .map(|(source, _)| format!("'{source}'"))
                .collect::<Vec<_>>()
                .join(", ");
            reporter.report(ParamWarning::MultipleBoundaries {
                supplied,
                used: *source,
            });
        }
        return (*source, *bounds);
    }

    let bounds = resolvers
        .boundaries
        .region_bounds(NamedRegion::Uk)
        .unwrap_or_else(|e| {
            reporter.report(ParamWarning::UnresolvedBoundary {
                boundary: BoundarySource::Default,
                value: NamedRegion::Uk.to_string(),
                reason: e.to_string(),
            });
            UK_FALLBACK
        });
    (BoundarySource::Default, bounds)
}

fn date_band(raw: &RawMapParams, index: usize, preset: &Colour, reporter: &dyn Reporter) -> DateBand {
    let from_key = format!("b{index}from");
    let to_key = format!("b{index}to");
    let fill_key = format!("b{index}fill");

    let years = pair(
        (from_key.as_str(), raw.get(&from_key)),
        (to_key.as_str(), raw.get(&to_key)),
        reporter,
    )
    .and_then(|(from, to)| {
        let from = sanitise_year(&from_key, Some(from), reporter);
        let to = sanitise_year(&to_key, Some(to), reporter);
        from.zip(to)
    });

    DateBand {
        years,
        fill: sanitise_fill(&fill_key, raw.get(&fill_key), preset, reporter),
    }
}

fn base_layers(raw: Option<&str>, reporter: &dyn Reporter) -> Vec<BaseLayer> {
    let list = sanitise_free_text("base", raw, &NOT_BASE_LIST, "", reporter);
    let mut layers = Vec::new();
    for token in list.split(',').filter(|token| !token.is_empty()) {
        if let Some(layer) = sanitise_enum_as::<BaseLayer>("base", Some(token), reporter)
            && !layers.contains(&layer)
        {
            layers.push(layer);
        }
    }
    if layers.is_empty() {
        layers.extend_from_slice(BaseLayer::all());
    }
    layers
}
