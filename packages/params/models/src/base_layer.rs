//! Base map tile layers and the attribution each one requires.
//!
//! Attribution is rendered outside the map in four generic link slots
//! plus one separator. Which text goes in which slot is fixed per layer;
//! [`BaseLayer::attribution_slots`] is the single source of that table.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString, VariantNames};

const NBN_TERMS_URL: &str = "https://docs.nbnatlas.org/nbn-atlas-terms-of-use/";
const NBN_ATTRIBUTION: &str = "<a href=\"https://docs.nbnatlas.org/nbn-atlas-terms-of-use/\" \
                               target=\"_blank\">powered by NBN</a> | ";

/// A base map layer.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    VariantNames,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum BaseLayer {
    /// CartoDB light basemap over OpenStreetMap data.
    Simple,
    /// Standard OpenStreetMap road map.
    Road,
    /// OpenTopoMap terrain.
    Terrain,
    /// Google satellite imagery with labels.
    Satellite,
}

impl BaseLayer {
    /// Every base layer in canonical order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Simple, Self::Road, Self::Terrain, Self::Satellite]
    }

    /// Name shown in the layer control.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Simple => "Simple",
            Self::Road => "Road",
            Self::Terrain => "Terrain",
            Self::Satellite => "Satellite",
        }
    }

    /// Looks a layer up by its display name or token, ignoring case.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|layer| layer.display_name().eq_ignore_ascii_case(name.trim()))
    }

    /// Slippy-map tile URL template.
    #[must_use]
    pub const fn tile_url(self) -> &'static str {
        match self {
            Self::Simple => "https://{s}.basemaps.cartocdn.com/light_all/{z}/{x}/{y}.png",
            Self::Road => "https://tile.openstreetmap.org/{z}/{x}/{y}.png",
            Self::Terrain => "https://{s}.tile.opentopomap.org/{z}/{x}/{y}.png",
            Self::Satellite => "https://{s}.google.com/vt/lyrs=s,h&x={x}&y={y}&z={z}",
        }
    }

    /// Subdomains substituted for `{s}`. Empty means the map library default.
    #[must_use]
    pub const fn subdomains(self) -> &'static [&'static str] {
        match self {
            Self::Satellite => &["mt0", "mt1", "mt2", "mt3"],
            Self::Simple | Self::Road | Self::Terrain => &[],
        }
    }

    /// Attribution HTML for the map's internal attribution control.
    #[must_use]
    pub fn attribution_html(self) -> String {
        let layer = match self {
            Self::Simple => {
                "<a href=\"https://www.openstreetmap.org/copyright\" target=\"_blank\">OpenStreetMap</a> | \
                 <a href=\"https://carto.com/attributions\" target=\"_blank\">CartoDB"
            }
            Self::Road => {
                "<a href=\"https://www.openstreetmap.org/copyright\" target=\"_blank\">OpenStreetMap</a>"
            }
            Self::Terrain => "<a href=\"https://opentopomap.org\" target=\"_blank\">OpenTopoMap</a>",
            Self::Satellite => {
                "<a href=\"https://mapsplatform.google.com/\" target=\"_blank\">powered by Google</a>"
            }
        };
        format!("{NBN_ATTRIBUTION}{layer}")
    }

    /// Contents of the external attribution slots for this layer.
    #[must_use]
    pub fn attribution_slots(self) -> AttributionSlots {
        let osm = AttributionLink::new("OpenStreetMap", "https://www.openstreetmap.org/copyright");
        let (attr3, attr4, pipe3_visible) = match self {
            Self::Simple => (
                osm,
                AttributionLink::new("CartoDB", "https://carto.com/attributions"),
                true,
            ),
            Self::Road => (osm, AttributionLink::empty(), false),
            Self::Terrain => (
                AttributionLink::new("OpenTopoMap", "https://opentopomap.org"),
                AttributionLink::empty(),
                false,
            ),
            Self::Satellite => (
                AttributionLink::new("powered by Google", "https://mapsplatform.google.com/"),
                AttributionLink::empty(),
                false,
            ),
        };
        AttributionSlots {
            attr1: AttributionLink::new("powered by NBN", NBN_TERMS_URL),
            attr2: AttributionLink::new("Leaflet", "https://leafletjs.com"),
            attr3,
            attr4,
            pipe3_visible,
        }
    }
}

/// One attribution hyperlink. Both fields empty means the slot is blank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributionLink {
    /// Link text.
    pub text: String,
    /// Link target.
    pub href: String,
}

impl AttributionLink {
    #[must_use]
    pub fn new(text: &str, href: &str) -> Self {
        Self {
            text: text.to_string(),
            href: href.to_string(),
        }
    }

    #[must_use]
    pub const fn empty() -> Self {
        Self {
            text: String::new(),
            href: String::new(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.href.is_empty()
    }
}

/// State of the four attribution slots and the separator before the fourth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributionSlots {
    pub attr1: AttributionLink,
    pub attr2: AttributionLink,
    pub attr3: AttributionLink,
    pub attr4: AttributionLink,
    /// Whether the separator between `attr3` and `attr4` is displayed.
    pub pipe3_visible: bool,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr as _;

    use super::*;

    #[test]
    fn only_simple_shows_fourth_slot() {
        for layer in BaseLayer::all() {
            let slots = layer.attribution_slots();
            assert_eq!(slots.attr1.text, "powered by NBN");
            assert_eq!(slots.attr2.text, "Leaflet");
            assert!(!slots.attr3.is_empty());
            let simple = *layer == BaseLayer::Simple;
            assert_eq!(slots.pipe3_visible, simple, "{layer}");
            assert_eq!(!slots.attr4.is_empty(), simple, "{layer}");
        }
    }

    #[test]
    fn satellite_credits_google() {
        let slots = BaseLayer::Satellite.attribution_slots();
        assert_eq!(slots.attr3.text, "powered by Google");
        assert_eq!(slots.attr3.href, "https://mapsplatform.google.com/");
        assert_eq!(BaseLayer::Satellite.subdomains().len(), 4);
    }

    #[test]
    fn parses_tokens_and_display_names() {
        assert_eq!(BaseLayer::from_str("terrain").unwrap(), BaseLayer::Terrain);
        assert_eq!(BaseLayer::from_name("Road"), Some(BaseLayer::Road));
        assert_eq!(BaseLayer::from_name("satellite"), Some(BaseLayer::Satellite));
        assert_eq!(BaseLayer::from_name("bogus"), None);
    }

    #[test]
    fn attribution_html_starts_with_nbn_credit() {
        for layer in BaseLayer::all() {
            assert!(layer.attribution_html().starts_with("<a href=\"https://docs.nbnatlas.org"));
        }
    }
}
