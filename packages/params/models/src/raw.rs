//! The raw, caller-supplied parameter bag.
//!
//! Every field is optional and kept as a string: absence (`None`) is
//! distinct from an empty string. Values may arrive as numbers in TOML or
//! JSON documents, so each field accepts any scalar and stores its textual
//! form.

use serde::{Deserialize, Deserializer, Serialize};

/// Flat bag of map parameters exactly as supplied by the caller.
///
/// Deserializing ignores fields it does not know. Documents from users go
/// through a key/value table and `species_map_params::raw_from_pairs`
/// instead, so unknown keys are reported.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawMapParams {
    /// Grid reference for the bottom-left corner of a bounding box. Use with `tr`.
    #[serde(deserialize_with = "scalar", skip_serializing_if = "Option::is_none")]
    pub bl: Option<String>,
    /// Grid reference for the top-right corner of a bounding box. Use with `bl`.
    #[serde(deserialize_with = "scalar", skip_serializing_if = "Option::is_none")]
    pub tr: Option<String>,
    /// `easting,northing` pair for the bottom-left corner. Use with `trCoord`.
    #[serde(deserialize_with = "scalar", skip_serializing_if = "Option::is_none")]
    pub bl_coord: Option<String>,
    /// `easting,northing` pair for the top-right corner. Use with `blCoord`.
    #[serde(deserialize_with = "scalar", skip_serializing_if = "Option::is_none")]
    pub tr_coord: Option<String>,
    /// Start year (inclusive) of the lower date band.
    #[serde(deserialize_with = "scalar", skip_serializing_if = "Option::is_none")]
    pub b0from: Option<String>,
    /// End year (inclusive) of the lower date band.
    #[serde(deserialize_with = "scalar", skip_serializing_if = "Option::is_none")]
    pub b0to: Option<String>,
    /// Fill colour of the lower date band.
    #[serde(deserialize_with = "scalar", skip_serializing_if = "Option::is_none")]
    pub b0fill: Option<String>,
    /// Border colour of the lower date band (not implemented).
    #[serde(deserialize_with = "scalar", skip_serializing_if = "Option::is_none")]
    pub b0bord: Option<String>,
    /// Start year (inclusive) of the middle date band.
    #[serde(deserialize_with = "scalar", skip_serializing_if = "Option::is_none")]
    pub b1from: Option<String>,
    /// End year (inclusive) of the middle date band.
    #[serde(deserialize_with = "scalar", skip_serializing_if = "Option::is_none")]
    pub b1to: Option<String>,
    /// Fill colour of the middle date band.
    #[serde(deserialize_with = "scalar", skip_serializing_if = "Option::is_none")]
    pub b1fill: Option<String>,
    /// Border colour of the middle date band (not implemented).
    #[serde(deserialize_with = "scalar", skip_serializing_if = "Option::is_none")]
    pub b1bord: Option<String>,
    /// Start year (inclusive) of the upper date band.
    #[serde(deserialize_with = "scalar", skip_serializing_if = "Option::is_none")]
    pub b2from: Option<String>,
    /// End year (inclusive) of the upper date band.
    #[serde(deserialize_with = "scalar", skip_serializing_if = "Option::is_none")]
    pub b2to: Option<String>,
    /// Fill colour of the upper date band.
    #[serde(deserialize_with = "scalar", skip_serializing_if = "Option::is_none")]
    pub b2fill: Option<String>,
    /// Border colour of the upper date band (not implemented).
    #[serde(deserialize_with = "scalar", skip_serializing_if = "Option::is_none")]
    pub b2bord: Option<String>,
    /// Background overlay. Only `vc` (vice-county boundaries) is recognised.
    #[serde(deserialize_with = "scalar", skip_serializing_if = "Option::is_none")]
    pub bg: Option<String>,
    /// Cache lifetime in days (not implemented).
    #[serde(deserialize_with = "scalar", skip_serializing_if = "Option::is_none")]
    pub cachedays: Option<String>,
    /// Comma-separated list of data resource ids to restrict records to.
    #[serde(deserialize_with = "scalar", skip_serializing_if = "Option::is_none")]
    pub ds: Option<String>,
    /// Grid overlay (not implemented).
    #[serde(deserialize_with = "scalar", skip_serializing_if = "Option::is_none")]
    pub gd: Option<String>,
    /// Map height in pixels.
    #[serde(deserialize_with = "scalar", skip_serializing_if = "Option::is_none")]
    pub h: Option<String>,
    /// Map width in pixels.
    #[serde(deserialize_with = "scalar", skip_serializing_if = "Option::is_none")]
    pub w: Option<String>,
    /// Attribution mode: `0` none, `1` external (default), `2` internal.
    #[serde(deserialize_with = "scalar", skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    /// Double resolution tiles (not implemented).
    #[serde(deserialize_with = "scalar", skip_serializing_if = "Option::is_none")]
    pub retina: Option<String>,
    /// Grid square size: `50km`, `10km` (default), `2km`, `1km` or `100m`.
    #[serde(deserialize_with = "scalar", skip_serializing_if = "Option::is_none")]
    pub res: Option<String>,
    /// Vice-county number to zoom to.
    #[serde(deserialize_with = "scalar", skip_serializing_if = "Option::is_none")]
    pub vc: Option<String>,
    /// Named region to zoom to (`uk`, `england`, `scotland`, ...).
    #[serde(deserialize_with = "scalar", skip_serializing_if = "Option::is_none")]
    pub zoom: Option<String>,
    /// Comma-separated, ordered list of base layers.
    #[serde(deserialize_with = "scalar", skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,
    /// `1` lets a click on the map retrieve occurrence records (default `1`).
    #[serde(deserialize_with = "scalar", skip_serializing_if = "Option::is_none")]
    pub clickable: Option<String>,
    /// `1` enables interactive map controls (default `0`).
    #[serde(deserialize_with = "scalar", skip_serializing_if = "Option::is_none")]
    pub interactive: Option<String>,
    /// Point size used by the accepted/unconfirmed layers (default `4`).
    #[serde(deserialize_with = "scalar", skip_serializing_if = "Option::is_none")]
    pub point_size: Option<String>,
    /// Custom WMS reflect query. Overrides date bands and the
    /// accepted/unconfirmed split.
    #[serde(deserialize_with = "scalar", skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    /// `1` restricts explore results to the target location (default `1`).
    #[serde(deserialize_with = "scalar", skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// `1` enables scroll-wheel zoom (default `0`).
    #[serde(deserialize_with = "scalar", skip_serializing_if = "Option::is_none")]
    pub scroll_zoom: Option<String>,
    /// `1` splits accepted and unconfirmed records into two layers (default `0`).
    #[serde(deserialize_with = "scalar", skip_serializing_if = "Option::is_none")]
    pub unconfirmed: Option<String>,
}

impl RawMapParams {
    /// Every key understood by [`Self::set`], in declaration order.
    pub const KEYS: &'static [&'static str] = &[
        "bl",
        "tr",
        "blCoord",
        "trCoord",
        "b0from",
        "b0to",
        "b0fill",
        "b0bord",
        "b1from",
        "b1to",
        "b1fill",
        "b1bord",
        "b2from",
        "b2to",
        "b2fill",
        "b2bord",
        "bg",
        "cachedays",
        "ds",
        "gd",
        "h",
        "w",
        "logo",
        "retina",
        "res",
        "vc",
        "zoom",
        "base",
        "clickable",
        "interactive",
        "pointSize",
        "query",
        "region",
        "scrollZoom",
        "unconfirmed",
    ];

    /// Sets a field by its external (camelCase) key.
    ///
    /// Keys are matched case-insensitively. Returns `false` if the key is
    /// not a known parameter, in which case nothing is changed.
    pub fn set(&mut self, key: &str, value: impl Into<String>) -> bool {
        let Some(slot) = self.slot_mut(key) else {
            return false;
        };
        *slot = Some(value.into());
        true
    }

    /// Returns the value of a field by its external (camelCase) key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        let key = Self::canonical_key(key)?;
        let value = match key {
            "bl" => &self.bl,
            "tr" => &self.tr,
            "blCoord" => &self.bl_coord,
            "trCoord" => &self.tr_coord,
            "b0from" => &self.b0from,
            "b0to" => &self.b0to,
            "b0fill" => &self.b0fill,
            "b0bord" => &self.b0bord,
            "b1from" => &self.b1from,
            "b1to" => &self.b1to,
            "b1fill" => &self.b1fill,
            "b1bord" => &self.b1bord,
            "b2from" => &self.b2from,
            "b2to" => &self.b2to,
            "b2fill" => &self.b2fill,
            "b2bord" => &self.b2bord,
            "bg" => &self.bg,
            "cachedays" => &self.cachedays,
            "ds" => &self.ds,
            "gd" => &self.gd,
            "h" => &self.h,
            "w" => &self.w,
            "logo" => &self.logo,
            "retina" => &self.retina,
            "res" => &self.res,
            "vc" => &self.vc,
            "zoom" => &self.zoom,
            "base" => &self.base,
            "clickable" => &self.clickable,
            "interactive" => &self.interactive,
            "pointSize" => &self.point_size,
            "query" => &self.query,
            "region" => &self.region,
            "scrollZoom" => &self.scroll_zoom,
            "unconfirmed" => &self.unconfirmed,
            _ => return None,
        };
        value.as_deref()
    }

    fn slot_mut(&mut self, key: &str) -> Option<&mut Option<String>> {
        let key = Self::canonical_key(key)?;
        Some(match key {
            "bl" => &mut self.bl,
            "tr" => &mut self.tr,
            "blCoord" => &mut self.bl_coord,
            "trCoord" => &mut self.tr_coord,
            "b0from" => &mut self.b0from,
            "b0to" => &mut self.b0to,
            "b0fill" => &mut self.b0fill,
            "b0bord" => &mut self.b0bord,
            "b1from" => &mut self.b1from,
            "b1to" => &mut self.b1to,
            "b1fill" => &mut self.b1fill,
            "b1bord" => &mut self.b1bord,
            "b2from" => &mut self.b2from,
            "b2to" => &mut self.b2to,
            "b2fill" => &mut self.b2fill,
            "b2bord" => &mut self.b2bord,
            "bg" => &mut self.bg,
            "cachedays" => &mut self.cachedays,
            "ds" => &mut self.ds,
            "gd" => &mut self.gd,
            "h" => &mut self.h,
            "w" => &mut self.w,
            "logo" => &mut self.logo,
            "retina" => &mut self.retina,
            "res" => &mut self.res,
            "vc" => &mut self.vc,
            "zoom" => &mut self.zoom,
            "base" => &mut self.base,
            "clickable" => &mut self.clickable,
            "interactive" => &mut self.interactive,
            "pointSize" => &mut self.point_size,
            "query" => &mut self.query,
            "region" => &mut self.region,
            "scrollZoom" => &mut self.scroll_zoom,
            "unconfirmed" => &mut self.unconfirmed,
            _ => return None,
        })
    }

    fn canonical_key(key: &str) -> Option<&'static str> {
        Self::KEYS
            .iter()
            .copied()
            .find(|known| known.eq_ignore_ascii_case(key))
    }
}

/// Builds a parameter bag from `(key, value)` pairs, skipping unknown
/// keys without a trace. Callers holding untrusted input should build
/// through `species_map_params::raw_from_pairs`, which reports them.
impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for RawMapParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::default();
        for (key, value) in iter {
            params.set(key.as_ref(), value);
        }
        params
    }
}

/// Any scalar a config document may hold for a parameter.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Integer(i64),
    Float(f64),
    Flag(bool),
}

fn scalar<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Scalar>::deserialize(deserializer)?;
    Ok(value.map(|scalar| match scalar {
        Scalar::Text(text) => text,
        Scalar::Integer(number) => number.to_string(),
        Scalar::Float(number) => number.to_string(),
        Scalar::Flag(flag) => String::from(if flag { "1" } else { "0" }),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_numbers_as_strings() {
        let params: RawMapParams = serde_json::from_value(serde_json::json!({
            "b0from": 1990,
            "b0to": "2000",
            "retina": 2,
            "pointSize": 6,
            "scrollZoom": true,
        }))
        .unwrap();

        assert_eq!(params.b0from.as_deref(), Some("1990"));
        assert_eq!(params.b0to.as_deref(), Some("2000"));
        assert_eq!(params.retina.as_deref(), Some("2"));
        assert_eq!(params.point_size.as_deref(), Some("6"));
        assert_eq!(params.scroll_zoom.as_deref(), Some("1"));
        assert!(params.bl.is_none());
    }

    #[test]
    fn absent_is_distinct_from_empty() {
        let params: RawMapParams =
            serde_json::from_value(serde_json::json!({ "bl": "" })).unwrap();
        assert_eq!(params.bl.as_deref(), Some(""));
        assert_eq!(params.tr, None);
    }

    #[test]
    fn deserializes_from_toml() {
        let params: RawMapParams = toml::from_str(
            r#"
            blCoord = "350000,350000"
            trCoord = "360000,360000"
            unconfirmed = 1
            "#,
        )
        .unwrap();
        assert_eq!(params.bl_coord.as_deref(), Some("350000,350000"));
        assert_eq!(params.unconfirmed.as_deref(), Some("1"));
    }

    #[test]
    fn set_and_get_by_external_key() {
        let mut params = RawMapParams::default();
        assert!(params.set("blCoord", "1,2"));
        assert!(params.set("SCROLLZOOM", "1"));
        assert!(!params.set("bogus", "1"));

        assert_eq!(params.get("blcoord"), Some("1,2"));
        assert_eq!(params.scroll_zoom.as_deref(), Some("1"));
        assert_eq!(params.get("bogus"), None);
    }

    #[test]
    fn every_key_is_settable() {
        let mut params = RawMapParams::default();
        for key in RawMapParams::KEYS {
            assert!(params.set(key, "x"), "key {key} not settable");
            assert_eq!(params.get(key), Some("x"));
        }
    }

    #[test]
    fn collects_from_pairs() {
        let params: RawMapParams = [("vc", "39"), ("zoom", "wales"), ("nope", "1")]
            .into_iter()
            .collect();
        assert_eq!(params.vc.as_deref(), Some("39"));
        assert_eq!(params.zoom.as_deref(), Some("wales"));
    }
}
