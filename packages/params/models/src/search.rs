//! Search targets: either a bare taxon version key or a structured
//! group/species/location search.

use serde::{Deserialize, Serialize};

/// Sentinel group name meaning "every species group".
pub const ALL_SPECIES: &str = "ALL_SPECIES";

/// Centre and extent of a structured search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    /// Square search area if `true`, circular otherwise.
    pub is_square: bool,
    /// Latitude of the centre (WGS84).
    pub latitude: f64,
    /// Longitude of the centre (WGS84).
    pub longitude: f64,
    /// Radius in kilometres. For a square, the distance from the centre to
    /// each edge.
    pub radius: f64,
}

/// A structured search by species group and/or species name around a
/// location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExploreMap {
    /// `true` when searching a whole group rather than one species.
    pub is_group: bool,
    /// Where to search.
    pub location: Location,
    /// Species group name, or [`ALL_SPECIES`].
    pub group_name: String,
    /// Scientific name of the species, when not a group search.
    pub species_name: String,
}

impl ExploreMap {
    /// Returns `true` if the group is the catch-all sentinel or unset.
    #[must_use]
    pub fn is_all_species(&self) -> bool {
        self.group_name.is_empty() || self.group_name == ALL_SPECIES
    }

    /// Returns `true` if results are restricted to a single species.
    #[must_use]
    pub fn filters_species(&self) -> bool {
        !self.is_group && !self.species_name.is_empty()
    }

    /// Returns `true` if neither a group nor a species has been chosen.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.group_name.is_empty() && self.species_name.is_empty()
    }
}

/// The active search target of a map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Search {
    /// A taxon version key.
    Tvk(String),
    /// A structured group/species/location search.
    Explore(ExploreMap),
}

impl Search {
    /// Label used to title layers derived from this target.
    ///
    /// The TVK itself in TVK mode. In explore mode, the species name when
    /// filtering to one species, else the group name.
    #[must_use]
    pub fn identifier(&self) -> &str {
        match self {
            Self::Tvk(tvk) => tvk,
            Self::Explore(explore) if explore.filters_species() => &explore.species_name,
            Self::Explore(explore) => &explore.group_name,
        }
    }

    /// Returns the explore target, if this is a structured search.
    #[must_use]
    pub const fn explore(&self) -> Option<&ExploreMap> {
        match self {
            Self::Explore(explore) => Some(explore),
            Self::Tvk(_) => None,
        }
    }
}

impl From<&str> for Search {
    fn from(tvk: &str) -> Self {
        Self::Tvk(tvk.to_string())
    }
}

impl From<String> for Search {
    fn from(tvk: String) -> Self {
        Self::Tvk(tvk)
    }
}

impl From<ExploreMap> for Search {
    fn from(explore: ExploreMap) -> Self {
        Self::Explore(explore)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn explore(is_group: bool, group: &str, species: &str) -> ExploreMap {
        ExploreMap {
            is_group,
            location: Location {
                is_square: false,
                latitude: 53.2,
                longitude: -2.9,
                radius: 2.0,
            },
            group_name: group.to_string(),
            species_name: species.to_string(),
        }
    }

    #[test]
    fn identifier_prefers_species_when_filtering() {
        let search = Search::from(explore(false, "birds", "Turdus merula"));
        assert_eq!(search.identifier(), "Turdus merula");

        let search = Search::from(explore(true, "birds", "Turdus merula"));
        assert_eq!(search.identifier(), "birds");

        let search = Search::from("NHMSYS0000530739");
        assert_eq!(search.identifier(), "NHMSYS0000530739");
    }

    #[test]
    fn all_species_sentinel() {
        assert!(explore(true, ALL_SPECIES, "").is_all_species());
        assert!(explore(true, "", "").is_all_species());
        assert!(!explore(true, "mammals", "").is_all_species());
        assert!(explore(true, "", "").is_empty());
    }

    #[test]
    fn deserializes_camel_case() {
        let value: ExploreMap = serde_json::from_value(serde_json::json!({
            "isGroup": false,
            "groupName": "birds",
            "speciesName": "Erithacus rubecula",
            "location": { "isSquare": true, "latitude": 54.0, "longitude": -2.0, "radius": 5 }
        }))
        .unwrap();
        assert!(value.location.is_square);
        assert!((value.location.radius - 5.0).abs() < f64::EPSILON);
    }
}
