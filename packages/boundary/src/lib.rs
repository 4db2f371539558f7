#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Boundary resolver.
//!
//! Looks vice-counties and named regions up in a static table of lat/lon
//! boxes. The table shipped with the crate is embedded at compile time and
//! parsed once on first use; [`BoundaryIndex::from_toml`] loads a
//! replacement table with the same schema.

use std::sync::LazyLock;

use species_map_boundary_models::{BoundaryKind, BoundaryRecord, BoundaryTable};
use species_map_params_models::{LatLng, LatLngBounds, NamedRegion};
use thiserror::Error;

/// Number of records in the embedded table. Enforced by a test.
#[cfg(test)]
const EXPECTED_BOUNDARY_COUNT: usize = 119;

const BOUNDARIES_TOML: &str = include_str!("../data/boundaries.toml");

static EMBEDDED: LazyLock<BoundaryIndex> = LazyLock::new(|| {
    BoundaryIndex::from_toml(BOUNDARIES_TOML)
        .unwrap_or_else(|e| panic!("Failed to parse embedded boundary table: {e}"))
});

/// Errors from loading or querying a boundary table.
#[derive(Debug, Error)]
pub enum BoundaryError {
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Duplicate boundary id: {0}")]
    DuplicateId(String),

    #[error("Unknown boundary: {0}")]
    NotFound(String),
}

/// A validated boundary table.
#[derive(Debug, Clone)]
pub struct BoundaryIndex {
    records: Vec<BoundaryRecord>,
}

impl BoundaryIndex {
    /// The table embedded in this crate.
    ///
    /// # Panics
    ///
    /// Panics on first use if the embedded TOML fails to parse. Since it is
    /// a compile-time constant, a failure indicates a development error and
    /// is caught by the tests.
    #[must_use]
    pub fn embedded() -> &'static Self {
        &EMBEDDED
    }

    /// Parses a table from TOML.
    ///
    /// # Errors
    ///
    /// Returns [`BoundaryError::Parse`] if the document does not match the
    /// schema, or [`BoundaryError::DuplicateId`] if two records share an id
    /// (ignoring case).
    pub fn from_toml(source: &str) -> Result<Self, BoundaryError> {
        let table: BoundaryTable = toml::de::from_str(source)?;
        Self::from_records(table.boundaries)
    }

    /// Builds an index from records.
    ///
    /// # Errors
    ///
    /// Returns [`BoundaryError::DuplicateId`] if two records share an id
    /// (ignoring case).
    pub fn from_records(records: Vec<BoundaryRecord>) -> Result<Self, BoundaryError> {
        for (i, record) in records.iter().enumerate() {
            if records[..i]
                .iter()
                .any(|other| other.id.eq_ignore_ascii_case(&record.id))
            {
                return Err(BoundaryError::DuplicateId(record.id.clone()));
            }
        }
        log::debug!("Loaded {} boundary records", records.len());
        Ok(Self { records })
    }

    /// All records in table order.
    #[must_use]
    pub fn records(&self) -> &[BoundaryRecord] {
        &self.records
    }

    /// Records of one kind, in table order.
    pub fn of_kind(&self, kind: BoundaryKind) -> impl Iterator<Item = &BoundaryRecord> {
        self.records.iter().filter(move |record| record.kind == kind)
    }

    /// Exact, case-insensitive match on the record id.
    #[must_use]
    pub fn find_by_id(&self, id: &str) -> Option<&BoundaryRecord> {
        self.records
            .iter()
            .find(|record| record.id.eq_ignore_ascii_case(id))
    }

    /// Exact, case-insensitive match on the record name.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<&BoundaryRecord> {
        self.records
            .iter()
            .find(|record| record.name.eq_ignore_ascii_case(name))
    }

    /// Box of the record with the given id.
    ///
    /// # Errors
    ///
    /// Returns [`BoundaryError::NotFound`] if no record has that id.
    pub fn bounds(&self, id: &str) -> Result<LatLngBounds, BoundaryError> {
        self.find_by_id(id)
            .map(BoundaryRecord::bounds)
            .ok_or_else(|| BoundaryError::NotFound(id.to_string()))
    }

    /// Box of a named region.
    ///
    /// # Errors
    ///
    /// Returns [`BoundaryError::NotFound`] if the table lacks the region.
    pub fn region_bounds(&self, region: NamedRegion) -> Result<LatLngBounds, BoundaryError> {
        self.bounds(region.as_ref())
    }

    /// Midpoint of the record whose name matches.
    #[must_use]
    pub fn region_centroid(&self, name: &str) -> Option<LatLng> {
        self.find_by_name(name).map(BoundaryRecord::centroid)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use strum::VariantNames as _;

    use super::*;

    #[test]
    fn loads_embedded_table() {
        let index = BoundaryIndex::embedded();
        assert_eq!(
            index.records().len(),
            EXPECTED_BOUNDARY_COUNT,
            "Expected {EXPECTED_BOUNDARY_COUNT} boundaries, found {}. \
             Update EXPECTED_BOUNDARY_COUNT after adding/removing records.",
            index.records().len()
        );
    }

    #[test]
    fn boundary_ids_are_unique() {
        let mut seen = BTreeSet::new();
        for record in BoundaryIndex::embedded().records() {
            assert!(
                seen.insert(record.id.to_ascii_lowercase()),
                "Duplicate boundary id: {}",
                record.id
            );
        }
    }

    #[test]
    fn all_boundaries_are_well_formed() {
        for record in BoundaryIndex::embedded().records() {
            assert!(!record.name.is_empty(), "Boundary {} has empty name", record.id);
            assert!(
                record.llat < record.ulat && record.llon < record.ulon,
                "Boundary {} has inverted corners",
                record.id
            );
            assert!(
                (49.0..=61.0).contains(&record.llat) && (49.0..=61.0).contains(&record.ulat),
                "Boundary {} lies outside the British Isles",
                record.id
            );
        }
    }

    #[test]
    fn every_named_region_is_present() {
        let index = BoundaryIndex::embedded();
        for region in NamedRegion::VARIANTS {
            let record = index
                .find_by_id(region)
                .unwrap_or_else(|| panic!("Missing region {region}"));
            assert_eq!(record.kind, BoundaryKind::Region);
        }
    }

    #[test]
    fn every_vice_county_resolves() {
        let index = BoundaryIndex::embedded();
        for id in 1..=112 {
            let record = index
                .find_by_id(&id.to_string())
                .unwrap_or_else(|| panic!("Missing vice-county {id}"));
            assert_eq!(record.kind, BoundaryKind::ViceCounty);
            assert!(index.bounds(&id.to_string()).is_ok());
        }
        assert_eq!(index.of_kind(BoundaryKind::ViceCounty).count(), 112);
    }

    #[test]
    fn looks_up_by_id_and_name_ignoring_case() {
        let index = BoundaryIndex::embedded();
        assert_eq!(index.find_by_id("39").unwrap().name, "Staffordshire");
        assert_eq!(index.find_by_id("UK").unwrap().id, "uk");
        assert_eq!(index.find_by_name("staffordshire").unwrap().id, "39");
        assert_eq!(index.find_by_id("44").unwrap().name, "Carmarthenshire");
        assert_eq!(index.find_by_name("south-west yorkshire").unwrap().id, "63");
        assert!(index.find_by_id("999").is_none());
        assert!(matches!(index.bounds("999"), Err(BoundaryError::NotFound(_))));
    }

    #[test]
    fn region_centroid_is_box_midpoint() {
        let centroid = BoundaryIndex::embedded().region_centroid("Wales").unwrap();
        assert!((centroid.lat - 52.4).abs() < 1e-9);
        assert!((centroid.lng - -4.0).abs() < 1e-9);
        assert!(BoundaryIndex::embedded().region_centroid("Atlantis").is_none());
    }

    #[test]
    fn rejects_duplicate_ids() {
        let source = r#"
            [[boundary]]
            id = "a"
            name = "A"
            kind = "region"
            llat = 50.0
            llon = -1.0
            ulat = 51.0
            ulon = 0.0

            [[boundary]]
            id = "A"
            name = "Also A"
            kind = "region"
            llat = 50.0
            llon = -1.0
            ulat = 51.0
            ulon = 0.0
        "#;
        assert!(matches!(
            BoundaryIndex::from_toml(source),
            Err(BoundaryError::DuplicateId(id)) if id == "A"
        ));
    }
}
