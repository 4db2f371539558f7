//! Filling a [`RawMapParams`] from caller-supplied pairs.
//!
//! [`RawMapParams`] itself drops keys it does not know. These helpers put
//! the same values in but report every unknown key as
//! [`ParamWarning::UnknownParameter`].

use species_map_params_models::RawMapParams;

use crate::diagnostics::{ParamWarning, Reporter};

/// Sets `key` on `raw`, reporting it if no parameter has that name.
///
/// Returns whether the key was recognised.
pub fn set_param(
    raw: &mut RawMapParams,
    key: &str,
    value: impl Into<String>,
    reporter: &dyn Reporter,
) -> bool {
    let known = raw.set(key, value);
    if !known {
        reporter.report(ParamWarning::UnknownParameter {
            name: key.to_string(),
        });
    }
    known
}

/// Builds a parameter bag from `(key, value)` pairs in order. Later pairs
/// overwrite earlier ones; unknown keys are reported and skipped.
pub fn raw_from_pairs<I, K, V>(pairs: I, reporter: &dyn Reporter) -> RawMapParams
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<String>,
{
    let mut raw = RawMapParams::default();
    for (key, value) in pairs {
        set_param(&mut raw, key.as_ref(), value, reporter);
    }
    raw
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::CollectingReporter;

    #[test]
    fn reports_unknown_keys_in_order() {
        let reporter = CollectingReporter::new();
        let raw = raw_from_pairs(
            [("vc", "39"), ("colour", "red"), ("ZOOM", "wales"), ("bl_coord", "1,2")],
            &reporter,
        );

        assert_eq!(raw.get("vc"), Some("39"));
        assert_eq!(raw.get("zoom"), Some("wales"));
        assert_eq!(raw.get("blCoord"), None);
        assert_eq!(
            reporter.take(),
            [
                ParamWarning::UnknownParameter {
                    name: "colour".to_string()
                },
                ParamWarning::UnknownParameter {
                    name: "bl_coord".to_string()
                },
            ]
        );
    }

    #[test]
    fn known_keys_are_silent_and_last_wins() {
        let reporter = CollectingReporter::new();
        let raw = raw_from_pairs([("b0from", "1990"), ("b0from", "2001")], &reporter);
        assert_eq!(raw.get("b0from"), Some("2001"));
        assert!(reporter.is_empty());
    }

    #[test]
    fn set_param_reports_and_leaves_bag_unchanged() {
        let reporter = CollectingReporter::new();
        let mut raw = RawMapParams::default();
        assert!(!set_param(&mut raw, "nope", "1", &reporter));
        assert_eq!(raw, RawMapParams::default());
        assert_eq!(
            reporter.warnings(),
            [ParamWarning::UnknownParameter {
                name: "nope".to_string()
            }]
        );
    }
}
