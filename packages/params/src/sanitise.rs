//! Field sanitisers.
//!
//! Every function here takes the raw value as supplied (`None` when the
//! caller omitted it), reports anything suspicious, and always returns a
//! usable value. None of them panic.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use reqwest::Url;
use species_map_params_models::Colour;
use strum::VariantNames;

use crate::diagnostics::{ParamWarning, Reporter};

/// Characters outside `[a-zA-Z0-9-]`, stripped before enum matching.
static NOT_ENUM_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[^a-zA-Z0-9-]").unwrap_or_else(|_| unreachable!()));

/// Earliest and latest year a date band accepts.
pub const YEAR_RANGE: std::ops::RangeInclusive<u16> = 1000..=3000;

/// Removes every character matched by `disallowed`.
///
/// Reports when anything was removed. Returns `fallback` when the value
/// was omitted or nothing is left.
pub fn sanitise_free_text(
    name: &str,
    raw: Option<&str>,
    disallowed: &Regex,
    fallback: &str,
    reporter: &dyn Reporter,
) -> String {
    let Some(raw) = raw else {
        return fallback.to_string();
    };
    let clean = disallowed.replace_all(raw, "");
    if clean != raw {
        reporter.report(ParamWarning::InvalidCharacters {
            name: name.to_string(),
            value: raw.to_string(),
            replacement: clean.to_string(),
        });
    }
    if clean.is_empty() {
        fallback.to_string()
    } else {
        clean.into_owned()
    }
}

/// Matches a value against a list of accepted tokens.
///
/// The value is stripped to `[a-zA-Z0-9-]` and lower-cased first. An
/// omitted value yields `fallback` silently; an unmatched one yields
/// `fallback` and a warning listing `allowed`.
pub fn sanitise_enum(
    name: &str,
    raw: Option<&str>,
    allowed: &[&str],
    fallback: &str,
    reporter: &dyn Reporter,
) -> String {
    match_token(name, raw, allowed, reporter).map_or_else(|| fallback.to_string(), str::to_string)
}

/// [`sanitise_enum`] over the tokens of a `strum` enum.
///
/// Returns `None` when the value was omitted or not recognised.
pub fn sanitise_enum_as<T>(name: &str, raw: Option<&str>, reporter: &dyn Reporter) -> Option<T>
where
    T: FromStr + VariantNames,
{
    match_token(name, raw, T::VARIANTS, reporter).and_then(|token| T::from_str(token).ok())
}

/// Reads a `0`/`1` flag.
pub fn sanitise_flag(name: &str, raw: Option<&str>, fallback: bool, reporter: &dyn Reporter) -> bool {
    match_token(name, raw, &["0", "1"], reporter).map_or(fallback, |token| token == "1")
}

fn match_token<'a>(
    name: &str,
    raw: Option<&str>,
    allowed: &[&'a str],
    reporter: &dyn Reporter,
) -> Option<&'a str> {
    let raw = raw?;
    let clean = sanitise_free_text(name, Some(raw), &NOT_ENUM_TOKEN, "", reporter).to_lowercase();

    let matched = allowed.iter().copied().find(|token| *token == clean);
    if matched.is_none() {
        reporter.report(ParamWarning::UnrecognisedValue {
            name: name.to_string(),
            value: clean,
            valid: allowed.join(", "),
        });
    }
    matched
}

/// Accepts only a syntactically valid absolute URL, returned verbatim.
pub fn sanitise_url(name: &str, raw: Option<&str>, reporter: &dyn Reporter) -> Option<String> {
    let raw = raw?;
    match Url::parse(raw) {
        Ok(_) => Some(raw.to_string()),
        Err(e) => {
            log::debug!("Rejected URL for '{name}': {e}");
            reporter.report(ParamWarning::InvalidUrl {
                name: name.to_string(),
                value: raw.to_string(),
            });
            None
        }
    }
}

/// Reads a six digit hex colour, falling back to `preset`.
///
/// The value (or `preset` if omitted or empty) is upper-cased and stripped
/// of non-hex characters, so `#ff00ff` reads as `FF00FF`. Anything that
/// does not leave exactly six digits is an error and yields `preset`.
pub fn sanitise_fill(
    name: &str,
    raw: Option<&str>,
    preset: &Colour,
    reporter: &dyn Reporter,
) -> Colour {
    let value = raw.filter(|raw| !raw.is_empty()).unwrap_or(preset.as_str());
    let digits: String = value
        .to_ascii_uppercase()
        .chars()
        .filter(char::is_ascii_hexdigit)
        .collect();

    Colour::parse_hex(&digits).unwrap_or_else(|| {
        reporter.report(ParamWarning::InvalidFill {
            name: name.to_string(),
            value: value.to_string(),
            fallback: preset.to_string(),
        });
        preset.clone()
    })
}

/// Reads a whole year in [`YEAR_RANGE`].
///
/// Anything else, including an empty value, is reported as an error and
/// yields `None`.
pub fn sanitise_year(name: &str, raw: Option<&str>, reporter: &dyn Reporter) -> Option<u16> {
    let value = raw.unwrap_or_default();
    let year = value
        .trim()
        .parse::<u16>()
        .ok()
        .filter(|year| YEAR_RANGE.contains(year));
    if year.is_none() {
        reporter.report(ParamWarning::InvalidYear {
            name: name.to_string(),
            value: value.to_string(),
        });
    }
    year
}

#[cfg(test)]
mod tests {
    use species_map_params_models::{GridResolution, NamedRegion};

    use super::*;
    use crate::diagnostics::CollectingReporter;

    fn regex(pattern: &str) -> Regex {
        Regex::new(pattern).unwrap()
    }

    #[test]
    fn free_text_strips_and_warns() {
        let reporter = CollectingReporter::new();
        let clean = sanitise_free_text("tvk", Some("NHMSYS-0000 530739"), &regex("[^a-zA-Z0-9]"), "", &reporter);
        assert_eq!(clean, "NHMSYS0000530739");
        assert_eq!(
            reporter.warnings(),
            vec![ParamWarning::InvalidCharacters {
                name: "tvk".into(),
                value: "NHMSYS-0000 530739".into(),
                replacement: "NHMSYS0000530739".into(),
            }]
        );
    }

    #[test]
    fn free_text_falls_back_when_empty_or_absent() {
        let reporter = CollectingReporter::new();
        let digits = regex("[^0-9]");
        assert_eq!(sanitise_free_text("pointSize", None, &digits, "4", &reporter), "4");
        assert!(reporter.is_empty());
        assert_eq!(sanitise_free_text("pointSize", Some("big"), &digits, "4", &reporter), "4");
        assert_eq!(reporter.warnings().len(), 1);
        assert_eq!(sanitise_free_text("pointSize", Some("6"), &digits, "4", &reporter), "6");
    }

    #[test]
    fn enum_matches_after_cleaning() {
        let reporter = CollectingReporter::new();
        let allowed = ["50km", "10km", "2km", "1km", "100m"];
        assert_eq!(sanitise_enum("res", Some("2KM"), &allowed, "", &reporter), "2km");
        assert!(reporter.is_empty());

        assert_eq!(sanitise_enum("res", Some("5km"), &allowed, "10km", &reporter), "10km");
        let warnings = reporter.take();
        assert_eq!(
            warnings,
            vec![ParamWarning::UnrecognisedValue {
                name: "res".into(),
                value: "5km".into(),
                valid: "50km, 10km, 2km, 1km, 100m".into(),
            }]
        );

        assert_eq!(sanitise_enum("res", None, &allowed, "10km", &reporter), "10km");
        assert!(reporter.is_empty());
    }

    #[test]
    fn typed_enum() {
        let reporter = CollectingReporter::new();
        assert_eq!(
            sanitise_enum_as::<NamedRegion>("zoom", Some("Sco-Mainland"), &reporter),
            Some(NamedRegion::ScoMainland)
        );
        assert_eq!(
            sanitise_enum_as::<GridResolution>("res", Some("100m"), &reporter),
            Some(GridResolution::M100)
        );
        assert_eq!(sanitise_enum_as::<NamedRegion>("zoom", Some("mars"), &reporter), None);
        assert_eq!(reporter.warnings().len(), 1);
    }

    #[test]
    fn flags() {
        let reporter = CollectingReporter::new();
        assert!(sanitise_flag("clickable", None, true, &reporter));
        assert!(!sanitise_flag("clickable", Some("0"), true, &reporter));
        assert!(sanitise_flag("interactive", Some("yes"), true, &reporter));
        assert_eq!(reporter.warnings().len(), 1);
    }

    #[test]
    fn url_must_be_absolute() {
        let reporter = CollectingReporter::new();
        assert!(sanitise_url("query", None, &reporter).is_none());
        assert!(reporter.is_empty());

        let url = sanitise_url(
            "query",
            Some("https://records-ws.nbnatlas.org/ogc/wms/reflect?q=*:*"),
            &reporter,
        );
        assert_eq!(
            url.as_deref(),
            Some("https://records-ws.nbnatlas.org/ogc/wms/reflect?q=*:*")
        );

        assert!(sanitise_url("query", Some("not a url"), &reporter).is_none());
        assert!(sanitise_url("query", Some("/relative/path"), &reporter).is_none());
        assert_eq!(reporter.warnings().len(), 2);
    }

    #[test]
    fn fill_accepts_six_hex_digits() {
        let reporter = CollectingReporter::new();
        for (raw, expected) in [("ff00ff", "FF00FF"), ("#00ffFF", "00FFFF"), ("E6704C", "E6704C")] {
            let fill = sanitise_fill("b0fill", Some(raw), &Colour::YELLOW, &reporter);
            assert_eq!(fill.as_str(), expected);
        }
        assert!(reporter.is_empty());
    }

    #[test]
    fn fill_falls_back_to_preset() {
        let reporter = CollectingReporter::new();
        for raw in ["red", "FF00F", "FF00FF00", "zzzzzz"] {
            let fill = sanitise_fill("b1fill", Some(raw), &Colour::MAGENTA, &reporter);
            assert_eq!(fill, Colour::MAGENTA, "{raw}");
        }
        assert_eq!(reporter.warnings().len(), 4);
        assert!(reporter.warnings().iter().all(|w| w.level() == log::Level::Error));

        assert_eq!(sanitise_fill("b2fill", None, &Colour::CYAN, &reporter), Colour::CYAN);
        assert_eq!(sanitise_fill("b2fill", Some(""), &Colour::CYAN, &reporter), Colour::CYAN);
        assert_eq!(reporter.warnings().len(), 4);
    }

    #[test]
    fn years_must_be_whole_and_in_range() {
        let reporter = CollectingReporter::new();
        assert_eq!(sanitise_year("b0from", Some("1000"), &reporter), Some(1000));
        assert_eq!(sanitise_year("b0from", Some("3000"), &reporter), Some(3000));
        assert_eq!(sanitise_year("b0to", Some(" 1995 "), &reporter), Some(1995));
        assert!(reporter.is_empty());

        for raw in ["999", "3001", "19x0", "1990.5", "", "-2000"] {
            assert_eq!(sanitise_year("b0to", Some(raw), &reporter), None, "{raw}");
        }
        assert_eq!(sanitise_year("b0to", None, &reporter), None);
        assert_eq!(reporter.warnings().len(), 7);
    }
}
