//! British National Grid and Irish Grid references.
//!
//! A British reference is two letters (the 500 km and 100 km squares)
//! followed by an even number of digits, e.g. `SJ49` or `TG 51409 13177`.
//! A 10 km reference may carry a DINTY tetrad letter (`SJ49K`) or a
//! quadrant (`SJ49NE`). An Irish reference has a single letter.

use crate::GeometryError;

/// Which national grid a reference belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridSystem {
    /// OSGB36 British National Grid.
    British,
    /// Ireland 1965 Irish Grid.
    Irish,
}

/// A parsed grid reference: the south-west corner of a square and its side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridReference {
    pub system: GridSystem,
    pub easting: f64,
    pub northing: f64,
    /// Side length of the referenced square in metres.
    pub size: f64,
}

/// Position of a grid letter in the 5x5 lettering, which omits `I`.
fn letter_index(letter: u8) -> Option<u32> {
    if !letter.is_ascii_uppercase() || letter == b'I' {
        return None;
    }
    let index = u32::from(letter - b'A');
    Some(if letter > b'I' { index - 1 } else { index })
}

/// Position of a DINTY tetrad letter, which omits `O`.
fn tetrad_index(letter: u8) -> Option<u32> {
    if !letter.is_ascii_uppercase() || letter == b'O' {
        return None;
    }
    let index = u32::from(letter - b'A');
    Some(if letter > b'O' { index - 1 } else { index })
}

impl GridReference {
    /// Parses a British or Irish grid reference. Whitespace and case are
    /// ignored.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::InvalidGridReference`] if the text is not a
    /// well-formed reference.
    #[allow(clippy::cast_precision_loss)]
    pub fn parse(text: &str) -> Result<Self, GeometryError> {
        let invalid = || GeometryError::InvalidGridReference(text.to_string());

        let normalised: Vec<u8> = text
            .bytes()
            .filter(|b| !b.is_ascii_whitespace())
            .map(|b| b.to_ascii_uppercase())
            .collect();

        let prefix_len = normalised
            .iter()
            .take_while(|b| b.is_ascii_alphabetic())
            .count();
        let (prefix, rest) = normalised.split_at(prefix_len);
        let digit_len = rest.iter().take_while(|b| b.is_ascii_digit()).count();
        let (digits, suffix) = rest.split_at(digit_len);

        if digits.len() % 2 != 0 || digits.len() > 10 {
            return Err(invalid());
        }

        let (system, mut easting, mut northing) = match prefix {
            [first, second] => {
                let l1 = letter_index(*first).ok_or_else(invalid)?;
                let l2 = letter_index(*second).ok_or_else(invalid)?;
                // 500 km squares covering Great Britain.
                if !matches!(first, b'S' | b'T' | b'N' | b'O' | b'H' | b'J') {
                    return Err(invalid());
                }
                let e100 = ((i64::from(l1) - 2).rem_euclid(5)) * 5 + i64::from(l2 % 5);
                let n100 = (19 - i64::from(l1 / 5) * 5) - i64::from(l2 / 5);
                (GridSystem::British, e100, n100)
            }
            [letter] => {
                let index = letter_index(*letter).ok_or_else(invalid)?;
                (
                    GridSystem::Irish,
                    i64::from(index % 5),
                    4 - i64::from(index / 5),
                )
            }
            _ => return Err(invalid()),
        };
        easting *= 100_000;
        northing *= 100_000;

        let half = digits.len() / 2;
        let mut size: i64 = 100_000;
        if half > 0 {
            let scale = 10_i64.pow(u32::try_from(5 - half).map_err(|_| invalid())?);
            easting += parse_digits(&digits[..half]) * scale;
            northing += parse_digits(&digits[half..]) * scale;
            size = scale;
        }

        match suffix {
            [] => {}
            [letter] if system == GridSystem::British && half == 1 => {
                let index = i64::from(tetrad_index(*letter).ok_or_else(invalid)?);
                easting += (index / 5) * 2_000;
                northing += (index % 5) * 2_000;
                size = 2_000;
            }
            [a, b] if system == GridSystem::British && half == 1 => {
                let (de, dn) = match (a, b) {
                    (b'S', b'W') => (0, 0),
                    (b'N', b'W') => (0, 5_000),
                    (b'S', b'E') => (5_000, 0),
                    (b'N', b'E') => (5_000, 5_000),
                    _ => return Err(invalid()),
                };
                easting += de;
                northing += dn;
                size = 5_000;
            }
            _ => return Err(invalid()),
        }

        Ok(Self {
            system,
            easting: easting as f64,
            northing: northing as f64,
            size: size as f64,
        })
    }

    /// Easting and northing of the centre of the square.
    #[must_use]
    pub fn centroid(&self) -> (f64, f64) {
        let half = self.size / 2.0;
        (self.easting + half, self.northing + half)
    }
}

fn parse_digits(digits: &[u8]) -> i64 {
    digits
        .iter()
        .fold(0, |acc, digit| acc * 10 + i64::from(digit - b'0'))
}

/// Reads an `easting,northing` pair.
///
/// # Errors
///
/// Returns [`GeometryError::InvalidCoordinate`] unless the text holds
/// exactly two comma-separated numbers.
pub fn parse_easting_northing(text: &str) -> Result<(f64, f64), GeometryError> {
    let invalid = || GeometryError::InvalidCoordinate(text.to_string());
    let mut parts = text.split(',').map(str::trim);
    let (Some(easting), Some(northing), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(invalid());
    };
    let easting = easting.parse::<f64>().map_err(|_| invalid())?;
    let northing = northing.parse::<f64>().map_err(|_| invalid())?;
    Ok((easting, northing))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> GridReference {
        GridReference::parse(text).unwrap()
    }

    #[test]
    fn hundred_km_squares() {
        let sv = parse("SV");
        assert_eq!((sv.easting, sv.northing, sv.size), (0.0, 0.0, 100_000.0));

        let tg = parse("TG");
        assert_eq!((tg.easting, tg.northing), (600_000.0, 300_000.0));

        let na = parse("NA");
        assert_eq!((na.easting, na.northing), (0.0, 900_000.0));

        let hp = parse("HP");
        assert_eq!((hp.easting, hp.northing), (400_000.0, 1_200_000.0));
    }

    #[test]
    fn ten_figure_reference() {
        let r = parse("TG 51409 13177");
        assert_eq!((r.easting, r.northing, r.size), (651_409.0, 313_177.0, 1.0));
    }

    #[test]
    fn hectad_centroid() {
        let r = parse("SJ49");
        assert_eq!(r.centroid(), (345_000.0, 395_000.0));
    }

    #[test]
    fn tetrad_suffix() {
        let a = parse("SJ49A");
        assert_eq!((a.easting, a.northing, a.size), (340_000.0, 390_000.0, 2_000.0));

        let z = parse("SJ49Z");
        assert_eq!((z.easting, z.northing), (348_000.0, 398_000.0));

        assert!(GridReference::parse("SJ49O").is_err());
    }

    #[test]
    fn quadrant_suffix() {
        let ne = parse("sj49ne");
        assert_eq!((ne.easting, ne.northing, ne.size), (345_000.0, 395_000.0, 5_000.0));
    }

    #[test]
    fn irish_reference() {
        let r = parse("O150340");
        assert_eq!(r.system, GridSystem::Irish);
        assert_eq!((r.easting, r.northing, r.size), (315_000.0, 234_000.0, 100.0));
    }

    #[test]
    fn rejects_malformed() {
        for text in ["", "SJ4", "SJ49AB", "XX12", "S1", "I12", "SJ123456789012", "49SJ"] {
            assert!(GridReference::parse(text).is_err(), "{text}");
        }
    }

    #[test]
    fn easting_northing_pairs() {
        assert_eq!(
            parse_easting_northing("350000,360000").unwrap(),
            (350_000.0, 360_000.0)
        );
        assert!(parse_easting_northing("350000").is_err());
        assert!(parse_easting_northing("1,2,3").is_err());
        assert!(parse_easting_northing(",").is_err());
    }
}
