//! Six-digit hexadecimal RGB colours as sent to the WMS `ENV` parameter.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// An upper-case, six hex digit RGB colour without a leading `#`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Colour(Cow<'static, str>);

impl Colour {
    pub const AQUAMARINE: Self = Self::named("F0F8FF");
    pub const BLUE: Self = Self::named("0000FF");
    pub const BROWN: Self = Self::named("A52A2A");
    pub const CORAL: Self = Self::named("FF7F50");
    pub const CYAN: Self = Self::named("00FFFF");
    pub const FUSCHIA: Self = Self::named("FF00FF");
    pub const GOLD: Self = Self::named("FFD700");
    pub const GREEN: Self = Self::named("008000");
    pub const GREENYELLOW: Self = Self::named("ADFF2F");
    pub const HOTPINK: Self = Self::named("FF69B4");
    pub const LIGHTBLUE: Self = Self::named("ADD8E6");
    pub const LIGHTORANGE: Self = Self::named("FFC0CB");
    pub const LIME: Self = Self::named("00FF00");
    pub const MAGENTA: Self = Self::named("FF00FF");
    pub const ORANGE: Self = Self::named("E6704C");
    pub const ORANGERED: Self = Self::named("FF4500");
    pub const YELLOW: Self = Self::named("FFFF00");
    /// Sea fill of the base maps.
    pub const SEAFILL: Self = Self::named("E6EFFF");
    /// Boundary outline colour.
    pub const BOUNDARY_LINE: Self = Self::named("7C7CD3");

    const fn named(hex: &'static str) -> Self {
        Self(Cow::Borrowed(hex))
    }

    /// Parses a colour that is already exactly six hex digits.
    ///
    /// Lower-case digits are accepted and normalised to upper case. No
    /// characters are stripped; see the sanitisers for lenient parsing.
    #[must_use]
    pub fn parse_hex(hex: &str) -> Option<Self> {
        if hex.len() == 6 && hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            Some(Self(Cow::Owned(hex.to_ascii_uppercase())))
        } else {
            None
        }
    }

    /// The six hex digits.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Colour {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Colour {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse_hex(&value).ok_or_else(|| format!("invalid colour: {value}"))
    }
}

impl From<Colour> for String {
    fn from(value: Colour) -> Self {
        value.0.into_owned()
    }
}
