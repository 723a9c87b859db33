use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fallback for descriptors that arrive without a usable color.
pub const NEUTRAL_GRAY: &str = "#9ca3af";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorParseError {
    #[error("color `{0}` must start with '#'")]
    MissingHash(String),
    #[error("color `{0}` must have 3 or 6 hex digits")]
    BadLength(String),
    #[error("color `{0}` contains a non-hex digit")]
    BadDigit(String),
}

/// CSS hex color (`#rgb` or `#rrggbb`), stored lowercase.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(String);

impl Color {
    pub fn parse(s: &str) -> Result<Color, ColorParseError> {
        let t = s.trim();
        let Some(digits) = t.strip_prefix('#') else {
            return Err(ColorParseError::MissingHash(t.to_string()));
        };
        if digits.len() != 3 && digits.len() != 6 {
            return Err(ColorParseError::BadLength(t.to_string()));
        }
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorParseError::BadDigit(t.to_string()));
        }
        Ok(Color(t.to_ascii_lowercase()))
    }

    pub fn neutral_gray() -> Color {
        Color(NEUTRAL_GRAY.to_string())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Color {
    type Err = ColorParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::parse(s)
    }
}

impl TryFrom<String> for Color {
    type Error = ColorParseError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        Color::parse(&s)
    }
}

impl From<Color> for String {
    fn from(c: Color) -> String {
        c.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Swatch {
    pub name: String,
    pub color: Color,
}

/// Named colors offered to the user. Never empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    swatches: Vec<Swatch>,
}

const DEFAULT_SWATCHES: [(&str, &str); 10] = [
    ("Red", "#ef4444"),
    ("Blue", "#3b82f6"),
    ("Yellow", "#eab308"),
    ("Green", "#22c55e"),
    ("White", "#f9fafb"),
    ("Black", "#1f2937"),
    ("Orange", "#f97316"),
    ("Purple", "#a855f7"),
    ("Pink", "#ec4899"),
    ("Gray", NEUTRAL_GRAY),
];

impl Default for Palette {
    fn default() -> Self {
        let swatches = DEFAULT_SWATCHES
            .iter()
            .map(|(name, hex)| Swatch {
                name: (*name).to_string(),
                color: Color((*hex).to_string()),
            })
            .collect();
        Self { swatches }
    }
}

impl Palette {
    /// Falls back to the default palette when `swatches` is empty.
    pub fn from_swatches(swatches: Vec<Swatch>) -> Self {
        if swatches.is_empty() {
            return Palette::default();
        }
        Self { swatches }
    }

    pub fn swatches(&self) -> &[Swatch] {
        &self.swatches
    }

    pub fn first(&self) -> &Color {
        &self.swatches[0].color
    }

    /// Case-insensitive lookup by swatch name.
    pub fn by_name(&self, name: &str) -> Option<&Color> {
        self.swatches
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name.trim()))
            .map(|s| &s.color)
    }

    /// Swatch name first, then a literal hex color.
    pub fn resolve(&self, input: &str) -> Result<Color, ColorParseError> {
        match self.by_name(input) {
            Some(c) => Ok(c.clone()),
            None => Color::parse(input),
        }
    }
}
