//! Normalized period colors and the preset palette.

use crate::model::validation::ValidationError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

static HEX_COLOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^#?([0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").expect("valid hex color regex")
});

/// Color preselected for new periods.
pub const DEFAULT_COLOR: &str = "#3B82F6";

/// Preset swatches offered by color pickers, in display order.
pub const PALETTE: [&str; 10] = [
    "#3B82F6", // blue
    "#EF4444", // red
    "#10B981", // green
    "#F59E0B", // yellow
    "#8B5CF6", // purple
    "#EC4899", // pink
    "#06B6D4", // cyan
    "#84CC16", // lime
    "#F97316", // orange
    "#6B7280", // gray
];

/// Color normalized to uppercase `#RRGGBB`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(String);

impl Color {
    /// Accepts `#RRGGBB`, `RRGGBB`, `#RGB` or `RGB` in any case.
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        let trimmed = value.trim();
        let caps = HEX_COLOR_RE
            .captures(trimmed)
            .ok_or_else(|| ValidationError::InvalidColor(value.to_string()))?;
        let digits = caps.get(1).map_or("", |m| m.as_str()).to_ascii_uppercase();
        let expanded = if digits.len() == 3 {
            digits.chars().flat_map(|c| [c, c]).collect::<String>()
        } else {
            digits
        };
        Ok(Self(format!("#{expanded}")))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Red, green and blue channels.
    pub fn rgb(&self) -> (u8, u8, u8) {
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&self.0[range], 16).unwrap_or_default()
        };
        (channel(1..3), channel(3..5), channel(5..7))
    }
}

impl Default for Color {
    fn default() -> Self {
        Self(DEFAULT_COLOR.to_string())
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Color {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value.as_str())
    }
}

impl From<Color> for String {
    fn from(value: Color) -> Self {
        value.0
    }
}

/// Palette swatches as parsed colors.
pub fn palette() -> Vec<Color> {
    PALETTE
        .iter()
        .map(|value| Color(value.to_string()))
        .collect()
}
