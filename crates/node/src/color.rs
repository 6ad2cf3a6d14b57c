//! Hex color normalization for item colors.
//!
//! Colors are stored as canonical `#RRGGBB` strings. Anything the user
//! types goes through [`normalize_hex_color`], which never fails: input
//! that cannot be read as a color collapses to [`FALLBACK_COLOR`].

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

/// Color substituted for unreadable input.
pub const FALLBACK_COLOR: &str = "#4A90E2";

static HEX6: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?i)[0-9a-f]{6}$").expect("static hex pattern compiles")
});

/// An RGB color that serializes as `#RRGGBB`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HexColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl HexColor {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RGB`, `RGB`, `#RRGGBB` or `RRGGBB` (any case, surrounding
    /// whitespace ignored).
    pub fn parse(value: &str) -> Option<Self> {
        let digits = value.trim();
        let digits = digits.strip_prefix('#').unwrap_or(digits);

        let expanded = if digits.len() == 3 && digits.is_ascii() {
            digits.chars().flat_map(|c| [c, c]).collect::<String>()
        } else {
            digits.to_string()
        };

        if !HEX6.is_match(&expanded) {
            return None;
        }

        let r = u8::from_str_radix(&expanded[0..2], 16).ok()?;
        let g = u8::from_str_radix(&expanded[2..4], 16).ok()?;
        let b = u8::from_str_radix(&expanded[4..6], 16).ok()?;
        Some(Self { r, g, b })
    }

    pub fn fallback() -> Self {
        Self::new(0x4A, 0x90, 0xE2)
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl Serialize for HexColor {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for HexColor {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        HexColor::parse(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid hex color: {s:?}")))
    }
}

/// Canonicalize a user-entered color to uppercase `#RRGGBB`.
///
/// Accepts an optional leading `#` and 3-digit shorthand. Total: invalid
/// input returns [`FALLBACK_COLOR`].
pub fn normalize_hex_color(value: &str) -> String {
    HexColor::parse(value)
        .unwrap_or_else(HexColor::fallback)
        .to_string()
}
