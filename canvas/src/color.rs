//! RGB trace colors with `#rrggbb` wire form.

#[cfg(test)]
#[path = "color_test.rs"]
mod color_test;

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when a color string is not `#RGB`, `#RRGGBB` or `#RRGGBBAA`.
#[derive(Debug, thiserror::Error)]
pub enum ColorError {
    #[error("color must start with '#': {0}")]
    MissingHash(String),
    #[error("unsupported color length: {0}")]
    Length(String),
    #[error("invalid hex digit: {0}")]
    Digit(#[from] ParseIntError),
}

/// An opaque RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb { r: 255, g: 255, b: 255 };

    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Lowercase `#rrggbb`.
    #[must_use]
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = ColorError;

    /// Parse `#RGB`, `#RRGGBB`, or `#RRGGBBAA` (alpha is dropped).
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        let Some(hex) = trimmed.strip_prefix('#') else {
            return Err(ColorError::MissingHash(trimmed.to_owned()));
        };
        if !hex.is_ascii() {
            return Err(ColorError::Length(trimmed.to_owned()));
        }
        match hex.len() {
            3 => Ok(Self {
                r: u8::from_str_radix(&hex[0..1].repeat(2), 16)?,
                g: u8::from_str_radix(&hex[1..2].repeat(2), 16)?,
                b: u8::from_str_radix(&hex[2..3].repeat(2), 16)?,
            }),
            6 | 8 => Ok(Self {
                r: u8::from_str_radix(&hex[0..2], 16)?,
                g: u8::from_str_radix(&hex[2..4], 16)?,
                b: u8::from_str_radix(&hex[4..6], 16)?,
            }),
            _ => Err(ColorError::Length(trimmed.to_owned())),
        }
    }
}

impl TryFrom<String> for Rgb {
    type Error = ColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self {
        value.to_hex()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Default for Rgb {
    /// The editor's initial trace color, `#00e676`.
    fn default() -> Self {
        Self::new(0x00, 0xe6, 0x76)
    }
}
