use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    #[error("color must start with '#': {0:?}")]
    MissingHash(String),
    #[error("color must have exactly six hex digits: {0:?}")]
    BadLength(String),
    #[error("color contains a non-hex digit: {0:?}")]
    BadDigit(String),
}

/// An sRGB color written as `#RRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HexColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl HexColor {
    pub const BLACK: HexColor = HexColor::rgb(0, 0, 0);
    pub const WHITE: HexColor = HexColor::rgb(0xff, 0xff, 0xff);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl FromStr for HexColor {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .trim()
            .strip_prefix('#')
            .ok_or_else(|| ColorError::MissingHash(s.to_string()))?;
        if digits.len() != 6 {
            return Err(ColorError::BadLength(s.to_string()));
        }

        let channel = |range: std::ops::Range<usize>| {
            digits
                .get(range)
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .ok_or_else(|| ColorError::BadDigit(s.to_string()))
        };

        Ok(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Serialize for HexColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for HexColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_mixed_case() {
        let color: HexColor = "#4F46e5".parse().unwrap();
        assert_eq!(color, HexColor::rgb(0x4f, 0x46, 0xe5));
        assert_eq!(color.to_string(), "#4f46e5");
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(matches!(
            "000000".parse::<HexColor>(),
            Err(ColorError::MissingHash(_))
        ));
        assert!(matches!(
            "#fff".parse::<HexColor>(),
            Err(ColorError::BadLength(_))
        ));
        assert!(matches!(
            "#gg0000".parse::<HexColor>(),
            Err(ColorError::BadDigit(_))
        ));
        // multi-byte characters must not panic on slicing
        assert!("#ééé".parse::<HexColor>().is_err());
    }

    #[test]
    fn serializes_as_string() {
        let json = serde_json::to_string(&HexColor::WHITE).unwrap();
        assert_eq!(json, "\"#ffffff\"");
        let back: HexColor = serde_json::from_str("\"#000000\"").unwrap();
        assert_eq!(back, HexColor::BLACK);
    }
}
