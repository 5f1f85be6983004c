//! Implements utilities to create color values.

use regex::Regex;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// An sRGB color with an optional alpha channel, each channel in `0.0..=1.0`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: Option<f64>,
}

impl Color {
    pub const WHITE: Color = Color::rgb(0xFF, 0xFF, 0xFF);
    pub const BLACK: Color = Color::rgb(0x00, 0x00, 0x00);

    /// Builds an opaque color from 8-bit channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f64 / 255.0,
            g: g as f64 / 255.0,
            b: b as f64 / 255.0,
            a: None,
        }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: r as f64 / 255.0,
            g: g as f64 / 255.0,
            b: b as f64 / 255.0,
            a: Some(a as f64 / 255.0),
        }
    }

    pub fn channels(&self) -> (f64, f64, f64, f64) {
        (self.r, self.g, self.b, self.a.unwrap_or(1.0))
    }

    pub fn with_alpha(&self, a: f64) -> Self {
        Self {
            a: Some(a.clamp(0.0, 1.0)),
            ..*self
        }
    }

    /// Applies this color as the current cairo source.
    pub fn set_source(&self, cr: &cairo::Context) {
        let (r, g, b, a) = self.channels();
        cr.set_source_rgba(r, g, b, a);
    }

    /// Linear interpolation towards `other`, `t` in `0.0..=1.0`.
    pub fn lerp(&self, other: &Color, t: f64) -> Color {
        let t = t.clamp(0.0, 1.0);
        Color {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
            a: match (self.a, other.a) {
                (None, None) => None,
                (a, b) => Some(a.unwrap_or(1.0) + (b.unwrap_or(1.0) - a.unwrap_or(1.0)) * t),
            },
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl FromStr for Color {
    type Err = &'static str;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let re =
            Regex::new(r"^#([0-9a-fA-F]{2})([0-9a-fA-F]{2})([0-9a-fA-F]{2})([0-9a-fA-F]{2})?$")
                .unwrap();

        let captures = re
            .captures(s)
            .ok_or("string not in form #RRGGBB or #RRGGBBAA")?;
        let mut values = captures
            .iter()
            .skip(1)
            .map(|c| c.map(|v| u8::from_str_radix(v.as_str(), 16).unwrap()));
        let r = values.next().unwrap().unwrap_or(0) as f64 / 255.0;
        let g = values.next().unwrap().unwrap_or(0) as f64 / 255.0;
        let b = values.next().unwrap().unwrap_or(0) as f64 / 255.0;
        let a = values.next().unwrap().map(|x| x as f64 / 255.0);
        Ok(Color { r, g, b, a })
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self { r, g, b, a } = *self;
        let r = (r.clamp(0.0, 1.0) * 255.0) as u8;
        let g = (g.clamp(0.0, 1.0) * 255.0) as u8;
        let b = (b.clamp(0.0, 1.0) * 255.0) as u8;
        if let Some(a) = a {
            let a = (a.clamp(0.0, 1.0) * 255.0) as u8;
            write!(f, "#{:02X}{:02X}{:02X}{:02X}", r, g, b, a)
        } else {
            write!(f, "#{:02X}{:02X}{:02X}", r, g, b)
        }
    }
}

struct ColorVisitor;

impl<'de> Visitor<'de> for ColorVisitor {
    type Value = Color;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a string in the form #RRGGBBAA or #RRGGBB")
    }

    fn visit_str<E>(self, v: &str) -> std::result::Result<Self::Value, E>
    where
        E: de::Error,
    {
        v.parse::<Color>().map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Color, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_str(ColorVisitor)
    }
}

impl Serialize for Color {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_opaque_hex() {
        let c: Color = "#FF8000".parse().unwrap();
        assert_eq!(c, Color::rgb(0xFF, 0x80, 0x00));
        assert_eq!(c.to_string(), "#FF8000");
    }

    #[test]
    fn parses_hex_with_alpha() {
        let c: Color = "#00000080".parse().unwrap();
        assert_eq!(c.a, Some(0x80 as f64 / 255.0));
        assert_eq!(c.to_string(), "#00000080");
    }

    #[test]
    fn rejects_malformed_strings() {
        assert!("FF8000".parse::<Color>().is_err());
        assert!("#F80".parse::<Color>().is_err());
        assert!("#GG0000".parse::<Color>().is_err());
    }

    #[test]
    fn lerp_midpoint() {
        let c = Color::BLACK.lerp(&Color::WHITE, 0.5);
        assert!((c.r - 0.5).abs() < 1e-9);
        assert!((c.g - 0.5).abs() < 1e-9);
        assert!((c.b - 0.5).abs() < 1e-9);
    }
}
