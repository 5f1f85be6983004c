//! Named card styles.
//!
//! A style paints a full background onto the canvas and decides which colors
//! the text layer uses on top of it. All randomness (gradient pick, shape
//! placement) goes through the caller's [`Rng`], so a seeded request is
//! reproducible.

mod bold;
mod bright;
mod elegant;
mod geometric;
mod minimal;
mod modern;
mod neon;
mod vintage;

pub use bold::Bold;
pub use bright::Bright;
pub use elegant::Elegant;
pub use geometric::Geometric;
pub use minimal::Minimal;
pub use modern::Modern;
pub use neon::Neon;
pub use vintage::Vintage;

use crate::color::Color;
use crate::error::{Error, Result};
use crate::rng::Rng;

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum StyleName {
    Minimal,
    Bright,
    Elegant,
    Bold,
    Modern,
    Neon,
    Vintage,
    Geometric,
}

impl StyleName {
    pub const ALL: [StyleName; 8] = [
        StyleName::Minimal,
        StyleName::Bright,
        StyleName::Elegant,
        StyleName::Bold,
        StyleName::Modern,
        StyleName::Neon,
        StyleName::Vintage,
        StyleName::Geometric,
    ];

    pub fn strategy(self) -> Box<dyn Style> {
        match self {
            StyleName::Minimal => Box::new(Minimal),
            StyleName::Bright => Box::new(Bright),
            StyleName::Elegant => Box::new(Elegant),
            StyleName::Bold => Box::new(Bold),
            StyleName::Modern => Box::new(Modern),
            StyleName::Neon => Box::new(Neon),
            StyleName::Vintage => Box::new(Vintage),
            StyleName::Geometric => Box::new(Geometric),
        }
    }
}

impl fmt::Display for StyleName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            StyleName::Minimal => "minimal",
            StyleName::Bright => "bright",
            StyleName::Elegant => "elegant",
            StyleName::Bold => "bold",
            StyleName::Modern => "modern",
            StyleName::Neon => "neon",
            StyleName::Vintage => "vintage",
            StyleName::Geometric => "geometric",
        };
        write!(f, "{name}")
    }
}

impl FromStr for StyleName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "minimal" => Ok(StyleName::Minimal),
            "bright" => Ok(StyleName::Bright),
            "elegant" => Ok(StyleName::Elegant),
            "bold" => Ok(StyleName::Bold),
            "modern" => Ok(StyleName::Modern),
            "neon" => Ok(StyleName::Neon),
            "vintage" => Ok(StyleName::Vintage),
            "geometric" => Ok(StyleName::Geometric),
            other => Err(Error::unknown_style(other)),
        }
    }
}

/// Colors the text layer should use over a painted background.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    pub quote: Color,
    pub author: Color,
    pub accent: Color,
    /// Offset shadow behind each glyph run, when the style wants one.
    pub shadow: Option<Color>,
    /// Translucent plate behind each quote line, for busy backgrounds.
    pub plate: Option<Color>,
}

impl Palette {
    /// Palette used when text sits on a raster photo instead of a painted
    /// style background.
    pub fn over_image() -> Self {
        Palette {
            quote: Color::WHITE,
            author: Color::rgb(0xf0, 0xf0, 0xf0),
            accent: Color::WHITE,
            shadow: Some(crate::text::font::TEXT_SHADOW),
            plate: None,
        }
    }
}

pub trait Style: Send + Sync {
    fn name(&self) -> StyleName;

    /// Paints the full `w`×`h` background and returns the text palette.
    fn paint(&self, cr: &cairo::Context, w: f64, h: f64, rng: &mut Rng) -> Result<Palette>;

    /// Whether the quote face should prefer its bold variant.
    fn bold_quote(&self) -> bool {
        false
    }

    /// Attribution line for this style.
    fn author_line(&self, author: &str) -> String {
        format!("— {author}")
    }
}

pub(crate) fn fill_solid(cr: &cairo::Context, w: f64, h: f64, color: Color) -> Result<()> {
    color.set_source(cr);
    cr.rectangle(0.0, 0.0, w, h);
    cr.fill().map_err(Error::cairo)
}

pub(crate) fn vertical_gradient(
    cr: &cairo::Context,
    w: f64,
    h: f64,
    top: Color,
    bottom: Color,
) -> Result<()> {
    let gradient = cairo::LinearGradient::new(0.0, 0.0, 0.0, h);
    let (r, g, b, a) = top.channels();
    gradient.add_color_stop_rgba(0.0, r, g, b, a);
    let (r, g, b, a) = bottom.channels();
    gradient.add_color_stop_rgba(1.0, r, g, b, a);
    cr.set_source(&gradient).map_err(Error::cairo)?;
    cr.rectangle(0.0, 0.0, w, h);
    cr.fill().map_err(Error::cairo)
}
