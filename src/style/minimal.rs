use crate::color::Color;
use crate::error::Result;
use crate::rng::Rng;
use crate::style::{fill_solid, Palette, Style, StyleName};

/// Plain white card with dark slate text.
pub struct Minimal;

impl Style for Minimal {
    fn name(&self) -> StyleName {
        StyleName::Minimal
    }

    fn paint(&self, cr: &cairo::Context, w: f64, h: f64, _rng: &mut Rng) -> Result<Palette> {
        fill_solid(cr, w, h, Color::WHITE)?;
        Ok(Palette {
            quote: Color::rgb(0x2c, 0x3e, 0x50),
            author: Color::rgb(0x7f, 0x8c, 0x8d),
            accent: Color::rgb(0x7f, 0x8c, 0x8d),
            shadow: None,
            plate: None,
        })
    }
}
