use crate::color::Color;
use crate::error::Result;
use crate::rng::Rng;
use crate::style::{vertical_gradient, Palette, Style, StyleName};

const GRADIENTS: [(Color, Color); 4] = [
    (Color::rgb(0xff, 0x6b, 0x6b), Color::rgb(0x4e, 0xcd, 0xc4)),
    (Color::rgb(0xa8, 0xe6, 0xcf), Color::rgb(0xff, 0xd3, 0xb6)),
    (Color::rgb(0xff, 0x8b, 0x94), Color::rgb(0xff, 0xaa, 0xa5)),
    (Color::rgb(0xff, 0xa0, 0x7a), Color::rgb(0xff, 0xd7, 0x00)),
];

/// Vibrant two-stop vertical gradient with white text.
pub struct Bright;

impl Style for Bright {
    fn name(&self) -> StyleName {
        StyleName::Bright
    }

    fn paint(&self, cr: &cairo::Context, w: f64, h: f64, rng: &mut Rng) -> Result<Palette> {
        let (top, bottom) = *rng.pick(&GRADIENTS);
        vertical_gradient(cr, w, h, top, bottom)?;
        Ok(Palette {
            quote: Color::WHITE,
            author: Color::rgb(0xf0, 0xf0, 0xf0),
            accent: top,
            shadow: None,
            plate: None,
        })
    }
}
