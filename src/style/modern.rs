use crate::color::Color;
use crate::error::{Error, Result};
use crate::rng::Rng;
use crate::style::{fill_solid, Palette, Style, StyleName};

const ACCENTS: [Color; 5] = [
    Color::rgb(0x00, 0xd2, 0xff),
    Color::rgb(0xff, 0x6b, 0x9d),
    Color::rgb(0xc4, 0x71, 0xed),
    Color::rgb(0x12, 0xcb, 0xc4),
    Color::rgb(0xfd, 0xa7, 0xdf),
];

/// Light gray canvas with a single accent disc bleeding off the top-left.
pub struct Modern;

impl Style for Modern {
    fn name(&self) -> StyleName {
        StyleName::Modern
    }

    fn paint(&self, cr: &cairo::Context, w: f64, h: f64, rng: &mut Rng) -> Result<Palette> {
        fill_solid(cr, w, h, Color::rgb(0xf5, 0xf5, 0xf5))?;

        let accent = *rng.pick(&ACCENTS);
        accent.set_source(cr);
        cr.arc(100.0, 100.0, 200.0, 0.0, std::f64::consts::TAU);
        cr.fill().map_err(Error::cairo)?;

        Ok(Palette {
            quote: Color::rgb(0x2c, 0x3e, 0x50),
            author: Color::rgb(0x7f, 0x8c, 0x8d),
            accent,
            shadow: None,
            plate: None,
        })
    }
}
