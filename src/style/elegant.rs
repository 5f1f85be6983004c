use crate::color::Color;
use crate::error::{Error, Result};
use crate::rng::Rng;
use crate::style::{fill_solid, Palette, Style, StyleName};

const PASTELS: [Color; 5] = [
    Color::rgb(0xff, 0xf5, 0xf7),
    Color::rgb(0xf0, 0xf8, 0xff),
    Color::rgb(0xf5, 0xf5, 0xdc),
    Color::rgb(0xff, 0xf0, 0xf5),
    Color::rgb(0xf0, 0xff, 0xf0),
];

const BORDER: Color = Color::rgb(0xd4, 0xa5, 0xa5);
const MARGIN: f64 = 60.0;

/// Pastel card framed by a double rose border.
pub struct Elegant;

impl Style for Elegant {
    fn name(&self) -> StyleName {
        StyleName::Elegant
    }

    fn paint(&self, cr: &cairo::Context, w: f64, h: f64, rng: &mut Rng) -> Result<Palette> {
        fill_solid(cr, w, h, *rng.pick(&PASTELS))?;

        BORDER.set_source(cr);
        cr.set_line_width(3.0);
        cr.rectangle(MARGIN, MARGIN, w - 2.0 * MARGIN, h - 2.0 * MARGIN);
        cr.stroke().map_err(Error::cairo)?;

        let inner = MARGIN + 15.0;
        cr.set_line_width(1.0);
        cr.rectangle(inner, inner, w - 2.0 * inner, h - 2.0 * inner);
        cr.stroke().map_err(Error::cairo)?;

        Ok(Palette {
            quote: Color::rgb(0x4a, 0x4a, 0x4a),
            author: Color::rgb(0x8b, 0x7d, 0x7d),
            accent: BORDER,
            shadow: None,
            plate: None,
        })
    }

    fn author_line(&self, author: &str) -> String {
        format!("— {author} —")
    }
}
