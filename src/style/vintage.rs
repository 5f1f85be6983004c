use crate::color::Color;
use crate::error::{Error, Result};
use crate::rng::Rng;
use crate::style::{fill_solid, Palette, Style, StyleName};

const PAPERS: [Color; 4] = [
    Color::rgb(0xf4, 0xe8, 0xc1),
    Color::rgb(0xe8, 0xdc, 0xc3),
    Color::rgb(0xf5, 0xe6, 0xd3),
    Color::rgb(0xff, 0xf8, 0xdc),
];

const RULE: Color = Color::rgb(0x8b, 0x73, 0x55);
const INSET: f64 = 20.0;
const CORNER: f64 = 60.0;
const SPECKLES: usize = 2000;

/// Aged paper with speckle grain and ruled corner brackets.
pub struct Vintage;

impl Style for Vintage {
    fn name(&self) -> StyleName {
        StyleName::Vintage
    }

    fn paint(&self, cr: &cairo::Context, w: f64, h: f64, rng: &mut Rng) -> Result<Palette> {
        fill_solid(cr, w, h, *rng.pick(&PAPERS))?;

        // Grain: single translucent pixels, darker or lighter than the paper.
        for _ in 0..SPECKLES {
            let x = rng.range(0.0, w).floor();
            let y = rng.range(0.0, h).floor();
            let tone = if rng.below(2) == 0 {
                Color::BLACK
            } else {
                Color::WHITE
            };
            tone.with_alpha(rng.range(0.0, 0.08)).set_source(cr);
            cr.rectangle(x, y, 1.0, 1.0);
            cr.fill().map_err(Error::cairo)?;
        }

        RULE.set_source(cr);
        cr.set_line_width(3.0);
        for (x, y, dx, dy) in [
            (INSET, INSET, 1.0, 1.0),
            (w - INSET, INSET, -1.0, 1.0),
            (INSET, h - INSET, 1.0, -1.0),
            (w - INSET, h - INSET, -1.0, -1.0),
        ] {
            cr.move_to(x + dx * (CORNER - INSET), y);
            cr.line_to(x, y);
            cr.line_to(x, y + dy * (CORNER - INSET));
        }
        cr.stroke().map_err(Error::cairo)?;

        Ok(Palette {
            quote: Color::rgb(0x3e, 0x27, 0x23),
            author: Color::rgb(0x5d, 0x40, 0x37),
            accent: RULE,
            shadow: None,
            plate: None,
        })
    }

    fn author_line(&self, author: &str) -> String {
        format!("~ {author} ~")
    }
}
