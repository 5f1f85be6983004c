use crate::color::Color;
use crate::error::{Error, Result};
use crate::rng::Rng;
use crate::style::{vertical_gradient, Palette, Style, StyleName};

const ACCENTS: [Color; 4] = [
    Color::rgb(0x00, 0xd2, 0xff),
    Color::rgb(0xff, 0x6b, 0x9d),
    Color::rgb(0xc4, 0x71, 0xed),
    Color::rgb(0x12, 0xcb, 0xc4),
];

const NIGHT: Color = Color::rgb(0x07, 0x08, 0x16);

/// Near-black gradient with two glowing accent rings in the corner.
pub struct Neon;

impl Style for Neon {
    fn name(&self) -> StyleName {
        StyleName::Neon
    }

    fn paint(&self, cr: &cairo::Context, w: f64, h: f64, rng: &mut Rng) -> Result<Palette> {
        let a1 = *rng.pick(&ACCENTS);
        let mut a2 = *rng.pick(&ACCENTS);
        while a2 == a1 {
            a2 = *rng.pick(&ACCENTS);
        }

        // Accents at a tenth of their brightness read as a dark glow.
        let dim = |c: Color| NIGHT.lerp(&c, 0.1);
        vertical_gradient(cr, w, h, dim(a1), dim(a2))?;

        // Ring geometry is proportional to the short edge; the constants
        // are tuned on a 1080px canvas.
        let s = w.min(h) / 1080.0;
        ring(cr, 180.0 * s, 340.0 * s, a1, 10.0 * s)?;
        ring(cr, 180.0 * s, 390.0 * s, a2, 6.0 * s)?;

        Ok(Palette {
            quote: Color::rgb(0xf8, 0xfa, 0xff),
            author: Color::rgb(0xdd, 0xe6, 0xff),
            accent: a1,
            shadow: Some(a1.with_alpha(0.55)),
            plate: None,
        })
    }

    fn bold_quote(&self) -> bool {
        true
    }
}

/// Strokes concentric circles with fading alpha to fake a blurred glow.
fn ring(cr: &cairo::Context, cx: f64, radius: f64, color: Color, width: f64) -> Result<()> {
    for (spread, alpha) in [(width * 2.0, 0.12), (width * 1.4, 0.25), (width, 0.8)] {
        color.with_alpha(alpha).set_source(cr);
        cr.set_line_width(spread);
        cr.arc(cx, cx, radius, 0.0, std::f64::consts::TAU);
        cr.stroke().map_err(Error::cairo)?;
    }
    Ok(())
}
