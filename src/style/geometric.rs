use crate::color::Color;
use crate::error::{Error, Result};
use crate::rng::Rng;
use crate::style::{fill_solid, Palette, Style, StyleName};

const SHAPE_COLORS: [Color; 5] = [
    Color::rgb(0x00, 0xd2, 0xff),
    Color::rgb(0xff, 0x6b, 0x9d),
    Color::rgb(0xc4, 0x71, 0xed),
    Color::rgb(0xff, 0xd7, 0x00),
    Color::rgb(0x00, 0xff, 0x88),
];

const SHAPE_COUNT: usize = 8;
const SHAPE_ALPHA: f64 = 30.0 / 255.0;

/// Off-white canvas scattered with translucent circles, squares and
/// triangles; quote lines get a light plate for contrast.
pub struct Geometric;

impl Style for Geometric {
    fn name(&self) -> StyleName {
        StyleName::Geometric
    }

    fn paint(&self, cr: &cairo::Context, w: f64, h: f64, rng: &mut Rng) -> Result<Palette> {
        fill_solid(cr, w, h, Color::rgb(0xfa, 0xfa, 0xfa))?;

        for _ in 0..SHAPE_COUNT {
            let color = rng.pick(&SHAPE_COLORS).with_alpha(SHAPE_ALPHA);
            let kind = rng.below(3);
            let x = rng.range(0.0, w);
            let y = rng.range(0.0, h);
            let size = rng.range(100.0, 300.0);
            color.set_source(cr);
            match kind {
                0 => {
                    let r = size / 2.0;
                    cr.arc(x + r, y + r, r, 0.0, std::f64::consts::TAU);
                }
                1 => cr.rectangle(x, y, size, size),
                _ => {
                    cr.move_to(x, y + size);
                    cr.line_to(x + size / 2.0, y);
                    cr.line_to(x + size, y + size);
                    cr.close_path();
                }
            }
            cr.fill().map_err(Error::cairo)?;
        }

        Ok(Palette {
            quote: Color::rgb(0x2c, 0x3e, 0x50),
            author: Color::rgb(0x7f, 0x8c, 0x8d),
            accent: SHAPE_COLORS[0],
            shadow: None,
            plate: Some(Color::rgba(0xff, 0xff, 0xff, 200)),
        })
    }

    fn bold_quote(&self) -> bool {
        true
    }
}
