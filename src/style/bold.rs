use crate::color::Color;
use crate::error::Result;
use crate::rng::Rng;
use crate::style::{fill_solid, Palette, Style, StyleName};

const BLOCKS: [Color; 5] = [
    Color::rgb(0xff, 0x47, 0x57),
    Color::rgb(0x37, 0x42, 0xfa),
    Color::rgb(0x2e, 0xd5, 0x73),
    Color::rgb(0xff, 0xa5, 0x02),
    Color::rgb(0x5f, 0x27, 0xcd),
];

/// One saturated solid block, white text punched on top.
pub struct Bold;

impl Style for Bold {
    fn name(&self) -> StyleName {
        StyleName::Bold
    }

    fn paint(&self, cr: &cairo::Context, w: f64, h: f64, rng: &mut Rng) -> Result<Palette> {
        let block = *rng.pick(&BLOCKS);
        fill_solid(cr, w, h, block)?;
        Ok(Palette {
            quote: Color::WHITE,
            author: Color::rgb(0xf0, 0xf0, 0xf0),
            accent: block,
            shadow: None,
            plate: None,
        })
    }

    fn bold_quote(&self) -> bool {
        true
    }
}
