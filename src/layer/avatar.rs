//! Avatar stage: circular author portrait in the top-left corner.

use crate::canvas;
use crate::color::Color;
use crate::error::{Error, Result};
use crate::layer::{Layer, RenderContext};

use std::path::PathBuf;

const PAD: f64 = 36.0;
const SIZE_PERCENT: f64 = 0.14;
const OPACITY: f64 = 0.95;
const RING: Color = Color::rgba(0xff, 0xff, 0xff, 200);
const RING_WIDTH: f64 = 4.0;

#[derive(Debug, Clone, Default)]
pub struct AvatarLayer {
    pub path: Option<PathBuf>,
}

impl Layer for AvatarLayer {
    fn render(&self, ctx: &mut RenderContext, cr: &cairo::Context) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let Ok(portrait) = canvas::load_surface(path) else {
            return Ok(());
        };
        let (iw, ih) = (portrait.width() as f64, portrait.height() as f64);
        if iw <= 0.0 || ih <= 0.0 {
            return Ok(());
        }

        let diameter = ctx.width.min(ctx.height) * SIZE_PERCENT;
        let radius = diameter / 2.0;
        let (cx, cy) = (PAD + radius, PAD + radius);

        // Center-crop to a square, then clip the square to a circle.
        let scale = diameter / iw.min(ih);
        let x = cx - (iw * scale) / 2.0;
        let y = cy - (ih * scale) / 2.0;

        cr.save().map_err(Error::cairo)?;
        cr.arc(cx, cy, radius, 0.0, std::f64::consts::TAU);
        cr.clip();
        canvas::draw_overlay(cr, &portrait, x, y, scale, OPACITY)?;
        cr.restore().map_err(Error::cairo)?;

        RING.set_source(cr);
        cr.set_line_width(RING_WIDTH);
        cr.arc(cx, cy, radius + RING_WIDTH / 2.0, 0.0, std::f64::consts::TAU);
        cr.stroke().map_err(Error::cairo)
    }
}
