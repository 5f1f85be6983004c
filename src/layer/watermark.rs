//! Watermark stage: one corner badge, or a rotated stripe tiling.

use crate::canvas;
use crate::error::{Error, Result};
use crate::layer::{Layer, RenderContext};

use serde::Deserialize;
use std::path::PathBuf;

const CORNER_PAD: f64 = 30.0;
const CORNER_MIN: f64 = 32.0;
const STRIPE_MIN_WIDTH: f64 = 160.0;
const STRIPE_WIDTH_PERCENT: f64 = 0.12;
const STRIPE_STEP: f64 = 1.8;
const STRIPE_ANGLE_DEG: f64 = -22.0;

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum WatermarkMode {
    /// Single instance in the bottom-right corner.
    #[default]
    Corner,
    /// Diagonal repetition across the whole canvas.
    Stripe,
}

pub struct WatermarkLayer {
    /// Explicit watermark file; wins over `dir`.
    pub path: Option<PathBuf>,
    /// Directory to pick a random watermark from.
    pub dir: Option<PathBuf>,
    pub mode: WatermarkMode,
    pub opacity: f64,
    /// Corner badge size as a fraction of the shorter canvas edge.
    pub size_percent: f64,
}

impl Default for WatermarkLayer {
    fn default() -> Self {
        Self {
            path: None,
            dir: None,
            mode: WatermarkMode::Corner,
            opacity: 0.7,
            size_percent: 0.15,
        }
    }
}

impl Layer for WatermarkLayer {
    fn render(&self, ctx: &mut RenderContext, cr: &cairo::Context) -> Result<()> {
        let path = match (&self.path, &self.dir) {
            (Some(path), _) => Some(path.clone()),
            (None, Some(dir)) => crate::layer::background::pick_file(dir, &mut ctx.rng),
            (None, None) => None,
        };
        let Some(path) = path else {
            return Ok(());
        };
        // A missing or corrupt watermark never fails the card.
        let Ok(mark) = canvas::load_surface(&path) else {
            return Ok(());
        };
        let (mw, mh) = (mark.width() as f64, mark.height() as f64);
        if mw <= 0.0 || mh <= 0.0 {
            return Ok(());
        }
        match self.mode {
            WatermarkMode::Corner => self.corner(ctx, cr, &mark, mw, mh),
            WatermarkMode::Stripe => self.stripe(ctx, cr, &mark, mw, mh),
        }
    }
}

impl WatermarkLayer {
    fn corner(
        &self,
        ctx: &RenderContext,
        cr: &cairo::Context,
        mark: &cairo::ImageSurface,
        mw: f64,
        mh: f64,
    ) -> Result<()> {
        let target = (ctx.width.min(ctx.height) * self.size_percent).max(CORNER_MIN);
        let scale = (target / mw.max(mh)).min(1.0);
        let (w, h) = (mw * scale, mh * scale);
        let x = ctx.width - w - CORNER_PAD;
        let y = ctx.height - h - CORNER_PAD;
        canvas::draw_overlay(cr, mark, x, y, scale, self.opacity)
    }

    fn stripe(
        &self,
        ctx: &RenderContext,
        cr: &cairo::Context,
        mark: &cairo::ImageSurface,
        mw: f64,
        mh: f64,
    ) -> Result<()> {
        let target = (ctx.width.min(ctx.height) * STRIPE_WIDTH_PERCENT).max(STRIPE_MIN_WIDTH);
        let scale = target / mw;
        let (w, h) = (mw * scale, mh * scale);
        let (step_x, step_y) = (w * STRIPE_STEP, h * STRIPE_STEP);

        cr.save().map_err(Error::cairo)?;
        cr.rectangle(0.0, 0.0, ctx.width, ctx.height);
        cr.clip();
        cr.translate(ctx.width / 2.0, ctx.height / 2.0);
        cr.rotate(STRIPE_ANGLE_DEG.to_radians());

        // The rotated grid must cover the whole canvas, so tile out to the
        // diagonal in both directions.
        let reach = ctx.width.hypot(ctx.height) / 2.0;
        let mut y = -reach - h;
        while y < reach + h {
            let mut x = -reach - w;
            while x < reach + w {
                canvas::draw_overlay(cr, mark, x, y, scale, self.opacity)?;
                x += step_x;
            }
            y += step_y;
        }
        cr.restore().map_err(Error::cairo)
    }
}
