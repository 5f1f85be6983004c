//! Implements abstract layers that compose one card onto a cairo canvas.
//!
//! The four stages run in order on the same surface: background, text,
//! avatar, watermark. The background stage decides the text palette (painted
//! style or photo overlay) and records it in the [`RenderContext`] for the
//! stages after it.

mod avatar;
mod background;
mod text;
mod watermark;

pub use avatar::AvatarLayer;
pub use background::{BackgroundLayer, BackgroundMode};
pub use text::TextLayer;
pub use watermark::{WatermarkLayer, WatermarkMode};

use crate::data::QuoteRecord;
use crate::error::Result;
use crate::rng::Rng;
use crate::style::{Palette, Style};
use crate::text::FontMap;

pub struct RenderContext<'a> {
    pub record: &'a QuoteRecord,
    pub fonts: &'a FontMap,
    pub style: &'a dyn Style,
    pub rng: Rng,
    pub width: f64,
    pub height: f64,
    /// Set by the background stage, read by the text stage.
    pub palette: Option<Palette>,
}

pub trait Layer {
    fn render(&self, ctx: &mut RenderContext, cr: &cairo::Context) -> Result<()>;
}

pub struct LayerStack<'a>(pub Vec<Box<dyn Layer + 'a>>);

impl<'a> LayerStack<'a> {
    pub fn render(self, ctx: &mut RenderContext, cr: &cairo::Context) -> Result<()> {
        let LayerStack(layers) = self;
        for layer in layers {
            layer.render(ctx, cr)?;
        }
        Ok(())
    }
}
