//! Text stage: wraps the quote, centers the block, draws the author line.

use crate::error::{Error, Result};
use crate::layer::{Layer, RenderContext};
use crate::style::Palette;
use crate::text::{fit_block, LayoutOptions, PangoMeasurer, TextBlock, TextMeasurer};

use pangocairo::functions as pc;

/// Offset of the drop shadow, when the palette carries one.
const SHADOW_OFFSET: f64 = 2.0;
/// Horizontal and vertical bleed of the per-line plate.
const PLATE_PAD: (f64, f64) = (20.0, 10.0);

pub struct TextLayer {
    /// Horizontal margin on each side of the quote block.
    pub margin: f64,
    /// Smallest size the quote may shrink to before truncation.
    pub min_size: f64,
    /// Gap between the quote block and the author line.
    pub gap: f64,
}

impl Default for TextLayer {
    fn default() -> Self {
        Self {
            margin: 110.0,
            min_size: 24.0,
            gap: 44.0,
        }
    }
}

impl Layer for TextLayer {
    fn render(&self, ctx: &mut RenderContext, cr: &cairo::Context) -> Result<()> {
        let palette = ctx.palette.clone().unwrap_or_else(Palette::over_image);
        let quote_face = ctx.fonts.get("quote");
        let author_face = ctx.fonts.get("author");

        let mut quote_desc = quote_face.description(quote_face.size);
        if ctx.style.bold_quote() {
            quote_desc.set_weight(pango::Weight::Bold);
        }
        let measurer = PangoMeasurer::new(quote_desc.clone());
        let author_measurer = PangoMeasurer::new(author_face.description(author_face.size));

        let author_text = ctx.style.author_line(&ctx.record.author);
        let author_height = author_measurer.line_height(author_face.size);

        let opts = LayoutOptions {
            max_width: ctx.width - 2.0 * self.margin,
            max_height: ctx.height * 0.6 - self.gap - author_height,
            starting_size: quote_face.size,
            min_size: self.min_size,
            line_spacing: 1.25,
        };
        let block = fit_block(&ctx.record.quote, &measurer, &opts);
        if block.is_empty() {
            return Ok(());
        }

        let total = block.height() + self.gap + author_height;
        let top = (ctx.height - total) / 2.0;

        let layout = pc::create_layout(cr);
        draw_block(ctx, cr, &layout, &measurer, &palette, &block, &quote_desc, top)?;

        layout.set_font_description(Some(&author_face.description(author_face.size)));
        let width = author_measurer.line_width(&author_text, author_face.size);
        let x = (ctx.width - width) / 2.0;
        let y = top + block.height() + self.gap;
        if let Some(shadow) = palette.shadow {
            fill_line(cr, &layout, x + SHADOW_OFFSET, y + SHADOW_OFFSET, &author_text, shadow)?;
        }
        fill_line(cr, &layout, x, y, &author_text, palette.author)?;
        Ok(())
    }
}

#[allow(clippy::too_many_arguments)]
fn draw_block(
    ctx: &RenderContext,
    cr: &cairo::Context,
    layout: &pango::Layout,
    measurer: &PangoMeasurer,
    palette: &Palette,
    block: &TextBlock,
    desc: &pango::FontDescription,
    top: f64,
) -> Result<()> {
    let mut desc = desc.clone();
    desc.set_absolute_size(block.size * pango::SCALE as f64);
    layout.set_font_description(Some(&desc));

    let mut y = top;
    for line in &block.lines {
        let width = measurer.line_width(line, block.size);
        let x = (ctx.width - width) / 2.0;

        if let Some(plate) = palette.plate {
            plate.set_source(cr);
            cr.rectangle(
                x - PLATE_PAD.0,
                y - PLATE_PAD.1,
                width + 2.0 * PLATE_PAD.0,
                block.advance + PLATE_PAD.1,
            );
            cr.fill().map_err(Error::cairo)?;
        }
        if let Some(shadow) = palette.shadow {
            fill_line(cr, layout, x + SHADOW_OFFSET, y + SHADOW_OFFSET, line, shadow)?;
        }
        fill_line(cr, layout, x, y, line, palette.quote)?;

        y += block.advance;
    }
    Ok(())
}

/// Draws one line's glyph outlines at `(x, y)` filled with `color`.
fn fill_line(
    cr: &cairo::Context,
    layout: &pango::Layout,
    x: f64,
    y: f64,
    text: &str,
    color: crate::color::Color,
) -> Result<()> {
    layout.set_text(text);
    cr.move_to(x, y);
    pc::layout_path(cr, layout);
    color.set_source(cr);
    cr.fill().map_err(Error::cairo)
}
