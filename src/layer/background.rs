//! Background stage: paints the style background or a raster photo.

use crate::canvas;
use crate::color::Color;
use crate::error::Result;
use crate::layer::{Layer, RenderContext};
use crate::style::Palette;

use std::path::{Path, PathBuf};

/// Scrim drawn over raster backgrounds so light text stays readable.
const SCRIM: Color = Color::rgba(0x00, 0x00, 0x00, 60);

#[derive(Debug, Clone, Default)]
pub enum BackgroundMode {
    /// Procedural background painted by the card style.
    #[default]
    Style,
    /// A random raster picked from a directory. Selection is independent per
    /// card; repeats across a batch are expected.
    Directory(PathBuf),
    /// A fixed raster file, e.g. one fetched by an external generator.
    File(PathBuf),
}

pub struct BackgroundLayer {
    pub mode: BackgroundMode,
}

impl Layer for BackgroundLayer {
    fn render(&self, ctx: &mut RenderContext, cr: &cairo::Context) -> Result<()> {
        let path = match &self.mode {
            BackgroundMode::Style => None,
            BackgroundMode::File(path) => Some(path.clone()),
            BackgroundMode::Directory(dir) => pick_file(dir, &mut ctx.rng),
        };

        if let Some(path) = path {
            if let Ok(surface) = canvas::load_surface(&path) {
                canvas::draw_cover(cr, &surface, ctx.width, ctx.height)?;
                SCRIM.set_source(cr);
                cr.rectangle(0.0, 0.0, ctx.width, ctx.height);
                cr.fill().map_err(crate::error::Error::cairo)?;
                ctx.palette = Some(Palette::over_image());
                return Ok(());
            }
        }

        // No raster, or an unreadable one: the style paints its own.
        let palette = ctx
            .style
            .paint(cr, ctx.width, ctx.height, &mut ctx.rng)?;
        ctx.palette = Some(palette);
        Ok(())
    }
}

const RASTER_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "webp"];

pub(crate) fn pick_file(dir: &Path, rng: &mut crate::rng::Rng) -> Option<PathBuf> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
        .ok()?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .map(|e| RASTER_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
                .unwrap_or(false)
        })
        .collect();
    if files.is_empty() {
        return None;
    }
    // Stable order before the pick, read_dir order is not deterministic.
    files.sort();
    Some(files.swap_remove(rng.below(files.len())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::QuoteRecord;
    use crate::rng::Rng;
    use crate::style::StyleName;
    use crate::text::FontMap;

    fn context<'a>(
        record: &'a QuoteRecord,
        fonts: &'a FontMap,
        style: &'a dyn crate::style::Style,
    ) -> RenderContext<'a> {
        RenderContext {
            record,
            fonts,
            style,
            rng: Rng::new(1),
            width: 64.0,
            height: 64.0,
            palette: None,
        }
    }

    #[test]
    fn missing_directory_falls_back_to_style() {
        let surface = cairo::ImageSurface::create(cairo::Format::ARgb32, 64, 64).unwrap();
        let cr = cairo::Context::new(&surface).unwrap();
        let record = QuoteRecord::default();
        let fonts = FontMap::default();
        let style = StyleName::Minimal.strategy();
        let mut ctx = context(&record, &fonts, style.as_ref());

        let layer = BackgroundLayer {
            mode: BackgroundMode::Directory(PathBuf::from("no/such/dir")),
        };
        layer.render(&mut ctx, &cr).unwrap();
        let palette = ctx.palette.unwrap();
        // Style fallback, not the photo overlay palette.
        assert_ne!(palette, Palette::over_image());
    }

    #[test]
    fn unreadable_file_falls_back_to_style() {
        let surface = cairo::ImageSurface::create(cairo::Format::ARgb32, 64, 64).unwrap();
        let cr = cairo::Context::new(&surface).unwrap();
        let record = QuoteRecord::default();
        let fonts = FontMap::default();
        let style = StyleName::Bold.strategy();
        let mut ctx = context(&record, &fonts, style.as_ref());

        let layer = BackgroundLayer {
            mode: BackgroundMode::File(PathBuf::from("no/such/background.png")),
        };
        layer.render(&mut ctx, &cr).unwrap();
        assert!(ctx.palette.is_some());
    }
}
