//! Cairo drawing surface plus raster image helpers.
//!
//! All composition happens on a single ARGB32 surface owned by a [`Canvas`].
//! Raster assets (backgrounds, watermarks, avatars) are decoded with the
//! `image` crate and copied into cairo surfaces with premultiplied alpha, so
//! every blend afterwards is plain cairo compositing.

use crate::error::{Error, Result};

use cairo::{Context, Format, ImageSurface};
use std::path::Path;

pub struct Canvas {
    surface: ImageSurface,
    cr: Context,
    width: i32,
    height: i32,
}

impl Canvas {
    pub fn new(width: i32, height: i32) -> Result<Self> {
        let surface =
            ImageSurface::create(Format::ARgb32, width, height).map_err(Error::cairo)?;
        let cr = Context::new(&surface).map_err(Error::cairo)?;
        Ok(Self {
            surface,
            cr,
            width,
            height,
        })
    }

    pub fn cr(&self) -> &Context {
        &self.cr
    }

    pub fn size(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    /// Finishes drawing and encodes the surface as a PNG byte buffer.
    pub fn encode_png(&mut self) -> Result<Vec<u8>> {
        self.surface.flush();
        let mut bytes = Vec::new();
        self.surface
            .write_to_png(&mut bytes)
            .map_err(Error::cairo)?;
        Ok(bytes)
    }
}

/// Decodes a raster file into a cairo surface.
///
/// Cairo stores ARGB32 as native-endian u32 with premultiplied alpha, so the
/// decoded RGBA pixels are converted before the copy.
pub fn load_surface(path: &Path) -> Result<ImageSurface> {
    let decoded = image::open(path)
        .map_err(|e| Error::image_open(path, e))?
        .to_rgba8();
    let (iw, ih) = (decoded.width() as i32, decoded.height() as i32);
    let mut surface =
        ImageSurface::create(Format::ARgb32, iw, ih).map_err(Error::cairo)?;
    let stride = surface.stride() as usize;
    {
        let mut data = surface.data().map_err(Error::cairo)?;
        for (y, row) in decoded.rows().enumerate() {
            let line = &mut data[y * stride..y * stride + 4 * iw as usize];
            for (x, px) in row.enumerate() {
                let [r, g, b, a] = px.0;
                let premul = |c: u8| ((c as u32 * a as u32) / 255) as u32;
                let argb =
                    ((a as u32) << 24) | (premul(r) << 16) | (premul(g) << 8) | premul(b);
                line[4 * x..4 * x + 4].copy_from_slice(&argb.to_ne_bytes());
            }
        }
    }
    Ok(surface)
}

/// Paints `surface` scaled to cover the full `w`×`h` target, centered, with
/// overflow clipped. Aspect ratio is preserved.
pub fn draw_cover(cr: &Context, surface: &ImageSurface, w: f64, h: f64) -> Result<()> {
    let (iw, ih) = (surface.width() as f64, surface.height() as f64);
    if iw <= 0.0 || ih <= 0.0 {
        return Ok(());
    }
    let scale = (w / iw).max(h / ih);
    cr.save().map_err(Error::cairo)?;
    cr.rectangle(0.0, 0.0, w, h);
    cr.clip();
    cr.translate((w - iw * scale) / 2.0, (h - ih * scale) / 2.0);
    cr.scale(scale, scale);
    cr.set_source_surface(surface, 0.0, 0.0)
        .map_err(Error::cairo)?;
    cr.paint().map_err(Error::cairo)?;
    cr.restore().map_err(Error::cairo)?;
    Ok(())
}

/// Paints `surface` at `(x, y)` with a uniform scale and opacity.
pub fn draw_overlay(
    cr: &Context,
    surface: &ImageSurface,
    x: f64,
    y: f64,
    scale: f64,
    opacity: f64,
) -> Result<()> {
    cr.save().map_err(Error::cairo)?;
    cr.translate(x, y);
    cr.scale(scale, scale);
    cr.set_source_surface(surface, 0.0, 0.0)
        .map_err(Error::cairo)?;
    cr.paint_with_alpha(opacity.clamp(0.0, 1.0))
        .map_err(Error::cairo)?;
    cr.restore().map_err(Error::cairo)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;

    #[test]
    fn canvas_encodes_png_signature() {
        let mut canvas = Canvas::new(32, 16).unwrap();
        Color::rgb(0x10, 0x20, 0x30).set_source(canvas.cr());
        canvas.cr().paint().unwrap();
        let bytes = canvas.encode_png().unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn missing_image_is_an_error() {
        assert!(load_surface(Path::new("no/such/image.png")).is_err());
    }

    #[test]
    fn cover_fills_target_with_opaque_source() {
        let src = ImageSurface::create(Format::ARgb32, 10, 20).unwrap();
        let cr_src = Context::new(&src).unwrap();
        cr_src.set_source_rgb(1.0, 0.0, 0.0);
        cr_src.paint().unwrap();
        drop(cr_src);

        let mut dst = ImageSurface::create(Format::ARgb32, 40, 40).unwrap();
        let cr = Context::new(&dst).unwrap();
        draw_cover(&cr, &src, 40.0, 40.0).unwrap();
        drop(cr);
        let data = dst.data().unwrap();
        // Corner pixel must be covered: alpha channel of ARGB32 is set.
        let px = u32::from_ne_bytes([data[0], data[1], data[2], data[3]]);
        assert_eq!(px >> 24, 0xff);
    }
}
