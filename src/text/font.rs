//! Management of font files and configuration.
//!
//! Faces are resolved once, up front, into plain family strings so the
//! resulting [`FontMap`] is freely shareable across worker threads; the
//! Fontconfig handle itself never leaves the loading phase.

use crate::color::Color;
use crate::error::Result;

use fontconfig::{Fontconfig, Pattern};
use fontconfig_sys::fontconfig as sys;
use serde::Deserialize;
use std::collections::HashMap;
use std::ffi::CString;
use std::path::{Path, PathBuf};

pub const FALLBACK_FAMILY: &str = "Sans";

/// Default pixel sizes for the two named faces.
const DEFAULT_QUOTE_SIZE: f64 = 52.0;
const DEFAULT_AUTHOR_SIZE: f64 = 30.0;

/// A named face in the template's `[fonts]` table. Either `path` points at a
/// font file shipped with the template, or `name` (+ optional `style`) is
/// resolved through Fontconfig.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct FontConfig {
    pub path: Option<PathBuf>,
    pub name: Option<String>,
    pub style: Option<String>,
    pub size: Option<f64>,
}

/// A resolved face: a Pango-parsable description plus its base size.
#[derive(Debug, Clone)]
pub struct FontFace {
    spec: String,
    pub size: f64,
}

impl FontFace {
    pub fn new(spec: impl Into<String>, size: f64) -> Self {
        Self {
            spec: spec.into(),
            size,
        }
    }

    /// Builds a description at an explicit pixel size.
    pub fn description(&self, size: f64) -> pango::FontDescription {
        let mut desc = pango::FontDescription::from_string(&self.spec);
        desc.set_absolute_size(size * pango::SCALE as f64);
        desc
    }
}

#[derive(Debug, Clone)]
pub struct FontMap {
    faces: HashMap<String, FontFace>,
}

impl Default for FontMap {
    fn default() -> Self {
        let mut faces = HashMap::new();
        faces.insert(
            "quote".to_string(),
            FontFace::new(format!("{FALLBACK_FAMILY} Bold"), DEFAULT_QUOTE_SIZE),
        );
        faces.insert(
            "author".to_string(),
            FontFace::new(FALLBACK_FAMILY, DEFAULT_AUTHOR_SIZE),
        );
        Self { faces }
    }
}

impl FontMap {
    /// Resolves every configured face, falling back to [`FALLBACK_FAMILY`]
    /// when a file or family cannot be loaded. Font trouble must never fail a
    /// render.
    pub fn load(configs: &HashMap<String, FontConfig>, base: &Path) -> Result<Self> {
        let mut map = Self::default();
        let fc = Fontconfig::new();
        for (key, cfg) in configs {
            let default_size = map
                .faces
                .get(key)
                .map(|f| f.size)
                .unwrap_or(DEFAULT_QUOTE_SIZE);
            let size = cfg.size.unwrap_or(default_size);
            let spec = match (&cfg.path, &cfg.name, &fc) {
                (Some(fp), _, Some(fc)) => {
                    let mut path = base.to_path_buf();
                    path.push(fp);
                    register_font_file(fc, &path).unwrap_or_else(|| FALLBACK_FAMILY.to_string())
                }
                (None, Some(name), Some(fc)) => {
                    let family = resolve_family(fc, name, cfg.style.as_deref())
                        .unwrap_or_else(|| name.clone());
                    match &cfg.style {
                        Some(style) => format!("{family} {style}"),
                        None => family,
                    }
                }
                // No usable Fontconfig: trust the configured name, or fall
                // back outright.
                (_, Some(name), None) => name.clone(),
                _ => FALLBACK_FAMILY.to_string(),
            };
            map.faces.insert(key.clone(), FontFace::new(spec, size));
        }
        Ok(map)
    }

    pub fn get(&self, key: &str) -> &FontFace {
        self.faces
            .get(key)
            .unwrap_or_else(|| &self.faces["quote"])
    }
}

/// Confirms a family exists and returns the matched family name.
fn resolve_family(fc: &Fontconfig, family: &str, style: Option<&str>) -> Option<String> {
    fc.find(family, style).map(|font| font.name)
}

/// Registers a font file with the application's Fontconfig configuration and
/// returns the family name scanned from the file.
fn register_font_file(fc: &Fontconfig, path: &Path) -> Option<String> {
    let c_fp = CString::new(path.to_string_lossy().as_bytes()).ok()?;
    let family = scan_family(fc, &c_fp)?;

    let status = unsafe {
        sys::FcConfigAppFontAddFile(std::ptr::null_mut(), c_fp.as_ptr() as *const sys::FcChar8)
    };
    (status != 0).then_some(family)
}

fn scan_family(fc: &Fontconfig, c_fp: &CString) -> Option<String> {
    unsafe {
        let set = sys::FcFontSetCreate();
        let status = sys::FcFileScan(
            set,
            std::ptr::null_mut(),
            std::ptr::null_mut(),
            std::ptr::null_mut(),
            c_fp.as_ptr() as *const sys::FcChar8,
            1,
        );
        let result = if status == 0 || (*set).nfont < 1 {
            None
        } else {
            let pat = Pattern::from_pattern(fc, *(*set).fonts);
            pat.name().map(str::to_string)
        };
        sys::FcFontSetDestroy(set);
        result
    }
}

/// Shadow used when drawing text over raster backgrounds.
pub const TEXT_SHADOW: Color = Color::rgba(0x00, 0x00, 0x00, 0x80);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_map_has_quote_and_author() {
        let map = FontMap::default();
        assert_eq!(map.get("quote").size, DEFAULT_QUOTE_SIZE);
        assert_eq!(map.get("author").size, DEFAULT_AUTHOR_SIZE);
        // Unknown keys fall back to the quote face.
        assert_eq!(map.get("caption").size, DEFAULT_QUOTE_SIZE);
    }

    #[test]
    fn description_carries_absolute_size() {
        let face = FontFace::new("Sans Bold", 40.0);
        let desc = face.description(40.0);
        assert!(desc.is_size_absolute());
        assert_eq!(desc.size(), 40 * pango::SCALE);
    }

    #[test]
    fn missing_file_falls_back() {
        let mut configs = HashMap::new();
        configs.insert(
            "quote".to_string(),
            FontConfig {
                path: Some(PathBuf::from("no/such/font.ttf")),
                name: None,
                style: None,
                size: Some(48.0),
            },
        );
        let map = FontMap::load(&configs, Path::new(".")).unwrap();
        assert_eq!(map.get("quote").size, 48.0);
    }
}
