//! Template definitions.
//!
//! A template is a `quotecard.toml` file, either in
//! `~/.config/quotecard/<name>/` or next to the data. Every table and field
//! has a default, so running without any template at all is fine.

use crate::data::source::CsvSourceConfig;
use crate::error::{Error, Result};
use crate::layer::WatermarkMode;
use crate::output::CardSize;
use crate::style::StyleName;
use crate::text::FontConfig;

use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Template {
    #[serde(default)]
    pub card: CardConfig,
    #[serde(default)]
    pub fonts: HashMap<String, FontConfig>,
    #[serde(default)]
    pub background: BackgroundConfig,
    #[serde(default)]
    pub watermark: Option<WatermarkConfig>,
    #[serde(default)]
    pub avatar: Option<AvatarConfig>,
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CardConfig {
    #[serde(default)]
    pub size: CardSize,
    pub style: Option<StyleName>,
    #[serde(default = "default_margin")]
    pub margin: f64,
    #[serde(default = "default_min_font_size")]
    pub min_font_size: f64,
}

fn default_margin() -> f64 {
    110.0
}

fn default_min_font_size() -> f64 {
    24.0
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            size: CardSize::default(),
            style: None,
            margin: default_margin(),
            min_font_size: default_min_font_size(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BackgroundConfig {
    /// Directory of raster backgrounds; set, it switches the card to photo
    /// backgrounds picked at random per card.
    pub custom_dir: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct WatermarkConfig {
    pub file: Option<PathBuf>,
    pub dir: Option<PathBuf>,
    #[serde(default)]
    pub mode: WatermarkMode,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    #[serde(default = "default_size_percent")]
    pub size_percent: f64,
}

fn default_opacity() -> f64 {
    0.7
}

fn default_size_percent() -> f64 {
    0.15
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AvatarConfig {
    pub file: PathBuf,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SourceConfig {
    #[serde(default)]
    pub csv: CsvSourceConfig,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("generated")
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
        }
    }
}

impl Template {
    /// Looks a named template up in the user config folder.
    pub fn find(name: impl AsRef<str>) -> Result<Self> {
        let mut path = Self::config_folder()?;
        path.push(name.as_ref());
        path.push("quotecard.toml");
        Self::open(&path)
    }

    /// Loads `./quotecard.toml` when present, defaults otherwise.
    pub fn local() -> Result<Self> {
        let path = Path::new("quotecard.toml");
        if path.is_file() {
            Self::open(&path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn open(path: &impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| Error::config_open(path, e))?;
        toml::from_str(&content).map_err(|e| Error::config_deser(path, e))
    }

    #[cfg(target_os = "windows")]
    fn config_folder() -> Result<PathBuf> {
        let home = std::env::var("APPDATA").map_err(|_| Error::no_env_variable("APPDATA"))?;
        let mut home = PathBuf::from(home);
        home.push("quotecard");
        Ok(home)
    }

    #[cfg(not(target_os = "windows"))]
    fn config_folder() -> Result<PathBuf> {
        let home = std::env::var("HOME").map_err(|_| Error::no_env_variable("HOME"))?;
        let mut home = PathBuf::from(home);
        home.push(".config");
        home.push("quotecard");
        Ok(home)
    }
}
