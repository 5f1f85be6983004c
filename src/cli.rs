//! CLI implementation.

use crate::data::{CsvSource, CsvStatusSink, Predicate, RecordSource, StatusSink};
use crate::error::Result;
use crate::layer::{BackgroundMode, WatermarkMode};
use crate::output::{CardSize, OutputMap};
use crate::pipeline::{Pipeline, RenderOptions, WatermarkOptions};
use crate::style::StyleName;
use crate::template::Template;
use crate::text::FontMap;

use clap::Parser;
use std::num::NonZero;
use std::path::PathBuf;

/// Render quote card images in bulk from spreadsheet rows
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[cfg(not(target_os = "windows"))]
    /// Template name, corresponding to a folder in ~/.config/quotecard,
    /// or ./quotecard.toml if omitted.
    pub template: Option<String>,

    #[cfg(target_os = "windows")]
    /// Template name, corresponding to a folder in %APPDATA%/quotecard,
    /// or ./quotecard.toml if omitted.
    pub template: Option<String>,

    /// Input CSV path
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output images path
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Card style; a random style per card if omitted
    #[arg(short, long, value_enum)]
    pub style: Option<StyleName>,

    /// Optionally filters input data, e.g. `category=Wisdom,status!=done`
    #[arg(short, long)]
    pub filter: Option<String>,

    /// Render every row, including ones already marked done or skip
    #[arg(long)]
    pub all: bool,

    /// Watermark image file
    #[arg(long)]
    pub watermark: Option<PathBuf>,

    /// Watermark placement
    #[arg(long, value_enum)]
    pub watermark_mode: Option<WatermarkMode>,

    /// Watermark opacity, 0.0 to 1.0
    #[arg(long)]
    pub watermark_opacity: Option<f64>,

    /// Watermark size as a fraction of the short canvas edge
    #[arg(long)]
    pub watermark_size: Option<f64>,

    /// Circular author avatar image file
    #[arg(long)]
    pub avatar: Option<PathBuf>,

    /// Fixed background image file; overrides the template's directory
    #[arg(long)]
    pub background_file: Option<PathBuf>,

    /// Directory of background images to pick from at random
    #[arg(long, conflicts_with = "background_file")]
    pub background_dir: Option<PathBuf>,

    /// Card dimensions as WxH
    #[arg(long)]
    pub size: Option<CardSize>,

    /// Base seed for all random choices
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Number of worker threads
    #[arg(short, long, default_value_t = NonZero::new(4).unwrap())]
    pub workers: NonZero<usize>,

    /// Do not write status columns back into the source CSV
    #[arg(long)]
    pub no_write_back: bool,
}

macro_rules! error {
    ($res:expr) => {
        $res.unwrap_or_else(|e| panic!("{e}"))
    };
}

impl Cli {
    pub fn run() {
        std::panic::set_hook(Box::new(|panic_info| {
            if let Some(s) = panic_info.payload().downcast_ref::<String>() {
                eprintln!("{s}");
            } else {
                eprintln!("{panic_info}");
            }
        }));

        let cli = Self::parse();
        let template = error!(cli.find_template());
        let fonts = error!(FontMap::load(&template.fonts, &PathBuf::from(".")));

        let source: Box<dyn RecordSource> =
            Box::new(error!(CsvSource::open(template.source.csv, &cli.input)));
        let sink: Option<Box<dyn StatusSink>> = if cli.no_write_back {
            None
        } else {
            Some(Box::new(error!(CsvStatusSink::open(
                &cli.input,
                template.source.csv.delimiter
            ))))
        };

        let out_dir = cli
            .output
            .clone()
            .unwrap_or_else(|| template.output.dir.clone());
        let options = cli.render_options(&template);
        let filter = cli
            .filter
            .as_ref()
            .map(|f| error!(Predicate::from_string(f)));

        let pipeline = Pipeline::new(
            cli.workers,
            source,
            sink,
            fonts,
            OutputMap::new(out_dir),
            options,
            cli.all,
        );
        error!(pipeline.run(filter));
    }

    fn find_template(&self) -> Result<Template> {
        match &self.template {
            Some(name) => Template::find(name),
            None => Template::local(),
        }
    }

    /// Merges template settings with flag overrides; flags win.
    fn render_options(&self, template: &Template) -> RenderOptions {
        let dir = self
            .background_dir
            .as_ref()
            .or(template.background.custom_dir.as_ref());
        let background = match (&self.background_file, dir) {
            (Some(file), _) => BackgroundMode::File(file.clone()),
            (None, Some(dir)) => BackgroundMode::Directory(dir.clone()),
            (None, None) => BackgroundMode::Style,
        };

        let watermark = match (&self.watermark, &template.watermark) {
            (None, None) => None,
            (path, config) => {
                let mut options = WatermarkOptions {
                    path: path.clone(),
                    ..Default::default()
                };
                if let Some(config) = config {
                    options.dir = config.dir.clone();
                    if options.path.is_none() {
                        options.path = config.file.clone();
                    }
                    options.mode = config.mode;
                    options.opacity = config.opacity;
                    options.size_percent = config.size_percent;
                }
                if let Some(mode) = self.watermark_mode {
                    options.mode = mode;
                }
                if let Some(opacity) = self.watermark_opacity {
                    options.opacity = opacity;
                }
                if let Some(size) = self.watermark_size {
                    options.size_percent = size;
                }
                Some(options)
            }
        };

        RenderOptions {
            style: self.style.or(template.card.style),
            background,
            watermark,
            avatar: self
                .avatar
                .clone()
                .or_else(|| template.avatar.as_ref().map(|a| a.file.clone())),
            size: self.size.unwrap_or(template.card.size),
            seed: self.seed,
            margin: template.card.margin,
            min_font_size: template.card.min_font_size,
        }
    }
}
