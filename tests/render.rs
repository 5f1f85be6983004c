//! End-to-end rendering tests over the public API.

use quotecard::canvas::Canvas;
use quotecard::data::{
    CsvSource, CsvSourceConfig, CsvStatusSink, QuoteRecord, RecordSource, Status, StatusSink,
    StatusUpdate,
};
use quotecard::output::{CardSize, OutputMap};
use quotecard::pipeline::{render, Pipeline, RenderOptions, RenderRequest, WatermarkOptions};
use quotecard::layer::{BackgroundMode, WatermarkMode};
use quotecard::style::StyleName;
use quotecard::text::{FontMap, PangoMeasurer, TextMeasurer};

use std::num::NonZero;
use std::path::PathBuf;

fn temp_dir(name: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    dir.push(format!("quotecard-it-{}-{}", std::process::id(), name));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn request(quote: &str, style: StyleName, size: (i32, i32), seed: u64) -> RenderRequest {
    RenderRequest {
        record: QuoteRecord {
            quote: quote.into(),
            author: "Marcus Aurelius".into(),
            category: "Stoicism".into(),
            ..Default::default()
        },
        row: 2,
        options: RenderOptions {
            style: Some(style),
            size: CardSize {
                width: size.0,
                height: size.1,
            },
            seed,
            ..Default::default()
        },
    }
}

/// Writes a small solid-red PNG and returns its path.
fn red_mark(dir: &PathBuf) -> PathBuf {
    let mut canvas = Canvas::new(40, 40).unwrap();
    canvas.cr().set_source_rgb(1.0, 0.0, 0.0);
    canvas.cr().paint().unwrap();
    let path = dir.join("mark.png");
    std::fs::write(&path, canvas.encode_png().unwrap()).unwrap();
    path
}

fn decode(artifact: &[u8]) -> image::RgbaImage {
    image::load_from_memory(artifact).unwrap().to_rgba8()
}

/// Whether Fontconfig resolves any usable face; text pixel assertions are
/// skipped on hosts without fonts.
fn glyphs_resolve() -> bool {
    let fonts = FontMap::default();
    let measurer = PangoMeasurer::new(fonts.get("quote").description(20.0));
    measurer.line_width("MM", 20.0) > 0.0
}

fn count_red(img: &image::RgbaImage) -> usize {
    img.pixels()
        .filter(|p| p.0[0] > 200 && p.0[1] < 150 && p.0[2] < 150)
        .count()
}

#[test]
fn renders_a_full_card() {
    let fonts = FontMap::default();
    let req = request(
        "The happiness of your life depends upon the quality of your thoughts.",
        StyleName::Minimal,
        (1080, 1080),
        0,
    );
    let artifact = render(&req, &fonts).unwrap();
    let img = decode(&artifact.bytes);
    assert_eq!((img.width(), img.height()), (1080, 1080));
    // Minimal keeps the corners white.
    assert_eq!(img.get_pixel(0, 0).0, [255, 255, 255, 255]);
    // The composited quote leaves dark text pixels on the canvas.
    if glyphs_resolve() {
        let dark = img.pixels().filter(|p| p.0[0] < 128).count();
        assert!(dark > 0);
    }
}

#[test]
fn font_floor_from_options_changes_the_layout() {
    if !glyphs_resolve() {
        return;
    }
    let fonts = FontMap::default();
    let quote = "What stands in the way becomes the way, every single time.";
    let mut low = request(quote, StyleName::Minimal, (300, 300), 2);
    low.options.min_font_size = 12.0;
    let mut high = low.clone();
    high.options.min_font_size = 60.0;
    let a = render(&low, &fonts).unwrap();
    let b = render(&high, &fonts).unwrap();
    assert_ne!(a.bytes, b.bytes);
}

#[test]
fn every_style_matches_requested_dimensions() {
    let fonts = FontMap::default();
    for style in StyleName::ALL {
        let artifact = render(&request("Know thyself.", style, (320, 240), 9), &fonts).unwrap();
        let img = decode(&artifact.bytes);
        assert_eq!((img.width(), img.height()), (320, 240), "{style}");
    }
}

#[test]
fn same_seed_renders_identical_bytes() {
    let fonts = FontMap::default();
    for style in [StyleName::Bright, StyleName::Geometric, StyleName::Vintage] {
        let a = render(&request("Fortune favors the bold.", style, (256, 256), 7), &fonts).unwrap();
        let b = render(&request("Fortune favors the bold.", style, (256, 256), 7), &fonts).unwrap();
        assert_eq!(a.bytes, b.bytes, "{style}");
    }
}

#[test]
fn corner_watermark_covers_less_than_stripe() {
    let dir = temp_dir("wm");
    let mark = red_mark(&dir);
    let fonts = FontMap::default();

    let mut corner = request("Less is more.", StyleName::Minimal, (200, 200), 1);
    corner.options.watermark = Some(WatermarkOptions {
        path: Some(mark.clone()),
        ..Default::default()
    });
    let mut stripe = corner.clone();
    stripe.options.watermark = Some(WatermarkOptions {
        path: Some(mark),
        mode: WatermarkMode::Stripe,
        ..Default::default()
    });

    let corner_red = count_red(&decode(&render(&corner, &fonts).unwrap().bytes));
    let stripe_red = count_red(&decode(&render(&stripe, &fonts).unwrap().bytes));
    assert!(corner_red > 0);
    assert!(stripe_red > corner_red);

    // Corner mode is a single badge: bounded by its scaled footprint.
    let target = 200.0 * 0.15_f64;
    let max_area = (target.max(32.0) + 2.0).powi(2) as usize;
    assert!(corner_red <= max_area);
    std::fs::remove_dir_all(dir).ok();
}

#[test]
fn avatar_is_clipped_to_a_circle() {
    let dir = temp_dir("avatar");
    let portrait = red_mark(&dir);
    let fonts = FontMap::default();

    let mut req = request("Know the self.", StyleName::Minimal, (200, 200), 1);
    req.options.avatar = Some(portrait);
    let img = decode(&render(&req, &fonts).unwrap().bytes);

    // Disc diameter is 0.14 * 200 = 28 px at pad 36: center lands at (50, 50).
    let center = img.get_pixel(50, 50).0;
    assert!(center[0] > 200 && center[1] < 150, "{center:?}");
    // The bounding-box corner is outside the circle: ring or background.
    let corner = img.get_pixel(38, 38).0;
    assert!(!(corner[0] > 200 && corner[1] < 150), "{corner:?}");
    std::fs::remove_dir_all(dir).ok();
}

#[test]
fn missing_overlays_and_background_degrade_gracefully() {
    let fonts = FontMap::default();
    let mut req = request("Persistence.", StyleName::Bold, (160, 160), 4);
    req.options.background = BackgroundMode::Directory(PathBuf::from("no/such/backgrounds"));
    req.options.avatar = Some(PathBuf::from("no/such/avatar.png"));
    req.options.watermark = Some(WatermarkOptions {
        path: Some(PathBuf::from("no/such/mark.png")),
        ..Default::default()
    });
    assert!(render(&req, &fonts).is_ok());
}

#[test]
fn batch_renders_pending_rows_and_writes_back() {
    let dir = temp_dir("batch");
    let csv_path = dir.join("quotes.csv");
    std::fs::write(
        &csv_path,
        "QUOTE,AUTHOR,CATEGORY,STATUS\n\
         An unexamined life is not worth living.,Socrates,Philosophy,\n\
         Already rendered once.,Nobody,Misc,done\n",
    )
    .unwrap();
    let out_dir = dir.join("out");

    let source: Box<dyn RecordSource> =
        Box::new(CsvSource::open(CsvSourceConfig::default(), &csv_path).unwrap());
    let sink: Option<Box<dyn StatusSink>> =
        Some(Box::new(CsvStatusSink::open(&csv_path, ',').unwrap()));
    let options = RenderOptions {
        style: Some(StyleName::Minimal),
        size: CardSize {
            width: 128,
            height: 128,
        },
        ..Default::default()
    };
    let pipeline = Pipeline::new(
        NonZero::new(1).unwrap(),
        source,
        sink,
        FontMap::default(),
        OutputMap::new(out_dir.clone()),
        options,
        false,
    );
    pipeline.run(None).unwrap();

    // Only the pending row got rendered.
    let rendered: Vec<_> = std::fs::read_dir(&out_dir).unwrap().collect();
    assert_eq!(rendered.len(), 1);

    let content = std::fs::read_to_string(&csv_path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert!(lines[0].ends_with("STATUS,DIMENSIONS,GENERATED_AT,LINK"));
    assert!(lines[1].contains("done,128x128,"));
    assert!(lines[2].starts_with("Already rendered once."));
    std::fs::remove_dir_all(dir).ok();
}

#[test]
fn write_back_does_not_disturb_an_open_reader() {
    let dir = temp_dir("interleave");
    let csv_path = dir.join("quotes.csv");
    // Well past the reader's internal buffer, so rows are still being
    // streamed from disk when the first write-back lands.
    let mut content = String::from("QUOTE,AUTHOR,CATEGORY,STATUS\n");
    for i in 0..600 {
        content.push_str(&format!(
            "A perfectly ordinary filler quote number {i} with some length to it.,Author {i},Misc,\n"
        ));
    }
    std::fs::write(&csv_path, &content).unwrap();

    let mut source = CsvSource::open(CsvSourceConfig::default(), &csv_path).unwrap();
    let mut sink = CsvStatusSink::open(&csv_path, ',').unwrap();
    let mut rows = source.read(None).unwrap();
    assert_eq!(rows.next().unwrap().unwrap().index, 2);

    sink.apply(
        2,
        &StatusUpdate {
            status: Status::Done,
            dimensions: (64, 64),
            generated_at: "2026-08-24 12:00:00".into(),
            link: "out/first.png".into(),
        },
    )
    .unwrap();

    // The open reader finishes on the data it was opened on, undisturbed.
    let rest: Vec<_> = rows.map(|r| r.unwrap()).collect();
    assert_eq!(rest.len(), 599);
    for (i, row) in rest.iter().enumerate() {
        assert_eq!(row.record.author, format!("Author {}", i + 1));
    }

    // A fresh read sees the update.
    let content = std::fs::read_to_string(&csv_path).unwrap();
    assert!(content.lines().nth(1).unwrap().contains("done,64x64,"));
    std::fs::remove_dir_all(dir).ok();
}
