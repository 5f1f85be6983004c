//! Single-card rendering and the multi-worker batch pipeline.

use crate::canvas::Canvas;
use crate::data::{Predicate, QuoteRecord, RecordSource, Row, Status, StatusSink, StatusUpdate};
use crate::error::{Error, Result};
use crate::layer::{
    AvatarLayer, BackgroundLayer, BackgroundMode, LayerStack, RenderContext, TextLayer,
    WatermarkLayer, WatermarkMode,
};
use crate::logs::{LogEvent, ProgressBar};
use crate::output::{CardSize, OutputMap};
use crate::rng::Rng;
use crate::style::StyleName;
use crate::text::FontMap;

use chrono::Local;
use std::collections::VecDeque;
use std::num::NonZero;
use std::path::PathBuf;
use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Watermark settings carried by a render request.
#[derive(Debug, Clone)]
pub struct WatermarkOptions {
    pub path: Option<PathBuf>,
    pub dir: Option<PathBuf>,
    pub mode: WatermarkMode,
    pub opacity: f64,
    pub size_percent: f64,
}

impl Default for WatermarkOptions {
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

/// Everything one render needs besides the record itself.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Fixed style; `None` picks one per card through the seeded RNG.
    pub style: Option<StyleName>,
    pub background: BackgroundMode,
    pub watermark: Option<WatermarkOptions>,
    pub avatar: Option<PathBuf>,
    pub size: CardSize,
    pub seed: u64,
    /// Horizontal margin on each side of the quote block.
    pub margin: f64,
    /// Floor below which the quote size never shrinks.
    pub min_font_size: f64,
}

impl Default for RenderOptions {
    fn default() -> Self {
        let text = TextLayer::default();
        Self {
            style: None,
            background: BackgroundMode::default(),
            watermark: None,
            avatar: None,
            size: CardSize::default(),
            seed: 0,
            margin: text.margin,
            min_font_size: text.min_size,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RenderRequest {
    pub record: QuoteRecord,
    /// Source row the record came from; also salts the per-card seed.
    pub row: usize,
    pub options: RenderOptions,
}

/// An encoded card ready for a sink.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub bytes: Vec<u8>,
    pub width: i32,
    pub height: i32,
    pub generated_at: String,
}

/// Renders one card synchronously.
///
/// The per-card seed is the base seed XORed with the row number, so batch
/// output does not depend on completion order.
pub fn render(request: &RenderRequest, fonts: &FontMap) -> Result<Artifact> {
    if request.record.quote.trim().is_empty() {
        return Err(Error::empty_quote(request.row));
    }
    let opts = &request.options;
    let mut rng = Rng::new(opts.seed ^ request.row as u64);
    let style = opts
        .style
        .unwrap_or_else(|| *rng.pick(&StyleName::ALL))
        .strategy();

    let (width, height) = (opts.size.width, opts.size.height);
    let mut canvas = Canvas::new(width, height)?;
    let mut ctx = RenderContext {
        record: &request.record,
        fonts,
        style: style.as_ref(),
        rng,
        width: width as f64,
        height: height as f64,
        palette: None,
    };

    let mut layers: Vec<Box<dyn crate::layer::Layer>> = vec![
        Box::new(BackgroundLayer {
            mode: opts.background.clone(),
        }),
        Box::new(TextLayer {
            margin: opts.margin,
            min_size: opts.min_font_size,
            ..TextLayer::default()
        }),
        Box::new(AvatarLayer {
            path: opts.avatar.clone(),
        }),
    ];
    if let Some(wm) = &opts.watermark {
        layers.push(Box::new(WatermarkLayer {
            path: wm.path.clone(),
            dir: wm.dir.clone(),
            mode: wm.mode,
            opacity: wm.opacity,
            size_percent: wm.size_percent,
        }));
    }
    LayerStack(layers).render(&mut ctx, canvas.cr())?;

    Ok(Artifact {
        bytes: canvas.encode_png()?,
        width,
        height,
        generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
    })
}

macro_rules! send {
    ($Variant:ident(from $id:expr) to $tx:expr) => {
        $tx.send(LogEvent::$Variant($id)).map_err(|e| Error::send($id, e))
    };
    ($Variant:ident(from $id:expr, $v:expr) to $tx:expr) => {
        $tx.send(LogEvent::$Variant($id, $v)).map_err(|e| Error::send($id, e))
    };
    ($Variant:ident($v:expr) to $tx:expr) => {
        $tx.send(LogEvent::$Variant($v)).map_err(|e| Error::send(0, e))
    };
}

macro_rules! lock {
    ($T:literal $lock:expr) => {
        $lock.lock().map_err(|e| Error::mutex_lock($T, e))?
    };
}

/// Batch renderer: reads records, fans them out to worker threads, writes
/// artifacts and status updates, reports progress on stderr.
pub struct Pipeline {
    n_workers: usize,
    source: Box<dyn RecordSource>,
    sink: Option<Box<dyn StatusSink>>,
    fonts: FontMap,
    out: OutputMap,
    options: RenderOptions,
    /// Render rows whose status is already `done` or `skip`.
    include_all: bool,
}

impl Pipeline {
    pub fn new(
        n_workers: NonZero<usize>,
        source: Box<dyn RecordSource>,
        sink: Option<Box<dyn StatusSink>>,
        fonts: FontMap,
        out: OutputMap,
        options: RenderOptions,
        include_all: bool,
    ) -> Self {
        let available = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        Self {
            n_workers: n_workers.get().clamp(1, available),
            source,
            sink,
            fonts,
            out,
            options,
            include_all,
        }
    }

    pub fn run(mut self, filter: Option<Predicate>) -> Result<()> {
        let n_workers = self.n_workers;
        let queue = Arc::new(RecordQueue::new(n_workers * 2));
        let fonts = Arc::new(self.fonts);
        let out = Arc::new(self.out);
        let sink = Arc::new(Mutex::new(self.sink));
        let (tx, rx) = mpsc::channel();

        let handles: Vec<JoinHandle<Result<()>>> = (1..=n_workers)
            .map(|id| {
                let worker = Worker {
                    id,
                    tx: tx.clone(),
                    queue: queue.clone(),
                    fonts: fonts.clone(),
                    out: out.clone(),
                    sink: sink.clone(),
                    options: self.options.clone(),
                };
                thread::spawn(move || worker.run())
            })
            .collect();

        let display = thread::spawn(move || -> std::io::Result<()> {
            let workers = NonZero::new(n_workers).unwrap_or(NonZero::<usize>::MIN);
            let mut pbar = ProgressBar::new_stderr(workers)?;
            loop {
                match rx.recv_timeout(Duration::from_millis(50)) {
                    Ok(event) => pbar.log(event)?,
                    Err(mpsc::RecvTimeoutError::Timeout) => pbar.update()?,
                    Err(mpsc::RecvTimeoutError::Disconnected) => return Ok(()),
                }
            }
        });

        let mut total: usize = 0;
        for row in self.source.read(filter)? {
            match row {
                Ok(row) => {
                    if !self.include_all && row.record.status != Status::Pending {
                        continue;
                    }
                    total += 1;
                    queue.push(row)?;
                }
                Err(e) => send!(Warn(from 0, e.to_string()) to tx)?,
            }
        }
        queue.close()?;
        send!(Total(total) to tx)?;

        for (i, handle) in handles.into_iter().enumerate() {
            let result = handle.join().map_err(|_| Error::thread_join(i + 1))?;
            if let Err(e) = result {
                send!(Error(from i + 1, e.to_string()) to tx)?;
            }
        }
        send!(Done(from 0, String::from("done!")) to tx)?;
        drop(tx);
        display.join().map_err(|_| Error::thread_join(0))?.ok();
        Ok(())
    }
}

/// Bounded handoff queue between the reader and the workers.
struct RecordQueue {
    queue: Mutex<(VecDeque<Row>, bool)>,
    capacity: usize,
    cond: Condvar,
}

impl RecordQueue {
    fn new(capacity: usize) -> Self {
        Self {
            queue: Mutex::new((VecDeque::with_capacity(capacity), false)),
            capacity,
            cond: Condvar::new(),
        }
    }

    fn push(&self, row: Row) -> Result<()> {
        let queue = lock!("RecordQueue" self.queue);
        let mut queue = self
            .cond
            .wait_while(queue, |(q, _)| q.len() >= self.capacity)
            .map_err(|e| Error::mutex_lock("RecordQueue", e))?;
        queue.0.push_back(row);
        self.cond.notify_one();
        Ok(())
    }

    fn pop(&self) -> Result<Option<Row>> {
        let queue = lock!("RecordQueue" self.queue);
        let mut queue = self
            .cond
            .wait_while(queue, |(q, closed)| q.is_empty() && !*closed)
            .map_err(|e| Error::mutex_lock("RecordQueue", e))?;
        let row = queue.0.pop_front();
        self.cond.notify_all();
        Ok(row)
    }

    fn close(&self) -> Result<()> {
        let mut queue = lock!("RecordQueue" self.queue);
        queue.1 = true;
        self.cond.notify_all();
        Ok(())
    }
}

struct Worker {
    id: usize,
    tx: Sender<LogEvent>,
    queue: Arc<RecordQueue>,
    fonts: Arc<FontMap>,
    out: Arc<OutputMap>,
    sink: Arc<Mutex<Option<Box<dyn StatusSink>>>>,
    options: RenderOptions,
}

impl Worker {
    fn run(self) -> Result<()> {
        while let Some(row) = self.queue.pop()? {
            send!(Status(from self.id, format!("rendering row {}...", row.index)) to self.tx)?;
            match self.process(row) {
                Ok(()) => send!(Count(from self.id) to self.tx)?,
                Err(e) => send!(Warn(from self.id, e.to_string()) to self.tx)?,
            }
        }
        send!(Done(from self.id, String::from("done!")) to self.tx)?;
        Ok(())
    }

    fn process(&self, row: Row) -> Result<()> {
        let path = self.out.path(&row.record);
        let request = RenderRequest {
            record: row.record,
            row: row.index,
            options: self.options.clone(),
        };
        let artifact = render(&request, &self.fonts)?;
        self.out.write(&artifact, &path)?;

        let mut sink = lock!("StatusSink" self.sink);
        if let Some(sink) = sink.as_mut() {
            sink.apply(
                row.index,
                &StatusUpdate {
                    status: Status::Done,
                    dimensions: (artifact.width, artifact.height),
                    generated_at: artifact.generated_at.clone(),
                    link: path.display().to_string(),
                },
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(quote: &str, seed: u64) -> RenderRequest {
        RenderRequest {
            record: QuoteRecord {
                quote: quote.into(),
                author: "Anonymous".into(),
                ..Default::default()
            },
            row: 2,
            options: RenderOptions {
                style: Some(StyleName::Minimal),
                size: CardSize {
                    width: 200,
                    height: 200,
                },
                seed,
                ..Default::default()
            },
        }
    }

    #[test]
    fn empty_quote_aborts_the_render() {
        let fonts = FontMap::default();
        let err = render(&request("   ", 1), &fonts).unwrap_err();
        assert!(matches!(err, Error::EmptyQuote(2)));
    }

    #[test]
    fn artifact_has_requested_dimensions() {
        let fonts = FontMap::default();
        let artifact = render(&request("A short quote.", 1), &fonts).unwrap();
        assert_eq!((artifact.width, artifact.height), (200, 200));
        assert_eq!(&artifact.bytes[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn missing_watermark_is_skipped() {
        let fonts = FontMap::default();
        let mut req = request("Resilience.", 3);
        req.options.watermark = Some(WatermarkOptions {
            path: Some(PathBuf::from("no/such/mark.png")),
            ..Default::default()
        });
        assert!(render(&req, &fonts).is_ok());
    }
}
