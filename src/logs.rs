//! Terminal progress display for batch runs.
//!
//! On a tty, each worker gets a live status row above an overall progress
//! bar, repainted in place with termion cursor control. When stderr is not a
//! tty (CI, pipes) the display degrades to plain line-per-event logging.

use std::io::{stderr, Error as IoError, Stderr, Write};
use std::num::NonZero;
use std::time::Instant;

#[derive(Debug, Clone)]
pub enum LogEvent {
    /// One card finished on the given worker (0 = only the overall count).
    Count(usize),
    /// Total number of queued cards, once the source is exhausted.
    Total(usize),
    Info(usize, String),
    Warn(usize, String),
    Status(usize, String),
    Error(usize, String),
    Done(usize, String),
}

#[derive(Debug, Clone)]
enum WorkerStatus {
    Running(String),
    Failed(String),
    Done(String),
}

impl Default for WorkerStatus {
    fn default() -> Self {
        Self::Running(String::new())
    }
}

pub struct ProgressBar<T: Write> {
    n_workers: usize,
    tty: T,
    fancy: bool,
    status: Vec<WorkerStatus>,
    counts: Vec<usize>,
    total: usize,
    frame: usize,
    time: Instant,
}

impl ProgressBar<Stderr> {
    pub fn new_stderr(n_workers: NonZero<usize>) -> Result<Self, IoError> {
        let out = stderr();
        let fancy = termion::is_tty(&out);
        Self::new(n_workers, out, fancy)
    }
}

const SPINNER: [char; 4] = ['|', '/', '-', '\\'];
const BAR_WIDTH: usize = 20;
const FRAME_DURATION: f64 = 0.1;

impl<T: Write> ProgressBar<T> {
    pub fn new(n_workers: NonZero<usize>, tty: T, fancy: bool) -> Result<Self, IoError> {
        let n_workers = n_workers.get();
        let mut pbar = Self {
            n_workers,
            tty,
            fancy,
            status: vec![WorkerStatus::default(); n_workers + 1],
            counts: vec![0; n_workers + 1],
            total: 0,
            frame: 0,
            time: Instant::now(),
        };
        if pbar.fancy {
            // Reserve one row per worker plus the overall bar.
            for _ in 0..=n_workers {
                writeln!(pbar.tty)?;
            }
            pbar.show()?;
        }
        Ok(pbar)
    }

    pub fn log(&mut self, event: LogEvent) -> Result<(), IoError> {
        if !self.fancy {
            return self.log_plain(event);
        }
        match event {
            LogEvent::Info(id, msg) => self.log_line(id, "INFO", msg, termion::color::LightBlack)?,
            LogEvent::Warn(id, msg) => self.log_line(id, "WARN", msg, termion::color::LightYellow)?,
            LogEvent::Status(id, msg) => self.status[id] = WorkerStatus::Running(msg),
            LogEvent::Error(id, msg) => self.status[id] = WorkerStatus::Failed(msg),
            LogEvent::Done(id, msg) => self.status[id] = WorkerStatus::Done(msg),
            LogEvent::Count(id) => {
                self.counts[0] += 1;
                if id > 0 {
                    self.counts[id] += 1;
                }
            }
            LogEvent::Total(n) => self.total = n,
        }
        self.show()
    }

    fn log_plain(&mut self, event: LogEvent) -> Result<(), IoError> {
        match event {
            LogEvent::Info(_, msg) => writeln!(self.tty, "[INFO] {msg}"),
            LogEvent::Warn(_, msg) => writeln!(self.tty, "[WARN] {msg}"),
            LogEvent::Error(id, msg) => writeln!(self.tty, "[FAIL] worker {id}: {msg}"),
            LogEvent::Count(_) => {
                self.counts[0] += 1;
                Ok(())
            }
            LogEvent::Total(n) => {
                self.total = n;
                Ok(())
            }
            LogEvent::Done(0, _) => {
                if self.total > 0 {
                    writeln!(self.tty, "rendered {}/{} cards", self.counts[0], self.total)
                } else {
                    writeln!(self.tty, "rendered {} cards", self.counts[0])
                }
            }
            LogEvent::Status(..) | LogEvent::Done(..) => Ok(()),
        }
    }

    /// Scrolls one message line in above the live region.
    fn log_line(
        &mut self,
        id: usize,
        label: &'static str,
        msg: String,
        color: impl termion::color::Color,
    ) -> Result<(), IoError> {
        let (_w, h) = termion::terminal_size()?;
        let y = h - self.n_workers as u16 - 2;
        let goto = termion::cursor::Goto(1, y);
        let up = termion::scroll::Up(1);
        let dim = termion::color::Fg(termion::color::LightBlack);
        let color = termion::color::Fg(color);
        let reset = termion::style::Reset;
        let clear = termion::clear::UntilNewline;
        let id = if id > 0 {
            format!("{id:02}")
        } else {
            String::from("  ")
        };
        write!(self.tty, "{up}{goto}{dim}{id} {color}[{label}] {reset}{msg}{clear}")
    }

    /// Advances the spinner frame; call from the display loop while idle.
    pub fn update(&mut self) -> Result<(), IoError> {
        if !self.fancy {
            return Ok(());
        }
        let now = Instant::now();
        if now.duration_since(self.time).as_secs_f64() >= FRAME_DURATION {
            self.time = now;
            self.frame = self.frame.wrapping_add(1);
            self.show()?;
        }
        Ok(())
    }

    fn show(&mut self) -> Result<(), IoError> {
        let (w, h) = termion::terminal_size()?;
        let y = h - self.n_workers as u16 - 1;
        write!(self.tty, "{}", termion::cursor::Goto(1, y))?;
        for id in 1..=self.n_workers {
            self.show_worker(w, id)?;
        }
        self.show_overall(w)?;
        self.tty.flush()
    }

    fn show_worker(&mut self, w: u16, id: usize) -> Result<(), IoError> {
        let (badge, color, msg) = match &self.status[id] {
            WorkerStatus::Running(msg) => (
                SPINNER[(self.frame + id) % SPINNER.len()].to_string(),
                termion::color::Blue.fg_str(),
                msg,
            ),
            WorkerStatus::Failed(msg) => ("!".to_string(), termion::color::LightRed.fg_str(), msg),
            WorkerStatus::Done(msg) => ("✓".to_string(), termion::color::LightGreen.fg_str(), msg),
        };
        let dim = termion::color::Fg(termion::color::LightBlack);
        let msg = ellipsize(msg, w, 12);
        let reset = termion::style::Reset;
        let clear = termion::clear::UntilNewline;
        let n = self.counts[id];
        writeln!(self.tty, "{dim}{id:02} {color}[{badge} {n:3}] {reset}{msg}{clear}")
    }

    fn show_overall(&mut self, w: u16) -> Result<(), IoError> {
        let n = self.counts[0];
        let total = self.total;
        let (bar, color, msg) = match &self.status[0] {
            WorkerStatus::Running(msg) => {
                let filled = if total > 0 {
                    (n as f64 / total as f64 * BAR_WIDTH as f64).round() as usize
                } else {
                    self.frame % (BAR_WIDTH + 1)
                };
                let bar = format!(
                    "{}{}",
                    "#".repeat(filled.min(BAR_WIDTH)),
                    "-".repeat(BAR_WIDTH.saturating_sub(filled))
                );
                (bar, termion::color::LightBlue.fg_str(), msg)
            }
            WorkerStatus::Failed(msg) => (
                "!".repeat(BAR_WIDTH),
                termion::color::LightRed.fg_str(),
                msg,
            ),
            WorkerStatus::Done(msg) => (
                "=".repeat(BAR_WIDTH),
                termion::color::LightGreen.fg_str(),
                msg,
            ),
        };
        let msg = ellipsize(msg, w, BAR_WIDTH as u16 + 12);
        let reset = termion::style::Reset;
        let clear = termion::clear::UntilNewline;
        if total > 0 {
            writeln!(self.tty, "{color}[{bar} {n:3}/{total:3}] {reset}{msg}{clear}")
        } else {
            writeln!(self.tty, "{color}[{bar} {n:3}] {reset}{msg}{clear}")
        }
    }
}

fn ellipsize(s: &str, width: u16, used: u16) -> String {
    let room = width.saturating_sub(used) as usize;
    if s.chars().count() > room {
        let kept: String = s.chars().take(room.saturating_sub(3)).collect();
        format!("{kept}...")
    } else {
        s.to_string()
    }
}
