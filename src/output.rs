//! Maps rendered artifacts to files on disk.
//!
//! Filenames follow the sheet convention:
//! `<category> - <quote-fragment> - <author> - <DD-MM-YYYY_HHMM>.png`, each
//! part stripped of punctuation and whitespace-collapsed to hyphens.

use crate::data::QuoteRecord;
use crate::error::{Error, Result};
use crate::pipeline::Artifact;

use chrono::Local;
use regex::Regex;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

pub struct OutputMap {
    pub dir: PathBuf,
}

impl OutputMap {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Output path for one record, timestamped at call time.
    pub fn path(&self, record: &QuoteRecord) -> PathBuf {
        let category = match sanitize(&record.category, 20) {
            part if part.is_empty() => String::from("General"),
            part => part,
        };
        let quote = sanitize(&record.quote, 30);
        let author = sanitize(&record.author, 20);
        let timestamp = Local::now().format("%d-%m-%Y_%H%M");
        let mut path = self.dir.clone();
        path.push(format!("{category} - {quote} - {author} - {timestamp}.png"));
        path
    }

    pub fn write(&self, artifact: &Artifact, path: &PathBuf) -> Result<()> {
        std::fs::create_dir_all(&self.dir).map_err(|e| Error::output_write(&self.dir, e))?;
        std::fs::write(path, &artifact.bytes).map_err(|e| Error::output_write(path, e))
    }
}

/// Drops everything but word characters, spaces and hyphens, truncates to
/// `max` characters, then collapses whitespace runs into single hyphens.
fn sanitize(part: &str, max: usize) -> String {
    let stripped = Regex::new(r"[^\w\s-]")
        .unwrap()
        .replace_all(part, "")
        .trim()
        .to_string();
    let truncated: String = stripped.chars().take(max).collect();
    Regex::new(r"\s+")
        .unwrap()
        .replace_all(truncated.trim(), "-")
        .to_string()
}

/// Card dimensions parsed from a `WxH` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardSize {
    pub width: i32,
    pub height: i32,
}

impl Default for CardSize {
    fn default() -> Self {
        Self {
            width: 1080,
            height: 1080,
        }
    }
}

impl FromStr for CardSize {
    type Err = &'static str;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let re = Regex::new(r"^(\d+)\s*x\s*(\d+)$").unwrap();
        let captures = re
            .captures(s)
            .ok_or("string not in form WxH where W and H are integer numbers")?;
        let out_of_range = "card dimensions must be positive integers";
        let width: i32 = captures[1].parse().map_err(|_| out_of_range)?;
        let height: i32 = captures[2].parse().map_err(|_| out_of_range)?;
        if width <= 0 || height <= 0 {
            return Err(out_of_range);
        }
        Ok(Self { width, height })
    }
}

struct CardSizeVisitor;

impl<'de> Visitor<'de> for CardSizeVisitor {
    type Value = CardSize;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a string in the form WxH where W and H are integer numbers")
    }

    fn visit_str<E>(self, v: &str) -> std::result::Result<Self::Value, E>
    where
        E: de::Error,
    {
        v.parse::<CardSize>().map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for CardSize {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_str(CardSizeVisitor)
    }
}
