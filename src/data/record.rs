//! Contains representations for quote record data.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::str::FromStr;

/// One row of the data source.
///
/// Field aliases accept the uppercase headers commonly used by exported
/// spreadsheets (`QUOTE`, `AUTHOR`, ...).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuoteRecord {
    #[serde(alias = "QUOTE", alias = "Quote")]
    pub quote: String,
    #[serde(default = "unknown_author", alias = "AUTHOR", alias = "Author")]
    pub author: String,
    #[serde(default, alias = "CATEGORY", alias = "Category")]
    pub category: String,
    #[serde(default, alias = "STATUS", alias = "Status")]
    pub status: Status,
}

fn unknown_author() -> String {
    String::from("Unknown")
}

impl QuoteRecord {
    pub fn field(&self, name: &str) -> Option<String> {
        match name {
            "quote" => Some(self.quote.clone()),
            "author" => Some(self.author.clone()),
            "category" => Some(self.category.clone()),
            "status" => Some(self.status.to_string()),
            _ => None,
        }
    }
}

/// A record together with its position in the source.
///
/// Row numbers start at 2: row 1 is the header line, matching how
/// spreadsheets number their rows.
#[derive(Debug, Clone)]
pub struct Row {
    pub index: usize,
    pub record: QuoteRecord,
}

/// Processing state of a record, stored in the source itself.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum Status {
    #[default]
    Pending,
    Done,
    Skip,
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "pending" => Ok(Self::Pending),
            // Older sheets mark finished rows as `generated`.
            "done" | "generated" => Ok(Self::Done),
            "skip" => Ok(Self::Skip),
            other => Err(format!("unknown status `{other}`")),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Done => write!(f, "done"),
            Self::Skip => write!(f, "skip"),
        }
    }
}

struct StatusVisitor;

impl<'de> Visitor<'de> for StatusVisitor {
    type Value = Status;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("one of `pending`, `done`, `skip`")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        // Unknown markers in the sheet shouldn't kill the whole run; treat
        // them as pending so the row gets rendered.
        Ok(v.parse::<Status>().unwrap_or_default())
    }
}

impl<'de> Deserialize<'de> for Status {
    fn deserialize<D>(deserializer: D) -> Result<Status, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_str(StatusVisitor)
    }
}
