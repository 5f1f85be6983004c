//! # quotecard
//!
//! A library to render styled quote card images from spreadsheet-like data
//! sources, in bulk, with watermark and avatar overlays.

pub mod canvas;
#[cfg(feature = "cli")]
pub mod cli;
pub mod color;
pub mod data;
mod error;
pub mod layer;
pub mod logs;
pub mod output;
pub mod pipeline;
pub mod rng;
pub mod style;
#[cfg(feature = "cli")]
pub mod template;
pub mod text;

pub use error::{Error, Result};
