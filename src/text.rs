//! Text measurement, font management and line layout.

pub mod font;
pub mod layout;

pub use font::{FontConfig, FontFace, FontMap};
pub use layout::{fit_block, LayoutOptions, PangoMeasurer, TextBlock, TextMeasurer};
