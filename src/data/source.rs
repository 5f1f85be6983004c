//! Contains implementations for different record sources.

#[cfg(feature = "csv")]
mod csv;

#[cfg(feature = "csv")]
pub use crate::data::source::csv::{CsvSource, CsvSourceConfig};
use crate::data::predicate::Predicate;
use crate::data::record::Row;
use crate::error::Result;

pub trait RecordSource: Send {
    fn read(
        &mut self,
        filter: Option<Predicate>,
    ) -> Result<Box<dyn Iterator<Item = Result<Row>> + '_>>;
}
