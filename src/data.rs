//! Controls how quote records are read from and written back to a data source.

pub mod predicate;
pub mod record;
pub mod sink;
pub mod source;

pub use predicate::Predicate;
pub use record::{QuoteRecord, Row, Status};
#[cfg(feature = "csv")]
pub use sink::CsvStatusSink;
pub use sink::{StatusSink, StatusUpdate};
#[cfg(feature = "csv")]
pub use source::{CsvSource, CsvSourceConfig};
pub use source::RecordSource;
