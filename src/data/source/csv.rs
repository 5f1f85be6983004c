//! Contains implementation for CSV as quote record source.

use crate::data::predicate::Predicate;
use crate::data::record::{QuoteRecord, Row};
use crate::data::source::RecordSource;
use crate::error::{Error, Result};

use itertools::Itertools;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Copy, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct CsvSourceConfig {
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
    #[serde(default = "default_header")]
    pub header: bool,
}

fn default_delimiter() -> char {
    ','
}

fn default_header() -> bool {
    true
}

impl Default for CsvSourceConfig {
    fn default() -> Self {
        CsvSourceConfig {
            delimiter: default_delimiter(),
            header: default_header(),
        }
    }
}

pub struct CsvSource {
    reader: csv::Reader<std::fs::File>,
    first_row: usize,
}

impl CsvSource {
    pub fn open(config: CsvSourceConfig, path: &impl AsRef<Path>) -> Result<CsvSource> {
        let path = path.as_ref();
        let reader = csv::ReaderBuilder::new()
            .delimiter(config.delimiter as u8)
            .has_headers(config.header)
            .flexible(true)
            .from_path(path)
            .map_err(|e| Error::source_open(path, e))?;
        // Rows are numbered like a spreadsheet: data starts at 2 when a
        // header line is present.
        let first_row = if config.header { 2 } else { 1 };
        Ok(Self { reader, first_row })
    }
}

impl RecordSource for CsvSource {
    fn read(
        &mut self,
        filter: Option<Predicate>,
    ) -> Result<Box<dyn Iterator<Item = Result<Row>> + '_>> {
        let first_row = self.first_row;
        let iterator = self
            .reader
            .deserialize::<QuoteRecord>()
            .enumerate()
            .map(move |(i, r)| {
                r.map(|record| Row {
                    index: first_row + i,
                    record,
                })
                .map_err(Error::record_read)
            });

        match filter {
            Some(filter) => Ok(Box::new(
                iterator.filter_ok(move |row| filter.eval(&row.record)),
            )),
            None => Ok(Box::new(iterator)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::record::Status;
    use std::io::Write;

    fn write_temp(name: &str, content: &str) -> std::path::PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("quotecard-{}-{}", std::process::id(), name));
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn reads_uppercase_sheet_headers() {
        let path = write_temp(
            "upper.csv",
            "CATEGORY,AUTHOR,QUOTE,STATUS\n\
             Wisdom,Seneca,Luck is what happens when preparation meets opportunity.,\n\
             Humor,Twain,Get your facts first.,done\n",
        );
        let mut source = CsvSource::open(CsvSourceConfig::default(), &path).unwrap();
        let rows: Vec<Row> = source.read(None).unwrap().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].index, 2);
        assert_eq!(rows[0].record.author, "Seneca");
        assert_eq!(rows[0].record.status, Status::Pending);
        assert_eq!(rows[1].index, 3);
        assert_eq!(rows[1].record.status, Status::Done);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn filter_keeps_row_numbers() {
        let path = write_temp(
            "filter.csv",
            "quote,author,category,status\na,x,One,done\nb,y,Two,\nc,z,Two,skip\n",
        );
        let mut source = CsvSource::open(CsvSourceConfig::default(), &path).unwrap();
        let filter = Predicate::from_string("category=Two").unwrap();
        let rows: Vec<Row> = source
            .read(Some(filter))
            .unwrap()
            .map(|r| r.unwrap())
            .collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].index, 3);
        assert_eq!(rows[1].index, 4);
        std::fs::remove_file(path).ok();
    }
}
