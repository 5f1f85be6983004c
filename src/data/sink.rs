//! Status write-back into the data source.
//!
//! After a record is rendered and its artifact written, the source row's
//! `STATUS`, `DIMENSIONS`, `GENERATED_AT` and `LINK` cells are updated. Each
//! update replaces the source file through an atomic rename.
//! Callers must serialize access (the batch pipeline holds the sink behind a
//! mutex) so concurrent workers cannot lose updates.

use crate::data::record::Status;
use crate::error::Result;

#[cfg(feature = "csv")]
use crate::error::Error;
#[cfg(feature = "csv")]
use std::path::{Path, PathBuf};

/// Cell values written back for one rendered row.
#[derive(Debug, Clone)]
pub struct StatusUpdate {
    pub status: Status,
    pub dimensions: (i32, i32),
    pub generated_at: String,
    pub link: String,
}

pub trait StatusSink: Send {
    fn apply(&mut self, row: usize, update: &StatusUpdate) -> Result<()>;
}

const WRITE_BACK_COLUMNS: [&str; 4] = ["STATUS", "DIMENSIONS", "GENERATED_AT", "LINK"];

/// Write-back sink for CSV sources. The whole file is kept in memory and
/// rewritten on every update; batches are small enough that this beats
/// tracking dirty regions.
#[cfg(feature = "csv")]
pub struct CsvStatusSink {
    path: PathBuf,
    delimiter: u8,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

#[cfg(feature = "csv")]
impl CsvStatusSink {
    pub fn open(path: &impl AsRef<Path>, delimiter: char) -> Result<Self> {
        let path = path.as_ref();
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter as u8)
            .has_headers(true)
            .flexible(true)
            .from_path(path)
            .map_err(|e| Error::source_open(path, e))?;
        let headers = reader
            .headers()
            .map_err(|e| Error::source_open(path, e))?
            .iter()
            .map(str::to_string)
            .collect();
        let rows = reader
            .records()
            .map(|r| {
                r.map(|rec| rec.iter().map(str::to_string).collect())
                    .map_err(Error::record_read)
            })
            .collect::<Result<Vec<Vec<String>>>>()?;
        Ok(Self {
            path: path.to_path_buf(),
            delimiter: delimiter as u8,
            headers,
            rows,
        })
    }

    fn column(&mut self, name: &str) -> usize {
        match self
            .headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
        {
            Some(i) => i,
            None => {
                self.headers.push(name.to_string());
                self.headers.len() - 1
            }
        }
    }

    fn flush(&self) -> Result<()> {
        // Rewriting the source in place would truncate it under a reader
        // that is still streaming rows from the same path. Write a sibling
        // file and rename it over the source instead; open readers keep the
        // old inode and finish on the data they started with.
        let tmp = tmp_path(&self.path);
        let mut writer = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_path(&tmp)
            .map_err(|e| Error::output_write(&tmp, e))?;
        writer
            .write_record(&self.headers)
            .map_err(|e| Error::output_write(&tmp, e))?;
        let width = self.headers.len();
        for row in &self.rows {
            let mut padded: Vec<&str> = row.iter().map(String::as_str).collect();
            padded.resize(width, "");
            writer
                .write_record(&padded)
                .map_err(|e| Error::output_write(&tmp, e))?;
        }
        writer
            .flush()
            .map_err(|e| Error::output_write(&tmp, e))?;
        drop(writer);
        std::fs::rename(&tmp, &self.path).map_err(|e| Error::output_write(&self.path, e))
    }
}

#[cfg(feature = "csv")]
fn tmp_path(path: &Path) -> PathBuf {
    let mut os = path.as_os_str().to_os_string();
    os.push(".tmp");
    PathBuf::from(os)
}

#[cfg(feature = "csv")]
impl StatusSink for CsvStatusSink {
    fn apply(&mut self, row: usize, update: &StatusUpdate) -> Result<()> {
        // Row numbers are spreadsheet-style; data row 2 is `rows[0]`.
        let i = row
            .checked_sub(2)
            .filter(|i| *i < self.rows.len())
            .ok_or_else(|| Error::write_back(row, "row not found in source"))?;
        let values = [
            update.status.to_string(),
            format!("{}x{}", update.dimensions.0, update.dimensions.1),
            update.generated_at.clone(),
            update.link.clone(),
        ];
        for (name, value) in WRITE_BACK_COLUMNS.iter().zip(values) {
            let col = self.column(name);
            let cells = &mut self.rows[i];
            if cells.len() <= col {
                cells.resize(col + 1, String::new());
            }
            cells[col] = value;
        }
        self.flush().map_err(|e| Error::write_back(row, e))
    }
}

#[cfg(all(test, feature = "csv"))]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(name: &str, content: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("quotecard-sink-{}-{}", std::process::id(), name));
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn appends_columns_and_updates_cells() {
        let path = write_temp("wb.csv", "QUOTE,AUTHOR\nhello,Someone\nworld,Other\n");
        let mut sink = CsvStatusSink::open(&path, ',').unwrap();
        sink.apply(
            3,
            &StatusUpdate {
                status: Status::Done,
                dimensions: (1080, 1080),
                generated_at: "2026-01-01 10:00:00".into(),
                link: "out/world.png".into(),
            },
        )
        .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(
            lines.next().unwrap(),
            "QUOTE,AUTHOR,STATUS,DIMENSIONS,GENERATED_AT,LINK"
        );
        assert_eq!(lines.next().unwrap(), "hello,Someone,,,,");
        assert_eq!(
            lines.next().unwrap(),
            "world,Other,done,1080x1080,2026-01-01 10:00:00,out/world.png"
        );
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn unknown_row_is_an_error() {
        let path = write_temp("missing.csv", "QUOTE\nonly\n");
        let mut sink = CsvStatusSink::open(&path, ',').unwrap();
        let update = StatusUpdate {
            status: Status::Done,
            dimensions: (100, 100),
            generated_at: String::new(),
            link: String::new(),
        };
        assert!(sink.apply(9, &update).is_err());
        std::fs::remove_file(path).ok();
    }
}
