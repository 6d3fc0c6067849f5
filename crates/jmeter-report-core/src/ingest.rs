//! Reading raw result rows
//!
//! The ingestor turns a delimited text file with a header row into a
//! [`RawTable`]: the declared column names plus one [`RawRecord`] per data
//! row, in file order. No value is interpreted here.
//!
//! Only the header must be valid UTF-8. Data cells with undecodable bytes are
//! kept, with U+FFFD in place of the bad bytes.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use tracing::{debug, info, warn};

use crate::error::{ReportError, Result};

/// One data row as read from input: column name to raw cell text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    fields: HashMap<String, String>,
}

impl RawRecord {
    /// Raw text of a cell, `None` when the row is too short to have it
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for RawRecord
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// The ingested input: declared columns and rows in file order
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub columns: Vec<String>,
    pub records: Vec<RawRecord>,
}

/// Reads delimited result files
#[derive(Debug, Clone, Copy)]
pub struct Ingestor {
    delimiter: u8,
}

impl Default for Ingestor {
    fn default() -> Self {
        Self::new(b',')
    }
}

impl Ingestor {
    pub fn new(delimiter: u8) -> Self {
        Self { delimiter }
    }

    /// Read a result file from disk.
    ///
    /// # Errors
    ///
    /// [`ReportError::Ingest`] if the file cannot be opened or is not a
    /// readable table.
    pub fn read_path<P: AsRef<Path>>(&self, path: P) -> Result<RawTable> {
        let path = path.as_ref();
        info!("Reading result file {}", path.display());
        let file = File::open(path).map_err(|e| ReportError::ingest(path, e))?;
        self.read_from(file, path)
    }

    /// Read a result table from any reader. `origin` only labels errors.
    pub fn read_from<R: Read>(&self, reader: R, origin: &Path) -> Result<RawTable> {
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(reader);

        let columns: Vec<String> = reader
            .headers()
            .map_err(|e| ReportError::ingest(origin, e))?
            .iter()
            .map(str::to_string)
            .collect();
        debug!(?columns, "Declared columns");

        // Data cells are decoded lossily: a stray byte in a message column
        // must not cost the whole run.
        let mut records = Vec::new();
        let mut lossy_rows = 0usize;
        for row in reader.byte_records() {
            let row = row.map_err(|e| ReportError::ingest(origin, e))?;
            if std::str::from_utf8(row.as_slice()).is_err() {
                lossy_rows += 1;
                debug!(row = records.len() + 1, "Row is not valid UTF-8; decoding lossily");
            }
            let record: RawRecord = columns
                .iter()
                .zip(row.iter())
                .map(|(column, value)| (column.as_str(), String::from_utf8_lossy(value)))
                .collect();
            records.push(record);
        }

        if lossy_rows > 0 {
            warn!(
                "{} rows contained invalid UTF-8; undecodable bytes were replaced",
                lossy_rows
            );
        }
        info!(
            "Read {} rows with {} columns from {}",
            records.len(),
            columns.len(),
            origin.display()
        );
        Ok(RawTable { columns, records })
    }
}
