use crate::error::{ExtractError, Result};
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

const PROGRESS_INTERVAL: u64 = 1024;

/// An in-memory CSV table: one header and every data row, in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    headers: StringRecord,
    rows: Vec<StringRecord>,
}

impl Table {
    /// Read the whole file at `path`. A missing or unreadable input is
    /// reported as `FileNotFound`; anything the csv parser rejects is
    /// `MalformedCsv`.
    pub fn load(
        path: &Path,
        delimiter: u8,
        progress_callback: Option<&dyn Fn(u64)>,
    ) -> Result<Self> {
        if path.is_dir() {
            return Err(ExtractError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let file = File::open(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound | std::io::ErrorKind::PermissionDenied => {
                ExtractError::FileNotFound {
                    path: path.display().to_string(),
                }
            }
            _ => ExtractError::Io(e),
        })?;

        Self::from_reader(file, delimiter, progress_callback)
            .map_err(|e| ExtractError::from_csv(path, e))
    }

    pub fn from_reader<R: Read>(
        reader: R,
        delimiter: u8,
        progress_callback: Option<&dyn Fn(u64)>,
    ) -> std::result::Result<Self, csv::Error> {
        let mut reader = ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        let mut rows = Vec::new();

        for record in reader.records() {
            rows.push(record?);

            if let Some(callback) = progress_callback {
                if rows.len() as u64 % PROGRESS_INTERVAL == 0 {
                    callback(rows.len() as u64);
                }
            }
        }

        if let Some(callback) = progress_callback {
            callback(rows.len() as u64);
        }

        Ok(Self { headers, rows })
    }

    pub fn headers(&self) -> &StringRecord {
        &self.headers
    }

    pub fn rows(&self) -> &[StringRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of the first header equal to `name`.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }

    /// Resolve every name to its column position, or fail with all the
    /// names the header lacks.
    pub fn require_columns(&self, names: &[String], source: &Path) -> Result<Vec<usize>> {
        let mut indices = Vec::with_capacity(names.len());
        let mut missing = Vec::new();

        for name in names {
            match self.column_index(name) {
                Some(idx) => indices.push(idx),
                None => missing.push(name.clone()),
            }
        }

        if !missing.is_empty() {
            return Err(ExtractError::MissingColumn {
                columns: missing,
                path: source.display().to_string(),
            });
        }

        Ok(indices)
    }

    /// Rows whose field at `column` is byte-for-byte equal to `value`,
    /// in their original order.
    pub fn filter_eq(&self, column: usize, value: &str) -> Table {
        let rows = self
            .rows
            .iter()
            .filter(|row| row.get(column) == Some(value))
            .cloned()
            .collect();

        Table {
            headers: self.headers.clone(),
            rows,
        }
    }

    /// Keep only the given column positions, in the given order.
    pub fn project(&self, columns: &[usize]) -> Table {
        let pick = |record: &StringRecord| -> StringRecord {
            columns
                .iter()
                .map(|&idx| record.get(idx).unwrap_or(""))
                .collect()
        };

        Table {
            headers: pick(&self.headers),
            rows: self.rows.iter().map(pick).collect(),
        }
    }

    /// Serialize header plus rows. The header is always written, so an
    /// empty table still produces a valid one-line CSV.
    pub fn write_to<W: Write>(
        &self,
        writer: W,
        delimiter: u8,
        progress_callback: Option<&dyn Fn(u64)>,
    ) -> std::result::Result<u64, csv::Error> {
        let mut writer = WriterBuilder::new()
            .delimiter(delimiter)
            .has_headers(false)
            .from_writer(writer);

        writer.write_record(&self.headers)?;

        let mut written = 0u64;
        for row in &self.rows {
            writer.write_record(row)?;
            written += 1;

            if let Some(callback) = progress_callback {
                if written % PROGRESS_INTERVAL == 0 {
                    callback(written);
                }
            }
        }

        writer.flush()?;

        if let Some(callback) = progress_callback {
            callback(written);
        }

        Ok(written)
    }
}
