use crate::config::Config;
use crate::error::Result;
use crate::table::Table;
use std::path::{Path, PathBuf};

/// What a single run extracts: one country, one input, one output.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionRequest {
    pub country: String,
    pub input_path: PathBuf,
    pub output_path: PathBuf,
}

impl ExtractionRequest {
    pub fn new<S, I, O>(country: S, input_path: I, output_path: O) -> Self
    where
        S: Into<String>,
        I: Into<PathBuf>,
        O: Into<PathBuf>,
    {
        Self {
            country: country.into(),
            input_path: input_path.into(),
            output_path: output_path.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            country: config.defaults.country.clone(),
            input_path: config.defaults.input_path.clone(),
            output_path: config.defaults.output_path.clone(),
        }
    }
}

/// Filter and projection stages applied to a loaded table.
pub struct ExtractionPipeline {
    // Filter column first, then the projected columns not already listed.
    required: Vec<String>,
    columns: Vec<String>,
    delimiter: u8,
}

impl ExtractionPipeline {
    pub fn new(config: &Config) -> Self {
        Self {
            required: config.required_columns(),
            columns: config.schema.columns.clone(),
            delimiter: config.csv.delimiter_byte(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn load(&self, input: &Path, progress_callback: Option<&dyn Fn(u64)>) -> Result<Table> {
        Table::load(input, self.delimiter, progress_callback)
    }

    /// Validate the header, keep the rows for `country`, then project the
    /// output columns. Every required column is checked before any row is
    /// touched, so a schema mismatch never reaches the writer.
    pub fn select(&self, table: &Table, country: &str, source: &Path) -> Result<Table> {
        let filter_idx = table.require_columns(&self.required, source)?[0];
        let projection: Vec<usize> = self
            .columns
            .iter()
            .filter_map(|column| table.column_index(column))
            .collect();

        Ok(table.filter_eq(filter_idx, country).project(&projection))
    }
}
