use crate::extractor::ExtractionRequest;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionReport {
    pub country: String,
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub columns: Vec<String>,
    pub rows_read: usize,
    pub rows_written: usize,
    pub dry_run: bool,
    pub duration: Duration,
    pub extraction_time: DateTime<Utc>,
}

impl ExtractionReport {
    pub fn new(request: &ExtractionRequest, columns: &[String]) -> Self {
        Self {
            country: request.country.clone(),
            input_path: request.input_path.clone(),
            output_path: request.output_path.clone(),
            columns: columns.to_vec(),
            rows_read: 0,
            rows_written: 0,
            dry_run: false,
            duration: Duration::ZERO,
            extraction_time: Utc::now(),
        }
    }

    /// Share of input rows that matched the country, as a percentage.
    pub fn match_ratio(&self) -> f64 {
        if self.rows_read == 0 {
            0.0
        } else {
            (self.rows_written as f64 / self.rows_read as f64) * 100.0
        }
    }

    pub fn display_summary(&self) -> String {
        format!(
            "{} of {} rows matched '{}' ({:.1}%)",
            self.rows_written,
            self.rows_read,
            self.country,
            self.match_ratio()
        )
    }
}
