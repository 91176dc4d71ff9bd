use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Input file not found: {path}")]
    FileNotFound { path: String },

    #[error("Column(s) {} not found in {path}", .columns.join(", "))]
    MissingColumn { columns: Vec<String>, path: String },

    #[error("Malformed CSV in {path}: {message}")]
    MalformedCsv {
        path: String,
        line: Option<u64>,
        message: String,
    },

    #[error("Failed to write output file {path}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },
}

/// The three ways a run can terminate unsuccessfully.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    FileNotFound,
    MissingColumn,
    GenericFailure,
}

impl ExtractError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ExtractError::FileNotFound { .. } => ErrorCategory::FileNotFound,
            ExtractError::MissingColumn { .. } => ErrorCategory::MissingColumn,
            _ => ErrorCategory::GenericFailure,
        }
    }

    /// Build an error from a csv failure, keeping the line position when
    /// the reader reports one.
    pub fn from_csv(path: &Path, error: csv::Error) -> Self {
        let line = error.position().map(|pos| pos.line());
        let message = error.to_string();
        match error.into_kind() {
            csv::ErrorKind::Io(e) => ExtractError::Io(e),
            _ => ExtractError::MalformedCsv {
                path: path.display().to_string(),
                line,
                message,
            },
        }
    }
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for ExtractError {
    fn user_message(&self) -> String {
        match self {
            ExtractError::FileNotFound { path } => {
                format!("File '{}' not found.", path)
            }
            ExtractError::MissingColumn { columns, .. } => {
                let quoted: Vec<String> = columns.iter().map(|c| format!("'{}'", c)).collect();
                if quoted.len() == 1 {
                    format!("Column {} not found in the CSV file.", quoted[0])
                } else {
                    format!("Columns {} not found in the CSV file.", quoted.join(", "))
                }
            }
            ExtractError::MalformedCsv {
                path,
                line: Some(line),
                message,
            } => {
                format!("Malformed CSV in {} at line {}: {}", path, line, message)
            }
            ExtractError::MalformedCsv { path, message, .. } => {
                format!("Malformed CSV in {}: {}", path, message)
            }
            ExtractError::Write { path, source } => {
                format!("Failed to write {}: {}", path, source)
            }
            ExtractError::Config { message } => {
                format!("Configuration error: {}", message)
            }
            _ => self.to_string(),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            ExtractError::FileNotFound { .. } => Some(
                "Pass the input CSV path as the third argument (e.g., country-extract Spain out.csv IMF_FSI_NGDP.csv).".to_string()
            ),
            ExtractError::MissingColumn { .. } => Some(
                "Check that the input is an IMF indicator export, or adjust [schema] columns in your configuration file.".to_string()
            ),
            ExtractError::MalformedCsv { .. } => Some(
                "Ensure every row has the same number of fields as the header and that quotes are balanced.".to_string()
            ),
            ExtractError::Write { .. } => Some(
                "Ensure the output directory exists and you have write permission for it.".to_string()
            ),
            ExtractError::Config { .. } => Some(
                "Check your configuration file syntax, or regenerate one with --generate-config.".to_string()
            ),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for ExtractError {
    fn from(error: toml::de::Error) -> Self {
        ExtractError::Config {
            message: error.to_string(),
        }
    }
}

impl From<toml::ser::Error> for ExtractError {
    fn from(error: toml::ser::Error) -> Self {
        ExtractError::Config {
            message: error.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ExtractError>;
