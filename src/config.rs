use crate::error::{ExtractError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

pub const DEFAULT_COUNTRY: &str = "Spain";
pub const DEFAULT_INPUT_PATH: &str = "IMF_FSI_NGDP.csv";
pub const DEFAULT_OUTPUT_PATH: &str = "spain_gdp_imf_data.csv";
pub const DEFAULT_FILTER_COLUMN: &str = "REF_AREA_NAME";
pub const DEFAULT_COLUMNS: [&str; 6] = [
    "REF_AREA_NAME",
    "FREQ_ID",
    "FREQ_NAME",
    "TIME_PERIOD",
    "OBS_VALUE",
    "UNIT_MEASURE_NAME",
];

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub defaults: DefaultsConfig,
    pub schema: SchemaConfig,
    pub csv: CsvConfig,
    /// File the settings were read from, if any.
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DefaultsConfig {
    pub country: String,
    pub input_path: PathBuf,
    pub output_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SchemaConfig {
    pub filter_column: String,
    pub columns: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CsvConfig {
    pub delimiter: char,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            country: DEFAULT_COUNTRY.to_string(),
            input_path: PathBuf::from(DEFAULT_INPUT_PATH),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
        }
    }
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            filter_column: DEFAULT_FILTER_COLUMN.to_string(),
            columns: DEFAULT_COLUMNS.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl Default for CsvConfig {
    fn default() -> Self {
        Self { delimiter: ',' }
    }
}

impl CsvConfig {
    /// Delimiter as the single byte the csv reader/writer expects.
    /// Only meaningful after `Config::validate` has accepted it.
    pub fn delimiter_byte(&self) -> u8 {
        if self.delimiter.is_ascii() {
            self.delimiter as u8
        } else {
            b','
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ExtractError::Config {
                message: format!("Configuration file not found: {}", path.display()),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| ExtractError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        let mut config: Config = toml::from_str(&content).map_err(|e| ExtractError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })?;
        config.source = Some(path.to_path_buf());

        Ok(config)
    }

    pub fn load_with_defaults<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_from_file(path),
            None => {
                let default_paths = ["country-extract.toml", ".country-extract.toml"];

                for default_path in &default_paths {
                    if Path::new(default_path).exists() {
                        return Self::load_from_file(default_path);
                    }
                }

                Ok(Self::default())
            }
        }
    }

    pub fn merge_with_cli_args(&mut self, cli_args: &CliOverrides) {
        if let Some(ref country) = cli_args.country {
            self.defaults.country = country.clone();
        }

        if let Some(ref output_path) = cli_args.output_path {
            self.defaults.output_path = output_path.clone();
        }

        if let Some(ref input_path) = cli_args.input_path {
            self.defaults.input_path = input_path.clone();
        }
    }

    /// True when the loaded file changes which columns are filtered on or
    /// written out.
    pub fn overrides_schema(&self) -> bool {
        self.schema != SchemaConfig::default()
    }

    pub fn validate(&self) -> Result<()> {
        if self.schema.columns.is_empty() {
            return Err(ExtractError::Config {
                message: "At least one output column must be specified".to_string(),
            });
        }

        let mut seen = HashSet::new();
        for column in &self.schema.columns {
            if column.is_empty() {
                return Err(ExtractError::Config {
                    message: "Output column names cannot be empty".to_string(),
                });
            }
            if !seen.insert(column.as_str()) {
                return Err(ExtractError::Config {
                    message: format!("Output column listed twice: {}", column),
                });
            }
        }

        if self.schema.filter_column.is_empty() {
            return Err(ExtractError::Config {
                message: "Filter column must be specified".to_string(),
            });
        }

        let delimiter = self.csv.delimiter;
        if !delimiter.is_ascii() || delimiter == '"' || delimiter == '\n' || delimiter == '\r' {
            return Err(ExtractError::Config {
                message: format!("Unsupported CSV delimiter: {:?}", delimiter),
            });
        }

        Ok(())
    }

    /// Every column the input header must provide: the filter column
    /// followed by the projected columns, without duplicates.
    pub fn required_columns(&self) -> Vec<String> {
        let mut required = vec![self.schema.filter_column.clone()];
        for column in &self.schema.columns {
            if !required.contains(column) {
                required.push(column.clone());
            }
        }
        required
    }

    pub fn create_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config).unwrap_or_else(|_| String::new())
    }
}

#[derive(Debug, Default)]
pub struct CliOverrides {
    pub country: Option<String>,
    pub output_path: Option<PathBuf>,
    pub input_path: Option<PathBuf>,
}

impl CliOverrides {
    pub fn with_country(mut self, country: Option<String>) -> Self {
        self.country = country;
        self
    }

    pub fn with_output_path(mut self, output_path: Option<PathBuf>) -> Self {
        self.output_path = output_path;
        self
    }

    pub fn with_input_path(mut self, input_path: Option<PathBuf>) -> Self {
        self.input_path = input_path;
        self
    }
}
