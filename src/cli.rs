use crate::config::{CliOverrides, Config};
use crate::error::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "country-extract")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Extract one country's rows from an IMF indicator CSV file")]
#[command(
    long_about = "country-extract reads a macroeconomic indicator CSV export, keeps the rows whose \
                  REF_AREA_NAME matches the given country exactly, and writes the REF_AREA_NAME, \
                  FREQ_ID, FREQ_NAME, TIME_PERIOD, OBS_VALUE and UNIT_MEASURE_NAME columns to a new CSV file."
)]
#[command(after_help = "EXAMPLES:\n  \
    country-extract\n  \
    country-extract France\n  \
    country-extract Italy italy_gdp.csv\n  \
    country-extract \"Korea, Rep.\" korea.csv IMF_FSI_NGDP.csv --verbose\n  \
    country-extract Spain --dry-run --output-format json")]
pub struct Cli {
    /// Country name to match against REF_AREA_NAME (exact, case-sensitive) [default: Spain]
    pub country: Option<String>,

    /// Output CSV path, overwritten if it exists [default: spain_gdp_imf_data.csv]
    pub output: Option<PathBuf>,

    /// Input CSV path [default: IMF_FSI_NGDP.csv]
    pub input: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, help = "Path to TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Output format for results
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Verbose output level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Dry run (show what would be extracted without writing)
    #[arg(long, help = "Count matching rows without writing the output file")]
    pub dry_run: bool,

    /// Generate sample configuration file
    #[arg(long, help = "Generate a sample configuration file")]
    pub generate_config: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON formatted output
    Json,
    /// Plain text output
    Plain,
}

impl Cli {
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load_with_defaults(self.config.as_ref())?;

        let overrides = self.create_cli_overrides();
        config.merge_with_cli_args(&overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn create_cli_overrides(&self) -> CliOverrides {
        CliOverrides::default()
            .with_country(self.country.clone())
            .with_output_path(self.output.clone())
            .with_input_path(self.input.clone())
    }

    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_positional_arguments() {
        let cli = Cli::try_parse_from(["country-extract", "France", "fr.csv", "data.csv"]).unwrap();
        assert_eq!(cli.country.as_deref(), Some("France"));
        assert_eq!(cli.output, Some(PathBuf::from("fr.csv")));
        assert_eq!(cli.input, Some(PathBuf::from("data.csv")));
    }

    #[test]
    fn test_defaults_when_no_arguments() {
        let cli = Cli::try_parse_from(["country-extract"]).unwrap();
        assert!(cli.country.is_none());
        assert!(cli.output.is_none());
        assert!(cli.input.is_none());
        assert!(!cli.dry_run);
        assert_eq!(cli.verbosity_level(), 0);
    }

    #[test]
    fn test_partial_positionals() {
        let cli = Cli::try_parse_from(["country-extract", "Italy"]).unwrap();
        assert_eq!(cli.country.as_deref(), Some("Italy"));
        assert!(cli.output.is_none());
    }

    #[test]
    fn test_too_many_positionals() {
        let result = Cli::try_parse_from(["country-extract", "a", "b", "c", "d"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        let result = Cli::try_parse_from(["country-extract", "-q", "-v"]);
        assert!(result.is_err());

        let cli = Cli::try_parse_from(["country-extract", "-vv"]).unwrap();
        assert_eq!(cli.verbosity_level(), 2);

        let cli = Cli::try_parse_from(["country-extract", "--quiet"]).unwrap();
        assert_eq!(cli.verbosity_level(), 0);
    }

    #[test]
    fn test_overrides_from_positionals() {
        let cli = Cli::try_parse_from(["country-extract", "Portugal", "pt.csv"]).unwrap();
        let overrides = cli.create_cli_overrides();
        assert_eq!(overrides.country.as_deref(), Some("Portugal"));
        assert_eq!(overrides.output_path, Some(PathBuf::from("pt.csv")));
        assert!(overrides.input_path.is_none());
    }
}
