pub mod cli;
pub mod config;
pub mod error;
pub mod extractor;
pub mod table;
pub mod ui;

// Public API re-exports
pub use cli::{Cli, OutputFormat};
pub use config::{CliOverrides, Config, CsvConfig, DefaultsConfig, SchemaConfig};
pub use error::{ErrorCategory, ExtractError, Result, UserFriendlyError};

// Core functionality re-exports
pub use extractor::{ExtractionPipeline, ExtractionReport, ExtractionRequest, OutputWriter};
pub use table::Table;
pub use ui::{OutputFormatter, OutputMode, ProgressManager};

use std::path::Path;
use std::time::Instant;

/// Main library interface: loads, filters, projects and writes one
/// country's rows.
pub struct CountryExtractor {
    config: Config,
    output_formatter: OutputFormatter,
    progress_manager: ProgressManager,
}

impl CountryExtractor {
    pub fn new(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let output_formatter = OutputFormatter::new(output_mode, verbose, quiet);
        let progress_manager = ProgressManager::new(!quiet && output_mode == OutputMode::Human);

        Self {
            config,
            output_formatter,
            progress_manager,
        }
    }

    /// Create a CountryExtractor from CLI arguments
    pub fn from_cli(cli_args: &Cli) -> Result<Self> {
        let config = cli_args.load_config()?;
        let output_mode = match cli_args.output_format {
            crate::cli::OutputFormat::Human => OutputMode::Human,
            crate::cli::OutputFormat::Json => OutputMode::Json,
            crate::cli::OutputFormat::Plain => OutputMode::Plain,
        };

        let extractor = Self::new(
            config,
            output_mode,
            cli_args.verbosity_level(),
            cli_args.quiet,
        );
        extractor.announce_config_source();
        Ok(extractor)
    }

    /// Names the configuration file in effect at `-v`, and whether it
    /// changes the filter or output columns.
    fn announce_config_source(&self) {
        if let Some(source) = &self.config.source {
            self.output_formatter
                .info(&format!("Using configuration file {}", source.display()));

            if self.config.overrides_schema() {
                self.output_formatter.warning(&format!(
                    "{} sets the filter column to {} and the output columns to {}",
                    source.display(),
                    self.config.schema.filter_column,
                    self.config.schema.columns.join(", ")
                ));
            }
        }
    }

    /// The request described by the configuration (CLI positionals
    /// already merged in).
    pub fn request(&self) -> ExtractionRequest {
        ExtractionRequest::from_config(&self.config)
    }

    /// Run the full pipeline and write the output file.
    pub fn extract(&self, request: &ExtractionRequest) -> Result<ExtractionReport> {
        self.run(request, false)
    }

    /// Load, validate and filter without touching the output path.
    pub fn preview(&self, request: &ExtractionRequest) -> Result<ExtractionReport> {
        self.run(request, true)
    }

    fn run(&self, request: &ExtractionRequest, dry_run: bool) -> Result<ExtractionReport> {
        let start_time = Instant::now();
        let pipeline = ExtractionPipeline::new(&self.config);
        let mut report = ExtractionReport::new(request, pipeline.columns());
        report.dry_run = dry_run;

        // Step 1: Load the whole input table
        let table = self.load_table(&pipeline, &request.input_path)?;
        report.rows_read = table.len();

        // Step 2: Filter by country and project the output columns
        let selected = pipeline.select(&table, &request.country, &request.input_path)?;
        report.rows_written = selected.len();
        self.output_formatter.debug(&report.display_summary());

        if selected.is_empty() {
            self.output_formatter.warning(&format!(
                "No rows matched '{}'; the output will contain only the header",
                request.country
            ));
        }

        // Step 3: Write the output file
        if !dry_run {
            let written = self.write_output(&selected, &request.output_path)?;
            report.rows_written = written as usize;
        }

        report.duration = start_time.elapsed();
        Ok(report)
    }

    fn load_table(&self, pipeline: &ExtractionPipeline, input: &Path) -> Result<Table> {
        self.output_formatter
            .start_operation(&format!("Loading {}", input.display()));

        let start_time = Instant::now();
        let row_progress = self.progress_manager.create_row_progress("Reading");
        let progress_callback = {
            let pb = row_progress.clone();
            move |rows: u64| ui::progress::update_row_progress(&pb, rows)
        };

        match pipeline.load(input, Some(&progress_callback)) {
            Ok(table) => {
                ui::progress::finish_progress_with_summary(
                    &row_progress,
                    "Read",
                    start_time.elapsed(),
                );
                self.output_formatter.info(&format!(
                    "Loaded {} rows with {} columns",
                    table.len(),
                    table.headers().len()
                ));
                Ok(table)
            }
            Err(e) => {
                ui::progress::abandon_progress(&row_progress, "Read failed");
                Err(e)
            }
        }
    }

    fn write_output(&self, table: &Table, output: &Path) -> Result<u64> {
        self.output_formatter
            .start_operation(&format!("Writing {}", output.display()));

        let start_time = Instant::now();
        let row_progress = self.progress_manager.create_row_progress("Writing");
        let progress_callback = {
            let pb = row_progress.clone();
            move |rows: u64| ui::progress::update_row_progress(&pb, rows)
        };

        let writer = OutputWriter::new(output, self.config.csv.delimiter_byte());
        match writer.write(table, Some(&progress_callback)) {
            Ok(written) => {
                ui::progress::finish_progress_with_summary(
                    &row_progress,
                    "Wrote",
                    start_time.elapsed(),
                );
                Ok(written)
            }
            Err(e) => {
                ui::progress::abandon_progress(&row_progress, "Write failed");
                Err(e)
            }
        }
    }

    /// Generate sample configuration file
    pub fn generate_sample_config<P: AsRef<Path>>(output_path: P) -> Result<()> {
        let sample_config = Config::create_sample_config();
        std::fs::write(output_path.as_ref(), sample_config)?;
        Ok(())
    }

    pub fn output_formatter(&self) -> &OutputFormatter {
        &self.output_formatter
    }

    /// Handle error with user-friendly output
    pub fn handle_error(&self, error: &ExtractError) {
        self.progress_manager.clear();
        self.output_formatter.print_user_friendly_error(error);
    }
}

/// Extract `country`'s rows from `input` into `output` with the default
/// columns and no console output. Returns the number of data rows written.
pub fn extract_country_data<I, O>(input: I, output: O, country: &str) -> Result<usize>
where
    I: AsRef<Path>,
    O: AsRef<Path>,
{
    let extractor = CountryExtractor::new(Config::default(), OutputMode::Plain, 0, true);
    let request = ExtractionRequest::new(country, input.as_ref(), output.as_ref());
    let report = extractor.extract(&request)?;
    Ok(report.rows_written)
}
