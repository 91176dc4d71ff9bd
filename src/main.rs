use clap::Parser;
use country_extract::{
    Cli, CountryExtractor, ErrorCategory, ExtractError, OutputFormatter, OutputMode,
    UserFriendlyError,
};
use std::process;

fn main() {
    let exit_code = run();
    process::exit(exit_code);
}

fn run() -> i32 {
    let cli = Cli::parse();

    if cli.generate_config {
        return handle_generate_config(&cli);
    }

    let extractor = match CountryExtractor::from_cli(&cli) {
        Ok(extractor) => extractor,
        Err(e) => {
            print_startup_error(&e);
            return exit_code_for(&e);
        }
    };

    let request = extractor.request();
    let result = if cli.dry_run {
        extractor.preview(&request)
    } else {
        extractor.extract(&request)
    };

    match result {
        Ok(report) => {
            extractor.output_formatter().print_extraction_report(&report);
            0
        }
        Err(e) => {
            extractor.handle_error(&e);
            exit_code_for(&e)
        }
    }
}

fn exit_code_for(error: &ExtractError) -> i32 {
    match error.category() {
        ErrorCategory::FileNotFound => 3,
        ErrorCategory::MissingColumn => 4,
        ErrorCategory::GenericFailure => match error {
            ExtractError::Config { .. } => 2,
            _ => 1,
        },
    }
}

fn handle_generate_config(cli: &Cli) -> i32 {
    let config_path = cli
        .config
        .as_ref()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|| "country-extract.toml".to_string());

    match CountryExtractor::generate_sample_config(&config_path) {
        Ok(()) => {
            println!("Generated sample configuration file: {}", config_path);
            println!("\nTo use this configuration:");
            println!("  country-extract --config {}", config_path);
            println!("\nEdit the file to change the default country, paths or columns.");
            0
        }
        Err(e) => {
            eprintln!("Failed to generate configuration file: {}", e.user_message());
            if let Some(suggestion) = e.suggestion() {
                eprintln!("Suggestion: {}", suggestion);
            }
            1
        }
    }
}

fn print_startup_error(error: &ExtractError) {
    let formatter = OutputFormatter::new(OutputMode::Human, 0, false);
    formatter.print_user_friendly_error(error);
}
