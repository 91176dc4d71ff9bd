use super::progress::format_duration;
use crate::error::{ExtractError, UserFriendlyError};
use crate::extractor::ExtractionReport;
use chrono::{DateTime, Utc};
use console::{style, Emoji, Term};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputMode {
    Human,
    Json,
    Plain,
}

static CHECKMARK: Emoji = Emoji("✅ ", "✓ ");
static CROSS: Emoji = Emoji("❌ ", "✗ ");
static INFO: Emoji = Emoji("ℹ️  ", "i ");
static WARNING: Emoji = Emoji("⚠️  ", "! ");
static ROCKET: Emoji = Emoji("🚀 ", "> ");
static SPARKLES: Emoji = Emoji("✨ ", "* ");

/// What a console line is about. Decides the stream it goes to, the
/// verbosity it needs and how each output mode decorates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Level {
    Success,
    Error,
    Suggestion,
    Warning,
    Info,
    Debug,
    Step,
}

impl Level {
    /// `None` means the line is shown even in quiet mode.
    fn required_verbosity(self) -> Option<u8> {
        match self {
            Level::Success | Level::Error | Level::Suggestion => None,
            Level::Step => Some(0),
            Level::Warning | Level::Info => Some(1),
            Level::Debug => Some(2),
        }
    }

    fn to_stderr(self) -> bool {
        matches!(self, Level::Error | Level::Suggestion)
    }

    fn tag(self) -> &'static str {
        match self {
            Level::Success => "success",
            Level::Error => "error",
            Level::Suggestion => "suggestion",
            Level::Warning => "warning",
            Level::Info => "info",
            Level::Debug => "debug",
            Level::Step => "step",
        }
    }

    fn decorate(self, message: &str, colors: bool) -> String {
        if !colors {
            return match self {
                Level::Success => format!("✓ {}", message),
                Level::Error => format!("Error: {}", message),
                Level::Suggestion => format!("Suggestion: {}", message),
                Level::Warning => format!("! {}", message),
                Level::Info => format!("i {}", message),
                Level::Debug => format!("  DEBUG: {}", message),
                Level::Step => format!("> {}", message),
            };
        }

        match self {
            Level::Success => format!("{}{}", CHECKMARK, style(message).green().bold()),
            Level::Error => format!("{}{}", CROSS, style(message).red().bold()),
            Level::Suggestion => {
                format!("{}{}", INFO, style(format!("Suggestion: {}", message)).cyan())
            }
            Level::Warning => format!("{}{}", WARNING, style(message).yellow().bold()),
            Level::Info => format!("{}{}", INFO, style(message).cyan()),
            Level::Debug => format!("  {}", style(message).dim()),
            Level::Step => format!("{}{}", ROCKET, style(message).bold()),
        }
    }
}

/// One line of `--output-format json` progress chatter.
#[derive(Debug, Serialize)]
struct ConsoleEvent<'a> {
    level: &'static str,
    message: &'a str,
    timestamp: DateTime<Utc>,
}

pub struct OutputFormatter {
    mode: OutputMode,
    use_colors: bool,
    verbose_level: u8,
    quiet: bool,
}

impl OutputFormatter {
    pub fn new(mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let use_colors = match mode {
            OutputMode::Human => Term::stdout().features().colors_supported() && !quiet,
            _ => false,
        };

        Self {
            mode,
            use_colors,
            verbose_level: if quiet { 0 } else { verbose },
            quiet,
        }
    }

    pub fn success(&self, message: &str) {
        self.emit(Level::Success, message);
    }

    pub fn error(&self, message: &str) {
        self.emit(Level::Error, message);
    }

    pub fn warning(&self, message: &str) {
        self.emit(Level::Warning, message);
    }

    pub fn info(&self, message: &str) {
        self.emit(Level::Info, message);
    }

    pub fn debug(&self, message: &str) {
        self.emit(Level::Debug, message);
    }

    pub fn start_operation(&self, operation: &str) {
        self.emit(Level::Step, operation);
    }

    pub fn print_user_friendly_error(&self, error: &ExtractError) {
        self.error(&error.user_message());
        if let Some(suggestion) = error.suggestion() {
            self.emit(Level::Suggestion, &suggestion);
        }
    }

    /// Final summary of a run. JSON mode prints the report itself so the
    /// output can be piped straight into other tools.
    pub fn print_extraction_report(&self, report: &ExtractionReport) {
        match self.mode {
            OutputMode::Human => self.print_human_report(report),
            OutputMode::Json => match serde_json::to_string_pretty(report) {
                Ok(json) => println!("{}", json),
                Err(e) => self.error(&format!("Failed to serialize report: {}", e)),
            },
            OutputMode::Plain => {
                let status = if report.dry_run {
                    "Dry run completed"
                } else {
                    "Extraction completed"
                };
                println!("REPORT: {}", status);
                for (label, value) in report_fields(report) {
                    println!("{}: {}", label, value);
                }
            }
        }
    }

    fn shows(&self, min_verbose_level: u8) -> bool {
        !self.quiet && self.verbose_level >= min_verbose_level
    }

    fn render(&self, level: Level, message: &str) -> String {
        match self.mode {
            OutputMode::Human => level.decorate(message, self.use_colors),
            OutputMode::Plain => format!("{}: {}", level.tag().to_uppercase(), message),
            OutputMode::Json => {
                let event = ConsoleEvent {
                    level: level.tag(),
                    message,
                    timestamp: Utc::now(),
                };
                serde_json::to_string(&event).unwrap_or_else(|_| "{}".to_string())
            }
        }
    }

    fn emit(&self, level: Level, message: &str) {
        if let Some(min) = level.required_verbosity() {
            if !self.shows(min) {
                return;
            }
        }

        let line = self.render(level, message);
        if level.to_stderr() {
            eprintln!("{}", line);
        } else {
            println!("{}", line);
        }
    }

    fn print_human_report(&self, report: &ExtractionReport) {
        if report.dry_run {
            self.success(&format!(
                "Dry run: {} rows for {} would be extracted",
                report.rows_written, report.country
            ));
            println!("Output would be saved to: {}", report.output_path.display());
        } else {
            self.success(&format!(
                "Successfully extracted {} rows for {}",
                report.rows_written, report.country
            ));
            println!("Output saved to: {}", report.output_path.display());
        }

        if !self.shows(1) {
            return;
        }

        println!();
        if self.use_colors {
            println!("{} {}", SPARKLES, style("Extraction Report").bold().cyan());
        } else {
            println!("=== Extraction Report ===");
        }
        for (label, value) in report_fields(report) {
            println!("{:<14}{}", format!("{}:", label), value);
        }
    }
}

fn report_fields(report: &ExtractionReport) -> Vec<(&'static str, String)> {
    vec![
        ("Country", report.country.clone()),
        ("Input", report.input_path.display().to_string()),
        ("Output", report.output_path.display().to_string()),
        ("Rows read", report.rows_read.to_string()),
        ("Rows matched", report.rows_written.to_string()),
        ("Columns", report.columns.join(", ")),
        ("Duration", format_duration(report.duration)),
        (
            "Extracted at",
            report
                .extraction_time
                .format("%Y-%m-%d %H:%M UTC")
                .to_string(),
        ),
    ]
}
