//! CLI argument definitions for the ICSR tool.

use std::path::PathBuf;

use chrono::NaiveDateTime;
use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use icsr_model::ValidationLevel;

#[derive(Parser)]
#[command(
    name = "icsr",
    version,
    about = "ICSR E2B(R3) tool - Convert and validate individual case safety reports",
    long_about = "Convert individual case safety reports between JSON and HL7 v3 \
                  E2B(R3) XML.\n\n\
                  Reports are validated against the E2B(R3) structural and \
                  business rules before export."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow patient identifying values in log output.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Render JSON reports into one E2B(R3) batch message.
    Export(ExportArgs),

    /// Read every report out of an E2B(R3) message into JSON.
    Import(ImportArgs),

    /// Validate JSON reports and print the issues found.
    Validate(ValidateArgs),

    /// List the E2B(R3) code lists, or the codes of one list.
    Codes(CodesArgs),
}

#[derive(Parser)]
pub struct ExportArgs {
    /// JSON file holding one report or an array of reports.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Where to write the XML message (default: stdout).
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Export reports without running business validation first.
    ///
    /// By default a report with validation issues is left out of the
    /// message and reported as failed.
    #[arg(long = "skip-validation")]
    pub skip_validation: bool,

    /// Creation time written to the message header (YYYYMMDDHHMMSS).
    #[arg(long = "creation-time", value_name = "TIMESTAMP", value_parser = parse_timestamp)]
    pub creation_time: Option<NaiveDateTime>,

    /// Spaces per indentation level (0 writes a single line).
    #[arg(long = "indent", value_name = "N", default_value_t = 2)]
    pub indent: usize,
}

#[derive(Parser)]
pub struct ImportArgs {
    /// E2B(R3) XML message or single PORR_IN049016UV fragment.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Where to write the JSON reports (default: stdout).
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Validation applied to every imported report.
    #[arg(long = "level", value_enum, default_value = "business")]
    pub level: LevelArg,
}

#[derive(Parser)]
pub struct ValidateArgs {
    /// JSON file holding one report or an array of reports.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// How far validation goes.
    #[arg(long = "level", value_enum, default_value = "business")]
    pub level: LevelArg,

    /// Report format.
    #[arg(long = "format", value_enum, default_value = "table")]
    pub format: ReportFormatArg,
}

#[derive(Parser)]
pub struct CodesArgs {
    /// Code list to print (e.g. report_type); all lists when omitted.
    #[arg(value_name = "LIST")]
    pub list: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LevelArg {
    Structural,
    Business,
}

impl From<LevelArg> for ValidationLevel {
    fn from(level: LevelArg) -> Self {
        match level {
            LevelArg::Structural => ValidationLevel::Structural,
            LevelArg::Business => ValidationLevel::Business,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormatArg {
    Table,
    Json,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(raw, "%Y%m%d%H%M%S")
        .map_err(|error| format!("expected YYYYMMDDHHMMSS: {error}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_args() {
        let cli = Cli::try_parse_from([
            "icsr",
            "validate",
            "reports.json",
            "--level",
            "structural",
            "--format",
            "json",
        ])
        .unwrap();
        let Command::Validate(args) = cli.command else {
            panic!("expected validate command");
        };
        assert_eq!(args.input, PathBuf::from("reports.json"));
        assert_eq!(ValidationLevel::from(args.level), ValidationLevel::Structural);
        assert_eq!(args.format, ReportFormatArg::Json);
    }

    #[test]
    fn test_export_defaults() {
        let cli = Cli::try_parse_from(["icsr", "export", "reports.json"]).unwrap();
        let Command::Export(args) = cli.command else {
            panic!("expected export command");
        };
        assert!(!args.skip_validation);
        assert_eq!(args.indent, 2);
        assert!(args.output.is_none());
        assert!(args.creation_time.is_none());
        assert!(!cli.log_data);
    }

    #[test]
    fn test_creation_time_format() {
        let cli = Cli::try_parse_from([
            "icsr",
            "export",
            "reports.json",
            "--creation-time",
            "20240301091500",
        ])
        .unwrap();
        let Command::Export(args) = cli.command else {
            panic!("expected export command");
        };
        assert_eq!(
            args.creation_time.map(|time| time.to_string()).as_deref(),
            Some("2024-03-01 09:15:00")
        );

        assert!(
            Cli::try_parse_from([
                "icsr",
                "export",
                "reports.json",
                "--creation-time",
                "2024-03-01",
            ])
            .is_err()
        );
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli =
            Cli::try_parse_from(["icsr", "codes", "--log-format", "json", "--log-data"]).unwrap();
        assert!(matches!(cli.log_format, LogFormatArg::Json));
        assert!(cli.log_data);
        assert!(matches!(cli.command, Command::Codes(CodesArgs { list: None })));
    }
}
