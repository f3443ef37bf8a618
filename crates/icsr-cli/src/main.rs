//! ICSR E2B(R3) command line tool.

use std::io::{self, IsTerminal};

use clap::{ColorChoice, Parser};
use icsr_cli::cli::{Cli, Command, LogFormatArg, LogLevelArg, ReportFormatArg};
use icsr_cli::commands::{print_validation_json, run_codes, run_export, run_import, run_validate};
use icsr_cli::logging::{LogConfig, LogFormat, init_logging};
use icsr_cli::summary::print_summary;
use icsr_cli::types::RunResult;
use tracing::level_filters::LevelFilter;

/// Records failed validation or mapping.
const EXIT_FAILURES: i32 = 1;
/// The command could not run at all.
const EXIT_FATAL: i32 = 2;

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(EXIT_FATAL);
    }
    let exit_code = match &cli.command {
        Command::Export(args) => finish(run_export(args), |result| {
            print_summary(result, args.output.is_none());
            Ok(())
        }),
        Command::Import(args) => finish(run_import(args), |result| {
            print_summary(result, args.output.is_none());
            Ok(())
        }),
        Command::Validate(args) => finish(run_validate(args), |result| match args.format {
            ReportFormatArg::Table => {
                print_summary(result, false);
                Ok(())
            }
            ReportFormatArg::Json => print_validation_json(result),
        }),
        Command::Codes(args) => match run_codes(args) {
            Ok(()) => 0,
            Err(error) => {
                eprintln!("error: {error:#}");
                EXIT_FATAL
            }
        },
    };
    std::process::exit(exit_code);
}

fn finish(
    outcome: anyhow::Result<RunResult>,
    report: impl FnOnce(&RunResult) -> anyhow::Result<()>,
) -> i32 {
    let result = match outcome {
        Ok(result) => result,
        Err(error) => {
            eprintln!("error: {error:#}");
            return EXIT_FATAL;
        }
    };
    if let Err(error) = report(&result) {
        eprintln!("error: {error:#}");
        return EXIT_FATAL;
    }
    if result.has_failures() {
        EXIT_FAILURES
    } else {
        0
    }
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.log_data = cli.log_data;
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
