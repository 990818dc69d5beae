//! CLI argument definitions for the OpenCitations validator.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "ocv",
    version,
    about = "Validate OpenCitations META-CSV and CITS-CSV tables",
    long_about = "Validate bibliographic entity and citation tables.\n\n\
                  Checks identifiers, dates, names, page ranges and vocabulary terms,\n\
                  cross-checks citations against entities and writes a browsable HTML report."
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
}

#[derive(Subcommand)]
pub enum Command {
    /// Validate entity and/or citation tables.
    Validate(ValidateArgs),

    /// List the registered tables and their columns.
    Schema(SchemaArgs),
}

#[derive(Parser)]
pub struct ValidateArgs {
    /// Input CSV files; the table kind is detected from the header.
    #[arg(value_name = "INPUT", required_unless_present_any = ["entities", "citations"])]
    pub inputs: Vec<PathBuf>,

    /// Entity table (META-CSV), skipping kind detection.
    #[arg(long = "entities", value_name = "PATH")]
    pub entities: Option<PathBuf>,

    /// Citation table (CITS-CSV), skipping kind detection.
    #[arg(long = "citations", value_name = "PATH")]
    pub citations: Option<PathBuf>,

    /// Schema document replacing the embedded OpenCitations schema.
    #[arg(long = "schema", value_name = "PATH")]
    pub schema: Option<PathBuf>,

    /// HTML report output path.
    #[arg(
        long = "report",
        short = 'o',
        value_name = "PATH",
        default_value = "validation_report.html"
    )]
    pub report: PathBuf,

    /// Also write the report as JSON.
    #[arg(long = "json", value_name = "PATH")]
    pub json: Option<PathBuf>,

    /// Skip external identifier lookups.
    #[arg(long = "offline")]
    pub offline: bool,

    /// Validate rows on all available cores.
    #[arg(long = "parallel")]
    pub parallel: bool,

    /// Timeout for each external lookup, in seconds.
    #[arg(long = "timeout", value_name = "SECS")]
    pub timeout: Option<u64>,
}

#[derive(Parser)]
pub struct SchemaArgs {
    /// Schema document to list instead of the embedded one.
    #[arg(long = "schema", value_name = "PATH")]
    pub schema: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn validate_accepts_kind_overrides_without_inputs() {
        let cli = Cli::try_parse_from([
            "ocv",
            "validate",
            "--citations",
            "cits.csv",
            "--offline",
            "--timeout",
            "3",
        ])
        .expect("parse");
        let Command::Validate(args) = cli.command else {
            panic!("expected validate");
        };
        assert!(args.inputs.is_empty());
        assert_eq!(args.citations, Some(PathBuf::from("cits.csv")));
        assert!(args.offline);
        assert_eq!(args.timeout, Some(3));
        assert_eq!(args.report, PathBuf::from("validation_report.html"));
    }

    #[test]
    fn validate_requires_some_table() {
        assert!(Cli::try_parse_from(["ocv", "validate"]).is_err());
    }

    #[test]
    fn log_flags_are_global() {
        let cli = Cli::try_parse_from(["ocv", "schema", "--log-format", "json"]).expect("parse");
        assert!(matches!(cli.log_format, LogFormatArg::Json));
        assert!(matches!(cli.command, Command::Schema(_)));
    }
}
