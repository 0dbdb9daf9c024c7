//! ymerge CLI - Main entry point

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "ymerge")]
#[command(version)]
#[command(about = "Merge YAML files, later files overriding earlier ones", long_about = None)]
struct Cli {
    /// YAML files to merge, in order
    #[arg(required = true, value_name = "FILE")]
    files: Vec<PathBuf>,

    /// Write output to FILE instead of stdout
    #[arg(short = 'o', long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = Format::Yaml)]
    format: Format,

    /// Substitution variable (NAME=VALUE), overriding the environment
    #[arg(short = 'D', long = "var", value_name = "NAME=VALUE", value_parser = parse_assignment)]
    vars: Vec<(String, String)>,

    /// Do not seed substitution variables from the environment
    #[arg(long)]
    no_env: bool,

    /// Fail on placeholders naming undefined variables
    #[arg(long)]
    strict: bool,

    /// Increase log verbosity (-v, -vv)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Yaml,
    Json,
}

impl From<Format> for ymerge_core::OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Yaml => ymerge_core::OutputFormat::Yaml,
            Format::Json => ymerge_core::OutputFormat::Json,
        }
    }
}

fn parse_assignment(arg: &str) -> Result<(String, String), String> {
    match arg.split_once('=') {
        Some((name, _)) if name.is_empty() => Err("variable name must not be empty".to_string()),
        Some((name, value)) => Ok((name.to_string(), value.to_string())),
        None => Err(format!("expected NAME=VALUE, got `{}`", arg)),
    }
}

fn default_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "ymerge=warn,ymerge_core=warn",
        1 => "ymerge=info,ymerge_core=debug",
        _ => "ymerge=trace,ymerge_core=trace",
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr so stdout carries only the merged document
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter(cli.verbose).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = commands::merge::MergeArgs {
        files: cli.files,
        output: cli.output,
        format: cli.format.into(),
        vars: cli.vars,
        no_env: cli.no_env,
        strict: cli.strict,
    };

    match commands::merge::execute(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            commands::merge::report_error(&err);
            ExitCode::FAILURE
        }
    }
}
