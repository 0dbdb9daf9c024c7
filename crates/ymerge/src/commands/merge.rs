/*
 * merge.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Merge command implementation
 */

//! Merge command implementation.
//!
//! Builds the substitution scope from the environment and `--var`
//! assignments, merges the given files in order, and writes the result to
//! stdout or `--output`.

use std::fs;
use std::io::{IsTerminal, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{debug, info};

use ymerge_core::{
    MergeError, MergeOptions, OutputFormat, UndefinedVariables, VariableScope, YamlMerger,
};

/// Arguments for the merge command
#[derive(Debug)]
pub struct MergeArgs {
    /// Files to merge, in order
    pub files: Vec<PathBuf>,
    /// Output file path (stdout when absent)
    pub output: Option<PathBuf>,
    pub format: OutputFormat,
    /// `NAME=VALUE` assignments layered over the environment
    pub vars: Vec<(String, String)>,
    /// Start from an empty scope instead of the environment
    pub no_env: bool,
    /// Fail on undefined variables
    pub strict: bool,
}

/// Execute the merge command
pub fn execute(args: MergeArgs) -> Result<()> {
    let mut scope = if args.no_env {
        VariableScope::new()
    } else {
        VariableScope::from_env()
    };
    scope.extend(args.vars);
    debug!(variables = scope.len(), "Built substitution scope");

    let options = MergeOptions {
        undefined_variables: if args.strict {
            UndefinedVariables::Error
        } else {
            UndefinedVariables::Empty
        },
    };
    let merger = YamlMerger::with_variables(scope).with_options(options);

    let merged = merger.merge_documents(&args.files)?;
    info!(files = args.files.len(), keys = merged.len(), "Merged");

    let mut text = args.format.serialize(&merged)?;
    if !text.ends_with('\n') {
        text.push('\n');
    }

    match &args.output {
        Some(path) => {
            fs::write(path, &text)
                .with_context(|| format!("Failed to write output file {}", path.display()))?;
            info!("Wrote {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(text.as_bytes())
                .and_then(|()| stdout.flush())
                .context("Failed to write to stdout")?;
        }
    }

    Ok(())
}

/// Print a failed command's error to stderr.
///
/// Errors with a position in a source get a source-annotated report.
pub fn report_error(err: &anyhow::Error) {
    let color = std::io::stderr().is_terminal();
    let report = err
        .downcast_ref::<MergeError>()
        .and_then(|merge_error| merge_error.render_report(color));

    match report {
        Some(report) => eprint!("{}", report),
        None => eprintln!("Error: {:#}", err),
    }
}
