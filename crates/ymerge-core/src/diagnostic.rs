/*
 * diagnostic.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Source-annotated error reports.
//!
//! Errors that carry a position in a source's text are rendered with
//! ariadne, showing the offending line with a label under the location.

use crate::error::MergeError;
use ariadne::{Color, Config, Label, Report, ReportKind, Source};
use std::ops::Range;
use ymerge_template::TemplateError;

impl MergeError {
    /// Render a source-annotated report for this error.
    ///
    /// Returns `None` for errors without a position in the source text;
    /// callers fall back to the `Display` message for those.
    pub fn render_report(&self, color: bool) -> Option<String> {
        match self {
            MergeError::Parse {
                document,
                message,
                offset: Some(offset),
                text,
                ..
            } => render(document, text, *offset, "Failed to parse YAML", message, color),
            MergeError::Template {
                document,
                text,
                source: TemplateError::ParseError { message, offset },
            } => render(
                document,
                text,
                *offset,
                "Invalid variable placeholder",
                message,
                color,
            ),
            _ => None,
        }
    }
}

fn render(
    document: &str,
    text: &str,
    byte_offset: usize,
    title: &str,
    problem: &str,
    color: bool,
) -> Option<String> {
    let id = document.to_string();
    let span = char_span(text, byte_offset);

    let report = Report::build(ReportKind::Error, id.clone(), span.start)
        .with_config(Config::default().with_color(color))
        .with_message(title)
        .with_label(
            Label::new((id.clone(), span))
                .with_message(problem)
                .with_color(Color::Red),
        )
        .finish();

    let mut output = Vec::new();
    report
        .write((id, Source::from(text)), &mut output)
        .ok()?;
    String::from_utf8(output).ok()
}

/// ariadne spans count characters, not bytes.
fn char_span(text: &str, byte_offset: usize) -> Range<usize> {
    let start = text
        .char_indices()
        .take_while(|(index, _)| *index < byte_offset)
        .count();
    let end = (start + 1).min(text.chars().count());
    start.min(end)..end
}
