/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Error types for template parsing and rendering.

use thiserror::Error;

/// Errors that can occur during template operations.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// Error parsing the template syntax.
    #[error("Parse error at byte {offset}: {message}")]
    ParseError {
        message: String,
        /// Byte offset of the offending tag in the template source.
        offset: usize,
    },

    /// A variable was referenced but is not defined, under
    /// [`UndefinedVariables::Error`](crate::UndefinedVariables::Error).
    #[error("Undefined variable: {name}")]
    UndefinedVariable { name: String },

    /// I/O error (e.g., reading a template file).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TemplateError {
    pub(crate) fn parse(message: impl Into<String>, offset: usize) -> Self {
        TemplateError::ParseError {
            message: message.into(),
            offset,
        }
    }
}

/// Result type for template operations.
pub type TemplateResult<T> = Result<T, TemplateError>;
