/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Error types for merging.

use thiserror::Error;
use ymerge_template::TemplateError;

/// Result type alias for ymerge-core operations.
pub type Result<T> = std::result::Result<T, MergeError>;

/// Errors that can occur while merging documents.
///
/// Every variant aborts the whole merge; no partial result is returned.
#[derive(Debug, Error)]
pub enum MergeError {
    /// The source could not be read.
    #[error("YAML file to merge not found: {document}")]
    NotFound {
        document: String,
        #[source]
        source: std::io::Error,
    },

    /// Placeholder syntax error, or an undefined variable in strict mode.
    #[error("Variable substitution failed in {document}: {source}")]
    Template {
        document: String,
        /// Raw (pre-substitution) text, kept for diagnostics.
        text: String,
        #[source]
        source: TemplateError,
    },

    /// The substituted text is not valid YAML.
    #[error("Failed to parse YAML in {document}: {message}")]
    Parse {
        document: String,
        message: String,
        /// 1-based line of the error, when known.
        line: Option<usize>,
        /// 1-based column of the error, when known.
        column: Option<usize>,
        /// Byte offset of the error in `text`, when known.
        offset: Option<usize>,
        /// Substituted text that failed to parse.
        text: String,
    },

    /// A document root is neither a mapping nor null.
    #[error("Document root must be a mapping, found {found} in {document}")]
    NotAMapping { document: String, found: String },

    /// Structural type clash at a key.
    #[error("{message}: {key}{}", document_suffix(.document))]
    IncompatibleMerge {
        /// Dotted key path, e.g. `database.properties`.
        key: String,
        message: &'static str,
        document: Option<String>,
    },

    /// A parsed value is not one of null, scalar, sequence or mapping.
    #[error("Cannot merge element of unsupported type: {key}: {kind}{}", document_suffix(.document))]
    UnsupportedType {
        key: String,
        kind: String,
        document: Option<String>,
    },

    /// The merged result could not be emitted as YAML.
    #[error("Failed to serialize YAML: {0}")]
    Serialize(#[from] serde_yaml::Error),

    /// The merged result could not be emitted as JSON.
    #[error("Failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl MergeError {
    /// Attach the source name to errors raised by the tree merge.
    ///
    /// Errors that already name a document are returned unchanged.
    pub fn in_document(self, name: &str) -> Self {
        match self {
            MergeError::IncompatibleMerge {
                key,
                message,
                document: None,
            } => MergeError::IncompatibleMerge {
                key,
                message,
                document: Some(name.to_string()),
            },
            MergeError::UnsupportedType {
                key,
                kind,
                document: None,
            } => MergeError::UnsupportedType {
                key,
                kind,
                document: Some(name.to_string()),
            },
            other => other,
        }
    }

    /// The key path responsible for a structural error.
    pub fn key(&self) -> Option<&str> {
        match self {
            MergeError::IncompatibleMerge { key, .. } | MergeError::UnsupportedType { key, .. } => {
                Some(key)
            }
            _ => None,
        }
    }

    /// The source document responsible for this error, when known.
    pub fn document(&self) -> Option<&str> {
        match self {
            MergeError::NotFound { document, .. }
            | MergeError::Template { document, .. }
            | MergeError::Parse { document, .. }
            | MergeError::NotAMapping { document, .. } => Some(document),
            MergeError::IncompatibleMerge { document, .. }
            | MergeError::UnsupportedType { document, .. } => document.as_deref(),
            MergeError::Serialize(_) | MergeError::Json(_) => None,
        }
    }
}

fn document_suffix(document: &Option<String>) -> String {
    match document {
        Some(document) => format!(" (in {})", document),
        None => String::new(),
    }
}
