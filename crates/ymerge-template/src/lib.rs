/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Mustache-style variable substitution for raw document text.
//!
//! Templates are compiled from plain text and rendered against any
//! [`VariableSource`]. The supported syntax is a small mustache subset:
//!
//! - Interpolation: `{{name}}`, `{{ name }}`
//! - Unescaped interpolation: `{{{name}}}`, `{{& name}}`
//! - Sections: `{{#name}}...{{/name}}` (rendered when `name` is non-empty)
//! - Inverted sections: `{{^name}}...{{/name}}` (rendered when `name` is unset or empty)
//! - Comments: `{{! comment}}`
//!
//! Rendered output is inserted verbatim. Values are never HTML-escaped,
//! so all interpolation forms behave the same.
//!
//! # Example
//!
//! ```
//! use std::collections::HashMap;
//! use ymerge_template::Template;
//!
//! let template = Template::compile("url: {{HOST}}:22133").unwrap();
//!
//! let mut vars = HashMap::new();
//! vars.insert("HOST".to_string(), "localhost".to_string());
//!
//! assert_eq!(template.render(&vars).unwrap(), "url: localhost:22133");
//! ```

pub mod ast;
pub mod context;
pub mod error;
pub mod evaluator;
pub mod parser;

pub use ast::{Comment, Literal, Section, TemplateNode, VariableRef};
pub use context::VariableSource;
pub use error::{TemplateError, TemplateResult};
pub use evaluator::{RenderOptions, UndefinedVariables};
pub use parser::Template;
