/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Layered YAML merging.
//!
//! Merges an ordered list of YAML sources into one tree. Later sources
//! override scalars, extend sequences and deep-merge mappings of earlier
//! ones. Before a source is parsed, `{{name}}` placeholders in its raw
//! text are replaced from a [`VariableScope`] (by default the process
//! environment).
//!
//! # Example
//!
//! ```
//! use ymerge_core::{MemoryResolver, Value, VariableScope, YamlMerger};
//!
//! let scope: VariableScope = [("ENV_VAR", "localhost")].into_iter().collect();
//! let merger = YamlMerger::with_variables(scope).with_resolver(MemoryResolver::with_sources([
//!     ("base.yml", "memcache:\n  host: {{ENV_VAR}}:22133\n  pool: [a]\n"),
//!     ("override.yml", "memcache:\n  pool: [b]\n"),
//! ]));
//!
//! let merged = Value::Mapping(merger.merge_documents(&["base.yml", "override.yml"]).unwrap());
//! assert_eq!(merged["memcache"]["host"].as_str(), Some("localhost:22133"));
//! assert_eq!(merged["memcache"]["pool"], Value::from(vec!["a", "b"]));
//! ```

pub mod diagnostic;
pub mod emit;
pub mod engine;
pub mod error;
pub mod scope;
pub mod source;
pub mod tree;

pub use emit::{OutputFormat, to_json_string, to_yaml_string};
pub use engine::{MergeOptions, YamlMerger};
pub use error::{MergeError, Result};
pub use scope::VariableScope;
pub use source::{FileSystemResolver, MemoryResolver, SourceResolver};
pub use tree::{kind_name, merge_into};

pub use serde_yaml::{Mapping, Value};
pub use ymerge_template::UndefinedVariables;
