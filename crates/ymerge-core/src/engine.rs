/*
 * engine.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! The merge engine.
//!
//! For each source, in the order given:
//!
//! 1. read the raw text through the configured [`SourceResolver`]
//! 2. render `{{placeholders}}` in the raw text against the [`VariableScope`]
//! 3. parse the substituted text as a YAML stream
//! 4. merge every document of the stream into the accumulator
//!
//! Substitution and parsing are strictly sequential passes, so a variable
//! may expand into text carrying YAML structure (`host:port`, flow lists, ...).

use crate::emit::to_yaml_string;
use crate::error::{MergeError, Result};
use crate::scope::VariableScope;
use crate::source::{FileSystemResolver, SourceResolver};
use crate::tree::{kind_name, merge_into};
use serde::Deserialize;
use serde_yaml::{Mapping, Value};
use std::fmt;
use std::path::Path;
use tracing::debug;
use ymerge_template::{RenderOptions, Template, UndefinedVariables, VariableSource};

/// Options controlling a merge.
#[derive(Debug, Clone, Default)]
pub struct MergeOptions {
    /// Treatment of placeholders naming undefined variables.
    pub undefined_variables: UndefinedVariables,
}

/// Merges an ordered list of YAML sources into one mapping.
///
/// The accumulator lives only for the duration of one
/// [`merge_documents`](Self::merge_documents) call.
pub struct YamlMerger {
    scope: VariableScope,
    resolver: Box<dyn SourceResolver>,
    options: MergeOptions,
}

impl Default for YamlMerger {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for YamlMerger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("YamlMerger")
            .field("variables", &self.scope.len())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl YamlMerger {
    /// Create a merger whose scope is the current process environment,
    /// reading sources from the filesystem.
    pub fn new() -> Self {
        Self::with_variables(VariableScope::from_env())
    }

    /// Create a merger with an explicit scope, reading sources from the
    /// filesystem.
    pub fn with_variables(scope: VariableScope) -> Self {
        Self {
            scope,
            resolver: Box::new(FileSystemResolver),
            options: MergeOptions::default(),
        }
    }

    /// Use a different source resolver.
    pub fn with_resolver(mut self, resolver: impl SourceResolver + 'static) -> Self {
        self.resolver = Box::new(resolver);
        self
    }

    /// Use different merge options.
    pub fn with_options(mut self, options: MergeOptions) -> Self {
        self.options = options;
        self
    }

    /// Replace the entire substitution scope.
    pub fn set_variables(&mut self, scope: VariableScope) -> &mut Self {
        self.scope = scope;
        self
    }

    /// The current substitution scope.
    pub fn variables(&self) -> &VariableScope {
        &self.scope
    }

    /// Merge the given sources, in order, into a new mapping.
    ///
    /// # Errors
    ///
    /// The first failing source aborts the whole merge.
    pub fn merge_documents<P: AsRef<Path>>(&self, sources: &[P]) -> Result<Mapping> {
        let mut merged = Mapping::new();
        for source in sources {
            let path = source.as_ref();
            let document = path.display().to_string();
            let text = self
                .resolver
                .read_source(path)
                .map_err(|source| MergeError::NotFound {
                    document: document.clone(),
                    source,
                })?;
            self.merge_text(&document, &text, &mut merged)?;
        }
        Ok(merged)
    }

    /// Merge the given sources and serialize the result as YAML.
    pub fn merge_to_string<P: AsRef<Path>>(&self, sources: &[P]) -> Result<String> {
        to_yaml_string(&self.merge_documents(sources)?)
    }

    /// Substitute, parse and merge one source's raw text into `accumulator`.
    ///
    /// `document` names the source in errors and logs.
    ///
    /// # Errors
    ///
    /// Fails on the same conditions as [`merge_documents`](Self::merge_documents).
    /// A failure while merging leaves `accumulator` partly updated: keys merged
    /// before the offending one stay merged. Callers that need the previous state
    /// must merge into a clone.
    pub fn merge_text(&self, document: &str, text: &str, accumulator: &mut Mapping) -> Result<()> {
        let substituted = self.substitute(document, text)?;
        let trees = parse_documents(document, &substituted)?;
        debug!(document, documents = trees.len(), "Loaded YAML");

        for tree in trees {
            merge_into(accumulator, tree).map_err(|err| err.in_document(document))?;
        }
        Ok(())
    }

    fn substitute(&self, document: &str, text: &str) -> Result<String> {
        let template_error = |source| MergeError::Template {
            document: document.to_string(),
            text: text.to_string(),
            source,
        };

        let template = Template::compile(text).map_err(template_error)?;
        for name in template.variables() {
            if !self.scope.contains(name) {
                debug!(document, variable = name, "Placeholder names an undefined variable");
            }
        }

        let options = RenderOptions {
            undefined: self.options.undefined_variables,
        };
        template
            .render_with(&self.scope, &options)
            .map_err(template_error)
    }
}

/// Parse a YAML stream into its document mappings.
///
/// Empty and null documents contribute nothing, which is the same as
/// contributing an empty mapping.
fn parse_documents(document: &str, text: &str) -> Result<Vec<Mapping>> {
    let mut trees = Vec::new();
    for deserializer in serde_yaml::Deserializer::from_str(text) {
        let mut value =
            Value::deserialize(deserializer).map_err(|err| parse_error(document, text, &err))?;
        // Expand `<<: *anchor` merge keys before layering.
        value
            .apply_merge()
            .map_err(|err| parse_error(document, text, &err))?;
        match value {
            Value::Null => {}
            Value::Mapping(tree) => trees.push(tree),
            other => {
                return Err(MergeError::NotAMapping {
                    document: document.to_string(),
                    found: kind_name(&other),
                });
            }
        }
    }
    Ok(trees)
}

fn parse_error(document: &str, text: &str, err: &serde_yaml::Error) -> MergeError {
    let location = err.location();
    MergeError::Parse {
        document: document.to_string(),
        message: err.to_string(),
        line: location.as_ref().map(|l| l.line()),
        column: location.as_ref().map(|l| l.column()),
        offset: location.as_ref().map(|l| l.index()),
        text: text.to_string(),
    }
}
