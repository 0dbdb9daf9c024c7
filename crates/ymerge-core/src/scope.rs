/*
 * scope.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Substitution variable scope.
//!
//! An ordered name → value mapping consulted when placeholders in raw
//! source text are rendered. The merge engine never writes to it while a
//! merge runs; callers replace it wholesale through
//! [`YamlMerger::set_variables`](crate::YamlMerger::set_variables).

use indexmap::IndexMap;
use tracing::trace;
use ymerge_template::VariableSource;

/// Ordered mapping from variable name to substitution value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableScope {
    variables: IndexMap<String, String>,
}

impl VariableScope {
    /// Create an empty scope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a scope holding every current process environment variable.
    ///
    /// Entries whose name or value is not valid Unicode are skipped.
    pub fn from_env() -> Self {
        let mut scope = Self::new();
        for (name, value) in std::env::vars_os() {
            match (name.into_string(), value.into_string()) {
                (Ok(name), Ok(value)) => {
                    scope.insert(name, value);
                }
                (name, _) => {
                    trace!(name = ?name, "Skipping non-Unicode environment variable");
                }
            }
        }
        trace!(count = scope.len(), "Seeded variable scope from environment");
        scope
    }

    /// Set a variable, returning the previous value if there was one.
    ///
    /// Overwriting keeps the variable's original position.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.variables.insert(name.into(), value.into())
    }

    /// Get a variable's value.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.variables.get(name).map(String::as_str)
    }

    /// Number of variables.
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// Check if the scope has no variables.
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Iterate over `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.variables
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }
}

impl VariableSource for VariableScope {
    fn lookup(&self, name: &str) -> Option<&str> {
        self.get(name)
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for VariableScope {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (name, value) in iter {
            self.insert(name, value);
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for VariableScope {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut scope = Self::new();
        scope.extend(iter);
        scope
    }
}
