/*
 * context.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Variable lookup for template rendering.
//!
//! Templates only ever see flat string values. Callers hand in whatever
//! mapping they hold; the substitution scope in `ymerge-core` implements
//! [`VariableSource`] directly.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

/// A source of template variable values.
pub trait VariableSource {
    /// Look up a variable by name.
    ///
    /// Returns `None` when the variable is not defined.
    fn lookup(&self, name: &str) -> Option<&str>;

    /// Check whether a variable is defined.
    fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }
}

impl<S: BuildHasher> VariableSource for HashMap<String, String, S> {
    fn lookup(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

impl VariableSource for BTreeMap<String, String> {
    fn lookup(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}
