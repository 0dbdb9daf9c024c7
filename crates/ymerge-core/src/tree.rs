/*
 * tree.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! The recursive merge policy.
//!
//! Incoming mappings are folded into an accumulator key by key:
//!
//! | existing             | incoming  | result                       |
//! |----------------------|-----------|------------------------------|
//! | any                  | null      | null                         |
//! | absent or null       | any       | incoming inserted            |
//! | mapping              | mapping   | deep merge                   |
//! | scalar or sequence   | mapping   | `IncompatibleMerge`          |
//! | sequence             | sequence  | incoming appended            |
//! | non-sequence         | sequence  | `IncompatibleMerge`          |
//! | any                  | scalar    | incoming replaces existing   |
//! | any                  | tagged    | `UnsupportedType`            |
//!
//! Scalar-over-mapping is allowed while mapping-over-scalar is an error.
//! That asymmetry is intentional and must be kept.
//!
//! New keys are appended; overwritten keys keep their original position.

use crate::error::{MergeError, Result};
use serde_yaml::{Mapping, Value};
use std::fmt;
use tracing::debug;

/// Merge `incoming` into `accumulator` in place.
///
/// Errors name the offending key path but no document; the engine attaches
/// the document name with [`MergeError::in_document`].
pub fn merge_into(accumulator: &mut Mapping, incoming: Mapping) -> Result<()> {
    let mut path = KeyPath::default();
    merge_mapping(accumulator, incoming, &mut path)
}

/// Human-readable name of a value's kind, used in error messages.
pub fn kind_name(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(_) => "boolean".to_string(),
        Value::Number(n) if n.is_f64() => "float".to_string(),
        Value::Number(_) => "integer".to_string(),
        Value::String(_) => "string".to_string(),
        Value::Sequence(_) => "sequence".to_string(),
        Value::Mapping(_) => "mapping".to_string(),
        Value::Tagged(tagged) => format!("tagged value `{}`", tagged.tag),
    }
}

fn merge_mapping(accumulator: &mut Mapping, incoming: Mapping, path: &mut KeyPath) -> Result<()> {
    for (key, value) in incoming {
        path.push(Segment::Key(key_label(&key)));
        merge_entry(accumulator, key, value, path)?;
        path.pop();
    }
    Ok(())
}

fn merge_entry(accumulator: &mut Mapping, key: Value, incoming: Value, path: &mut KeyPath) -> Result<()> {
    match incoming {
        Value::Null => {
            debug!(key = %path, "Setting null value");
            accumulator.insert(key, Value::Null);
            Ok(())
        }
        tagged @ Value::Tagged(_) => Err(unsupported(path, &tagged)),
        incoming => match accumulator.get_mut(&key) {
            Some(existing) if !existing.is_null() => merge_existing(existing, incoming, path),
            _ => {
                ensure_supported(&incoming, path)?;
                debug!(key = %path, value = ?incoming, "Adding new key");
                accumulator.insert(key, incoming);
                Ok(())
            }
        },
    }
}

/// Merge a non-null, supported incoming value into a non-null existing one.
fn merge_existing(existing: &mut Value, incoming: Value, path: &mut KeyPath) -> Result<()> {
    match incoming {
        Value::Mapping(incoming) => match existing {
            Value::Mapping(existing) => merge_mapping(existing, incoming, path),
            Value::Sequence(_) => Err(incompatible(
                path,
                "cannot merge a structured value into a list",
            )),
            _ => Err(incompatible(
                path,
                "cannot merge a structured value into a simple one",
            )),
        },
        Value::Sequence(items) => match existing {
            Value::Sequence(existing) => {
                for (index, item) in items.iter().enumerate() {
                    path.push(Segment::Index(existing.len() + index));
                    ensure_supported(item, path)?;
                    path.pop();
                }
                debug!(key = %path, appended = items.len(), "Concatenating lists");
                existing.extend(items);
                Ok(())
            }
            _ => Err(incompatible(path, "cannot merge a list with a non-list")),
        },
        scalar => {
            debug!(key = %path, value = ?scalar, "Overriding value");
            *existing = scalar;
            Ok(())
        }
    }
}

/// Reject tagged values anywhere inside a subtree that is about to be
/// moved into the accumulator wholesale.
fn ensure_supported(value: &Value, path: &mut KeyPath) -> Result<()> {
    match value {
        Value::Tagged(_) => Err(unsupported(path, value)),
        Value::Sequence(items) => {
            for (index, item) in items.iter().enumerate() {
                path.push(Segment::Index(index));
                ensure_supported(item, path)?;
                path.pop();
            }
            Ok(())
        }
        Value::Mapping(entries) => {
            for (key, item) in entries {
                path.push(Segment::Key(key_label(key)));
                ensure_supported(item, path)?;
                path.pop();
            }
            Ok(())
        }
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => Ok(()),
    }
}

fn incompatible(path: &KeyPath, message: &'static str) -> MergeError {
    MergeError::IncompatibleMerge {
        key: path.to_string(),
        message,
        document: None,
    }
}

fn unsupported(path: &KeyPath, value: &Value) -> MergeError {
    MergeError::UnsupportedType {
        key: path.to_string(),
        kind: kind_name(value),
        document: None,
    }
}

/// Render a mapping key for use in a key path.
fn key_label(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "~".to_string(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().replace('\n', " "))
            .unwrap_or_else(|_| kind_name(other)),
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Key(String),
    Index(usize),
}

/// Keys that would read as path syntax are written as `["a.b"]`.
fn needs_brackets(key: &str) -> bool {
    key.is_empty() || key.contains(['.', '[', ']', '"'])
}

/// Location of the value being merged: `database.hosts[2].name`.
#[derive(Debug, Clone, Default)]
struct KeyPath {
    segments: Vec<Segment>,
}

impl KeyPath {
    fn push(&mut self, segment: Segment) {
        self.segments.push(segment);
    }

    fn pop(&mut self) {
        self.segments.pop();
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Key(key) if needs_brackets(key) => write!(f, "[{:?}]", key)?,
                Segment::Key(key) if i == 0 => write!(f, "{}", key)?,
                Segment::Key(key) => write!(f, ".{}", key)?,
                Segment::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}
