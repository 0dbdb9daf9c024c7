/*
 * emit.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Serializing a merged tree.

use crate::error::Result;
use serde_yaml::Mapping;

/// Output format for a merged tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

impl OutputFormat {
    /// Serialize `merged` in this format.
    pub fn serialize(self, merged: &Mapping) -> Result<String> {
        match self {
            OutputFormat::Yaml => to_yaml_string(merged),
            OutputFormat::Json => to_json_string(merged),
        }
    }
}

/// Serialize a merged tree as block-style YAML.
///
/// Key order follows the tree's insertion order.
pub fn to_yaml_string(merged: &Mapping) -> Result<String> {
    Ok(serde_yaml::to_string(merged)?)
}

/// Serialize a merged tree as pretty-printed JSON.
///
/// Fails if the tree holds a mapping key that is not a scalar.
pub fn to_json_string(merged: &Mapping) -> Result<String> {
    Ok(serde_json::to_string_pretty(merged)?)
}
