/*
 * source.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Source resolution.
//!
//! A resolver turns a source identifier into the raw text that will be
//! substituted and parsed. Each call reads the whole source and releases
//! any handle before returning.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

/// Trait for loading raw source text.
pub trait SourceResolver {
    /// Read the full text of a source.
    ///
    /// Any error is reported to the caller as a missing source.
    fn read_source(&self, path: &Path) -> io::Result<String>;
}

/// Resolver that reads sources from the filesystem.
#[derive(Debug, Clone, Default)]
pub struct FileSystemResolver;

impl SourceResolver for FileSystemResolver {
    fn read_source(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }
}

/// Resolver that serves sources from an in-memory map.
///
/// Useful for testing and for callers that already hold document text.
#[derive(Debug, Clone, Default)]
pub struct MemoryResolver {
    sources: HashMap<PathBuf, String>,
}

impl MemoryResolver {
    /// Create a new empty memory resolver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a source to the resolver.
    pub fn add(&mut self, path: impl Into<PathBuf>, content: impl Into<String>) -> &mut Self {
        self.sources.insert(path.into(), content.into());
        self
    }

    /// Create a resolver with the given sources.
    pub fn with_sources(
        sources: impl IntoIterator<Item = (impl Into<PathBuf>, impl Into<String>)>,
    ) -> Self {
        let mut resolver = Self::new();
        for (path, content) in sources {
            resolver.add(path, content);
        }
        resolver
    }
}

impl SourceResolver for MemoryResolver {
    fn read_source(&self, path: &Path) -> io::Result<String> {
        self.sources.get(path).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no in-memory source named {}", path.display()),
            )
        })
    }
}
