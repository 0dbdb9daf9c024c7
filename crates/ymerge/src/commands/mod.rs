//! Command implementations for the ymerge CLI
//!
//! Each command module handles the CLI interface and delegates to
//! ymerge-core for the actual merge.

pub mod merge;
