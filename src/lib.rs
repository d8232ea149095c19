//! Refscan: cross-reference scanner for Python code.
//!
//! This library parses every module of a repository with tree-sitter, wraps
//! each syntax tree in a navigable tree, and pairs class and function
//! definitions with the classified syntactic references to their names.

#![warn(missing_docs)]
// env_logger is used by src/main.rs (binary), not this library
#![expect(unused_crate_dependencies)]

pub mod cli;
pub mod error;
pub mod graph;
pub mod index;
pub mod ingest;
pub mod resolve;
pub mod tree;

/// Re-export common error types for convenience.
pub use error::{Result, ScanError};

/// Re-export the main entry points for convenience.
pub use graph::ReferenceGraph;
pub use index::RepositoryIndex;
pub use ingest::ScanConfig;
pub use resolve::{ReferenceKind, ReferenceRecord};
pub use tree::{ModuleTree, NodeRef};

/// Refscan version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
