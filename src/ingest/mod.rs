//! Filesystem → tree-sitter → syntax node ingestion.
//!
//! Discovery enumerates module files, the Python frontend parses each one
//! with tree-sitter and lowers it into the [`syntax::SyntaxNode`] model the
//! tree builder consumes.

pub mod detect;
pub mod python;
pub mod syntax;

pub use detect::{discover_modules, ScanConfig};
pub use python::{parse_python_file, parse_python_module};
pub use syntax::{NodeKind, Span, SyntaxNode};
