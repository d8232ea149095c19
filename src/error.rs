//! Refscan error types.
//!
//! All errors are typed and provide root cause information.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Main error type for Refscan operations.
#[derive(Error, Debug)]
pub enum ScanError {
    /// I/O error during file operations.
    #[error("I/O error for path {path}: {source}")]
    Io {
        /// The file path that caused the I/O error.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Tree-sitter could not produce a tree for the file.
    #[error("Parse error in {file}: {message}")]
    Parse {
        /// The file that failed to parse.
        file: PathBuf,
        /// The parse error message.
        message: String,
    },

    /// The source contains invalid syntax.
    #[error("Syntax error in {file} at line {line}, column {column}")]
    Syntax {
        /// The file that failed to parse.
        file: PathBuf,
        /// Line of the first invalid token (1-based).
        line: usize,
        /// Column of the first invalid token (1-based).
        column: usize,
    },

    /// Module discovery failed.
    #[error("Cannot discover modules under {root}: {message}")]
    Discovery {
        /// The repository root being scanned.
        root: PathBuf,
        /// What went wrong.
        message: String,
    },

    /// A caller broke an API precondition.
    #[error("Contract violation: {0}")]
    ContractViolation(String),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{0}")]
    Other(String),
}

impl ScanError {
    /// Create an I/O error bound to a path.
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        ScanError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Whether this error means a source file could not be parsed.
    pub fn is_parse_error(&self) -> bool {
        matches!(self, ScanError::Parse { .. } | ScanError::Syntax { .. })
    }

    /// Stable identifier of the error variant.
    pub fn kind(&self) -> &'static str {
        match self {
            ScanError::Io { .. } => "Io",
            ScanError::Parse { .. } => "Parse",
            ScanError::Syntax { .. } => "Syntax",
            ScanError::Discovery { .. } => "Discovery",
            ScanError::ContractViolation(_) => "ContractViolation",
            ScanError::Json(_) => "Json",
            ScanError::Other(_) => "Other",
        }
    }

    /// The file this error names, if any.
    pub fn file(&self) -> Option<&Path> {
        match self {
            ScanError::Io { path, .. } => Some(path),
            ScanError::Parse { file, .. } | ScanError::Syntax { file, .. } => Some(file),
            ScanError::Discovery { root, .. } => Some(root),
            _ => None,
        }
    }
}

/// Result type alias for Refscan operations.
pub type Result<T> = std::result::Result<T, ScanError>;
