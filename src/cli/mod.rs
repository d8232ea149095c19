//! Command-line interface for Refscan.
//!
//! This module handles argument parsing and user interface only.
//! NO analysis is performed here.

use clap::Parser;
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;

/// Refscan: cross-reference scanner for Python classes and functions.
#[derive(Parser, Debug)]
#[command(name = "refscan")]
#[command(author, version, about, long_about = None)]
#[command(subcommand_required = true)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print results and errors as JSON payloads.
    #[arg(long, global = true)]
    pub json: bool,
}

/// Available Refscan commands.
#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Analyze a repository and write its reference graph.
    Analyze {
        /// Repository root to scan.
        path: PathBuf,

        /// Output file (defaults to ref_graph.dot or ref_graph.json).
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Dot)]
        format: OutputFormat,

        /// Module file extension.
        #[arg(long, default_value = crate::ingest::detect::PYTHON_EXTENSION)]
        extension: String,
    },

    /// Print the navigable tree of one module.
    Tree {
        /// Path to the source file.
        file: PathBuf,
    },
}

/// Reference graph output format.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Graphviz DOT.
    Dot,
    /// JSON node/edge lists.
    Json,
}

impl OutputFormat {
    /// File extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Dot => "dot",
            OutputFormat::Json => "json",
        }
    }

    /// Default output path for this format.
    pub fn default_output(&self) -> PathBuf {
        PathBuf::from(format!(
            "{}.{}",
            crate::graph::DEFAULT_GRAPH_NAME,
            self.extension()
        ))
    }
}

/// Parse command-line arguments.
///
/// This function is the entry point for CLI argument parsing.
/// It returns the parsed Cli struct or exits on error.
pub fn parse_args() -> Cli {
    Cli::parse()
}

/// JSON success payload for CLI responses.
#[derive(Serialize)]
pub struct CliSuccessPayload {
    /// Status indicator ("ok").
    pub status: &'static str,
    /// Human-readable message.
    pub message: String,
    /// Optional structured data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl CliSuccessPayload {
    /// Construct a payload containing only the message.
    pub fn message_only(message: String) -> Self {
        Self {
            status: "ok",
            message,
            data: None,
        }
    }

    /// Construct a payload with structured data.
    pub fn with_data(message: String, data: Value) -> Self {
        Self {
            status: "ok",
            message,
            data: Some(data),
        }
    }
}

/// JSON error payload for CLI responses.
#[derive(Serialize)]
pub struct CliErrorPayload {
    /// Status indicator ("error").
    pub status: &'static str,
    /// Structured error details.
    pub error: ErrorDetails,
}

/// Details for a CLI error payload.
#[derive(Serialize)]
pub struct ErrorDetails {
    /// Error kind identifier (Syntax, Io, etc.).
    pub kind: &'static str,
    /// Human-readable message.
    pub message: String,
    /// Optional file context.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

impl CliErrorPayload {
    /// Build payload from a ScanError instance.
    pub fn from_error(error: &crate::ScanError) -> Self {
        CliErrorPayload {
            status: "error",
            error: ErrorDetails {
                kind: error.kind(),
                message: error.to_string(),
                file: error.file().map(|p| p.to_string_lossy().to_string()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_analyze_defaults() {
        let cli = Cli::try_parse_from(["refscan", "analyze", "/repo"]).expect("parse");
        match cli.command {
            Commands::Analyze {
                path,
                output,
                format,
                extension,
            } => {
                assert_eq!(path, Path::new("/repo"));
                assert!(output.is_none());
                assert_eq!(format, OutputFormat::Dot);
                assert_eq!(extension, "py");
                assert_eq!(format.default_output(), Path::new("ref_graph.dot"));
            }
            other => panic!("unexpected command {:?}", other),
        }
        assert!(!cli.verbose);
    }

    #[test]
    fn test_tree_with_global_flags() {
        let cli = Cli::try_parse_from(["refscan", "tree", "mod.py", "-v", "--json"])
            .expect("parse");
        assert!(cli.verbose);
        assert!(cli.json);
        assert!(matches!(cli.command, Commands::Tree { .. }));
    }

    #[test]
    fn test_error_payload() {
        let err = crate::ScanError::Syntax {
            file: PathBuf::from("/repo/bad.py"),
            line: 2,
            column: 5,
        };
        let payload = serde_json::to_value(CliErrorPayload::from_error(&err)).expect("json");
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error"]["kind"], "Syntax");
        assert_eq!(payload["error"]["file"], "/repo/bad.py");
    }
}
