//! Refscan CLI binary
//!
//! This is the main entry point for the refscan command-line interface.
//! The CLI is a thin adapter over existing APIs - NO logic is implemented here.

use refscan::cli::{CliErrorPayload, CliSuccessPayload, Commands, OutputFormat};
use refscan::{ModuleTree, ReferenceGraph, RepositoryIndex, ScanConfig, ScanError};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

fn main() -> ExitCode {
    // Parse CLI arguments
    let cli = refscan::cli::parse_args();

    // Initialize logger if verbose
    if cli.verbose {
        env_logger::init();
    }

    // Execute command
    let result = match cli.command {
        Commands::Analyze {
            path,
            output,
            format,
            extension,
        } => execute_analyze(&path, output, format, &extension),

        Commands::Tree { file } => execute_tree(&file),
    };

    // Handle result
    match result {
        Ok(payload) => {
            if cli.json {
                print_json(&payload);
            } else {
                println!("{}", payload.message);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            if cli.json {
                print_json(&CliErrorPayload::from_error(&e));
            } else {
                eprintln!("Error: {}", e);
            }
            ExitCode::from(1)
        }
    }
}

fn print_json<T: serde::Serialize>(payload: &T) {
    match serde_json::to_string_pretty(payload) {
        Ok(text) => println!("{}", text),
        Err(e) => eprintln!("Error: {}", e),
    }
}

/// Execute the analyze command.
///
/// This function is a thin adapter that:
/// 1. Discovers and parses every module under the root
/// 2. Resolves and classifies references to every definition
/// 3. Writes the reference graph in the requested format
fn execute_analyze(
    root: &Path,
    output: Option<PathBuf>,
    format: OutputFormat,
    extension: &str,
) -> Result<CliSuccessPayload, ScanError> {
    let config = ScanConfig::new(root).with_extension(extension);
    let index = RepositoryIndex::open(config)?;
    let graph = ReferenceGraph::from_index(&index);

    let rendered = match format {
        OutputFormat::Dot => graph.to_dot(),
        OutputFormat::Json => graph.to_json()?,
    };
    let output = output.unwrap_or_else(|| format.default_output());
    std::fs::write(&output, rendered).map_err(|e| ScanError::io(&output, e))?;

    let message = format!(
        "Wrote reference graph for {} modules ({} referenced definitions) to {}",
        index.len(),
        graph.definition_count(),
        output.display()
    );
    Ok(CliSuccessPayload::with_data(
        message,
        json!({
            "modules": index.len(),
            "definitions": graph.definition_count(),
            "edges": graph.edges.len(),
            "output": output.to_string_lossy(),
        }),
    ))
}

/// Execute the tree command.
fn execute_tree(file: &Path) -> Result<CliSuccessPayload, ScanError> {
    let tree = ModuleTree::from_path(file)?;
    let rendered = tree.render_ascii();
    Ok(CliSuccessPayload::message_only(
        rendered.trim_end().to_string(),
    ))
}
