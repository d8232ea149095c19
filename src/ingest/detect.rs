//! Source module discovery.
//!
//! Table-driven: a file is a module when its extension equals the
//! configured one. Extensions are compared case-sensitively and file
//! contents are never inspected.

use crate::error::{Result, ScanError};
use glob::{glob, Pattern};
use std::path::{Path, PathBuf};

/// Canonical extension of Python source files.
pub const PYTHON_EXTENSION: &str = "py";

/// Where to look for modules and which files count as modules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    /// Repository root.
    pub root: PathBuf,
    /// Module file extension, without the dot.
    pub extension: String,
}

impl ScanConfig {
    /// Scan `root` for Python modules.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extension: PYTHON_EXTENSION.to_string(),
        }
    }

    /// Use a different module extension.
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into().trim_start_matches('.').to_string();
        self
    }

    /// Whether `path` has the configured extension.
    ///
    /// # Examples
    ///
    /// ```
    /// # use refscan::ingest::detect::ScanConfig;
    /// # use std::path::Path;
    /// let config = ScanConfig::new("/repo");
    /// assert!(config.is_module(Path::new("pkg/models.py")));
    /// assert!(!config.is_module(Path::new("README.md")));
    /// ```
    pub fn is_module(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e == self.extension)
    }
}

/// Recursively enumerate module files under the configured root.
///
/// Returns absolute paths. Ordering across directories is not part of the
/// contract.
pub fn discover_modules(config: &ScanConfig) -> Result<Vec<PathBuf>> {
    let root = std::fs::canonicalize(&config.root).map_err(|e| ScanError::io(&config.root, e))?;
    if !root.is_dir() {
        return Err(ScanError::Discovery {
            root,
            message: "not a directory".to_string(),
        });
    }

    let root_str = root.to_str().ok_or_else(|| ScanError::Discovery {
        root: root.clone(),
        message: "path is not valid UTF-8".to_string(),
    })?;
    let pattern = format!(
        "{}/**/*.{}",
        Pattern::escape(root_str),
        Pattern::escape(&config.extension)
    );

    let entries = glob(&pattern).map_err(|e| ScanError::Discovery {
        root: root.clone(),
        message: format!("Invalid glob pattern: {}", e),
    })?;

    let mut modules = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| ScanError::Discovery {
            root: root.clone(),
            message: format!("Glob iteration error: {}", e),
        })?;
        if path.is_file() && config.is_module(&path) {
            modules.push(path);
        }
    }

    log::debug!("discovered {} modules under {}", modules.len(), root.display());
    Ok(modules)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_is_module() {
        let config = ScanConfig::new("/repo");
        assert!(config.is_module(Path::new("main.py")));
        assert!(config.is_module(Path::new("/usr/local/lib/script.py")));
        assert!(!config.is_module(Path::new("main.rs")));
        assert!(!config.is_module(Path::new("Makefile")));
        assert!(!config.is_module(Path::new(".gitignore")));
    }

    #[test]
    fn test_case_sensitive() {
        let config = ScanConfig::new("/repo");
        assert!(!config.is_module(Path::new("file.PY")));
    }

    #[test]
    fn test_with_extension_strips_dot() {
        let config = ScanConfig::new("/repo").with_extension(".pyi");
        assert_eq!(config.extension, "pyi");
        assert!(config.is_module(Path::new("stubs/types.pyi")));
        assert!(!config.is_module(Path::new("types.py")));
    }

    #[test]
    fn test_discover_nested_modules() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        fs::create_dir_all(dir.path().join("pkg/sub")).expect("Failed to create dirs");
        fs::write(dir.path().join("top.py"), "x = 1\n").expect("write");
        fs::write(dir.path().join("pkg/mod.py"), "y = 2\n").expect("write");
        fs::write(dir.path().join("pkg/sub/deep.py"), "z = 3\n").expect("write");
        fs::write(dir.path().join("pkg/notes.txt"), "not python\n").expect("write");

        let mut modules =
            discover_modules(&ScanConfig::new(dir.path())).expect("Failed to discover");
        modules.sort();

        assert_eq!(modules.len(), 3);
        assert!(modules.iter().all(|p| p.is_absolute()));
        let names: Vec<String> = modules
            .iter()
            .filter_map(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .collect();
        assert!(names.contains(&"top.py".to_string()));
        assert!(names.contains(&"mod.py".to_string()));
        assert!(names.contains(&"deep.py".to_string()));
    }

    #[test]
    fn test_discover_missing_root() {
        let err = discover_modules(&ScanConfig::new("/nonexistent/refscan/root"))
            .expect_err("should fail");
        assert!(matches!(err, ScanError::Io { .. }));
    }
}
