//! Repository-wide module index.
//!
//! Owns one [`ModuleTree`] per discovered file and aggregates per-module
//! searches. Aggregated results are concatenated in path order, each
//! module contributing its own pre-order results.

use crate::error::Result;
use crate::ingest::detect::{discover_modules, ScanConfig};
use crate::tree::{ModuleTree, NodeRef};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// All module trees of one repository.
#[derive(Debug, Clone)]
pub struct RepositoryIndex {
    config: ScanConfig,
    modules: BTreeMap<PathBuf, ModuleTree>,
}

impl RepositoryIndex {
    /// Create an empty index for the configured repository.
    pub fn new(config: ScanConfig) -> Self {
        Self {
            config,
            modules: BTreeMap::new(),
        }
    }

    /// Discover and build every module under `root`.
    pub fn open(config: ScanConfig) -> Result<Self> {
        let mut index = Self::new(config);
        index.build_all()?;
        Ok(index)
    }

    /// Scan configuration.
    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Module files under the configured root.
    pub fn discover_modules(&self) -> Result<Vec<PathBuf>> {
        discover_modules(&self.config)
    }

    /// Parse and build every discovered module.
    ///
    /// Fails on the first module that cannot be read or parsed. On failure
    /// the index keeps its previous contents; no partial set is installed.
    /// Returns the number of modules indexed.
    pub fn build_all(&mut self) -> Result<usize> {
        let paths = self.discover_modules()?;
        let mut modules = BTreeMap::new();
        for path in paths {
            let tree = ModuleTree::from_path(&path).inspect_err(|e| {
                log::warn!("aborting repository build: {}", e);
            })?;
            modules.insert(path, tree);
        }

        log::info!(
            "indexed {} modules under {}",
            modules.len(),
            self.config.root.display()
        );
        self.modules = modules;
        Ok(self.modules.len())
    }

    /// Modules in path order.
    pub fn modules(&self) -> impl Iterator<Item = (&Path, &ModuleTree)> {
        self.modules.iter().map(|(p, t)| (p.as_path(), t))
    }

    /// Tree for one module.
    pub fn module(&self, path: &Path) -> Option<&ModuleTree> {
        self.modules.get(path)
    }

    /// Number of indexed modules.
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Whether no module has been indexed.
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Class-style references to `name` in every module.
    pub fn search_class_references_everywhere(&self, name: &str) -> Vec<NodeRef<'_>> {
        self.collect(|tree| tree.search_class_references(name))
    }

    /// Call sites of `name` in every module.
    pub fn search_function_references_everywhere(&self, name: &str) -> Vec<NodeRef<'_>> {
        self.collect(|tree| tree.search_function_references(name))
    }

    /// Class definitions in every module.
    pub fn get_all_class_definitions(&self) -> Vec<NodeRef<'_>> {
        self.collect(ModuleTree::search_class_definitions)
    }

    /// Function definitions in every module.
    pub fn get_all_function_definitions(&self) -> Vec<NodeRef<'_>> {
        self.collect(ModuleTree::search_function_definitions)
    }

    fn collect<'a, F>(&'a self, per_module: F) -> Vec<NodeRef<'a>>
    where
        F: Fn(&'a ModuleTree) -> Vec<NodeRef<'a>>,
    {
        let mut result = Vec::new();
        for tree in self.modules.values() {
            result.extend(per_module(tree));
        }
        result
    }
}
