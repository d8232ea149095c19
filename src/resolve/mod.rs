//! Definition → reference resolution.
//!
//! Pairs every class and function definition in a repository with the
//! classified references to its name. Resolution is name-only: imports,
//! aliases and shadowing are not followed.

pub mod references;

pub use references::{
    classify_class_reference, classify_function_reference, DefinitionKind, ReferenceKind,
    ReferenceRecord,
};

use crate::index::RepositoryIndex;
use crate::tree::{callee_identifier, NodeRef};
use std::collections::{HashMap, HashSet};

/// One definition name and every reference to it.
#[derive(Debug, Clone)]
pub struct DefinitionReferences<'a> {
    /// Definition name.
    pub name: &'a str,
    /// Class or function.
    pub kind: DefinitionKind,
    /// First definition with this name, in repository order.
    pub definition: NodeRef<'a>,
    /// Classified references, in repository order.
    pub references: Vec<ReferenceRecord<'a>>,
}

/// Name → occurrence lists built in one pass over a repository.
///
/// Lookups return the same nodes in the same order as the per-call
/// repository searches.
#[derive(Debug, Default)]
pub struct OccurrenceIndex<'a> {
    names: HashMap<&'a str, Vec<NodeRef<'a>>>,
    calls: HashMap<&'a str, Vec<NodeRef<'a>>>,
}

impl<'a> OccurrenceIndex<'a> {
    /// Index every Name, Attribute and Call node of the repository.
    pub fn build(index: &'a RepositoryIndex) -> Self {
        let mut occurrences = Self::default();
        for (_, tree) in index.modules() {
            for node in tree.preorder() {
                if let Some(ident) = node.identifier() {
                    occurrences.names.entry(ident).or_default().push(node);
                }
                if let Some(callee) = callee_identifier(node) {
                    occurrences.calls.entry(callee).or_default().push(node);
                }
            }
        }
        occurrences
    }

    /// Same result as [`RepositoryIndex::search_class_references_everywhere`].
    pub fn class_references(&self, name: &str) -> &[NodeRef<'a>] {
        self.names.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Same result as [`RepositoryIndex::search_function_references_everywhere`].
    pub fn function_references(&self, name: &str) -> &[NodeRef<'a>] {
        self.calls.get(name).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Every class definition name with its classified references.
pub fn collect_class_references<'a>(
    index: &'a RepositoryIndex,
    occurrences: &OccurrenceIndex<'a>,
) -> Vec<DefinitionReferences<'a>> {
    collect(
        index.get_all_class_definitions(),
        DefinitionKind::Class,
        |name| {
            occurrences
                .class_references(name)
                .iter()
                .map(|n| ReferenceRecord::for_class(*n))
                .collect()
        },
    )
}

/// Every function definition name with its classified call sites.
pub fn collect_function_references<'a>(
    index: &'a RepositoryIndex,
    occurrences: &OccurrenceIndex<'a>,
) -> Vec<DefinitionReferences<'a>> {
    collect(
        index.get_all_function_definitions(),
        DefinitionKind::Function,
        |name| {
            occurrences
                .function_references(name)
                .iter()
                .map(|n| ReferenceRecord::for_function(*n))
                .collect()
        },
    )
}

fn collect<'a, F>(
    definitions: Vec<NodeRef<'a>>,
    kind: DefinitionKind,
    references_of: F,
) -> Vec<DefinitionReferences<'a>>
where
    F: Fn(&str) -> Vec<ReferenceRecord<'a>>,
{
    let mut seen = HashSet::new();
    let mut result = Vec::new();
    for definition in definitions {
        let Some(name) = definition.name() else {
            continue;
        };
        if !seen.insert(name) {
            continue;
        }
        result.push(DefinitionReferences {
            name,
            kind,
            definition,
            references: references_of(name),
        });
    }
    result
}
