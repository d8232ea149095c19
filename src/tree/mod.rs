//! Per-module navigable syntax trees.
//!
//! A [`ModuleTree`] wraps the lowered syntax tree of one file in an arena of
//! [`TreeNode`]s with parent links. Nodes are allocated in pre-order, field
//! declaration order first and sequence order second, so traversal output is
//! stable across runs.

pub mod node;

pub use node::{NodeId, NodeRef, TreeNode};

use crate::error::{Result, ScanError};
use crate::ingest::python::{parse_python_file, parse_python_module};
use crate::ingest::syntax::{field, FieldValue, NodeKind, SyntaxNode};
use std::path::{Path, PathBuf};

/// Navigable tree for one source module.
#[derive(Debug, Clone)]
pub struct ModuleTree {
    path: PathBuf,
    nodes: Vec<TreeNode>,
}

impl ModuleTree {
    /// Build a tree from a lowered syntax tree.
    ///
    /// # Errors
    /// `ContractViolation` if `root` is not a Module node.
    pub fn build(root: SyntaxNode, module_path: &Path) -> Result<Self> {
        if root.kind() != NodeKind::Module {
            return Err(ScanError::ContractViolation(format!(
                "tree root for {} must be a Module, got {}",
                module_path.display(),
                root.kind()
            )));
        }

        let mut tree = Self {
            path: module_path.to_path_buf(),
            nodes: Vec::with_capacity(root.node_count()),
        };
        let root_id = tree.construct(root, None, None);
        tree.nodes[root_id.0].module_path = Some(module_path.to_path_buf());
        Ok(tree)
    }

    /// Parse source text and build its tree.
    pub fn from_source(module_path: &Path, source: &str) -> Result<Self> {
        let root = parse_python_module(module_path, source)?;
        Self::build(root, module_path)
    }

    /// Read, parse and build a module from disk.
    pub fn from_path(module_path: &Path) -> Result<Self> {
        let root = parse_python_file(module_path)?;
        let tree = Self::build(root, module_path)?;
        log::debug!(
            "built tree for {} ({} nodes)",
            module_path.display(),
            tree.len()
        );
        Ok(tree)
    }

    /// Allocate `syntax` under `parent`, then its children depth-first.
    fn construct(
        &mut self,
        syntax: SyntaxNode,
        parent: Option<NodeId>,
        field_name: Option<&'static str>,
    ) -> NodeId {
        let (kind, span, fields) = syntax.into_parts();
        let id = NodeId(self.nodes.len());
        let mut node = TreeNode::new(kind, span, field_name);
        node.parent = parent;
        self.nodes.push(node);
        if let Some(parent) = parent {
            self.nodes[parent.0].children.push(id);
        }

        for f in fields {
            match f.value {
                FieldValue::Scalar(value) => self.nodes[id.0].scalars.push((f.name, value)),
                FieldValue::Node(child) => {
                    self.construct(*child, Some(id), Some(f.name));
                }
                FieldValue::Sequence(children) => {
                    for child in children {
                        self.construct(child, Some(id), Some(f.name));
                    }
                }
            }
        }
        id
    }

    pub(crate) fn node(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id.0]
    }

    /// Path of the module this tree was built from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The Module root.
    pub fn root(&self) -> NodeRef<'_> {
        NodeRef::new(self, NodeId(0))
    }

    /// Handle for an id from this tree.
    pub fn get(&self, id: NodeId) -> Option<NodeRef<'_>> {
        (id.0 < self.nodes.len()).then(|| NodeRef::new(self, id))
    }

    /// Number of nodes in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a tree has at least its root.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Pre-order traversal from the root.
    pub fn preorder(&self) -> Preorder<'_> {
        Preorder {
            tree: self,
            stack: vec![NodeId(0)],
        }
    }

    /// Nodes whose description contains `text`.
    pub fn search_by_substring(&self, text: &str) -> Vec<NodeRef<'_>> {
        self.preorder()
            .filter(|n| n.textual_description().contains(text))
            .collect()
    }

    /// Name and Attribute nodes whose identifier is `name`.
    ///
    /// Matching is by text only: an unrelated symbol with the same name
    /// is reported too.
    pub fn search_class_references(&self, name: &str) -> Vec<NodeRef<'_>> {
        self.preorder()
            .filter(|n| n.identifier() == Some(name))
            .collect()
    }

    /// Call nodes whose callee identifier is `name`.
    pub fn search_function_references(&self, name: &str) -> Vec<NodeRef<'_>> {
        self.preorder()
            .filter(|n| callee_identifier(*n) == Some(name))
            .collect()
    }

    /// All class definitions, pre-order.
    pub fn search_class_definitions(&self) -> Vec<NodeRef<'_>> {
        self.nodes_of_kind(NodeKind::ClassDefinition)
    }

    /// All function definitions, pre-order.
    pub fn search_function_definitions(&self) -> Vec<NodeRef<'_>> {
        self.nodes_of_kind(NodeKind::FunctionDefinition)
    }

    fn nodes_of_kind(&self, kind: NodeKind) -> Vec<NodeRef<'_>> {
        self.preorder().filter(|n| n.kind() == kind).collect()
    }

    /// Render the tree with box-drawing connectors, one node per line.
    pub fn render_ascii(&self) -> String {
        let mut out = String::new();
        render_node(self.root(), "", true, &mut out);
        out
    }
}

/// Identifier of a Call node's callee, if it is a Name or Attribute.
pub(crate) fn callee_identifier(node: NodeRef<'_>) -> Option<&str> {
    if node.kind() != NodeKind::Call {
        return None;
    }
    node.child_by_field(field::CALLEE)?.identifier()
}

fn render_node(node: NodeRef<'_>, indent: &str, is_last: bool, out: &mut String) {
    let connector = if is_last { "└── " } else { "├── " };
    out.push_str(indent);
    out.push_str(connector);
    out.push_str(&format!(
        "<{}> ── {}\n",
        node.field().unwrap_or("root"),
        node
    ));

    let child_indent = format!("{}{}", indent, if is_last { "    " } else { "│   " });
    let count = node.children().count();
    for (i, child) in node.children().enumerate() {
        render_node(child, &child_indent, i + 1 == count, out);
    }
}

/// Iterative pre-order traversal of a [`ModuleTree`].
pub struct Preorder<'a> {
    tree: &'a ModuleTree,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for Preorder<'a> {
    type Item = NodeRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let node = self.tree.node(id);
        self.stack.extend(node.children.iter().rev().copied());
        Some(NodeRef::new(self.tree, id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const SOURCE: &str = "\
class A:
    pass


def f():
    return A()
";

    fn build(source: &str) -> ModuleTree {
        ModuleTree::from_source(Path::new("/repo/sample.py"), source).expect("Failed to build")
    }

    fn syntax_kinds(node: &SyntaxNode, counts: &mut HashMap<NodeKind, usize>) {
        *counts.entry(node.kind()).or_default() += 1;
        for f in node.fields() {
            match &f.value {
                FieldValue::Node(n) => syntax_kinds(n, counts),
                FieldValue::Sequence(ns) => ns.iter().for_each(|n| syntax_kinds(n, counts)),
                FieldValue::Scalar(_) => {}
            }
        }
    }

    #[test]
    fn test_tree_kinds_match_syntax_kinds() {
        let path = Path::new("/repo/sample.py");
        let syntax = parse_python_module(path, SOURCE).expect("Failed to parse");
        let mut expected = HashMap::new();
        syntax_kinds(&syntax, &mut expected);

        let tree = ModuleTree::build(syntax, path).expect("Failed to build");
        let mut actual: HashMap<NodeKind, usize> = HashMap::new();
        for node in tree.preorder() {
            *actual.entry(node.kind()).or_default() += 1;
        }
        assert_eq!(actual, expected);
        assert_eq!(tree.preorder().count(), tree.len());
    }

    #[test]
    fn test_each_node_appears_once_in_parent() {
        let tree = build(SOURCE);
        for node in tree.preorder().skip(1) {
            let parent = node.parent().expect("non-root has a parent");
            let hits = parent.children().filter(|c| *c == node).count();
            assert_eq!(hits, 1);
            assert!(!node.field().unwrap_or("").is_empty());
        }
    }

    #[test]
    fn test_preorder_matches_arena_order() {
        let tree = build(SOURCE);
        let ids: Vec<usize> = tree.preorder().map(|n| n.id().index()).collect();
        let expected: Vec<usize> = (0..tree.len()).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn test_rebuild_is_deterministic() {
        let shape = |tree: &ModuleTree| -> Vec<(NodeKind, Option<&'static str>)> {
            tree.preorder().map(|n| (n.kind(), n.field())).collect()
        };
        let first = build(SOURCE);
        let second = build(SOURCE);
        assert_eq!(shape(&first), shape(&second));
    }

    #[test]
    fn test_build_rejects_non_module_root() {
        let root = SyntaxNode::new(NodeKind::Call, None);
        let err = ModuleTree::build(root, Path::new("/repo/x.py")).expect_err("should fail");
        assert!(matches!(err, ScanError::ContractViolation(_)));
    }

    #[test]
    fn test_definitions_in_declaration_order() {
        let tree = build("def first():\n    def inner():\n        pass\n\ndef second():\n    pass\n");
        let names: Vec<&str> = tree
            .search_function_definitions()
            .iter()
            .filter_map(|n| n.name())
            .collect();
        assert_eq!(names, vec!["first", "inner", "second"]);
        assert!(tree.search_class_definitions().is_empty());
    }

    #[test]
    fn test_class_references_include_hints_and_bases() {
        let tree = build(
            "class Base:\n    pass\n\nclass Child(Base):\n    pass\n\ndef make(b: Base) -> Base:\n    return Base()\n",
        );
        let refs = tree.search_class_references("Base");
        assert_eq!(refs.len(), 4);
        assert!(refs.iter().all(|r| r.kind() == NodeKind::Name));
        let lines: Vec<usize> = refs.iter().filter_map(|r| r.span()).map(|s| s.start_line).collect();
        assert_eq!(lines, vec![4, 7, 7, 8]);
    }

    #[test]
    fn test_function_references_are_call_sites_only() {
        let tree = build("def run():\n    pass\n\nrun()\nalias = run\nobj.run(1)\n");
        let refs = tree.search_function_references("run");
        assert_eq!(refs.len(), 2);
        assert!(refs.iter().all(|r| r.kind() == NodeKind::Call));
        assert_eq!(refs[0].span().map(|s| s.start_line), Some(4));
        assert_eq!(refs[1].span().map(|s| s.start_line), Some(6));
    }

    #[test]
    fn test_search_by_substring() {
        let tree = build(SOURCE);
        let hits = tree.search_by_substring("ClassDefinition");
        assert_eq!(hits.len(), 1);

        let line_six = tree.search_by_substring("to line 6");
        assert!(line_six.iter().any(|n| n.kind() == NodeKind::FunctionDefinition));
        assert!(tree.search_by_substring("no such text").is_empty());
    }

    #[test]
    fn test_render_ascii_follows_build_order() {
        let tree = build(SOURCE);
        let rendered = tree.render_ascii();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), tree.len());
        assert_eq!(lines[0], "└── <root> ── <Module>");
        assert_eq!(lines[1], "    ├── <body> ── ClassDefinition from line 1 to line 2");
        assert!(lines[2].starts_with("    │   └── <body> ── pass_statement"));
        assert!(lines
            .last()
            .is_some_and(|l| l.starts_with("                └── <function> ── Name")));
    }
}
