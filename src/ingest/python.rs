//! Python-specific tree-sitter parsing logic.
//!
//! This module parses Python source with tree-sitter-python and lowers the
//! concrete syntax tree into [`SyntaxNode`]s shaped like Python's own AST:
//! declared names are scalars rather than nodes, and `block`, `argument_list`
//! and `type` wrappers are transparent.

use crate::error::{Result, ScanError};
use crate::ingest::syntax::{field, NodeKind, Span, SyntaxNode};
use std::path::Path;
use tree_sitter::Node;

/// Read and parse a Python file.
pub fn parse_python_file(path: &Path) -> Result<SyntaxNode> {
    let source = std::fs::read_to_string(path).map_err(|e| ScanError::io(path, e))?;
    parse_python_module(path, &source)
}

/// Parse Python source into a lowered syntax tree rooted at a Module node.
///
/// Tree-sitter recovers from errors, so any ERROR or MISSING node in the
/// result is reported as [`ScanError::Syntax`] at its start position.
pub fn parse_python_module(path: &Path, source: &str) -> Result<SyntaxNode> {
    let mut parser = tree_sitter::Parser::new();
    parser
        .set_language(&tree_sitter_python::language())
        .map_err(|e| ScanError::Parse {
            file: path.to_path_buf(),
            message: format!("Failed to set Python language: {:?}", e),
        })?;

    let tree = parser
        .parse(source, None)
        .ok_or_else(|| ScanError::Parse {
            file: path.to_path_buf(),
            message: "Parse failed - no tree returned".to_string(),
        })?;

    let root = tree.root_node();
    if root.has_error() {
        let (line, column) = first_error(root)
            .map(|n| {
                let pos = n.start_position();
                (pos.row + 1, pos.column + 1)
            })
            .unwrap_or((1, 1));
        return Err(ScanError::Syntax {
            file: path.to_path_buf(),
            line,
            column,
        });
    }

    let lowering = Lowering {
        source: source.as_bytes(),
    };
    Ok(lowering.lower(root))
}

/// First ERROR or MISSING node in document order.
fn first_error(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    let children: Vec<Node<'_>> = node.children(&mut cursor).collect();
    children.into_iter().find_map(first_error)
}

/// Kinds lowered as a single node carrying their full text.
const ATOMIC_KINDS: &[&str] = &["dotted_name"];

/// Kinds whose children are lifted into the enclosing field.
const TRANSPARENT_KINDS: &[&str] = &["block", "argument_list"];

struct Lowering<'s> {
    source: &'s [u8],
}

impl Lowering<'_> {
    fn lower(&self, node: Node<'_>) -> SyntaxNode {
        let kind = node_kind(node);
        let span = match kind {
            NodeKind::Module => None,
            _ => Some(span_of(node)),
        };
        let mut syntax = SyntaxNode::new(kind, span);

        if node.child_count() == 0 || ATOMIC_KINDS.contains(&node.kind()) {
            let slot = match kind {
                NodeKind::Name => field::ID,
                _ => field::VALUE,
            };
            syntax.push_scalar(slot, self.text(node));
            return syntax;
        }

        let mut cursor = node.walk();
        if cursor.goto_first_child() {
            loop {
                let child = cursor.node();
                if child.is_named() && !child.is_extra() {
                    self.attach(&mut syntax, node.kind(), cursor.field_name(), child);
                }
                if !cursor.goto_next_sibling() {
                    break;
                }
            }
        }
        syntax
    }

    fn attach(
        &self,
        parent: &mut SyntaxNode,
        parent_kind: &'static str,
        slot: Option<&'static str>,
        child: Node<'_>,
    ) {
        if child.kind() == "identifier" {
            if is_parameter_list(parent_kind) && slot.is_none() {
                let mut param = SyntaxNode::new(NodeKind::Parameter, Some(span_of(child)));
                param.push_scalar(field::NAME, self.text(child));
                parent.push_node(default_slot(parent_kind), param);
                return;
            }
            if let Some(name_slot) = declared_name_slot(parent_kind, slot) {
                parent.push_scalar(name_slot, self.text(child));
                return;
            }
        }

        let slot = slot.unwrap_or_else(|| default_slot(parent_kind));

        if TRANSPARENT_KINDS.contains(&child.kind()) {
            let mut cursor = child.walk();
            for inner in child.named_children(&mut cursor) {
                if !inner.is_extra() {
                    parent.push_node(slot, self.lower(inner));
                }
            }
            return;
        }

        if child.kind() == "type" {
            if let Some(inner) = child.named_child(0) {
                parent.push_node(slot, self.lower(inner));
                return;
            }
        }

        parent.push_node(slot, self.lower(child));
    }

    fn text(&self, node: Node<'_>) -> String {
        node.utf8_text(self.source).unwrap_or_default().to_string()
    }
}

fn node_kind(node: Node<'_>) -> NodeKind {
    match node.kind() {
        "module" => NodeKind::Module,
        "class_definition" => NodeKind::ClassDefinition,
        "function_definition" => NodeKind::FunctionDefinition,
        "call" => NodeKind::Call,
        "attribute" => NodeKind::Attribute,
        "identifier" => NodeKind::Name,
        "assignment" if node.child_by_field_name("type").is_some() => {
            NodeKind::AnnotatedAssignment
        }
        "assignment" => NodeKind::Assignment,
        "typed_parameter" | "typed_default_parameter" | "default_parameter" => NodeKind::Parameter,
        other => NodeKind::Other(other),
    }
}

fn span_of(node: Node<'_>) -> Span {
    Span {
        start_line: node.start_position().row + 1,
        end_line: node.end_position().row + 1,
    }
}

fn is_parameter_list(kind: &str) -> bool {
    matches!(kind, "parameters" | "lambda_parameters")
}

/// Scalar slot for an identifier that declares a name rather than using one.
fn declared_name_slot(parent_kind: &str, slot: Option<&str>) -> Option<&'static str> {
    match (parent_kind, slot) {
        (
            "class_definition"
            | "function_definition"
            | "default_parameter"
            | "typed_default_parameter"
            | "keyword_argument",
            Some("name"),
        ) => Some(field::NAME),
        ("typed_parameter", None) => Some(field::NAME),
        ("attribute", Some("attribute")) => Some(field::ATTRIBUTE),
        ("aliased_import", Some("alias")) => Some("alias"),
        ("global_statement" | "nonlocal_statement", None) => Some("names"),
        _ => None,
    }
}

fn default_slot(parent_kind: &str) -> &'static str {
    match parent_kind {
        "module" => "body",
        "parameters" | "lambda_parameters" => "args",
        _ => "children",
    }
}
