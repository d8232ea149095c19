//! Owned syntax node model.
//!
//! A [`SyntaxNode`] is the parser-independent shape the tree builder
//! consumes: a kind tag, ordered named fields, and an optional line span.

use serde::Serialize;
use std::fmt;

/// Field names used by the classifier and the search queries.
pub mod field {
    /// Callee of a call expression.
    pub const CALLEE: &str = "function";
    /// Base class list of a class definition.
    pub const BASES: &str = "superclasses";
    /// Annotation of an annotated assignment or a typed parameter.
    pub const ANNOTATION: &str = "type";
    /// Declared return type of a function definition.
    pub const RETURNS: &str = "return_type";
    /// Declared name of a definition or parameter.
    pub const NAME: &str = "name";
    /// Attribute name of an attribute expression.
    pub const ATTRIBUTE: &str = "attribute";
    /// Identifier text of a name expression.
    pub const ID: &str = "id";
    /// Text of any other leaf node.
    pub const VALUE: &str = "value";
}

/// Syntax node kinds.
///
/// Only the kinds that searches and classification care about get a
/// dedicated variant; everything else keeps its grammar name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NodeKind {
    /// A whole source file.
    Module,
    /// `class Name(...): ...`
    ClassDefinition,
    /// `def name(...): ...`
    FunctionDefinition,
    /// `callee(args)`
    Call,
    /// `object.attribute`
    Attribute,
    /// A bare identifier in expression position.
    Name,
    /// `target: annotation = value`
    AnnotatedAssignment,
    /// `targets = value`
    Assignment,
    /// One entry of a parameter list.
    Parameter,
    /// Any other grammar node.
    Other(&'static str),
}

impl NodeKind {
    /// Convert to string for display.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Module => "Module",
            NodeKind::ClassDefinition => "ClassDefinition",
            NodeKind::FunctionDefinition => "FunctionDefinition",
            NodeKind::Call => "Call",
            NodeKind::Attribute => "Attribute",
            NodeKind::Name => "Name",
            NodeKind::AnnotatedAssignment => "AnnotatedAssignment",
            NodeKind::Assignment => "Assignment",
            NodeKind::Parameter => "Parameter",
            NodeKind::Other(kind) => kind,
        }
    }

    /// Whether this kind is a class or function definition.
    pub fn is_definition(&self) -> bool {
        matches!(self, NodeKind::ClassDefinition | NodeKind::FunctionDefinition)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Line range of a node (1-based, inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Span {
    /// First line.
    pub start_line: usize,
    /// Last line.
    pub end_line: usize,
}

/// Value held by a named field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// A single child node.
    Node(Box<SyntaxNode>),
    /// An ordered sequence of child nodes.
    Sequence(Vec<SyntaxNode>),
    /// A non-node value such as an identifier or literal text.
    Scalar(String),
}

/// One named field of a syntax node.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Field name.
    pub name: &'static str,
    /// Field contents.
    pub value: FieldValue,
}

/// One element of a parsed syntax tree.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxNode {
    kind: NodeKind,
    span: Option<Span>,
    fields: Vec<Field>,
}

impl SyntaxNode {
    /// Create a node with no fields.
    pub fn new(kind: NodeKind, span: Option<Span>) -> Self {
        Self {
            kind,
            span,
            fields: Vec::new(),
        }
    }

    /// Node kind.
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Line span, if known.
    pub fn span(&self) -> Option<Span> {
        self.span
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Take ownership of the fields.
    pub fn into_parts(self) -> (NodeKind, Option<Span>, Vec<Field>) {
        (self.kind, self.span, self.fields)
    }

    /// Look up a scalar field.
    pub fn scalar(&self, name: &str) -> Option<&str> {
        self.fields.iter().find_map(|f| match &f.value {
            FieldValue::Scalar(s) if f.name == name => Some(s.as_str()),
            _ => None,
        })
    }

    /// Set a scalar field.
    pub fn push_scalar(&mut self, name: &'static str, value: impl Into<String>) {
        self.fields.push(Field {
            name,
            value: FieldValue::Scalar(value.into()),
        });
    }

    /// Append a child node under `name`.
    ///
    /// A second child under the same name turns the field into a sequence.
    pub fn push_node(&mut self, name: &'static str, node: SyntaxNode) {
        let existing = self
            .fields
            .iter()
            .position(|f| f.name == name && !matches!(f.value, FieldValue::Scalar(_)));

        let Some(idx) = existing else {
            self.fields.push(Field {
                name,
                value: FieldValue::Node(Box::new(node)),
            });
            return;
        };

        let slot = &mut self.fields[idx].value;
        if let FieldValue::Sequence(nodes) = slot {
            nodes.push(node);
            return;
        }
        if let FieldValue::Node(first) = std::mem::replace(slot, FieldValue::Sequence(Vec::new())) {
            *slot = FieldValue::Sequence(vec![*first, node]);
        }
    }

    /// Number of syntax nodes reachable from this one, itself included.
    pub fn node_count(&self) -> usize {
        1 + self
            .fields
            .iter()
            .map(|f| match &f.value {
                FieldValue::Node(n) => n.node_count(),
                FieldValue::Sequence(nodes) => nodes.iter().map(SyntaxNode::node_count).sum(),
                FieldValue::Scalar(_) => 0,
            })
            .sum::<usize>()
    }
}
