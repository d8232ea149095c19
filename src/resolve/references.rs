//! Reference classification.
//!
//! A reference's role is decided from its immediate parent's kind and the
//! field the reference sits in, nothing deeper. Rows are tried in order and
//! the first match wins, so a callee that is also an attribute expression
//! resolves to the call row.

use crate::ingest::syntax::{field, NodeKind};
use crate::tree::NodeRef;
use serde::Serialize;
use std::fmt;
use std::path::Path;

/// Syntactic role of a reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ReferenceKind {
    /// `Cls(...)`
    Instantiation,
    /// `class Sub(Cls)`
    Inheritance,
    /// `x: Cls = ...`
    VariableTypeHint,
    /// `def f(x: Cls)`
    ArgumentTypeHint,
    /// `def f() -> Cls`
    ReturnTypeHint,
    /// `x = Cls`, value usage that may or may not be an instance.
    AssignedClass,
    /// `mod.Cls` or `Cls.attr`
    AttributeAccess,
    /// `func(...)`
    FunctionCall,
    /// The function's own definition site.
    FunctionDefinition,
    /// A function used as a base class expression.
    FunctionInInheritance,
    /// `obj.func` outside a call.
    FunctionAttributeAccess,
    /// No row matched.
    Unknown,
}

impl ReferenceKind {
    /// Human-readable label, used as the diagram edge label.
    pub fn label(&self) -> &'static str {
        match self {
            ReferenceKind::Instantiation => "Instantiation",
            ReferenceKind::Inheritance => "Inheritance",
            ReferenceKind::VariableTypeHint => "Variable Type Hint",
            ReferenceKind::ArgumentTypeHint => "Function Argument Type Hint",
            ReferenceKind::ReturnTypeHint => "Function Return Type Hint",
            ReferenceKind::AssignedClass => "Assigned Class (ambiguous value usage)",
            ReferenceKind::AttributeAccess => "Attribute Access",
            ReferenceKind::FunctionCall => "Function Call",
            ReferenceKind::FunctionDefinition => "Function Definition",
            ReferenceKind::FunctionInInheritance => "Function in Inheritance",
            ReferenceKind::FunctionAttributeAccess => "Function Attribute Access",
            ReferenceKind::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classify a node found by class reference search.
pub fn classify_class_reference(node: NodeRef<'_>) -> ReferenceKind {
    let Some(parent) = node.parent() else {
        return ReferenceKind::Unknown;
    };

    match (parent.kind(), node.field()) {
        (NodeKind::Call, Some(field::CALLEE)) => ReferenceKind::Instantiation,
        (NodeKind::ClassDefinition, Some(field::BASES)) => ReferenceKind::Inheritance,
        (NodeKind::AnnotatedAssignment, Some(field::ANNOTATION)) => {
            ReferenceKind::VariableTypeHint
        }
        (NodeKind::Parameter, Some(field::ANNOTATION)) => ReferenceKind::ArgumentTypeHint,
        (NodeKind::FunctionDefinition, Some(field::RETURNS)) => ReferenceKind::ReturnTypeHint,
        (NodeKind::Assignment, _) => ReferenceKind::AssignedClass,
        (NodeKind::Attribute, _) => ReferenceKind::AttributeAccess,
        _ => ReferenceKind::Unknown,
    }
}

/// Classify a node found by function reference search.
pub fn classify_function_reference(node: NodeRef<'_>) -> ReferenceKind {
    let Some(parent) = node.parent() else {
        return ReferenceKind::Unknown;
    };

    match (parent.kind(), node.field()) {
        (NodeKind::Call, Some(field::CALLEE)) => ReferenceKind::FunctionCall,
        (NodeKind::FunctionDefinition, _)
            if node.identifier().is_some() && parent.name() == node.identifier() =>
        {
            ReferenceKind::FunctionDefinition
        }
        (NodeKind::ClassDefinition, Some(field::BASES)) => ReferenceKind::FunctionInInheritance,
        (NodeKind::Parameter, Some(field::ANNOTATION)) => ReferenceKind::ArgumentTypeHint,
        (NodeKind::FunctionDefinition, Some(field::RETURNS)) => ReferenceKind::ReturnTypeHint,
        (NodeKind::Attribute, _) => ReferenceKind::FunctionAttributeAccess,
        _ => ReferenceKind::Unknown,
    }
}

/// Which table a reference is classified with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DefinitionKind {
    /// Class definition.
    Class,
    /// Function or method definition.
    Function,
}

/// A reference plus its derived context.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceRecord<'a> {
    /// The matched node. For function references this is the Call node.
    pub node: NodeRef<'a>,
    /// Name of the nearest enclosing function.
    pub enclosing_function: Option<&'a str>,
    /// Name of the nearest enclosing class.
    pub enclosing_class: Option<&'a str>,
    /// Path of the module containing the reference.
    pub module: Option<&'a Path>,
    /// Syntactic role.
    pub kind: ReferenceKind,
}

impl<'a> ReferenceRecord<'a> {
    /// Record for a node returned by class reference search.
    pub fn for_class(node: NodeRef<'a>) -> Self {
        Self::with_kind(node, classify_class_reference(node))
    }

    /// Record for a Call node returned by function reference search.
    ///
    /// The call is classified through its callee.
    pub fn for_function(node: NodeRef<'a>) -> Self {
        let target = match node.kind() {
            NodeKind::Call => node.child_by_field(field::CALLEE).unwrap_or(node),
            _ => node,
        };
        Self::with_kind(node, classify_function_reference(target))
    }

    fn with_kind(node: NodeRef<'a>, kind: ReferenceKind) -> Self {
        Self {
            node,
            enclosing_function: node.enclosing_function(),
            enclosing_class: node.enclosing_class(),
            module: node.enclosing_module(),
            kind,
        }
    }

    /// First line of the reference, when known.
    pub fn line(&self) -> Option<usize> {
        self.node.span().map(|s| s.start_line)
    }

    /// `Class.method` style location, empty at module level.
    pub fn location(&self) -> String {
        match (self.enclosing_class, self.enclosing_function) {
            (Some(class), Some(func)) => format!("{}.{}", class, func),
            (Some(class), None) => class.to_string(),
            (None, Some(func)) => func.to_string(),
            (None, None) => String::new(),
        }
    }
}
