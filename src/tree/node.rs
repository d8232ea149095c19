//! Tree nodes and borrowed node handles.
//!
//! Nodes live in their [`ModuleTree`]'s arena. The parent link is a plain
//! index used only for upward lookup; children are owned by the tree in
//! declaration order.

use crate::ingest::syntax::{field, NodeKind, Span};
use crate::tree::ModuleTree;
use std::fmt;
use std::path::{Path, PathBuf};

/// Index of a node in its module's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Arena slot of this node (pre-order position).
    pub fn index(&self) -> usize {
        self.0
    }
}

/// One wrapped syntax node.
#[derive(Debug, Clone)]
pub struct TreeNode {
    pub(crate) kind: NodeKind,
    pub(crate) span: Option<Span>,
    pub(crate) field: Option<&'static str>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) scalars: Vec<(&'static str, String)>,
    /// Set on the root only.
    pub(crate) module_path: Option<PathBuf>,
}

impl TreeNode {
    /// Create a detached node with no children.
    pub(crate) fn new(kind: NodeKind, span: Option<Span>, field: Option<&'static str>) -> Self {
        Self {
            kind,
            span,
            field,
            parent: None,
            children: Vec::new(),
            scalars: Vec::new(),
            module_path: None,
        }
    }
}

/// A borrowed handle to a node inside a [`ModuleTree`].
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    tree: &'a ModuleTree,
    id: NodeId,
}

impl<'a> NodeRef<'a> {
    pub(crate) fn new(tree: &'a ModuleTree, id: NodeId) -> Self {
        Self { tree, id }
    }

    fn node(&self) -> &'a TreeNode {
        self.tree.node(self.id)
    }

    /// Arena id of this node.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The tree that owns this node.
    pub fn tree(&self) -> &'a ModuleTree {
        self.tree
    }

    /// Node kind.
    pub fn kind(&self) -> NodeKind {
        self.node().kind
    }

    /// Line span, if the parser provided one.
    pub fn span(&self) -> Option<Span> {
        self.node().span
    }

    /// Name of the parent field this node is attached under. `None` for the root.
    pub fn field(&self) -> Option<&'static str> {
        self.node().field
    }

    /// Parent node. `None` for the root.
    pub fn parent(&self) -> Option<NodeRef<'a>> {
        self.node().parent.map(|id| NodeRef::new(self.tree, id))
    }

    /// Children in declaration order.
    pub fn children(&self) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        let tree = self.tree;
        self.node()
            .children
            .iter()
            .map(move |&id| NodeRef::new(tree, id))
    }

    /// First child attached under `name`.
    pub fn child_by_field(&self, name: &str) -> Option<NodeRef<'a>> {
        self.children().find(|c| c.field() == Some(name))
    }

    /// Scalar field value.
    pub fn scalar(&self, name: &str) -> Option<&'a str> {
        self.node()
            .scalars
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Declared name of a definition or parameter.
    pub fn name(&self) -> Option<&'a str> {
        self.scalar(field::NAME)
    }

    /// Identifier this node refers to: the id of a Name or the attribute of
    /// an Attribute.
    pub fn identifier(&self) -> Option<&'a str> {
        match self.kind() {
            NodeKind::Name => self.scalar(field::ID),
            NodeKind::Attribute => self.scalar(field::ATTRIBUTE),
            _ => None,
        }
    }

    /// Module path recorded on the root.
    pub fn module_path(&self) -> Option<&'a Path> {
        self.node().module_path.as_deref()
    }

    /// Nearest strict ancestor of the given kind.
    pub fn find_ancestor_of_kind(&self, kind: NodeKind) -> Option<NodeRef<'a>> {
        let mut current = self.parent();
        while let Some(node) = current {
            if node.kind() == kind {
                return Some(node);
            }
            current = node.parent();
        }
        None
    }

    /// Name of the nearest enclosing function.
    pub fn enclosing_function(&self) -> Option<&'a str> {
        self.find_ancestor_of_kind(NodeKind::FunctionDefinition)
            .and_then(|n| n.name())
    }

    /// Name of the nearest enclosing class.
    pub fn enclosing_class(&self) -> Option<&'a str> {
        self.find_ancestor_of_kind(NodeKind::ClassDefinition)
            .and_then(|n| n.name())
    }

    /// Path of the enclosing module.
    pub fn enclosing_module(&self) -> Option<&'a Path> {
        self.find_ancestor_of_kind(NodeKind::Module)
            .and_then(|n| n.module_path())
    }

    /// Kind plus line range, used for substring search and diagnostics.
    pub fn textual_description(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.span() {
            Some(span) => write!(
                f,
                "{} from line {} to line {}",
                self.kind(),
                span.start_line,
                span.end_line
            ),
            None => write!(f, "<{}>", self.kind()),
        }
    }
}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("kind", &self.kind())
            .field("field", &self.field())
            .field("span", &self.span())
            .finish()
    }
}

impl PartialEq for NodeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl Eq for NodeRef<'_> {}
