//! Reference graph model and renderers.
//!
//! Turns resolved definitions and references into a node/edge graph and
//! renders it as Graphviz DOT or JSON. Only definitions with at least one
//! reference appear.

use crate::error::Result;
use crate::index::RepositoryIndex;
use crate::resolve::{
    collect_class_references, collect_function_references, DefinitionKind,
    DefinitionReferences, OccurrenceIndex, ReferenceRecord,
};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt::Write as _;
use std::path::Path;

/// Default output file name, without extension.
pub const DEFAULT_GRAPH_NAME: &str = "ref_graph";

/// Default graph title.
pub const DEFAULT_TITLE: &str = "Reference Graph";

/// Node shape in the rendered diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeShape {
    /// Class definitions.
    Box,
    /// Function definitions.
    Ellipse,
    /// Reference sites.
    Note,
}

impl NodeShape {
    fn as_str(&self) -> &'static str {
        match self {
            NodeShape::Box => "box",
            NodeShape::Ellipse => "ellipse",
            NodeShape::Note => "note",
        }
    }
}

/// One diagram node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphNode {
    /// Unique node id.
    pub id: String,
    /// Display label; may contain newlines.
    pub label: String,
    /// Shape.
    pub shape: NodeShape,
    /// Fill colour.
    pub fill: &'static str,
}

/// One diagram edge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphEdge {
    /// Source node id.
    pub from: String,
    /// Target node id.
    pub to: String,
    /// Edge label.
    pub label: String,
    /// Drawn dashed.
    pub dashed: bool,
}

/// Definitions, their reference sites, and the edges between them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceGraph {
    /// Graph title.
    pub title: String,
    /// Nodes in insertion order.
    pub nodes: Vec<GraphNode>,
    /// Edges in insertion order.
    pub edges: Vec<GraphEdge>,
}

impl ReferenceGraph {
    /// Resolve every definition in `index` and build its graph.
    pub fn from_index(index: &RepositoryIndex) -> Self {
        let occurrences = OccurrenceIndex::build(index);
        let class_refs = collect_class_references(index, &occurrences);
        let function_refs = collect_function_references(index, &occurrences);
        Self::build(&class_refs, &function_refs)
    }

    /// Build the graph for resolved class and function references.
    ///
    /// A function whose first definition sits inside a class that has a
    /// node gets a dashed `method-of` edge from that class.
    pub fn build(
        class_refs: &[DefinitionReferences<'_>],
        function_refs: &[DefinitionReferences<'_>],
    ) -> Self {
        let mut graph = Self {
            title: DEFAULT_TITLE.to_string(),
            nodes: Vec::new(),
            edges: Vec::new(),
        };

        let mut drawn_classes = HashSet::new();
        for def in class_refs.iter().filter(|d| !d.references.is_empty()) {
            graph.add_definition(def);
            drawn_classes.insert(def.name);
        }

        for def in function_refs.iter().filter(|d| !d.references.is_empty()) {
            graph.add_definition(def);
            if let Some(class) = def.definition.enclosing_class() {
                if drawn_classes.contains(class) {
                    graph.edges.push(GraphEdge {
                        from: definition_id(DefinitionKind::Class, class),
                        to: definition_id(DefinitionKind::Function, def.name),
                        label: "method-of".to_string(),
                        dashed: true,
                    });
                }
            }
        }

        graph
    }

    fn add_definition(&mut self, def: &DefinitionReferences<'_>) {
        let def_id = definition_id(def.kind, def.name);
        let (prefix, shape, fill) = match def.kind {
            DefinitionKind::Class => ("CLASS", NodeShape::Box, "lightblue"),
            DefinitionKind::Function => ("FUNC", NodeShape::Ellipse, "lightgreen"),
        };
        self.nodes.push(GraphNode {
            id: def_id.clone(),
            label: format!("{}: {}", prefix, def.name),
            shape,
            fill,
        });

        for (idx, reference) in def.references.iter().enumerate() {
            let ref_id = reference_id(reference, def.kind, def.name, idx);
            self.nodes.push(GraphNode {
                id: ref_id.clone(),
                label: reference_label(reference),
                shape: NodeShape::Note,
                fill: "#f0f0f0",
            });
            self.edges.push(GraphEdge {
                from: def_id.clone(),
                to: ref_id,
                label: reference.kind.label().to_string(),
                dashed: false,
            });
        }
    }

    /// Number of definition nodes.
    pub fn definition_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| n.shape != NodeShape::Note)
            .count()
    }

    /// Render as Graphviz DOT.
    pub fn to_dot(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "digraph {} {{", quote(&self.title));
        out.push_str("    rankdir=LR;\n");
        out.push_str("    size=\"12,12\";\n");
        for node in &self.nodes {
            let _ = writeln!(
                out,
                "    {} [label={}, shape={}, style=filled, fillcolor={}];",
                quote(&node.id),
                quote(&node.label),
                node.shape.as_str(),
                quote(node.fill)
            );
        }
        for edge in &self.edges {
            let style = if edge.dashed { ", style=dashed" } else { "" };
            let _ = writeln!(
                out,
                "    {} -> {} [label={}{}];",
                quote(&edge.from),
                quote(&edge.to),
                quote(&edge.label),
                style
            );
        }
        out.push_str("}\n");
        out
    }

    /// Render as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn definition_id(kind: DefinitionKind, name: &str) -> String {
    match kind {
        DefinitionKind::Class => format!("class_{}", name),
        DefinitionKind::Function => format!("func_{}", name),
    }
}

fn reference_id(
    reference: &ReferenceRecord<'_>,
    kind: DefinitionKind,
    name: &str,
    idx: usize,
) -> String {
    let base = reference
        .module
        .map(|p| {
            p.to_string_lossy()
                .replace(|c: char| matches!(c, '/' | '\\' | '.'), "_")
        })
        .unwrap_or_default();
    let prefix = match kind {
        DefinitionKind::Class => "class",
        DefinitionKind::Function => "func",
    };
    format!("{}_{}_{}_{}", base, name, prefix, idx)
        .trim_matches('_')
        .to_string()
}

fn reference_label(reference: &ReferenceRecord<'_>) -> String {
    let module = reference
        .module
        .and_then(Path::file_name)
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let line = reference
        .line()
        .map(|l| format!("L{}", l))
        .unwrap_or_default();
    format!("{}\n{}\n{}", reference.location(), module, line)
}

/// DOT double-quoted string.
fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}
