//! Build a [`Document`] from a parsed Mermaid flowchart.
//!
//! Subgraphs become group nodes, flowchart nodes become shape nodes inside
//! the innermost subgraph they were first mentioned in, and edges keep their
//! declaration order.

use std::collections::HashMap;

use crate::graph_ast::{EdgeType, GraphDiagram, NodeShape};
use crate::model::{Document, Graph, NodeId};
use crate::style::{Arrow, EdgeStyle, LineStyle, LineType, NodeStyle, Shape};

const THICK_LINE_WIDTH: f64 = 3.0;

pub fn to_document(diagram: &GraphDiagram) -> Document {
    let mut doc = Document::new();
    let mut ids: HashMap<String, NodeId> = HashMap::new();
    fill(doc.graph_mut(), None, diagram, &mut ids);

    for edge in &diagram.edges {
        let (Some(source), Some(target)) = (ids.get(&edge.from), ids.get(&edge.to)) else {
            tracing::warn!(from = %edge.from, to = %edge.to, "edge endpoint not declared, skipping");
            continue;
        };
        let added = doc.add_edge(source, target);
        if let Some(label) = &edge.label {
            added.label = label.clone();
        }
        added.style = edge_style(edge.edge_type);
    }
    doc
}

fn fill(
    graph: &mut Graph,
    scope: Option<usize>,
    diagram: &GraphDiagram,
    ids: &mut HashMap<String, NodeId>,
) {
    let is_subgraph_id = |id: &str| diagram.subgraphs.iter().any(|sg| sg.id == id);

    for decl in diagram.nodes.iter().filter(|n| n.subgraph == scope) {
        // A node named like a subgraph refers to the group node itself.
        if is_subgraph_id(&decl.id) {
            continue;
        }
        let node = graph.add_node();
        node.label = decl.label.clone();
        node.style = Some(NodeStyle {
            shape: Some(shape_for(decl.shape)),
            ..Default::default()
        });
        ids.insert(decl.id.clone(), node.id().clone());
    }

    for (index, sg) in diagram.subgraphs.iter().enumerate() {
        if sg.parent != scope {
            continue;
        }
        let group = graph.add_node();
        group.label = sg.label.clone();
        ids.insert(sg.id.clone(), group.id().clone());
        fill(group.subgraph(), Some(index), diagram, ids);
    }
}

fn shape_for(shape: NodeShape) -> Shape {
    match shape {
        NodeShape::Box => Shape::Rectangle,
        NodeShape::Round => Shape::RoundRectangle,
        NodeShape::Diamond => Shape::Diamond,
        NodeShape::Circle => Shape::Ellipse,
    }
}

fn edge_style(edge_type: EdgeType) -> Option<EdgeStyle> {
    let (target, kind, width) = match edge_type {
        EdgeType::Arrow => return None,
        EdgeType::OpenLink => (Arrow::None, None, None),
        EdgeType::DottedArrow => (Arrow::Standard, Some(LineType::Dotted), None),
        EdgeType::DottedLink => (Arrow::None, Some(LineType::Dotted), None),
        EdgeType::ThickArrow => (Arrow::Standard, None, Some(THICK_LINE_WIDTH)),
        EdgeType::ThickLink => (Arrow::None, None, Some(THICK_LINE_WIDTH)),
    };
    Some(EdgeStyle {
        target: Some(target),
        line: Some(LineStyle {
            color: None,
            width,
            kind,
        }),
        ..Default::default()
    })
}
