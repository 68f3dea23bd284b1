/// A parsed Mermaid flowchart.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphDiagram {
    pub nodes: Vec<NodeDecl>,
    pub edges: Vec<Edge>,
    pub subgraphs: Vec<Subgraph>,
}

/// A `subgraph ... end` block. Parents are always listed before their
/// children.
#[derive(Debug, Clone, PartialEq)]
pub struct Subgraph {
    pub id: String,
    pub label: String,
    pub parent: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NodeDecl {
    pub id: String,
    pub label: String,
    pub shape: NodeShape,
    /// Innermost subgraph the node was first mentioned in.
    pub subgraph: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeShape {
    Box,
    Round,
    Diamond,
    Circle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub from: String,
    pub to: String,
    pub edge_type: EdgeType,
    pub label: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EdgeType {
    Arrow,
    OpenLink,
    DottedArrow,
    DottedLink,
    ThickArrow,
    ThickLink,
}
