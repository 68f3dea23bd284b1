//! In-memory graph model: a document owning a tree of graphs and nodes, plus
//! the edges between any two nodes of that tree.

use std::fmt;
use std::io::Write;

use crate::error::Result;
use crate::style::{EdgeStyle, NodeStyle};
use crate::writer::Writer;

/// Separator between a subgraph's id and its local node ids.
const ID_SEPARATOR: char = ':';

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeId(String);

impl NodeId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EdgeId(String);

impl EdgeId {
    pub(crate) fn nth(n: usize) -> Self {
        EdgeId(format!("e{n}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A container of nodes. The root graph has no id; a node's subgraph is
/// identified by the node id followed by `:`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Graph {
    id: Option<String>,
    next_node: usize,
    nodes: Vec<Node>,
    pub description: String,
}

impl Graph {
    pub fn root() -> Self {
        Self::default()
    }

    fn nested(owner: &NodeId) -> Self {
        Self {
            id: Some(format!("{owner}{ID_SEPARATOR}")),
            ..Self::default()
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Hand out the next node id of this graph without creating a node.
    ///
    /// Ids are `n0`, `n1`, ... for the root graph and `<graph id>:n0`, ...
    /// for nested graphs. The counter never goes back.
    pub fn allocate_node_id(&mut self) -> NodeId {
        let local = format!("n{}", self.next_node);
        self.next_node += 1;
        match &self.id {
            Some(prefix) => NodeId(format!("{prefix}{ID_SEPARATOR}{local}")),
            None => NodeId(local),
        }
    }

    pub fn add_node(&mut self) -> &mut Node {
        let id = self.allocate_node_id();
        self.nodes.push(Node::new(id));
        let last = self.nodes.len() - 1;
        &mut self.nodes[last]
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Look a node up by id in this graph or any nested subgraph.
    pub fn find(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.iter().find_map(|n| {
            if &n.id == id {
                Some(n)
            } else {
                n.subgraph.as_ref().and_then(|g| g.find(id))
            }
        })
    }

    pub fn find_mut(&mut self, id: &NodeId) -> Option<&mut Node> {
        self.nodes.iter_mut().find_map(|n| {
            if &n.id == id {
                Some(n)
            } else {
                n.subgraph.as_mut().and_then(|g| g.find_mut(id))
            }
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    id: NodeId,
    subgraph: Option<Graph>,
    pub label: String,
    pub description: String,
    pub style: Option<NodeStyle>,
}

impl Node {
    pub(crate) fn new(id: NodeId) -> Self {
        Self {
            id,
            subgraph: None,
            label: String::new(),
            description: String::new(),
            style: None,
        }
    }

    pub fn id(&self) -> &NodeId {
        &self.id
    }

    /// The nested graph of this node, created on first access. A node with a
    /// subgraph is written as a group node.
    pub fn subgraph(&mut self) -> &mut Graph {
        let owner = &self.id;
        self.subgraph.get_or_insert_with(|| Graph::nested(owner))
    }

    pub fn nested(&self) -> Option<&Graph> {
        self.subgraph.as_ref()
    }

    pub fn is_group(&self) -> bool {
        self.subgraph.is_some()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    id: EdgeId,
    source: NodeId,
    target: NodeId,
    pub label: String,
    pub description: String,
    pub style: Option<EdgeStyle>,
}

impl Edge {
    pub(crate) fn new(id: EdgeId, source: NodeId, target: NodeId) -> Self {
        Self {
            id,
            source,
            target,
            label: String::new(),
            description: String::new(),
            style: None,
        }
    }

    pub fn id(&self) -> &EdgeId {
        &self.id
    }

    pub fn source(&self) -> &NodeId {
        &self.source
    }

    pub fn target(&self) -> &NodeId {
        &self.target
    }
}

/// A whole GraphML document: the root graph and every edge, in creation
/// order. Nothing is written until [`Document::write`] or [`Document::close`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    root: Graph,
    edges: Vec<Edge>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn graph(&self) -> &Graph {
        &self.root
    }

    pub fn graph_mut(&mut self) -> &mut Graph {
        &mut self.root
    }

    /// Connect two nodes anywhere in the tree. Ids are not checked against
    /// the graph.
    pub fn add_edge(&mut self, source: &NodeId, target: &NodeId) -> &mut Edge {
        let id = EdgeId::nth(self.edges.len());
        self.edges.push(Edge::new(id, source.clone(), target.clone()));
        let last = self.edges.len() - 1;
        &mut self.edges[last]
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Serialize the graph tree, then all edges, then the footer.
    pub fn write<W: Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        writer.write_graph(&self.root)?;
        for edge in &self.edges {
            writer.write_edge(edge)?;
        }
        writer.close()?;
        tracing::debug!(
            nodes = self.root.len(),
            edges = self.edges.len(),
            "document serialized"
        );
        Ok(())
    }

    /// Write the document to `sink` and hand the sink back. The document is
    /// consumed, so it cannot be changed or written again.
    pub fn close<W: Write>(self, sink: W) -> Result<W> {
        let mut writer = Writer::new(sink);
        self.write(&mut writer)?;
        Ok(writer.into_inner())
    }

    pub fn to_graphml(&self) -> Result<String> {
        let mut writer = Writer::new(Vec::new());
        self.write(&mut writer)?;
        Ok(String::from_utf8_lossy(&writer.into_inner()).into_owned())
    }
}
