use std::io::Write;

use crate::error::Result;
use crate::model::{Edge, EdgeId, Graph, Node, NodeId};
use crate::writer::Writer;

/// Streaming writer for a single root graph.
///
/// The first write emits the header and opens the root graph element. Nodes
/// and edges then go out one by one in call order, inside that element, and
/// [`FlatWriter::close`] closes it before the footer.
///
/// Node ids come from the same allocator as [`Graph::add_node`], so ids match
/// a [`crate::Document`] holding the same nodes.
pub struct FlatWriter<W: Write> {
    writer: Writer<W>,
    root: Graph,
    next_edge: usize,
    graph_open: bool,
}

impl<W: Write> FlatWriter<W> {
    pub fn new(sink: W) -> Self {
        Self::with_description(sink, String::new())
    }

    pub fn with_description(sink: W, description: impl Into<String>) -> Self {
        let mut root = Graph::root();
        root.description = description.into();
        Self {
            writer: Writer::new(sink),
            root,
            next_edge: 0,
            graph_open: false,
        }
    }

    /// A fresh node with the next root-graph id. Nothing is written until the
    /// node is passed to [`FlatWriter::write_node`].
    pub fn new_node(&mut self) -> Node {
        Node::new(self.root.allocate_node_id())
    }

    pub fn new_edge(&mut self, source: &NodeId, target: &NodeId) -> Edge {
        let id = EdgeId::nth(self.next_edge);
        self.next_edge += 1;
        Edge::new(id, source.clone(), target.clone())
    }

    fn ensure_open(&mut self) -> Result<()> {
        if !self.graph_open {
            self.writer.open_graph(&self.root)?;
            self.graph_open = true;
        }
        Ok(())
    }

    pub fn write_node(&mut self, node: &Node) -> Result<()> {
        self.ensure_open()?;
        self.writer.write_node(node)
    }

    pub fn write_edge(&mut self, edge: &Edge) -> Result<()> {
        self.ensure_open()?;
        self.writer.write_edge(edge)
    }

    /// Close the root graph and write the footer. Idempotent.
    pub fn close(&mut self) -> Result<()> {
        if self.writer.is_closed() {
            return Ok(());
        }
        self.ensure_open()?;
        self.writer.close_graph()?;
        self.writer.close()
    }

    pub fn is_closed(&self) -> bool {
        self.writer.is_closed()
    }

    pub fn get_ref(&self) -> &W {
        self.writer.get_ref()
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}
