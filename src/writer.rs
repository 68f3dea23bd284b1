use std::io::Write;

use crate::error::{Error, Result};
use crate::markup;
use crate::model::{Edge, Graph, Node};
use crate::style;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Unopened,
    Header,
    Closed,
}

/// Append-only GraphML emitter.
///
/// The header goes out with the first write of any kind and the footer with
/// [`Writer::close`]. A failed sink write is kept and returned by every later
/// call, without touching the sink again. The writer never closes the sink;
/// take it back with [`Writer::into_inner`].
///
/// Nodes only reach the sink through [`Writer::write_graph`], so every
/// `<node>` sits inside a `<graph>`. Edges are written by
/// [`crate::Document::write`] and [`crate::FlatWriter`].
pub struct Writer<W: Write> {
    sink: W,
    phase: Phase,
    error: Option<Error>,
}

impl<W: Write> Writer<W> {
    pub fn new(sink: W) -> Self {
        Self {
            sink,
            phase: Phase::Unopened,
            error: None,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.phase == Phase::Closed
    }

    pub fn get_ref(&self) -> &W {
        &self.sink
    }

    pub fn into_inner(self) -> W {
        self.sink
    }

    fn check(&self) -> Result<()> {
        if let Some(err) = &self.error {
            return Err(err.clone());
        }
        if self.phase == Phase::Closed {
            return Err(Error::Closed);
        }
        Ok(())
    }

    fn emit(&mut self, text: &str) -> Result<()> {
        self.check()?;
        if let Err(err) = self.sink.write_all(text.as_bytes()) {
            tracing::warn!(error = %err, "graphml sink write failed");
            let err = Error::from(err);
            self.error = Some(err.clone());
            return Err(err);
        }
        Ok(())
    }

    /// Emit the XML prolog and key declarations. Repeated calls are no-ops.
    pub fn write_header(&mut self) -> Result<()> {
        self.check()?;
        if self.phase == Phase::Header {
            return Ok(());
        }
        self.emit(markup::HEADER)?;
        self.phase = Phase::Header;
        tracing::debug!("graphml header written");
        Ok(())
    }

    /// Write a complete graph element, depth first through group nodes.
    pub fn write_graph(&mut self, graph: &Graph) -> Result<()> {
        self.open_graph(graph)?;
        for node in graph.nodes() {
            self.write_node(node)?;
        }
        self.close_graph()
    }

    pub(crate) fn open_graph(&mut self, graph: &Graph) -> Result<()> {
        self.write_header()?;
        let mut out = String::new();
        markup::graph_open(&mut out, graph);
        self.emit(&out)
    }

    pub(crate) fn close_graph(&mut self) -> Result<()> {
        let mut out = String::new();
        markup::graph_close(&mut out);
        self.emit(&out)
    }

    /// Write one node. A group node is followed by its whole subgraph before
    /// the node element is closed.
    pub(crate) fn write_node(&mut self, node: &Node) -> Result<()> {
        self.write_header()?;
        tracing::trace!(id = %node.id(), group = node.is_group(), "writing node");
        let mut out = String::new();
        match node.nested() {
            Some(sub) => {
                markup::group_node_open(&mut out, node);
                self.emit(&out)?;
                self.write_graph(sub)?;
                out.clear();
                markup::node_close(&mut out);
            }
            None => {
                let style = style::resolve_node(node.style.as_ref());
                markup::shape_node(&mut out, node, &style);
            }
        }
        self.emit(&out)
    }

    pub(crate) fn write_edge(&mut self, edge: &Edge) -> Result<()> {
        self.write_header()?;
        tracing::trace!(id = %edge.id(), source = %edge.source(), target = %edge.target(), "writing edge");
        let style = style::resolve_edge(edge.style.as_ref());
        let mut out = String::new();
        markup::edge(&mut out, edge, &style);
        self.emit(&out)
    }

    /// Emit the footer. Closing twice is a no-op; closing a writer that never
    /// wrote anything still produces a complete, empty document.
    pub fn close(&mut self) -> Result<()> {
        if self.phase == Phase::Closed {
            return Ok(());
        }
        self.write_header()?;
        self.emit(markup::FOOTER)?;
        self.phase = Phase::Closed;
        tracing::debug!("graphml footer written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io;

    struct FailAfter {
        ok_writes: usize,
        attempts: usize,
        buf: Vec<u8>,
    }

    impl Write for FailAfter {
        fn write(&mut self, data: &[u8]) -> io::Result<usize> {
            self.attempts += 1;
            if self.ok_writes == 0 {
                return Err(io::Error::other("disk full"));
            }
            self.ok_writes -= 1;
            self.buf.extend_from_slice(data);
            Ok(data.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn header_is_written_once() {
        let mut w = Writer::new(Vec::new());
        w.write_header().unwrap();
        w.write_header().unwrap();
        let out = String::from_utf8(w.into_inner()).unwrap();
        assert_eq!(out.matches("<graphml ").count(), 1);
    }

    #[test]
    fn close_on_fresh_writer_makes_empty_document() {
        let mut w = Writer::new(Vec::new());
        w.close().unwrap();
        let out = String::from_utf8(w.into_inner()).unwrap();
        assert!(out.starts_with("<?xml"));
        assert!(out.ends_with("</graphml>\n"));
    }

    #[test]
    fn close_is_idempotent() {
        let mut w = Writer::new(Vec::new());
        w.write_graph(&Graph::root()).unwrap();
        w.close().unwrap();
        let first = w.get_ref().clone();
        w.close().unwrap();
        assert_eq!(w.get_ref(), &first);
        assert!(w.is_closed());
    }

    #[test]
    fn public_writes_keep_nodes_inside_graphs() {
        let mut g = Graph::root();
        g.add_node();
        let group = g.add_node();
        group.subgraph().add_node();

        let mut w = Writer::new(Vec::new());
        w.write_header().unwrap();
        w.write_graph(&g).unwrap();
        w.close().unwrap();
        let out = String::from_utf8(w.into_inner()).unwrap();

        let xml = roxmltree::Document::parse(&out).unwrap();
        let nodes: Vec<_> = xml.descendants().filter(|n| n.has_tag_name("node")).collect();
        assert_eq!(nodes.len(), 3);
        for node in nodes {
            let parent = node.parent_element().unwrap();
            assert!(parent.has_tag_name("graph"), "{:?} outside a graph", node.attribute("id"));
        }
    }

    #[test]
    fn writes_after_close_fail() {
        let mut w = Writer::new(Vec::new());
        w.close().unwrap();
        let len = w.get_ref().len();
        let mut g = Graph::root();
        let node = g.add_node().clone();
        assert!(w.write_graph(&g).unwrap_err().is_closed());
        assert!(w.write_node(&node).unwrap_err().is_closed());
        assert!(w.write_header().unwrap_err().is_closed());
        assert_eq!(w.get_ref().len(), len);
    }

    #[test]
    fn sink_error_is_sticky() {
        let sink = FailAfter {
            ok_writes: 1,
            attempts: 0,
            buf: Vec::new(),
        };
        let mut w = Writer::new(sink);
        w.write_header().unwrap();
        let mut g = Graph::root();
        g.add_node();
        let first = w.write_graph(&g).unwrap_err();
        assert!(matches!(first, Error::Sink(_)));
        let attempts = w.get_ref().attempts;

        let again = w.close().unwrap_err();
        assert_eq!(again.to_string(), first.to_string());
        assert!(w.write_graph(&g).is_err());
        assert_eq!(w.get_ref().attempts, attempts, "no further sink writes");
        assert!(!w.is_closed());
    }
}
