use pretty_assertions::assert_eq;
use yed::{Color, Document, Error, FlatWriter, NodeStyle, Writer};

fn elements<'a, 'i>(
    xml: &'a roxmltree::Document<'i>,
    name: &'static str,
) -> Vec<roxmltree::Node<'a, 'i>> {
    xml.descendants().filter(|n| n.has_tag_name(name)).collect()
}

fn two_nodes_one_edge() -> Document {
    let mut doc = Document::new();
    let a = doc.graph_mut().add_node();
    a.label = "A".to_string();
    let a = a.id().clone();
    let b = doc.graph_mut().add_node();
    b.label = "B".to_string();
    let b = b.id().clone();
    doc.add_edge(&a, &b).label = "go".to_string();
    doc
}

// =============================================================================
// End to end
// =============================================================================

#[test]
fn two_nodes_and_an_edge() {
    let out = two_nodes_one_edge().to_graphml().unwrap();
    let xml = roxmltree::Document::parse(&out).unwrap();

    let graphs = elements(&xml, "graph");
    assert_eq!(graphs.len(), 1);
    assert_eq!(graphs[0].attribute("id"), Some("G"));
    assert_eq!(graphs[0].attribute("edgedefault"), Some("directed"));

    let nodes = elements(&xml, "node");
    assert_eq!(nodes.len(), 2);
    let ids: Vec<&str> = nodes.iter().filter_map(|n| n.attribute("id")).collect();
    assert_eq!(ids, vec!["n0", "n1"]);

    let shapes: Vec<&str> = elements(&xml, "Shape")
        .iter()
        .filter_map(|n| n.attribute("type"))
        .collect();
    assert_eq!(shapes, vec!["roundrectangle", "roundrectangle"]);
    for fill in elements(&xml, "Fill") {
        assert_eq!(fill.attribute("color"), Some("#FFCC00"));
    }
    for border in elements(&xml, "BorderStyle") {
        assert_eq!(border.attribute("color"), Some("#000000"));
    }

    let edges = elements(&xml, "edge");
    assert_eq!(edges.len(), 1);
    assert_eq!(edges[0].attribute("source"), Some("n0"));
    assert_eq!(edges[0].attribute("target"), Some("n1"));
    let labels = elements(&xml, "EdgeLabel");
    assert_eq!(labels.len(), 1);
    assert_eq!(labels[0].text(), Some("go"));

    assert_eq!(elements(&xml, "Resources").len(), 1);
    assert!(!out.contains("{}"));
    assert!(!out.contains('%'));
}

#[test]
fn key_declarations_are_complete() {
    let out = Document::new().to_graphml().unwrap();
    let xml = roxmltree::Document::parse(&out).unwrap();
    let keys: Vec<&str> = elements(&xml, "key")
        .iter()
        .filter_map(|n| n.attribute("id"))
        .collect();
    let expected: Vec<String> = (0..=10).map(|i| format!("d{i}")).collect();
    assert_eq!(keys, expected);
}

#[test]
fn edges_follow_the_graph_element() {
    let out = two_nodes_one_edge().to_graphml().unwrap();
    let graph_end = out.find("</graph>").unwrap();
    let edge = out.find("<edge ").unwrap();
    let resources = out.find(r#"<data key="d7">"#).unwrap();
    assert!(graph_end < edge);
    assert!(edge < resources);
}

// =============================================================================
// Group nodes
// =============================================================================

#[test]
fn group_node_encloses_its_subgraph() {
    let mut doc = Document::new();
    let group = doc.graph_mut().add_node();
    group.label = "Team".to_string();
    let child = group.subgraph().add_node();
    child.label = "Member".to_string();
    let child_id = child.id().clone();
    let outside = doc.graph_mut().add_node().id().clone();
    doc.add_edge(&outside, &child_id);

    let out = doc.to_graphml().unwrap();
    let xml = roxmltree::Document::parse(&out).unwrap();

    let group = elements(&xml, "node")
        .into_iter()
        .find(|n| n.attribute("yfiles.foldertype") == Some("group"))
        .unwrap();
    assert_eq!(group.attribute("id"), Some("n0"));

    let d6 = group
        .children()
        .find(|n| n.has_tag_name("data") && n.attribute("key") == Some("d6"))
        .unwrap();
    let proxy = d6.children().find(|n| n.has_tag_name("ProxyAutoBoundsNode")).unwrap();
    let realizers = proxy
        .descendants()
        .filter(|n| n.has_tag_name("GroupNode"))
        .count();
    assert_eq!(realizers, 2);

    let nested: Vec<_> = group.children().filter(|n| n.has_tag_name("graph")).collect();
    assert_eq!(nested.len(), 1);
    assert_eq!(nested[0].attribute("id"), Some("n0:"));
    let inner: Vec<&str> = nested[0]
        .children()
        .filter(|n| n.has_tag_name("node"))
        .filter_map(|n| n.attribute("id"))
        .collect();
    assert_eq!(inner, vec!["n0::n0"]);

    let edge = elements(&xml, "edge")[0];
    assert_eq!(edge.attribute("source"), Some("n1"));
    assert_eq!(edge.attribute("target"), Some("n0::n0"));
}

// =============================================================================
// Escaping
// =============================================================================

#[test]
fn escaped_text_reads_back() {
    let tricky = r#"<tag attr="v"> & 'quoted'"#;
    let mut doc = Document::new();
    let node = doc.graph_mut().add_node();
    node.label = tricky.to_string();
    node.description = tricky.to_string();
    let id = node.id().clone();
    let edge = doc.add_edge(&id, &id);
    edge.label = tricky.to_string();
    edge.description = tricky.to_string();
    doc.graph_mut().description = tricky.to_string();

    let out = doc.to_graphml().unwrap();
    let xml = roxmltree::Document::parse(&out).unwrap();

    let texts: Vec<&str> = xml
        .descendants()
        .filter(|n| {
            n.has_tag_name("NodeLabel")
                || n.has_tag_name("EdgeLabel")
                || (n.has_tag_name("data")
                    && matches!(n.attribute("key"), Some("d0") | Some("d5")))
        })
        .filter_map(|n| n.text())
        .collect();
    assert_eq!(texts.len(), 5);
    for text in texts {
        assert_eq!(text, tricky);
    }
}

// =============================================================================
// Lifecycle
// =============================================================================

#[test]
fn close_is_idempotent_and_final() {
    let doc = two_nodes_one_edge();
    let mut writer = Writer::new(Vec::new());
    doc.write(&mut writer).unwrap();
    let first = writer.get_ref().clone();

    writer.close().unwrap();
    assert_eq!(writer.get_ref(), &first);

    let err = doc.write(&mut writer).unwrap_err();
    assert!(matches!(err, Error::Closed));
    assert!(matches!(writer.write_graph(doc.graph()), Err(Error::Closed)));
    assert_eq!(writer.into_inner(), first);
}

#[test]
fn close_hands_back_the_sink() {
    let sink = two_nodes_one_edge().close(Vec::new()).unwrap();
    let out = String::from_utf8(sink).unwrap();
    assert_eq!(out, two_nodes_one_edge().to_graphml().unwrap());
}

#[test]
fn explicit_style_is_field_local() {
    let mut doc = Document::new();
    doc.graph_mut().add_node().style = Some(NodeStyle {
        color: Some(Color::from("#123456")),
        ..Default::default()
    });
    let out = doc.to_graphml().unwrap();
    let xml = roxmltree::Document::parse(&out).unwrap();
    assert_eq!(elements(&xml, "Fill")[0].attribute("color"), Some("#123456"));
    assert_eq!(elements(&xml, "Shape")[0].attribute("type"), Some("roundrectangle"));
    assert_eq!(elements(&xml, "Geometry")[0].attribute("height"), Some("30.0"));
    let border = elements(&xml, "BorderStyle")[0];
    assert_eq!(border.attribute("color"), Some("#000000"));
    assert_eq!(border.attribute("width"), Some("1.0"));
}

#[test]
fn flat_writer_streams_a_valid_document() {
    let mut flat = FlatWriter::with_description(Vec::new(), "streamed");
    let mut ids = Vec::new();
    for i in 0..3 {
        let mut node = flat.new_node();
        node.label = format!("step {i}");
        flat.write_node(&node).unwrap();
        ids.push(node.id().clone());
    }
    for pair in ids.windows(2) {
        let edge = flat.new_edge(&pair[0], &pair[1]);
        flat.write_edge(&edge).unwrap();
    }
    flat.close().unwrap();
    flat.close().unwrap();

    let out = String::from_utf8(flat.into_inner()).unwrap();
    let xml = roxmltree::Document::parse(&out).unwrap();
    let graph = elements(&xml, "graph")[0];
    assert_eq!(graph.attribute("id"), Some("G"));
    assert_eq!(graph.children().filter(|n| n.has_tag_name("node")).count(), 3);
    assert_eq!(graph.children().filter(|n| n.has_tag_name("edge")).count(), 2);
    assert_eq!(out.matches("</graphml>").count(), 1);
}

#[test]
fn non_finite_geometry_falls_back_to_defaults() {
    let mut doc = Document::new();
    doc.graph_mut().add_node().style = Some(NodeStyle {
        height: Some(f64::NAN),
        ..Default::default()
    });
    let out = doc.to_graphml().unwrap();
    let xml = roxmltree::Document::parse(&out).unwrap();
    assert_eq!(elements(&xml, "Geometry")[0].attribute("height"), Some("30.0"));
    assert!(!out.contains("NaN"));
}
