//! yEd GraphML fragments. Every function appends one piece of markup to a
//! `String`; styles arrive already resolved.

use std::fmt::Write as _;

use crate::escape::EscapeXml;
use crate::model::{Edge, Graph, Node};
use crate::style::{ResolvedEdgeStyle, ResolvedNodeStyle};

/// Id of the root graph element, which has no id of its own.
pub const ROOT_GRAPH_ID: &str = "G";

pub const HEADER: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="no"?>
<graphml xmlns="http://graphml.graphdrawing.org/xmlns" xmlns:java="http://www.yworks.com/xml/yfiles-common/1.0/java" xmlns:sys="http://www.yworks.com/xml/yfiles-common/markup/primitives/2.0" xmlns:x="http://www.yworks.com/xml/yfiles-common/markup/2.0" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xmlns:y="http://www.yworks.com/xml/graphml" xmlns:yed="http://www.yworks.com/xml/yed/3" xsi:schemaLocation="http://graphml.graphdrawing.org/xmlns http://www.yworks.com/xml/schema/graphml/1.1/ygraphml.xsd">
  <!--Created by yed-->
  <key attr.name="Description" attr.type="string" for="graph" id="d0"/>
  <key for="port" id="d1" yfiles.type="portgraphics"/>
  <key for="port" id="d2" yfiles.type="portgeometry"/>
  <key for="port" id="d3" yfiles.type="portuserdata"/>
  <key attr.name="url" attr.type="string" for="node" id="d4"/>
  <key attr.name="description" attr.type="string" for="node" id="d5"/>
  <key for="node" id="d6" yfiles.type="nodegraphics"/>
  <key for="graphml" id="d7" yfiles.type="resources"/>
  <key attr.name="url" attr.type="string" for="edge" id="d8"/>
  <key attr.name="description" attr.type="string" for="edge" id="d9"/>
  <key for="edge" id="d10" yfiles.type="edgegraphics"/>
"#;

pub const FOOTER: &str = r#"
  <data key="d7">
    <y:Resources/>
  </data>
</graphml>
"#;

/// Numbers as yEd writes them: always with a fractional part.
struct Num(f64);

impl std::fmt::Display for Num {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // xs:double spellings for the values Rust prints as `inf` and `NaN`.
        match self.0 {
            v if v.is_nan() => f.write_str("NaN"),
            v if v.is_infinite() => f.write_str(if v > 0.0 { "INF" } else { "-INF" }),
            v if v.fract() == 0.0 => write!(f, "{v:.1}"),
            v => write!(f, "{v}"),
        }
    }
}

pub fn graph_open(out: &mut String, graph: &Graph) {
    let id = graph.id().unwrap_or(ROOT_GRAPH_ID);
    let _ = write!(out, "\n  <graph edgedefault=\"directed\" id=\"{}\">", EscapeXml(id));
    if graph.description.is_empty() {
        out.push_str("\n    <data key=\"d0\"/>");
    } else {
        let _ = write!(
            out,
            "\n    <data key=\"d0\" xml:space=\"preserve\">{}</data>",
            EscapeXml(&graph.description)
        );
    }
}

pub fn graph_close(out: &mut String) {
    out.push_str("\n  </graph>");
}

fn description(out: &mut String, text: &str) {
    if text.is_empty() {
        out.push_str("\n      <data key=\"d5\"/>");
    } else {
        let _ = write!(
            out,
            "\n      <data key=\"d5\" xml:space=\"preserve\">{}</data>",
            EscapeXml(text)
        );
    }
}

pub fn shape_node(out: &mut String, node: &Node, style: &ResolvedNodeStyle) {
    let _ = write!(out, "\n    <node id=\"{}\">", EscapeXml(node.id().as_str()));
    description(out, &node.description);
    let border = &style.border;
    let _ = write!(
        out,
        r#"
      <data key="d6">
        <y:ShapeNode>
          <y:Geometry height="{}" x="0.0" y="0.0"/>
          <y:Fill color="{}" transparent="false"/>
          <y:BorderStyle color="{}" raised="false" type="{}" width="{}"/>"#,
        Num(style.height),
        EscapeXml(style.color.as_str()),
        EscapeXml(border.color.as_str()),
        border.kind.as_str(),
        Num(border.width),
    );
    if !node.label.is_empty() {
        let label = &style.label;
        let _ = write!(
            out,
            r#"
          <y:NodeLabel alignment="center" autoSizePolicy="content" fontFamily="Dialog" fontSize="{}" fontStyle="plain" hasBackgroundColor="false" hasLineColor="false" height="17.96875" horizontalTextPosition="center" iconTextGap="4" modelName="custom" textColor="{}" verticalTextPosition="bottom" visible="true" x="5.0" xml:space="preserve" y="6.015625">{}<y:LabelModel><y:SmartNodeLabelModel distance="4.0"/></y:LabelModel><y:ModelParameter><y:SmartNodeLabelModelParameter labelRatioX="0.0" labelRatioY="0.0" nodeRatioX="0.0" nodeRatioY="0.0" offsetX="0.0" offsetY="0.0" upX="0.0" upY="-1.0"/></y:ModelParameter></y:NodeLabel>"#,
            label.font_size,
            EscapeXml(label.color.as_str()),
            EscapeXml(&node.label),
        );
    }
    let _ = write!(
        out,
        r#"
          <y:Shape type="{}"/>
        </y:ShapeNode>
      </data>"#,
        style.shape.as_str()
    );
    node_close(out);
}

/// Opening part of a group node: the node element and its two realizers
/// (open and closed). The caller writes the subgraph, then [`node_close`].
pub fn group_node_open(out: &mut String, node: &Node) {
    let _ = write!(
        out,
        "\n    <node id=\"{}\" yfiles.foldertype=\"group\">",
        EscapeXml(node.id().as_str())
    );
    description(out, &node.description);
    let label = EscapeXml(&node.label);
    let _ = write!(
        out,
        r##"
      <data key="d6">
        <y:ProxyAutoBoundsNode>
          <y:Realizers active="0">
            <y:GroupNode>
              <y:Geometry height="181.87067499999998" width="294.52628859375017" x="186.07787140624984" y="135.68900499999998"/>
              <y:Fill color="#F5F5F5" transparent="false"/>
              <y:BorderStyle color="#000000" type="dashed" width="1.0"/>
              <y:NodeLabel alignment="right" autoSizePolicy="node_width" backgroundColor="#EBEBEB" borderDistance="0.0" fontFamily="Dialog" fontSize="15" fontStyle="plain" hasLineColor="false" height="21.4609375" horizontalTextPosition="center" iconTextGap="4" modelName="internal" modelPosition="t" textColor="#000000" verticalTextPosition="bottom" visible="true" width="294.52628859375017" x="0.0" xml:space="preserve" y="0.0">{label}</y:NodeLabel>
              <y:Shape type="roundrectangle"/>
              <y:State closed="false" closedHeight="50.0" closedWidth="50.0" innerGraphDisplayEnabled="false"/>
              <y:NodeBounds considerNodeLabelSize="true"/>
              <y:Insets bottom="15" bottomF="15.0" left="15" leftF="15.0" right="15" rightF="15.0" top="15" topF="15.0"/>
              <y:BorderInsets bottom="5" bottomF="5.1200000000000045" left="7" leftF="7.15380859375" right="7" rightF="7.040000000000134" top="0" topF="0.0"/>
            </y:GroupNode>
            <y:GroupNode>
              <y:Geometry height="50.0" width="50.0" x="0.0" y="60.0"/>
              <y:Fill color="#F5F5F5" transparent="false"/>
              <y:BorderStyle color="#000000" type="dashed" width="1.0"/>
              <y:NodeLabel alignment="right" autoSizePolicy="node_width" backgroundColor="#EBEBEB" borderDistance="0.0" fontFamily="Dialog" fontSize="15" fontStyle="plain" hasLineColor="false" height="21.4609375" horizontalTextPosition="center" iconTextGap="4" modelName="internal" modelPosition="t" textColor="#000000" verticalTextPosition="bottom" visible="true" width="64.3076171875" x="-7.15380859375" xml:space="preserve" y="0.0">{label}</y:NodeLabel>
              <y:Shape type="roundrectangle"/>
              <y:State closed="true" closedHeight="50.0" closedWidth="50.0" innerGraphDisplayEnabled="false"/>
              <y:Insets bottom="5" bottomF="5.0" left="5" leftF="5.0" right="5" rightF="5.0" top="5" topF="5.0"/>
              <y:BorderInsets bottom="0" bottomF="0.0" left="0" leftF="0.0" right="0" rightF="0.0" top="0" topF="0.0"/>
            </y:GroupNode>
          </y:Realizers>
        </y:ProxyAutoBoundsNode>
      </data>"##
    );
}

pub fn node_close(out: &mut String) {
    out.push_str("\n    </node>");
}

pub fn edge(out: &mut String, edge: &Edge, style: &ResolvedEdgeStyle) {
    let _ = write!(
        out,
        "\n  <edge id=\"{}\" source=\"{}\" target=\"{}\">",
        EscapeXml(edge.id().as_str()),
        EscapeXml(edge.source().as_str()),
        EscapeXml(edge.target().as_str()),
    );
    description(out, &edge.description);
    let line = &style.line;
    let _ = write!(
        out,
        r#"
      <data key="d10">
        <y:PolyLineEdge>
          <y:Path sx="0.0" sy="0.0" tx="0.0" ty="0.0"/>
          <y:LineStyle color="{}" type="{}" width="{}"/>
          <y:Arrows source="{}" target="{}"/>"#,
        EscapeXml(line.color.as_str()),
        line.kind.as_str(),
        Num(line.width),
        style.source.as_str(),
        style.target.as_str(),
    );
    if !edge.label.is_empty() {
        let label = &style.label;
        let _ = write!(
            out,
            r#"
          <y:EdgeLabel alignment="center" configuration="AutoFlippingLabel" distance="2.0" fontFamily="Dialog" fontSize="{}" fontStyle="plain" hasBackgroundColor="false" hasLineColor="false" height="17.96875" horizontalTextPosition="center" iconTextGap="4" modelName="three_center" modelPosition="center" preferredPlacement="anywhere" ratio="0.5" textColor="{}" verticalTextPosition="bottom" visible="true" x="-2.14501953125" xml:space="preserve" y="11.50439453125">{}<y:PreferredPlacementDescriptor angle="0.0" angleOffsetOnRightSide="0" angleReference="absolute" angleRotationOnRightSide="co" distance="-1.0" frozen="true" placement="anywhere" side="anywhere" sideReference="relative_to_edge_flow"/></y:EdgeLabel>"#,
            label.font_size,
            EscapeXml(label.color.as_str()),
            EscapeXml(&edge.label),
        );
    }
    out.push_str(
        r#"
          <y:BendStyle smoothed="false"/>
        </y:PolyLineEdge>
      </data>
  </edge>"#,
    );
}
