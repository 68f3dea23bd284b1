use winnow::prelude::*;
use winnow::ascii::{line_ending, space0, space1};
use winnow::combinator::{alt, eof, opt};
use winnow::error::{ContextError, StrContext};
use winnow::token::{take_until, take_while};

use crate::error::{Error, Result};
use crate::graph_ast::*;

const UNTERMINATED: &str = "subgraph";

pub fn parse_graph(input: &str) -> Result<GraphDiagram> {
    let mut input = input;
    graph_diagram(&mut input).map_err(|err| syntax_error(input, &err))
}

fn syntax_error(rest: &str, err: &ContextError) -> Error {
    if err.context().any(|c| matches!(c, StrContext::Label(label) if *label == UNTERMINATED)) {
        return Error::Syntax("subgraph is missing its `end`".to_string());
    }
    if rest.trim().is_empty() {
        return Error::Syntax("unexpected end of input".to_string());
    }
    let context = rest.lines().map(str::trim).find(|l| !l.is_empty()).unwrap_or("");
    let context_display = if context.chars().count() > 40 {
        format!("{}...", context.chars().take(40).collect::<String>())
    } else {
        context.to_string()
    };
    Error::Syntax(format!("unexpected `{context_display}`"))
}

fn graph_diagram(input: &mut &str) -> winnow::Result<GraphDiagram> {
    space0.parse_next(input)?;
    alt(("graph", "flowchart")).parse_next(input)?;
    space1.parse_next(input)?;
    direction.parse_next(input)?;
    space0.parse_next(input)?;
    opt(line_ending).parse_next(input)?;

    let mut diagram = GraphDiagram {
        nodes: Vec::new(),
        edges: Vec::new(),
        subgraphs: Vec::new(),
    };

    for line in block_body(input, false)? {
        collect_line(line, None, &mut diagram);
    }

    Ok(diagram)
}

fn collect_line(line: GraphLine, scope: Option<usize>, diagram: &mut GraphDiagram) {
    match line {
        GraphLine::Edges(items) => {
            for (edge, from_decl, to_decl) in items {
                add_node(&mut diagram.nodes, from_decl, scope);
                add_node(&mut diagram.nodes, to_decl, scope);
                diagram.edges.push(edge);
            }
        }
        GraphLine::Node(decl) => {
            add_node(&mut diagram.nodes, decl, scope);
        }
        GraphLine::SubgraphBlock { id, label, lines } => {
            // A repeated id reopens the first block of that name.
            let index = match diagram.subgraphs.iter().position(|sg| sg.id == id) {
                Some(index) => index,
                None => {
                    diagram.subgraphs.push(Subgraph {
                        id,
                        label,
                        parent: scope,
                    });
                    diagram.subgraphs.len() - 1
                }
            };
            for inner in lines {
                collect_line(inner, Some(index), diagram);
            }
        }
    }
}

fn add_node(nodes: &mut Vec<NodeDecl>, mut decl: NodeDecl, scope: Option<usize>) {
    if !nodes.iter().any(|n| n.id == decl.id) {
        decl.subgraph = scope;
        nodes.push(decl);
    }
}

#[derive(Debug)]
enum GraphLine {
    Edges(Vec<(Edge, NodeDecl, NodeDecl)>),
    Node(NodeDecl),
    SubgraphBlock {
        id: String,
        label: String,
        lines: Vec<GraphLine>,
    },
}

/// Lines up to the end of input, or up to the closing `end` when `nested`.
///
/// On failure the input is left at the start of the offending line, however
/// deep in nested subgraphs it sits.
fn block_body(input: &mut &str, nested: bool) -> winnow::Result<Vec<GraphLine>> {
    let mut lines = Vec::new();
    loop {
        space0.parse_next(input)?;
        if nested && at_end_keyword(input) {
            "end".parse_next(input)?;
            line_end.parse_next(input)?;
            return Ok(lines);
        }
        if input.is_empty() {
            if nested {
                "end".context(StrContext::Label(UNTERMINATED)).parse_next(input)?;
            }
            return Ok(lines);
        }
        if let Some(line) = graph_line(input)? {
            lines.push(line);
        }
    }
}

fn graph_line(input: &mut &str) -> winnow::Result<Option<GraphLine>> {
    if at_subgraph_keyword(input) {
        return subgraph_block.map(Some).parse_next(input);
    }

    let line_start = *input;
    let result = alt((
        blank_line.map(|_| None),
        comment_line.map(|_| None),
        edge_line.map(Some),
        alt_edge_line.map(Some),
        node_line.map(Some),
    ))
    .parse_next(input);
    if result.is_err() {
        *input = line_start;
    }
    result
}

fn at_end_keyword(input: &str) -> bool {
    input
        .strip_prefix("end")
        .is_some_and(|rest| rest.is_empty() || rest.starts_with([' ', '\t', '\r', '\n', ';']))
}

fn at_subgraph_keyword(input: &str) -> bool {
    input
        .strip_prefix("subgraph")
        .is_some_and(|rest| rest.starts_with([' ', '\t']))
}

fn subgraph_block(input: &mut &str) -> winnow::Result<GraphLine> {
    let line_start = *input;
    let header = (
        "subgraph",
        space1,
        take_while(1.., |c: char| c != '\n' && c != '\r'),
        opt(line_ending),
    )
        .parse_next(input);
    let title = match header {
        Ok((_, _, title, _)) => title,
        Err(err) => {
            *input = line_start;
            return Err(err);
        }
    };
    let (id, label) = split_subgraph_title(title.trim_end());
    let lines = block_body(input, true)?;
    Ok(GraphLine::SubgraphBlock { id, label, lines })
}

/// `subgraph one [Title]` names the block `one`; a bare `subgraph Title`
/// derives the id from the title.
fn split_subgraph_title(title: &str) -> (String, String) {
    if let Some(open) = title.find('[') {
        if title.ends_with(']') && open > 0 {
            let id = title[..open].trim().to_string();
            let label = unquote(title[open + 1..title.len() - 1].trim()).to_string();
            return (id, label);
        }
    }
    let label = unquote(title).to_string();
    (label.replace(' ', "_"), label)
}

fn unquote(text: &str) -> &str {
    text.strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .unwrap_or(text)
}

fn blank_line(input: &mut &str) -> winnow::Result<()> {
    line_ending.void().parse_next(input)
}

fn comment_line(input: &mut &str) -> winnow::Result<()> {
    "%%".parse_next(input)?;
    take_while(0.., |c: char| c != '\n' && c != '\r').parse_next(input)?;
    opt(line_ending).parse_next(input)?;
    Ok(())
}

fn direction(input: &mut &str) -> winnow::Result<()> {
    alt(("TD", "TB", "BT", "LR", "RL")).void().parse_next(input)
}

fn identifier<'s>(input: &mut &'s str) -> winnow::Result<&'s str> {
    take_while(1.., |c: char| c.is_alphanumeric() || c == '_').parse_next(input)
}

fn node_ref(input: &mut &str) -> winnow::Result<NodeDecl> {
    let id = identifier.parse_next(input)?;
    let shape_label = opt(shape_label).parse_next(input)?;
    let (shape, label) = shape_label.unwrap_or_else(|| (NodeShape::Box, id.to_string()));
    Ok(NodeDecl {
        id: id.to_string(),
        label,
        shape,
        subgraph: None,
    })
}

fn shape_label(input: &mut &str) -> winnow::Result<(NodeShape, String)> {
    alt((
        circle_label.map(|l| (NodeShape::Circle, l)),
        round_label.map(|l| (NodeShape::Round, l)),
        diamond_label.map(|l| (NodeShape::Diamond, l)),
        bracketed_label.map(|l| (NodeShape::Box, l)),
    ))
    .parse_next(input)
}

fn quoted_inner(quote: char, closer: char) -> impl FnMut(&mut &str) -> winnow::Result<String> {
    move |input: &mut &str| {
        if input.starts_with(quote) {
            let _q: char = winnow::token::any.parse_next(input)?;
            let text = take_while(1.., move |c: char| c != quote).parse_next(input)?;
            let result = text.to_string();
            let _q2: char = winnow::token::any.parse_next(input)?;
            Ok(result)
        } else {
            let text = take_while(1.., move |c: char| c != closer).parse_next(input)?;
            Ok(text.to_string())
        }
    }
}

fn round_label(input: &mut &str) -> winnow::Result<String> {
    "(".parse_next(input)?;
    let text = quoted_inner('"', ')').parse_next(input)?;
    ")".parse_next(input)?;
    Ok(text)
}

fn diamond_label(input: &mut &str) -> winnow::Result<String> {
    "{".parse_next(input)?;
    let text = quoted_inner('"', '}').parse_next(input)?;
    "}".parse_next(input)?;
    Ok(text)
}

fn circle_label(input: &mut &str) -> winnow::Result<String> {
    "((".parse_next(input)?;
    let text = take_while(1.., |c: char| c != ')').parse_next(input)?;
    "))".parse_next(input)?;
    Ok(text.to_string())
}

fn bracketed_label(input: &mut &str) -> winnow::Result<String> {
    "[".parse_next(input)?;
    let text = quoted_inner('"', ']').parse_next(input)?;
    "]".parse_next(input)?;
    Ok(text)
}

fn edge_type(input: &mut &str) -> winnow::Result<EdgeType> {
    alt((
        "-.->".value(EdgeType::DottedArrow),
        "-.-".value(EdgeType::DottedLink),
        "==>".value(EdgeType::ThickArrow),
        "===".value(EdgeType::ThickLink),
        "-->".value(EdgeType::Arrow),
        "---".value(EdgeType::OpenLink),
    ))
    .parse_next(input)
}

fn edge_label(input: &mut &str) -> winnow::Result<String> {
    "|".parse_next(input)?;
    let text = take_while(1.., |c: char| c != '|').parse_next(input)?;
    "|".parse_next(input)?;
    Ok(text.trim().to_string())
}

fn edge_line(input: &mut &str) -> winnow::Result<GraphLine> {
    let from = node_ref.parse_next(input)?;
    space0.parse_next(input)?;
    let et = edge_type.parse_next(input)?;
    let label = opt(edge_label).parse_next(input)?;
    space0.parse_next(input)?;
    let mut targets = vec![node_ref.parse_next(input)?];

    loop {
        space0.parse_next(input)?;
        if opt("&").parse_next(input)?.is_none() {
            break;
        }
        space0.parse_next(input)?;
        targets.push(node_ref.parse_next(input)?);
    }
    line_end.parse_next(input)?;

    let items = targets
        .into_iter()
        .map(|target| {
            let edge = Edge {
                from: from.id.clone(),
                to: target.id.clone(),
                edge_type: et,
                label: label.clone(),
            };
            (edge, from.clone(), target)
        })
        .collect();
    Ok(GraphLine::Edges(items))
}

fn alt_edge_line(input: &mut &str) -> winnow::Result<GraphLine> {
    let from = node_ref.parse_next(input)?;
    space0.parse_next(input)?;
    "-- ".parse_next(input)?;
    let (label_text, et) = alt((
        (take_until(1.., " -->"), " -->".value(EdgeType::Arrow)),
        (take_until(1.., " ---"), " ---".value(EdgeType::OpenLink)),
    ))
    .parse_next(input)?;
    space0.parse_next(input)?;
    let to = node_ref.parse_next(input)?;
    line_end.parse_next(input)?;

    let edge = Edge {
        from: from.id.clone(),
        to: to.id.clone(),
        edge_type: et,
        label: Some(label_text.trim().to_string()),
    };
    Ok(GraphLine::Edges(vec![(edge, from, to)]))
}

fn node_line(input: &mut &str) -> winnow::Result<GraphLine> {
    let decl = node_ref.parse_next(input)?;
    line_end.parse_next(input)?;
    Ok(GraphLine::Node(decl))
}

/// Optional `;`, then the end of the line or of the input.
fn line_end(input: &mut &str) -> winnow::Result<()> {
    space0.parse_next(input)?;
    opt(";").parse_next(input)?;
    space0.parse_next(input)?;
    alt((line_ending, eof)).void().parse_next(input)
}
