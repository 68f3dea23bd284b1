pub mod error;
pub mod escape;
pub mod flat;
pub mod graph_ast;
pub mod graph_parser;
pub mod import;
pub mod markup;
pub mod model;
pub mod style;
pub mod writer;

pub use error::{Error, Result};
pub use flat::FlatWriter;
pub use model::{Document, Edge, EdgeId, Graph, Node, NodeId};
pub use style::{
    Arrow, BorderStyle, Color, EdgeStyle, LabelStyle, LineStyle, LineType, NodeStyle, Shape,
};
pub use writer::Writer;

/// Convert a Mermaid flowchart into a yEd GraphML document.
pub fn render(input: &str) -> Result<String> {
    render_with_description(input, "")
}

pub fn render_with_description(input: &str, description: &str) -> Result<String> {
    let trimmed = input.trim_start();
    if !(trimmed.starts_with("graph") || trimmed.starts_with("flowchart")) {
        let first_word = trimmed.split_whitespace().next().unwrap_or("(empty)");
        return Err(Error::Syntax(format!("unknown diagram type: {first_word}")));
    }
    let diagram = graph_parser::parse_graph(input)?;
    let mut doc = import::to_document(&diagram);
    doc.graph_mut().description = description.to_string();
    doc.to_graphml()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_unknown_diagram_type_returns_error() {
        let err = render("sequenceDiagram\n  Alice->>Bob: Hi\n").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("unknown diagram type"), "got: {msg}");
        assert!(msg.contains("sequenceDiagram"), "got: {msg}");
    }

    #[test]
    fn render_empty_input_returns_error() {
        let err = render("").unwrap_err();
        assert!(err.to_string().contains("(empty)"), "got: {err}");
    }

    #[test]
    fn render_graph_diagram_works() {
        let output = render("graph TD\n    A --> B\n").unwrap();
        assert!(output.contains(">A<y:LabelModel>"));
        assert!(output.ends_with("</graphml>\n"));
    }

    #[test]
    fn render_sets_root_description() {
        let output = render_with_description("graph TD\n    A\n", "from mermaid").unwrap();
        assert!(output.contains(r#"<data key="d0" xml:space="preserve">from mermaid</data>"#));
    }
}
