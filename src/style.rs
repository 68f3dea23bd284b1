//! Visual attributes for nodes and edges, and their resolution against the
//! global defaults.
//!
//! Every field of a style record is optional. Resolution is field-local: a
//! field left unset (or set to an empty color or a zero number) takes the
//! matching default, all other fields keep the caller's value.

use std::borrow::Cow;
use std::fmt;

/// An RGB color in `#RRGGBB` notation. The string is passed through verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Color(Cow<'static, str>);

impl Color {
    pub const BLACK: Color = Color(Cow::Borrowed("#000000"));
    pub const WHITE: Color = Color(Cow::Borrowed("#FFFFFF"));

    pub fn new(value: impl Into<Cow<'static, str>>) -> Self {
        Color(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for Color {
    fn from(value: &'static str) -> Self {
        Color(Cow::Borrowed(value))
    }
}

impl From<String> for Color {
    fn from(value: String) -> Self {
        Color(Cow::Owned(value))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    Rectangle,
    RoundRectangle,
    Ellipse,
    Diamond,
    Hexagon,
    Octagon,
    Parallelogram,
    Trapezoid,
    Triangle,
}

impl Shape {
    pub fn as_str(self) -> &'static str {
        match self {
            Shape::Rectangle => "rectangle",
            Shape::RoundRectangle => "roundrectangle",
            Shape::Ellipse => "ellipse",
            Shape::Diamond => "diamond",
            Shape::Hexagon => "hexagon",
            Shape::Octagon => "octagon",
            Shape::Parallelogram => "parallelogram",
            Shape::Trapezoid => "trapezoid",
            Shape::Triangle => "triangle",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arrow {
    None,
    Standard,
    Delta,
    WhiteDelta,
    Diamond,
    WhiteDiamond,
    Short,
    Plain,
    Circle,
}

impl Arrow {
    pub fn as_str(self) -> &'static str {
        match self {
            Arrow::None => "none",
            Arrow::Standard => "standard",
            Arrow::Delta => "delta",
            Arrow::WhiteDelta => "white_delta",
            Arrow::Diamond => "diamond",
            Arrow::WhiteDiamond => "white_diamond",
            Arrow::Short => "short",
            Arrow::Plain => "plain",
            Arrow::Circle => "circle",
        }
    }
}

/// Stroke pattern of a border or edge line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineType {
    Line,
    Dashed,
    Dotted,
    DashedDotted,
}

impl LineType {
    pub fn as_str(self) -> &'static str {
        match self {
            LineType::Line => "line",
            LineType::Dashed => "dashed",
            LineType::Dotted => "dotted",
            LineType::DashedDotted => "dashed_dotted",
        }
    }
}

/// Line or border style. Node borders use the same record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineStyle {
    pub color: Option<Color>,
    pub width: Option<f64>,
    pub kind: Option<LineType>,
}

pub type BorderStyle = LineStyle;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelStyle {
    pub font_size: Option<u32>,
    pub color: Option<Color>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeStyle {
    pub color: Option<Color>,
    pub shape: Option<Shape>,
    pub height: Option<f64>,
    pub border: Option<BorderStyle>,
    pub label: Option<LabelStyle>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EdgeStyle {
    pub source: Option<Arrow>,
    pub target: Option<Arrow>,
    pub line: Option<LineStyle>,
    pub label: Option<LabelStyle>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLineStyle {
    pub color: Color,
    pub width: f64,
    pub kind: LineType,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLabelStyle {
    pub font_size: u32,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedNodeStyle {
    pub color: Color,
    pub shape: Shape,
    pub height: f64,
    pub border: ResolvedLineStyle,
    pub label: ResolvedLabelStyle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedEdgeStyle {
    pub source: Arrow,
    pub target: Arrow,
    pub line: ResolvedLineStyle,
    pub label: ResolvedLabelStyle,
}

pub const DEFAULT_LINE_STYLE: ResolvedLineStyle = ResolvedLineStyle {
    color: Color::BLACK,
    width: 1.0,
    kind: LineType::Line,
};

pub const DEFAULT_BORDER_STYLE: ResolvedLineStyle = DEFAULT_LINE_STYLE;

pub const DEFAULT_LABEL_STYLE: ResolvedLabelStyle = ResolvedLabelStyle {
    font_size: 12,
    color: Color::BLACK,
};

pub const DEFAULT_NODE_STYLE: ResolvedNodeStyle = ResolvedNodeStyle {
    color: Color(Cow::Borrowed("#FFCC00")),
    shape: Shape::RoundRectangle,
    height: 30.0,
    border: DEFAULT_BORDER_STYLE,
    label: DEFAULT_LABEL_STYLE,
};

pub const DEFAULT_EDGE_STYLE: ResolvedEdgeStyle = ResolvedEdgeStyle {
    source: Arrow::None,
    target: Arrow::Standard,
    line: DEFAULT_LINE_STYLE,
    label: DEFAULT_LABEL_STYLE,
};

fn pick_color(value: Option<&Color>, fallback: &Color) -> Color {
    match value {
        Some(c) if !c.is_empty() => c.clone(),
        _ => fallback.clone(),
    }
}

fn pick_number(value: Option<f64>, fallback: f64) -> f64 {
    match value {
        Some(v) if v != 0.0 && v.is_finite() => v,
        _ => fallback,
    }
}

impl LineStyle {
    pub fn resolve(&self, defaults: &ResolvedLineStyle) -> ResolvedLineStyle {
        ResolvedLineStyle {
            color: pick_color(self.color.as_ref(), &defaults.color),
            width: pick_number(self.width, defaults.width),
            kind: self.kind.unwrap_or(defaults.kind),
        }
    }
}

impl LabelStyle {
    pub fn resolve(&self, defaults: &ResolvedLabelStyle) -> ResolvedLabelStyle {
        ResolvedLabelStyle {
            font_size: match self.font_size {
                Some(size) if size != 0 => size,
                _ => defaults.font_size,
            },
            color: pick_color(self.color.as_ref(), &defaults.color),
        }
    }
}

impl NodeStyle {
    pub fn resolve(&self, defaults: &ResolvedNodeStyle) -> ResolvedNodeStyle {
        ResolvedNodeStyle {
            color: pick_color(self.color.as_ref(), &defaults.color),
            shape: self.shape.unwrap_or(defaults.shape),
            height: pick_number(self.height, defaults.height),
            border: match &self.border {
                Some(border) => border.resolve(&defaults.border),
                None => defaults.border.clone(),
            },
            label: match &self.label {
                Some(label) => label.resolve(&defaults.label),
                None => defaults.label.clone(),
            },
        }
    }
}

impl EdgeStyle {
    pub fn resolve(&self, defaults: &ResolvedEdgeStyle) -> ResolvedEdgeStyle {
        ResolvedEdgeStyle {
            source: self.source.unwrap_or(defaults.source),
            target: self.target.unwrap_or(defaults.target),
            line: match &self.line {
                Some(line) => line.resolve(&defaults.line),
                None => defaults.line.clone(),
            },
            label: match &self.label {
                Some(label) => label.resolve(&defaults.label),
                None => defaults.label.clone(),
            },
        }
    }
}

/// Effective node style: the explicit style resolved against
/// [`DEFAULT_NODE_STYLE`], or the default itself when no style is set.
pub fn resolve_node(style: Option<&NodeStyle>) -> ResolvedNodeStyle {
    match style {
        Some(style) => style.resolve(&DEFAULT_NODE_STYLE),
        None => DEFAULT_NODE_STYLE,
    }
}

pub fn resolve_edge(style: Option<&EdgeStyle>) -> ResolvedEdgeStyle {
    match style {
        Some(style) => style.resolve(&DEFAULT_EDGE_STYLE),
        None => DEFAULT_EDGE_STYLE,
    }
}
