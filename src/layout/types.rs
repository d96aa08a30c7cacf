use crate::geometry::Rect;
use crate::noderef::NodeRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Agent,
    InputChannel,
    PromptComponent,
    Tool,
    System,
    OutputChannel,
}

/// Render category of an edge. Determines stroke color and arrowhead only;
/// edges carry no persisted state of their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeKind {
    DataIn,
    ActionOut,
    PromptContext,
    ToolCall,
}

/// Named handle an edge attaches to on a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Left,
    Right,
    Top,
    Bottom,
}

/// Rendering toggle. Changes which token figures are emitted on nodes and
/// edges, never the placement itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Architecture,
    TokenEconomics,
}

#[derive(Debug, Clone)]
pub struct DiagramNode {
    pub node_ref: NodeRef,
    pub id: String,
    pub kind: NodeKind,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub title: String,
    pub subtitle: Option<String>,
    /// Per-node token summary, populated in token-economics view only.
    pub token_figure: Option<String>,
    pub selected: bool,
}

impl DiagramNode {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

#[derive(Debug, Clone)]
pub struct DiagramEdge {
    pub id: String,
    pub from: String,
    pub from_anchor: Option<Anchor>,
    pub to: String,
    pub to_anchor: Option<Anchor>,
    pub kind: EdgeKind,
    /// Token label, populated in token-economics view only.
    pub label: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Layout {
    pub view_mode: ViewMode,
    pub nodes: Vec<DiagramNode>,
    pub edges: Vec<DiagramEdge>,
    pub width: f32,
    pub height: f32,
}

impl Layout {
    pub fn node(&self, id: &str) -> Option<&DiagramNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut DiagramNode> {
        self.nodes.iter_mut().find(|node| node.id == id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Transient alignment guide shown during a drag. A `Vertical` line sits at
/// fixed x (an X-axis snap); a `Horizontal` line at fixed y. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapLine {
    pub axis: Axis,
    pub at: f32,
}
