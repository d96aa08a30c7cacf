use crate::layout::Layout;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Serializable snapshot of a computed layout, for the CLI and for golden
/// assertions in tests.
#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub view_mode: String,
    pub width: f32,
    pub height: f32,
    pub nodes: Vec<NodeDump>,
    pub edges: Vec<EdgeDump>,
}

#[derive(Debug, Serialize)]
pub struct NodeDump {
    pub id: String,
    pub kind: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub title: String,
    pub subtitle: Option<String>,
    pub token_figure: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EdgeDump {
    pub id: String,
    pub from: String,
    pub from_anchor: Option<String>,
    pub to: String,
    pub to_anchor: Option<String>,
    pub kind: String,
    pub label: Option<String>,
}

impl LayoutDump {
    pub fn from_layout(layout: &Layout) -> Self {
        let nodes = layout
            .nodes
            .iter()
            .map(|node| NodeDump {
                id: node.id.clone(),
                kind: format!("{:?}", node.kind),
                x: node.x,
                y: node.y,
                width: node.width,
                height: node.height,
                title: node.title.clone(),
                subtitle: node.subtitle.clone(),
                token_figure: node.token_figure.clone(),
            })
            .collect();

        let edges = layout
            .edges
            .iter()
            .map(|edge| EdgeDump {
                id: edge.id.clone(),
                from: edge.from.clone(),
                from_anchor: edge.from_anchor.map(|anchor| format!("{anchor:?}")),
                to: edge.to.clone(),
                to_anchor: edge.to_anchor.map(|anchor| format!("{anchor:?}")),
                kind: format!("{:?}", edge.kind),
                label: edge.label.clone(),
            })
            .collect();

        LayoutDump {
            view_mode: format!("{:?}", layout.view_mode),
            width: layout.width,
            height: layout.height,
            nodes,
            edges,
        }
    }
}

pub fn write_layout_dump(path: &Path, layout: &Layout) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = LayoutDump::from_layout(layout);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}
