use serde::{Deserialize, Serialize};

use crate::layout::{EdgeKind, NodeKind};

/// Color palette consumed by embedding renderers. The engine itself never
/// paints; it only tags nodes and edges with kinds that resolve here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f32,
    pub canvas_background: String,
    pub node_text_color: String,
    pub agent_fill: String,
    pub agent_border: String,
    pub input_fill: String,
    pub prompt_fill: String,
    pub tool_fill: String,
    pub system_fill: String,
    pub output_fill: String,
    pub data_in_stroke: String,
    pub action_out_stroke: String,
    pub prompt_context_stroke: String,
    pub tool_call_stroke: String,
    pub snap_guide_color: String,
    pub selection_color: String,
}

impl Theme {
    pub fn modern() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 13.0,
            canvas_background: "#F8FAFF".to_string(),
            node_text_color: "#1C2430".to_string(),
            agent_fill: "#EDE9FE".to_string(),
            agent_border: "#7C5CDB".to_string(),
            input_fill: "#E0F2FE".to_string(),
            prompt_fill: "#FEF9C3".to_string(),
            tool_fill: "#DCFCE7".to_string(),
            system_fill: "#F1F5F9".to_string(),
            output_fill: "#FFE4E6".to_string(),
            data_in_stroke: "#0284C7".to_string(),
            action_out_stroke: "#E11D48".to_string(),
            prompt_context_stroke: "#CA8A04".to_string(),
            tool_call_stroke: "#16A34A".to_string(),
            snap_guide_color: "#F472B6".to_string(),
            selection_color: "#2563EB".to_string(),
        }
    }

    pub fn dark() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 13.0,
            canvas_background: "#0F172A".to_string(),
            node_text_color: "#E2E8F0".to_string(),
            agent_fill: "#312E81".to_string(),
            agent_border: "#A5B4FC".to_string(),
            input_fill: "#0C4A6E".to_string(),
            prompt_fill: "#713F12".to_string(),
            tool_fill: "#14532D".to_string(),
            system_fill: "#1E293B".to_string(),
            output_fill: "#881337".to_string(),
            data_in_stroke: "#38BDF8".to_string(),
            action_out_stroke: "#FB7185".to_string(),
            prompt_context_stroke: "#FACC15".to_string(),
            tool_call_stroke: "#4ADE80".to_string(),
            snap_guide_color: "#F472B6".to_string(),
            selection_color: "#60A5FA".to_string(),
        }
    }

    pub fn node_fill(&self, kind: NodeKind) -> &str {
        match kind {
            NodeKind::Agent => &self.agent_fill,
            NodeKind::InputChannel => &self.input_fill,
            NodeKind::PromptComponent => &self.prompt_fill,
            NodeKind::Tool => &self.tool_fill,
            NodeKind::System => &self.system_fill,
            NodeKind::OutputChannel => &self.output_fill,
        }
    }

    pub fn edge_stroke(&self, kind: EdgeKind) -> &str {
        match kind {
            EdgeKind::DataIn => &self.data_in_stroke,
            EdgeKind::ActionOut => &self.action_out_stroke,
            EdgeKind::PromptContext => &self.prompt_context_stroke,
            EdgeKind::ToolCall => &self.tool_call_stroke,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::modern()
    }
}
