mod zones;
pub(crate) mod types;
pub use types::*;

use std::collections::BTreeMap;

use crate::config::LayoutConfig;
use crate::geometry::Position;
use crate::noderef::NodeRef;
use crate::spec::AgentSpec;

/// Deterministic, overlap-free placement of a specification's node-bearing
/// collections. Pure function of its inputs: re-invoking after any mutation
/// reproduces identical results for unchanged sub-trees.
///
/// `saved_positions` overrides the computed default per node id; size is
/// never overridden.
pub fn compute_layout(
    spec: &AgentSpec,
    view_mode: ViewMode,
    saved_positions: Option<&BTreeMap<String, Position>>,
    config: &LayoutConfig,
) -> Layout {
    let placed = zones::place_nodes(spec, config);

    let mut nodes = Vec::with_capacity(placed.len());
    for (node_ref, default_position) in placed {
        let id = node_ref.id();
        let position = saved_positions
            .and_then(|map| map.get(&id))
            .copied()
            .unwrap_or(default_position);
        nodes.push(build_node(spec, node_ref, id, position, view_mode, config));
    }

    let edges = build_edges(spec, view_mode);

    let mut max_right = 0.0f32;
    let mut max_bottom = 0.0f32;
    for node in &nodes {
        max_right = max_right.max(node.x + node.width);
        max_bottom = max_bottom.max(node.y + node.height);
    }
    let width = (max_right + config.margin).max(200.0);
    let height = (max_bottom + config.margin).max(200.0);

    Layout {
        view_mode,
        nodes,
        edges,
        width,
        height,
    }
}

/// Canonical "reset" position map: layout with no overrides, collected into
/// a plain map. A fixed point of `compute_layout` — feeding the result back
/// as the override set reproduces the same positions.
pub fn auto_layout(spec: &AgentSpec, config: &LayoutConfig) -> BTreeMap<String, Position> {
    zones::place_nodes(spec, config)
        .into_iter()
        .map(|(node_ref, position)| (node_ref.id(), position))
        .collect()
}

pub(crate) fn node_kind(node_ref: NodeRef) -> NodeKind {
    match node_ref {
        NodeRef::Agent => NodeKind::Agent,
        NodeRef::Input(_) => NodeKind::InputChannel,
        NodeRef::SystemPrompt
        | NodeRef::Context(_)
        | NodeRef::FewShot
        | NodeRef::Guardrail(_) => NodeKind::PromptComponent,
        NodeRef::Tool(_) => NodeKind::Tool,
        NodeRef::System { .. } => NodeKind::System,
        NodeRef::Output(_) => NodeKind::OutputChannel,
    }
}

fn build_node(
    spec: &AgentSpec,
    node_ref: NodeRef,
    id: String,
    position: Position,
    view_mode: ViewMode,
    config: &LayoutConfig,
) -> DiagramNode {
    let kind = node_kind(node_ref);
    let size = match kind {
        NodeKind::Agent => config.agent,
        NodeKind::InputChannel => config.input,
        NodeKind::PromptComponent => config.prompt,
        NodeKind::Tool => config.tool,
        NodeKind::System => config.system,
        NodeKind::OutputChannel => config.output,
    };

    let (title, subtitle, tokens) = node_text(spec, node_ref);
    let token_figure = match view_mode {
        ViewMode::Architecture => None,
        ViewMode::TokenEconomics => tokens,
    };

    DiagramNode {
        node_ref,
        id,
        kind,
        x: position.x,
        y: position.y,
        width: size.width,
        height: size.height,
        title,
        subtitle,
        token_figure,
        selected: false,
    }
}

fn node_text(spec: &AgentSpec, node_ref: NodeRef) -> (String, Option<String>, Option<String>) {
    match node_ref {
        NodeRef::Agent => {
            let title = if spec.name.is_empty() {
                "Agent".to_string()
            } else {
                spec.name.clone()
            };
            let subtitle = (!spec.model.is_empty()).then(|| spec.model.clone());
            (title, subtitle, None)
        }
        NodeRef::Input(index) => {
            let channel = &spec.input_channels[index];
            (
                channel.name.clone(),
                Some(channel.format.clone()),
                Some(format!("{} tok in", channel.tokens_per_message)),
            )
        }
        NodeRef::SystemPrompt => {
            let prompt = spec
                .prompt_requirements
                .system_prompt
                .as_ref()
                .expect("system prompt present when referenced");
            (
                "System prompt".to_string(),
                Some(prompt.summary.clone()),
                Some(format!("{} tok", prompt.token_estimate)),
            )
        }
        NodeRef::Context(index) => {
            let entry = &spec.prompt_requirements.dynamic_context[index];
            (
                entry.name.clone(),
                Some(entry.source.clone()),
                Some(format!("{} tok", entry.token_estimate)),
            )
        }
        NodeRef::FewShot => {
            let block = spec
                .prompt_requirements
                .few_shot
                .as_ref()
                .expect("few-shot block present when referenced");
            (
                "Few-shot examples".to_string(),
                Some(format!("{} examples", block.example_count)),
                Some(format!("{} tok", block.token_estimate)),
            )
        }
        NodeRef::Guardrail(index) => {
            let guardrail = &spec.prompt_requirements.guardrails[index];
            (
                guardrail.rule.clone(),
                None,
                Some(format!("{} tok", guardrail.token_estimate)),
            )
        }
        NodeRef::Tool(index) => {
            let tool = &spec.tool_stack[index];
            (
                tool.name.clone(),
                Some(tool.kind.clone()),
                Some(format!("{} in / {} out", tool.input_tokens, tool.output_tokens)),
            )
        }
        NodeRef::System { tool, system } => {
            let connected = &spec.tool_stack[tool].connected_systems[system];
            (connected.name.clone(), Some(connected.integration.clone()), None)
        }
        NodeRef::Output(index) => {
            let channel = &spec.output_channels[index];
            (
                channel.name.clone(),
                Some(channel.format.clone()),
                Some(format!("{} tok out", channel.tokens_per_delivery)),
            )
        }
    }
}

/// Edges are derived entirely from the specification's structural
/// relationships; they carry no persisted state.
fn build_edges(spec: &AgentSpec, view_mode: ViewMode) -> Vec<DiagramEdge> {
    let token_view = view_mode == ViewMode::TokenEconomics;
    let mut edges = Vec::new();

    let mut push = |from: String,
                    from_anchor: Anchor,
                    to: String,
                    to_anchor: Anchor,
                    kind: EdgeKind,
                    label: Option<String>| {
        edges.push(DiagramEdge {
            id: format!("{from}->{to}"),
            from,
            from_anchor: Some(from_anchor),
            to,
            to_anchor: Some(to_anchor),
            kind,
            label,
        });
    };

    for (index, channel) in spec.input_channels.iter().enumerate() {
        let label = token_view.then(|| format!("{} tok in", channel.tokens_per_message));
        push(
            NodeRef::Input(index).id(),
            Anchor::Right,
            NodeRef::Agent.id(),
            Anchor::Left,
            EdgeKind::DataIn,
            label,
        );
    }

    let prompt = &spec.prompt_requirements;
    if let Some(system_prompt) = &prompt.system_prompt {
        let label = token_view.then(|| format!("{} tok", system_prompt.token_estimate));
        push(
            NodeRef::SystemPrompt.id(),
            Anchor::Bottom,
            NodeRef::Agent.id(),
            Anchor::Top,
            EdgeKind::PromptContext,
            label,
        );
    }
    for (index, entry) in prompt.dynamic_context.iter().enumerate() {
        let label = token_view.then(|| format!("{} tok", entry.token_estimate));
        push(
            NodeRef::Context(index).id(),
            Anchor::Bottom,
            NodeRef::Agent.id(),
            Anchor::Top,
            EdgeKind::PromptContext,
            label,
        );
    }
    if let Some(few_shot) = &prompt.few_shot {
        let label = token_view.then(|| format!("{} tok", few_shot.token_estimate));
        push(
            NodeRef::FewShot.id(),
            Anchor::Bottom,
            NodeRef::Agent.id(),
            Anchor::Top,
            EdgeKind::PromptContext,
            label,
        );
    }
    for (index, guardrail) in prompt.guardrails.iter().enumerate() {
        let label = token_view.then(|| format!("{} tok", guardrail.token_estimate));
        push(
            NodeRef::Guardrail(index).id(),
            Anchor::Bottom,
            NodeRef::Agent.id(),
            Anchor::Top,
            EdgeKind::PromptContext,
            label,
        );
    }

    for (tool_index, tool) in spec.tool_stack.iter().enumerate() {
        let label =
            token_view.then(|| format!("{} in / {} out", tool.input_tokens, tool.output_tokens));
        push(
            NodeRef::Agent.id(),
            Anchor::Right,
            NodeRef::Tool(tool_index).id(),
            Anchor::Left,
            EdgeKind::ToolCall,
            label,
        );
        for system_index in 0..tool.connected_systems.len() {
            push(
                NodeRef::Tool(tool_index).id(),
                Anchor::Right,
                NodeRef::System {
                    tool: tool_index,
                    system: system_index,
                }
                .id(),
                Anchor::Left,
                EdgeKind::ToolCall,
                None,
            );
        }
    }

    for (index, channel) in spec.output_channels.iter().enumerate() {
        let label = token_view.then(|| format!("{} tok out", channel.tokens_per_delivery));
        push(
            NodeRef::Agent.id(),
            Anchor::Bottom,
            NodeRef::Output(index).id(),
            Anchor::Top,
            EdgeKind::ActionOut,
            label,
        );
    }

    edges
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::{
        ConnectedSystem, DynamicContextEntry, InputChannel, OutputChannel, SystemPrompt, Tool,
    };

    fn spec_with(inputs: usize, tools: &[usize], outputs: usize) -> AgentSpec {
        let mut spec = AgentSpec {
            name: "Test Agent".to_string(),
            model: "sonnet".to_string(),
            ..AgentSpec::default()
        };
        for index in 0..inputs {
            spec.input_channels.push(InputChannel {
                name: format!("in {index}"),
                format: "json".to_string(),
                tokens_per_message: 100,
            });
        }
        for (tool_index, &system_count) in tools.iter().enumerate() {
            spec.tool_stack.push(Tool {
                name: format!("tool {tool_index}"),
                kind: "api".to_string(),
                input_tokens: 50,
                output_tokens: 200,
                connected_systems: (0..system_count)
                    .map(|system_index| ConnectedSystem {
                        name: format!("sys {tool_index}-{system_index}"),
                        integration: "REST".to_string(),
                    })
                    .collect(),
            });
        }
        for index in 0..outputs {
            spec.output_channels.push(OutputChannel {
                name: format!("out {index}"),
                format: "email".to_string(),
                tokens_per_delivery: 300,
            });
        }
        spec
    }

    #[test]
    fn empty_spec_yields_lone_agent() {
        let layout = compute_layout(
            &AgentSpec::default(),
            ViewMode::Architecture,
            None,
            &LayoutConfig::default(),
        );
        assert_eq!(layout.nodes.len(), 1);
        assert_eq!(layout.nodes[0].id, "agent");
        assert!(layout.edges.is_empty());
    }

    #[test]
    fn saved_position_overrides_only_that_node() {
        let spec = spec_with(2, &[1], 1);
        let config = LayoutConfig::default();
        let default_layout = compute_layout(&spec, ViewMode::Architecture, None, &config);

        let mut saved = BTreeMap::new();
        saved.insert("input-1".to_string(), Position::new(900.0, 900.0));
        let layout = compute_layout(&spec, ViewMode::Architecture, Some(&saved), &config);

        let moved = layout.node("input-1").unwrap();
        assert_eq!(moved.x, 900.0);
        assert_eq!(moved.y, 900.0);
        for node in &layout.nodes {
            if node.id != "input-1" {
                let default_node = default_layout.node(&node.id).unwrap();
                assert_eq!(node.x, default_node.x, "{} drifted", node.id);
                assert_eq!(node.y, default_node.y, "{} drifted", node.id);
            }
        }
        // size never overridden
        let default_input = default_layout.node("input-1").unwrap();
        assert_eq!(moved.width, default_input.width);
        assert_eq!(moved.height, default_input.height);
    }

    #[test]
    fn auto_layout_is_fixed_point_of_layout() {
        let mut spec = spec_with(2, &[2, 0], 2);
        spec.prompt_requirements.system_prompt = Some(SystemPrompt {
            summary: "triage".to_string(),
            token_estimate: 800,
        });
        spec.prompt_requirements.dynamic_context.push(DynamicContextEntry {
            name: "history".to_string(),
            source: "CRM".to_string(),
            token_estimate: 1200,
        });
        let config = LayoutConfig::default();

        let map = auto_layout(&spec, &config);
        let fresh = compute_layout(&spec, ViewMode::Architecture, None, &config);
        let overridden = compute_layout(&spec, ViewMode::Architecture, Some(&map), &config);

        assert_eq!(fresh.nodes.len(), overridden.nodes.len());
        for (a, b) in fresh.nodes.iter().zip(overridden.nodes.iter()) {
            assert_eq!(a.id, b.id);
            assert_eq!(a.x, b.x, "{} moved under its own auto-layout", a.id);
            assert_eq!(a.y, b.y, "{} moved under its own auto-layout", a.id);
        }
    }

    #[test]
    fn token_labels_only_in_token_economics_view() {
        let spec = spec_with(1, &[1], 1);
        let config = LayoutConfig::default();

        let architecture = compute_layout(&spec, ViewMode::Architecture, None, &config);
        assert!(architecture.edges.iter().all(|edge| edge.label.is_none()));
        assert!(architecture.nodes.iter().all(|node| node.token_figure.is_none()));

        let economics = compute_layout(&spec, ViewMode::TokenEconomics, None, &config);
        let input_edge = economics
            .edges
            .iter()
            .find(|edge| edge.kind == EdgeKind::DataIn)
            .unwrap();
        assert_eq!(input_edge.label.as_deref(), Some("100 tok in"));
        let tool_edge = economics
            .edges
            .iter()
            .find(|edge| edge.from == "agent" && edge.kind == EdgeKind::ToolCall)
            .unwrap();
        assert_eq!(tool_edge.label.as_deref(), Some("50 in / 200 out"));
    }

    #[test]
    fn view_mode_does_not_move_nodes() {
        let spec = spec_with(2, &[1, 2], 1);
        let config = LayoutConfig::default();
        let architecture = compute_layout(&spec, ViewMode::Architecture, None, &config);
        let economics = compute_layout(&spec, ViewMode::TokenEconomics, None, &config);
        for (a, b) in architecture.nodes.iter().zip(economics.nodes.iter()) {
            assert_eq!(a.id, b.id);
            assert_eq!((a.x, a.y), (b.x, b.y));
        }
    }

    #[test]
    fn edges_cover_every_structural_relationship() {
        let spec = spec_with(2, &[2], 1);
        let layout = compute_layout(&spec, ViewMode::Architecture, None, &LayoutConfig::default());
        // 2 input edges + 1 agent->tool + 2 tool->system + 1 agent->output
        assert_eq!(layout.edges.len(), 6);
        assert!(layout.edges.iter().any(|e| e.from == "tool-0" && e.to == "system-0-1"));
    }
}
