use crate::config::LayoutConfig;
use crate::geometry::Position;
use crate::noderef::NodeRef;
use crate::spec::AgentSpec;

/// Default placement for every node the specification yields, in zone order:
/// prompt row, input column, agent, tool column with per-tool system stacks,
/// output row.
///
/// Heights are computed bottom-up before any y is assigned, so a tool with a
/// tall system stack claims its full row and can never overlap the next
/// tool. Empty collections contribute zero height/width and collapse out of
/// the centering math without special cases.
pub(super) fn place_nodes(spec: &AgentSpec, config: &LayoutConfig) -> Vec<(NodeRef, Position)> {
    let margin = config.margin;

    let prompt_refs = prompt_row_refs(spec);
    let input_count = spec.input_channels.len();
    let output_count = spec.output_channels.len();

    // Column heights first.
    let input_col_h = stacked_height(input_count, config.input.height, config.input_gap);

    struct ToolRow {
        row_h: f32,
        stack_h: f32,
        system_count: usize,
    }
    let tool_rows: Vec<ToolRow> = spec
        .tool_stack
        .iter()
        .map(|tool| {
            let system_count = tool.connected_systems.len();
            let stack_h = stacked_height(system_count, config.system.height, config.system_gap);
            ToolRow {
                row_h: config.tool.height.max(stack_h),
                stack_h,
                system_count,
            }
        })
        .collect();
    let tool_col_h = if tool_rows.is_empty() {
        0.0
    } else {
        tool_rows.iter().map(|row| row.row_h).sum::<f32>()
            + (tool_rows.len() - 1) as f32 * config.tool_gap
    };

    let main_row_h = config.agent.height.max(input_col_h).max(tool_col_h);

    // X coordinates: the cursor advances only past non-empty zones, so an
    // empty column collapses together with its gap.
    let mut x = margin;
    let input_x = x;
    if input_count > 0 {
        x += config.input.width + config.column_gap;
    }
    let agent_x = x;
    x += config.agent.width;
    let tool_x = if tool_rows.is_empty() {
        x
    } else {
        x += config.column_gap;
        let tool_x = x;
        x += config.tool.width;
        tool_x
    };
    let has_systems = tool_rows.iter().any(|row| row.system_count > 0);
    let system_x = if has_systems {
        x += config.column_gap;
        let system_x = x;
        x += config.system.width;
        system_x
    } else {
        x
    };
    let span_right = x;
    let span_center_x = (margin + span_right) / 2.0;

    let main_y = if prompt_refs.is_empty() {
        margin
    } else {
        margin + config.prompt.height + config.row_gap
    };

    let mut placed = Vec::new();

    // Prompt row, centered over the main span.
    if !prompt_refs.is_empty() {
        let total_w = row_width(prompt_refs.len(), config.prompt.width, config.row_item_gap);
        let mut px = span_center_x - total_w / 2.0;
        for node_ref in prompt_refs {
            placed.push((node_ref, Position::new(px, margin)));
            px += config.prompt.width + config.row_item_gap;
        }
    }

    // Input column, centered as a block within the main row.
    let mut input_y = main_y + (main_row_h - input_col_h) / 2.0;
    for index in 0..input_count {
        placed.push((NodeRef::Input(index), Position::new(input_x, input_y)));
        input_y += config.input.height + config.input_gap;
    }

    // Agent, centered in the full row.
    placed.push((
        NodeRef::Agent,
        Position::new(agent_x, main_y + (main_row_h - config.agent.height) / 2.0),
    ));

    // Tool column. Each tool centers in its own row; its system stack
    // centers on the tool's vertical midpoint, not the row's.
    let mut row_y = main_y + (main_row_h - tool_col_h) / 2.0;
    for (tool_index, row) in tool_rows.iter().enumerate() {
        let tool_y = row_y + (row.row_h - config.tool.height) / 2.0;
        placed.push((NodeRef::Tool(tool_index), Position::new(tool_x, tool_y)));

        if row.system_count > 0 {
            let tool_mid_y = tool_y + config.tool.height / 2.0;
            let mut system_y = tool_mid_y - row.stack_h / 2.0;
            for system_index in 0..row.system_count {
                placed.push((
                    NodeRef::System {
                        tool: tool_index,
                        system: system_index,
                    },
                    Position::new(system_x, system_y),
                ));
                system_y += config.system.height + config.system_gap;
            }
        }

        row_y += row.row_h + config.tool_gap;
    }

    // Output row, same centering rule as the prompt row, below the main row.
    if output_count > 0 {
        let output_y = main_y + main_row_h + config.row_gap;
        let total_w = row_width(output_count, config.output.width, config.row_item_gap);
        let mut ox = span_center_x - total_w / 2.0;
        for index in 0..output_count {
            placed.push((NodeRef::Output(index), Position::new(ox, output_y)));
            ox += config.output.width + config.row_item_gap;
        }
    }

    placed
}

fn prompt_row_refs(spec: &AgentSpec) -> Vec<NodeRef> {
    let prompt = &spec.prompt_requirements;
    let mut refs = Vec::new();
    if prompt.system_prompt.is_some() {
        refs.push(NodeRef::SystemPrompt);
    }
    for index in 0..prompt.dynamic_context.len() {
        refs.push(NodeRef::Context(index));
    }
    if prompt.few_shot.is_some() {
        refs.push(NodeRef::FewShot);
    }
    for index in 0..prompt.guardrails.len() {
        refs.push(NodeRef::Guardrail(index));
    }
    refs
}

fn stacked_height(count: usize, item_height: f32, gap: f32) -> f32 {
    if count == 0 {
        0.0
    } else {
        count as f32 * item_height + (count - 1) as f32 * gap
    }
}

fn row_width(count: usize, item_width: f32, gap: f32) -> f32 {
    if count == 0 {
        0.0
    } else {
        count as f32 * item_width + (count - 1) as f32 * gap
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::{ConnectedSystem, InputChannel, OutputChannel, Tool};

    fn position_of(placed: &[(NodeRef, Position)], node_ref: NodeRef) -> Position {
        placed
            .iter()
            .find(|(candidate, _)| *candidate == node_ref)
            .map(|(_, position)| *position)
            .unwrap()
    }

    #[test]
    fn systems_center_on_their_tool_midpoint() {
        let mut spec = AgentSpec::default();
        spec.tool_stack.push(Tool {
            connected_systems: vec![
                ConnectedSystem::default(),
                ConnectedSystem::default(),
                ConnectedSystem::default(),
            ],
            ..Tool::default()
        });
        let config = LayoutConfig::default();
        let placed = place_nodes(&spec, &config);

        let tool = position_of(&placed, NodeRef::Tool(0));
        let first = position_of(&placed, NodeRef::System { tool: 0, system: 0 });
        let last = position_of(&placed, NodeRef::System { tool: 0, system: 2 });

        let tool_mid = tool.y + config.tool.height / 2.0;
        let stack_mid = (first.y + last.y + config.system.height) / 2.0;
        assert!((tool_mid - stack_mid).abs() < 0.01);
    }

    #[test]
    fn empty_input_column_collapses_gap() {
        let mut with_inputs = AgentSpec::default();
        with_inputs.input_channels.push(InputChannel::default());
        let config = LayoutConfig::default();

        let agent_with = position_of(&place_nodes(&with_inputs, &config), NodeRef::Agent);
        let agent_without = position_of(&place_nodes(&AgentSpec::default(), &config), NodeRef::Agent);

        assert_eq!(agent_without.x, config.margin);
        assert_eq!(
            agent_with.x,
            config.margin + config.input.width + config.column_gap
        );
    }

    #[test]
    fn output_row_sits_below_main_row() {
        let mut spec = AgentSpec::default();
        spec.output_channels.push(OutputChannel::default());
        spec.output_channels.push(OutputChannel::default());
        let config = LayoutConfig::default();
        let placed = place_nodes(&spec, &config);

        let agent = position_of(&placed, NodeRef::Agent);
        let out0 = position_of(&placed, NodeRef::Output(0));
        let out1 = position_of(&placed, NodeRef::Output(1));
        assert!(out0.y >= agent.y + config.agent.height);
        assert_eq!(out0.y, out1.y);
        assert_eq!(out1.x - out0.x, config.output.width + config.row_item_gap);
    }

    #[test]
    fn tall_system_stack_sets_tool_column_height() {
        let mut spec = AgentSpec::default();
        spec.tool_stack.push(Tool {
            connected_systems: vec![ConnectedSystem::default(); 3],
            ..Tool::default()
        });
        spec.tool_stack.push(Tool::default());
        let config = LayoutConfig::default();
        let placed = place_nodes(&spec, &config);

        let stack_h = 3.0 * config.system.height + 2.0 * config.system_gap;
        assert!(stack_h > config.tool.height);

        // second tool starts below the first tool's full (stack-tall) row
        let tool0 = position_of(&placed, NodeRef::Tool(0));
        let tool1 = position_of(&placed, NodeRef::Tool(1));
        let row0_top = tool0.y + config.tool.height / 2.0 - stack_h / 2.0;
        assert!(tool1.y >= row0_top + stack_h + config.tool_gap - 0.01);
    }
}
