use crate::spec::AgentSpec;

/// Typed reference to the specification entry a diagram node renders.
///
/// Constructed once at layout time and threaded through drag, edit and
/// persistence paths; the string id is only an opaque stable key and is never
/// parsed back into kind/index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum NodeRef {
    Agent,
    Input(usize),
    SystemPrompt,
    Context(usize),
    FewShot,
    Guardrail(usize),
    Tool(usize),
    System { tool: usize, system: usize },
    Output(usize),
}

impl NodeRef {
    /// Deterministic id derived from category and index only. Stable across
    /// re-layouts as long as collection order is stable, which keeps saved
    /// positions valid between sessions.
    pub fn id(&self) -> String {
        match self {
            NodeRef::Agent => "agent".to_string(),
            NodeRef::Input(index) => format!("input-{index}"),
            NodeRef::SystemPrompt => "system-prompt".to_string(),
            NodeRef::Context(index) => format!("context-{index}"),
            NodeRef::FewShot => "few-shot".to_string(),
            NodeRef::Guardrail(index) => format!("guardrail-{index}"),
            NodeRef::Tool(index) => format!("tool-{index}"),
            NodeRef::System { tool, system } => format!("system-{tool}-{system}"),
            NodeRef::Output(index) => format!("output-{index}"),
        }
    }

    /// Whether the referenced entry exists in `spec`.
    pub fn resolves(&self, spec: &AgentSpec) -> bool {
        match *self {
            NodeRef::Agent => true,
            NodeRef::Input(index) => index < spec.input_channels.len(),
            NodeRef::SystemPrompt => spec.prompt_requirements.system_prompt.is_some(),
            NodeRef::Context(index) => index < spec.prompt_requirements.dynamic_context.len(),
            NodeRef::FewShot => spec.prompt_requirements.few_shot.is_some(),
            NodeRef::Guardrail(index) => index < spec.prompt_requirements.guardrails.len(),
            NodeRef::Tool(index) => index < spec.tool_stack.len(),
            NodeRef::System { tool, system } => spec
                .tool_stack
                .get(tool)
                .is_some_and(|t| system < t.connected_systems.len()),
            NodeRef::Output(index) => index < spec.output_channels.len(),
        }
    }

    /// Every node reference the specification currently yields, in zone
    /// order: prompt row, inputs, agent, tools with their systems, outputs.
    pub fn enumerate(spec: &AgentSpec) -> Vec<NodeRef> {
        let mut refs = Vec::new();
        if spec.prompt_requirements.system_prompt.is_some() {
            refs.push(NodeRef::SystemPrompt);
        }
        for index in 0..spec.prompt_requirements.dynamic_context.len() {
            refs.push(NodeRef::Context(index));
        }
        if spec.prompt_requirements.few_shot.is_some() {
            refs.push(NodeRef::FewShot);
        }
        for index in 0..spec.prompt_requirements.guardrails.len() {
            refs.push(NodeRef::Guardrail(index));
        }
        for index in 0..spec.input_channels.len() {
            refs.push(NodeRef::Input(index));
        }
        refs.push(NodeRef::Agent);
        for (tool_index, tool) in spec.tool_stack.iter().enumerate() {
            refs.push(NodeRef::Tool(tool_index));
            for system_index in 0..tool.connected_systems.len() {
                refs.push(NodeRef::System {
                    tool: tool_index,
                    system: system_index,
                });
            }
        }
        for index in 0..spec.output_channels.len() {
            refs.push(NodeRef::Output(index));
        }
        refs
    }
}
