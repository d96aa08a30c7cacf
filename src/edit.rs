use thiserror::Error;

use crate::noderef::NodeRef;
use crate::spec::{AgentSpec, AutonomyLevel, SpecPatch};
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum EditError {
    #[error("node {0} does not resolve to a specification entry")]
    UnknownNode(String),
    #[error("field patch does not match the node's kind")]
    KindMismatch,
    #[error("no editor panel is open")]
    PanelClosed,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Edited fields for one node, all optional: absent fields keep their
/// current value (shallow merge onto the targeted entry).
#[derive(Debug, Clone, Default)]
pub struct AgentFields {
    pub name: Option<String>,
    pub model: Option<String>,
    pub autonomy_level: Option<AutonomyLevel>,
}

#[derive(Debug, Clone, Default)]
pub struct InputChannelFields {
    pub name: Option<String>,
    pub format: Option<String>,
    pub tokens_per_message: Option<u32>,
}

#[derive(Debug, Clone, Default)]
pub struct SystemPromptFields {
    pub summary: Option<String>,
    pub token_estimate: Option<u32>,
}

#[derive(Debug, Clone, Default)]
pub struct ContextFields {
    pub name: Option<String>,
    pub source: Option<String>,
    pub token_estimate: Option<u32>,
}

#[derive(Debug, Clone, Default)]
pub struct FewShotFields {
    pub example_count: Option<u32>,
    pub token_estimate: Option<u32>,
}

#[derive(Debug, Clone, Default)]
pub struct GuardrailFields {
    pub rule: Option<String>,
    pub token_estimate: Option<u32>,
}

#[derive(Debug, Clone, Default)]
pub struct ToolFields {
    pub name: Option<String>,
    pub kind: Option<String>,
    pub input_tokens: Option<u32>,
    pub output_tokens: Option<u32>,
}

#[derive(Debug, Clone, Default)]
pub struct SystemFields {
    pub name: Option<String>,
    pub integration: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct OutputChannelFields {
    pub name: Option<String>,
    pub format: Option<String>,
    pub tokens_per_delivery: Option<u32>,
}

/// One edit commit from the side panel, typed by node kind.
#[derive(Debug, Clone)]
pub enum FieldPatch {
    Agent(AgentFields),
    Input(InputChannelFields),
    SystemPrompt(SystemPromptFields),
    Context(ContextFields),
    FewShot(FewShotFields),
    Guardrail(GuardrailFields),
    Tool(ToolFields),
    System(SystemFields),
    Output(OutputChannelFields),
}

macro_rules! merge {
    ($entry:expr, $fields:expr, $($field:ident),+ $(,)?) => {
        $(
            if let Some(value) = $fields.$field.clone() {
                $entry.$field = value;
            }
        )+
    };
}

/// Builds the sparse specification patch for one committed edit: the owning
/// top-level collection is copied, only the targeted entry is replaced with
/// the shallow merge of old and new fields. The caller applies the patch
/// optimistically and rolls the whole thing back if the store rejects it.
pub fn build_spec_patch(
    spec: &AgentSpec,
    node_ref: NodeRef,
    patch: &FieldPatch,
) -> Result<SpecPatch, EditError> {
    if !node_ref.resolves(spec) {
        return Err(EditError::UnknownNode(node_ref.id()));
    }

    let mut out = SpecPatch::default();
    match (node_ref, patch) {
        (NodeRef::Agent, FieldPatch::Agent(fields)) => {
            out.name = fields.name.clone();
            out.model = fields.model.clone();
            out.autonomy_level = fields.autonomy_level;
        }
        (NodeRef::Input(index), FieldPatch::Input(fields)) => {
            let mut channels = spec.input_channels.clone();
            merge!(channels[index], fields, name, format, tokens_per_message);
            out.input_channels = Some(channels);
        }
        (NodeRef::SystemPrompt, FieldPatch::SystemPrompt(fields)) => {
            let mut prompt = spec.prompt_requirements.clone();
            let entry = prompt
                .system_prompt
                .as_mut()
                .expect("resolved system prompt");
            merge!(entry, fields, summary, token_estimate);
            out.prompt_requirements = Some(prompt);
        }
        (NodeRef::Context(index), FieldPatch::Context(fields)) => {
            let mut prompt = spec.prompt_requirements.clone();
            merge!(
                prompt.dynamic_context[index],
                fields,
                name,
                source,
                token_estimate
            );
            out.prompt_requirements = Some(prompt);
        }
        (NodeRef::FewShot, FieldPatch::FewShot(fields)) => {
            let mut prompt = spec.prompt_requirements.clone();
            let entry = prompt.few_shot.as_mut().expect("resolved few-shot block");
            merge!(entry, fields, example_count, token_estimate);
            out.prompt_requirements = Some(prompt);
        }
        (NodeRef::Guardrail(index), FieldPatch::Guardrail(fields)) => {
            let mut prompt = spec.prompt_requirements.clone();
            merge!(prompt.guardrails[index], fields, rule, token_estimate);
            out.prompt_requirements = Some(prompt);
        }
        (NodeRef::Tool(index), FieldPatch::Tool(fields)) => {
            let mut tools = spec.tool_stack.clone();
            merge!(
                tools[index],
                fields,
                name,
                kind,
                input_tokens,
                output_tokens
            );
            out.tool_stack = Some(tools);
        }
        (NodeRef::System { tool, system }, FieldPatch::System(fields)) => {
            let mut tools = spec.tool_stack.clone();
            merge!(
                tools[tool].connected_systems[system],
                fields,
                name,
                integration
            );
            out.tool_stack = Some(tools);
        }
        (NodeRef::Output(index), FieldPatch::Output(fields)) => {
            let mut channels = spec.output_channels.clone();
            merge!(channels[index], fields, name, format, tokens_per_delivery);
            out.output_channels = Some(channels);
        }
        _ => return Err(EditError::KindMismatch),
    }

    Ok(out)
}
