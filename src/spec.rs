use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::geometry::Position;
use crate::noderef::NodeRef;

/// Identifier of a specification document at the owning service.
pub type SpecId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutonomyLevel {
    FullDelegation,
    SupervisedExecution,
    AssistedMode,
}

impl Default for AutonomyLevel {
    fn default() -> Self {
        Self::SupervisedExecution
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputChannel {
    pub name: String,
    pub format: String,
    pub tokens_per_message: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemPrompt {
    pub summary: String,
    pub token_estimate: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DynamicContextEntry {
    pub name: String,
    pub source: String,
    pub token_estimate: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FewShotBlock {
    pub example_count: u32,
    pub token_estimate: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Guardrail {
    pub rule: String,
    pub token_estimate: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptRequirements {
    pub system_prompt: Option<SystemPrompt>,
    pub dynamic_context: Vec<DynamicContextEntry>,
    pub few_shot: Option<FewShotBlock>,
    pub guardrails: Vec<Guardrail>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectedSystem {
    pub name: String,
    pub integration: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tool {
    pub name: String,
    pub kind: String,
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub connected_systems: Vec<ConnectedSystem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputChannel {
    pub name: String,
    pub format: String,
    pub tokens_per_delivery: u32,
}

/// The externally-owned specification document. Collections default to empty
/// so a partial document deserializes to zero-length zones rather than an
/// error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentSpec {
    pub name: String,
    pub model: String,
    pub autonomy_level: AutonomyLevel,
    pub input_channels: Vec<InputChannel>,
    pub prompt_requirements: PromptRequirements,
    pub tool_stack: Vec<Tool>,
    pub output_channels: Vec<OutputChannel>,
    pub node_positions: BTreeMap<String, Position>,
    /// Change marker advanced by the owning service on every accepted write.
    pub revision: u64,
}

impl AgentSpec {
    /// Local optimistic merge. Top-level fields are replaced wholesale; the
    /// remote service's response remains the authoritative merge.
    pub fn apply_patch(&mut self, patch: &SpecPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(model) = &patch.model {
            self.model = model.clone();
        }
        if let Some(level) = patch.autonomy_level {
            self.autonomy_level = level;
        }
        if let Some(channels) = &patch.input_channels {
            self.input_channels = channels.clone();
        }
        if let Some(prompt) = &patch.prompt_requirements {
            self.prompt_requirements = prompt.clone();
        }
        if let Some(tools) = &patch.tool_stack {
            self.tool_stack = tools.clone();
        }
        if let Some(channels) = &patch.output_channels {
            self.output_channels = channels.clone();
        }
        if let Some(positions) = &patch.node_positions {
            self.node_positions = positions.clone();
        }
    }

    /// Drops saved positions whose id no longer resolves against the current
    /// collections, so an index freed by a deleted entry cannot hand its old
    /// position to an unrelated future entry.
    pub fn prune_positions(&mut self) {
        let live: std::collections::BTreeSet<String> = NodeRef::enumerate(self)
            .into_iter()
            .map(|node_ref| node_ref.id())
            .collect();
        self.node_positions.retain(|id, _| live.contains(id));
    }
}

/// Sparse partial update: only fields present are sent, matching the owning
/// service's patch semantics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpecPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub autonomy_level: Option<AutonomyLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_channels: Option<Vec<InputChannel>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_requirements: Option<PromptRequirements>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_stack: Option<Vec<Tool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_channels: Option<Vec<OutputChannel>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_positions: Option<BTreeMap<String, Position>>,
}
