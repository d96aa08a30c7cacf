use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Card footprint for one node kind. Sizes are declared, never measured;
/// layout only ever overrides position.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeSize {
    pub width: f32,
    pub height: f32,
}

impl Default for NodeSize {
    fn default() -> Self {
        Self {
            width: 180.0,
            height: 72.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Canvas margin around the whole diagram.
    pub margin: f32,
    pub agent: NodeSize,
    pub input: NodeSize,
    pub prompt: NodeSize,
    pub tool: NodeSize,
    pub system: NodeSize,
    pub output: NodeSize,
    /// Horizontal gap between adjacent non-empty zones.
    pub column_gap: f32,
    /// Vertical gap between stacked input channels.
    pub input_gap: f32,
    /// Vertical gap between tool rows.
    pub tool_gap: f32,
    /// Vertical gap inside a tool's connected-system stack.
    pub system_gap: f32,
    /// Uniform horizontal gap inside the prompt and output rows.
    pub row_item_gap: f32,
    /// Vertical gap between the prompt/output rows and the main row.
    pub row_gap: f32,
    /// Snap activation distance in pixels; an edge exactly at this distance
    /// does not snap.
    pub snap_threshold: f32,
    /// Debounce window for position persistence, milliseconds.
    pub flush_debounce_ms: u64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            margin: 40.0,
            agent: NodeSize {
                width: 220.0,
                height: 140.0,
            },
            input: NodeSize {
                width: 180.0,
                height: 72.0,
            },
            prompt: NodeSize {
                width: 170.0,
                height: 64.0,
            },
            tool: NodeSize {
                width: 190.0,
                height: 84.0,
            },
            system: NodeSize {
                width: 170.0,
                height: 64.0,
            },
            output: NodeSize {
                width: 180.0,
                height: 72.0,
            },
            column_gap: 90.0,
            input_gap: 24.0,
            tool_gap: 32.0,
            system_gap: 16.0,
            row_item_gap: 28.0,
            row_gap: 80.0,
            snap_threshold: 6.0,
            flush_debounce_ms: 600,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub layout: LayoutConfig,
    pub theme: Theme,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    theme: Option<String>,
    layout: Option<LayoutConfig>,
    theme_overrides: Option<Theme>,
}

/// Loads a user config file. JSON5 so hand-written files may carry comments
/// and trailing commas.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let Some(path) = path else {
        return Ok(config);
    };

    let contents = std::fs::read_to_string(path)?;
    let parsed: ConfigFile = json5::from_str(&contents)?;

    if let Some(theme_name) = parsed.theme.as_deref() {
        if theme_name == "dark" {
            config.theme = Theme::dark();
        } else if theme_name == "modern" || theme_name == "default" {
            config.theme = Theme::modern();
        }
    }
    if let Some(layout) = parsed.layout {
        config.layout = layout;
    }
    if let Some(theme) = parsed.theme_overrides {
        config.theme = theme;
    }

    Ok(config)
}
