use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Configuration from config.toml in the data directory
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Show key hints in the status row while navigating
    #[serde(default = "default_true")]
    pub show_key_hints: bool,
    #[serde(default)]
    pub colors: PaletteOverrides,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            show_key_hints: true,
            colors: PaletteOverrides::default(),
        }
    }
}

/// Per-palette color overrides: `[ui.colors.dark]` and `[ui.colors.light]`.
/// Values are `#RRGGBB` hex strings keyed by theme slot name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaletteOverrides {
    #[serde(default)]
    pub dark: HashMap<String, String>,
    #[serde(default)]
    pub light: HashMap<String, String>,
}

fn default_true() -> bool {
    true
}
