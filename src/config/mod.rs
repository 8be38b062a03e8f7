/// Main configuration module.
///
/// `game` and `reporting` hold the built-in defaults. [`GameConfig`] is the configuration object
/// built once by the composition root and injected into the level session; there is no
/// process-wide configuration state.
pub mod game;
pub mod reporting;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::GameError;
use game::{DEFAULT_PLAYER_NAME, DEMO_DURATION_SECS, NPC_INTERVAL_MS};

/// Settings for one game session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub player_name: String,
    /// When set, the level runs without scheduling any NPC.
    pub disable_npcs: bool,
    /// Whether an NPC may be blocked by another NPC occupying the destination.
    pub npcs_block_npcs: bool,
    pub npc_interval_ms: u64,
    pub demo_duration_secs: u64,
    pub reporting: ReportingConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            player_name: DEFAULT_PLAYER_NAME.to_string(),
            disable_npcs: false,
            npcs_block_npcs: true,
            npc_interval_ms: NPC_INTERVAL_MS,
            demo_duration_secs: DEMO_DURATION_SECS,
            reporting: ReportingConfig::default(),
        }
    }
}

/// Where and as whom game events are reported.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportingConfig {
    pub beacon_url: String,
    pub application_id: String,
    pub device_id: u64,
}

impl ReportingConfig {
    /// Reporting is only enabled for a complete configuration.
    pub fn is_valid(&self) -> bool {
        !self.beacon_url.is_empty() && !self.application_id.is_empty() && self.device_id > 0
    }
}

/// Values given on the command line. They take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub player_name: Option<String>,
    pub disable_npcs: bool,
    pub beacon_url: Option<String>,
    pub application_id: Option<String>,
    pub device_id: Option<u64>,
}

impl GameConfig {
    /// Parse a JSON config. Missing keys fall back to the defaults.
    pub fn from_json_str(text: &str) -> Result<Self, GameError> {
        let config: GameConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON config file.
    pub fn load(path: &Path) -> Result<Self, GameError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<(), GameError> {
        if self.npc_interval_ms == 0 {
            return Err(GameError::Config("npc_interval_ms must be greater than zero".to_string()));
        }
        if self.player_name.trim().is_empty() {
            return Err(GameError::Config("player_name must not be empty".to_string()));
        }
        Ok(())
    }

    /// Apply command line values. Empty strings and zero ids are ignored, so the file value
    /// (or the default) is kept.
    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(name) = non_empty(overrides.player_name) {
            self.player_name = name;
        }
        if overrides.disable_npcs {
            self.disable_npcs = true;
        }
        if let Some(url) = non_empty(overrides.beacon_url) {
            self.reporting.beacon_url = url;
        }
        if let Some(id) = non_empty(overrides.application_id) {
            self.reporting.application_id = id;
        }
        if let Some(device_id) = overrides.device_id.filter(|id| *id > 0) {
            self.reporting.device_id = device_id;
        }
    }

    pub fn npc_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.npc_interval_ms)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
