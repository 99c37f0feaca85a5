//! Engine configuration: starting reserve and evaluation weights

use crate::error::EngineError;
use crate::eval::Heuristics;
use crate::game::GameState;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Pieces each player starts with in reserve
pub const DEFAULT_RESERVE: i32 = 15;

/// Engine configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Pieces each player holds before the first move
    pub starting_reserve: i32,
    /// Evaluation weights
    pub heuristics: Heuristics,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            starting_reserve: DEFAULT_RESERVE,
            heuristics: Heuristics::default(),
        }
    }
}

impl EngineConfig {
    /// Empty board with this configuration
    pub fn new_game(&self) -> GameState {
        GameState::with_config(self)
    }

    /// State from a 61-character initialization string
    pub fn game_from_str(&self, init: &str) -> Result<GameState, EngineError> {
        GameState::from_init_string(init, self)
    }

    /// Parse from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let config: EngineConfig = serde_json::from_str(json)?;
        anyhow::ensure!(
            config.starting_reserve > 0,
            "starting_reserve must be positive, got {}",
            config.starting_reserve
        );
        Ok(config)
    }

    /// Load from JSON file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_json(&content)?;
        tracing::debug!(
            path = %path.display(),
            reserve = config.starting_reserve,
            "loaded engine config"
        );
        Ok(config)
    }

    /// Save to JSON file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
