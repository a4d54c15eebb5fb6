//! Session tuning
//!
//! Fixed when the engine is built; a running session never sees these change.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Config parse/validation failures
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(&'static str),
}

/// Game balance constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameConfig {
    /// Session time budget at level 1 (seconds)
    pub initial_time: u32,
    /// Seconds added to the session clock for every dish served
    pub time_per_level: u32,
    /// Base of the per-level score multiplier (`score_multiplier ^ (level - 1)`)
    pub score_multiplier: f64,
    /// Clearing this level ends the session as a win
    pub max_level: u32,
    /// Points lost when an order times out
    pub timeout_penalty: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            initial_time: 120,
            time_per_level: 8,
            score_multiplier: 1.3,
            max_level: 15,
            timeout_penalty: 50,
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON config. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file, falling back to defaults if it is missing or bad
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path)
            .map_err(ConfigError::from)
            .and_then(|json| Self::from_json(&json))
        {
            Ok(config) => {
                log::info!("Loaded game config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Using default game config ({e})");
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_time == 0 {
            return Err(ConfigError::Invalid("initialTime must be positive"));
        }
        if !self.score_multiplier.is_finite() || self.score_multiplier < 1.0 {
            return Err(ConfigError::Invalid("scoreMultiplier must be at least 1.0"));
        }
        if self.max_level == 0 {
            return Err(ConfigError::Invalid("maxLevel must be at least 1"));
        }
        Ok(())
    }

    /// `score_multiplier ^ (level - 1)`
    pub fn level_multiplier(&self, level: u32) -> f64 {
        let exp = level.saturating_sub(1).min(i32::MAX as u32) as i32;
        self.score_multiplier.powi(exp)
    }
}
