//! # Carving Configuration
//!
//! Loaded once at startup from a TOML file. Every field has a default, so an
//! empty file is a valid configuration.
//!
//! ```toml
//! seed = 12345
//! tunnels = 4
//! tubes = 10
//!
//! [walk]
//! max_length = 300
//! branch_probability = 0.25
//! lateral_range = { min = -1, max = 1 }
//!
//! [tube_walk]
//! max_length = 80
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::CarveError;
use crate::walker::WalkConfig;

/// Errors raised while loading a configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid TOML for this schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Values parsed but are out of range.
    #[error(transparent)]
    Invalid(#[from] CarveError),
}

/// Everything a carving run needs besides the world.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarveConfig {
    /// RNG seed; a fresh one is chosen when absent.
    pub seed: Option<u64>,
    /// Carve a tunnel starting in front of the player.
    pub player_tunnel: bool,
    /// Extra tunnels started at random columns.
    pub tunnels: u32,
    /// Single-cell tube walks started at random columns.
    pub tubes: u32,
    /// Block id written by tube walks.
    pub tube_material: u16,
    /// Solid fraction that counts as ground when picking start levels.
    pub ground_threshold: f64,
    /// How far below ground random walks begin.
    pub start_depth: i32,
    /// Parameters for tunnel walks.
    pub walk: WalkConfig,
    /// Parameters for tube walks.
    pub tube_walk: WalkConfig,
}

impl Default for CarveConfig {
    fn default() -> Self {
        Self {
            seed: None,
            player_tunnel: true,
            tunnels: 0,
            tubes: 0,
            tube_material: 0,
            ground_threshold: 0.5,
            start_depth: 8,
            walk: WalkConfig::default(),
            tube_walk: WalkConfig {
                branch_probability: 0.0,
                ..WalkConfig::default()
            },
        }
    }
}

impl CarveConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML and
    /// [`ConfigError::Invalid`] for out-of-range values.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`CarveConfig::from_toml_str`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        tracing::info!("Loaded config file: {}", path.display());
        Ok(config)
    }

    /// Checks both walk configurations and the ground threshold.
    ///
    /// # Errors
    ///
    /// Returns [`CarveError::InvalidConfig`] for out-of-range values.
    pub fn validate(&self) -> Result<(), CarveError> {
        self.walk.validate()?;
        self.tube_walk.validate()?;
        if !(0.0..=1.0).contains(&self.ground_threshold) {
            return Err(CarveError::InvalidConfig(format!(
                "ground_threshold must be within [0, 1], got {}",
                self.ground_threshold
            )));
        }
        if self.start_depth < 0 {
            return Err(CarveError::InvalidConfig(format!(
                "start_depth must not be negative, got {}",
                self.start_depth
            )));
        }
        Ok(())
    }
}
