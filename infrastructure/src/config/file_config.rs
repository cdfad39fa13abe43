//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.
//! Unknown keys are rejected at deserialization.

use serde::{Deserialize, Serialize};
use squad_application::EngineDefaults;
use squad_domain::ConsensusMode;
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error)]
pub enum ConfigValidationError {
    #[error("engine.commit_timeout_seconds cannot be 0")]
    InvalidTimeout,

    #[error("sweeper.interval_seconds cannot be 0")]
    InvalidSweepInterval,

    #[error("limits.window_seconds cannot be 0")]
    InvalidLimitWindow,
}

/// Engine defaults applied to newly created squads
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileEngineConfig {
    /// Default consensus mode (unanimous, majority, no_objection)
    pub consensus_mode: ConsensusMode,
    /// Default commit timeout captured by new proposals
    pub commit_timeout_seconds: u64,
}

impl Default for FileEngineConfig {
    fn default() -> Self {
        Self {
            consensus_mode: ConsensusMode::Majority,
            commit_timeout_seconds: 300,
        }
    }
}

/// Rate-limit settings consumed by the console adapter
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileLimitsConfig {
    /// Actions allowed per identity per window
    pub max_actions: u32,
    /// Window length in seconds
    pub window_seconds: u64,
}

impl Default for FileLimitsConfig {
    fn default() -> Self {
        Self {
            max_actions: 30,
            window_seconds: 60,
        }
    }
}

/// Expiry sweeper settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileSweeperConfig {
    /// Whether the background sweep runs at all
    pub enabled: bool,
    /// How often overdue proposals are swept
    pub interval_seconds: u64,
}

impl Default for FileSweeperConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_seconds: 10,
        }
    }
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Engine defaults
    pub engine: FileEngineConfig,
    /// Rate limits
    pub limits: FileLimitsConfig,
    /// Sweeper settings
    pub sweeper: FileSweeperConfig,
}

impl FileConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.engine.commit_timeout_seconds == 0 {
            return Err(ConfigValidationError::InvalidTimeout);
        }
        if self.sweeper.interval_seconds == 0 {
            return Err(ConfigValidationError::InvalidSweepInterval);
        }
        if self.limits.window_seconds == 0 {
            return Err(ConfigValidationError::InvalidLimitWindow);
        }
        Ok(())
    }

    /// Engine defaults derived from the `[engine]` section.
    pub fn engine_defaults(&self) -> EngineDefaults {
        EngineDefaults {
            consensus_mode: self.engine.consensus_mode,
            commit_timeout_seconds: self.engine.commit_timeout_seconds,
        }
    }
}
