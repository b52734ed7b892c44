//! Configuration module for tempo.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TempoError};

/// Top-level configuration for the timer engine and its surroundings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TempoConfig {
    /// Timer engine configuration.
    pub engine: EngineConfig,
    /// Observability configuration.
    pub observability: ObservabilityConfig,
}

impl TempoConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| TempoError::Config(format!("Failed to read config file: {}", e)))?;

        let config: Self = serde_json::from_str(&content)
            .map_err(|e| TempoError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<()> {
        if self.engine.check_interval.is_zero() {
            return Err(TempoError::InvalidConfig {
                field: "engine.check_interval".to_string(),
                reason: "Check interval must be non-zero".to_string(),
            });
        }

        // Schedules have minute granularity; sampling slower than once a
        // minute would skip firings.
        if self.engine.check_interval > Duration::from_secs(60) {
            return Err(TempoError::InvalidConfig {
                field: "engine.check_interval".to_string(),
                reason: "Check interval must not exceed 60s".to_string(),
            });
        }

        if self.engine.event_buffer == 0 {
            return Err(TempoError::InvalidConfig {
                field: "engine.event_buffer".to_string(),
                reason: "Event buffer must be non-zero".to_string(),
            });
        }

        Ok(())
    }

    /// Create a minimal development configuration.
    pub fn development() -> Self {
        Self {
            engine: EngineConfig {
                check_interval: Duration::from_secs(5),
                event_buffer: 100,
            },
            observability: ObservabilityConfig {
                log_level: "debug".to_string(),
                json_logs: false,
            },
        }
    }
}

/// Timer engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// How often registered schedules are evaluated.
    #[serde(with = "humantime_serde")]
    pub check_interval: Duration,
    /// Capacity of the engine's event broadcast channel.
    pub event_buffer: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            check_interval: Duration::from_secs(30),
            event_buffer: 100,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level filter when `RUST_LOG` is not set.
    pub log_level: String,
    /// Emit JSON-formatted logs.
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}
