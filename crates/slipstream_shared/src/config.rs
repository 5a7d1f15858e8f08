//! Runtime configuration, loaded once at startup.
//!
//! The config is plain TOML. Every participant in a session must load the
//! same tick rate; the remaining fields tune per-role behavior and may
//! differ between owner and authority without breaking the protocol.

use crate::constants::{
    CHANNEL_CAPACITY, INTERP_RATE, POSITION_TOLERANCE, PREDICTION_WINDOW, TICK_RATE, YAW_TOLERANCE,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error loading or validating a [`NetcodeConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The TOML text could not be parsed.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    /// A field holds a value the simulation cannot run with.
    #[error("invalid {field}: {reason}")]
    Invalid {
        /// Name of the offending field.
        field: &'static str,
        /// Why the value was rejected.
        reason: &'static str,
    },
}

/// Tuning for a session participant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NetcodeConfig {
    /// Simulation tick rate (ticks per second). Must match on every machine.
    pub tick_rate: u32,
    /// Capacity of the owner's input and prediction windows, in ticks.
    pub prediction_window: usize,
    /// Positional divergence tolerance in meters before a rewind is forced.
    pub position_tolerance: f32,
    /// Yaw divergence tolerance in degrees before a rewind is forced.
    pub yaw_tolerance: f32,
    /// Exponential smoothing rate (per second) for observer interpolation.
    pub interp_rate: f32,
    /// Bounded capacity of the command and snapshot queues.
    pub channel_capacity: usize,
}

impl Default for NetcodeConfig {
    fn default() -> Self {
        Self {
            tick_rate: TICK_RATE,
            prediction_window: PREDICTION_WINDOW,
            position_tolerance: POSITION_TOLERANCE,
            yaw_tolerance: YAW_TOLERANCE,
            interp_rate: INTERP_RATE,
            channel_capacity: CHANNEL_CAPACITY,
        }
    }
}

impl NetcodeConfig {
    /// Fixed tick duration in seconds.
    #[inline]
    #[must_use]
    pub fn tick_duration(&self) -> f32 {
        1.0 / self.tick_rate as f32
    }

    /// Parses a config from TOML text and validates it.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every field for a value the simulation can run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_rate == 0 {
            return Err(ConfigError::Invalid {
                field: "tick_rate",
                reason: "must be at least 1",
            });
        }
        if self.prediction_window < 2 {
            return Err(ConfigError::Invalid {
                field: "prediction_window",
                reason: "must hold at least 2 ticks",
            });
        }
        if !(self.position_tolerance >= 0.0) {
            return Err(ConfigError::Invalid {
                field: "position_tolerance",
                reason: "must be finite and non-negative",
            });
        }
        if !(self.yaw_tolerance >= 0.0) {
            return Err(ConfigError::Invalid {
                field: "yaw_tolerance",
                reason: "must be finite and non-negative",
            });
        }
        if !(self.interp_rate > 0.0) {
            return Err(ConfigError::Invalid {
                field: "interp_rate",
                reason: "must be positive",
            });
        }
        if self.channel_capacity == 0 {
            return Err(ConfigError::Invalid {
                field: "channel_capacity",
                reason: "must be at least 1",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = NetcodeConfig::default();
        assert!(config.validate().is_ok());
        assert!((config.tick_duration() - 0.05).abs() < 1e-6);
    }

    #[test]
    fn test_parse_partial_toml() {
        let config = NetcodeConfig::from_toml_str(
            r#"
            tick_rate = 30
            position_tolerance = 0.25
            "#,
        )
        .unwrap();

        assert_eq!(config.tick_rate, 30);
        assert!((config.position_tolerance - 0.25).abs() < 1e-6);
        // Unspecified fields fall back to defaults
        assert_eq!(config.prediction_window, PREDICTION_WINDOW);
    }

    #[test]
    fn test_rejects_zero_tick_rate() {
        let err = NetcodeConfig::from_toml_str("tick_rate = 0").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "tick_rate",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_unknown_field() {
        assert!(NetcodeConfig::from_toml_str("tick_rte = 20").is_err());
    }
}
