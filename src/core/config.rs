//! Replay configuration with documented defaults
//!
//! Balance numbers live in `battle::constants` and the trait table. This file
//! only covers how a replay run is seeded and numbered.

use serde::{Deserialize, Serialize};

use crate::core::types::Turn;

/// Settings for replaying a scripted sequence of commands
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayConfig {
    /// Seed for the ChaCha stream backing every roll
    ///
    /// Two runs with the same seed, scenario and trait table produce the
    /// same results byte for byte.
    pub seed: u64,

    /// Turn number the first scripted step executes on
    ///
    /// Cooldowns published by commands are absolute turn numbers, so this
    /// only matters when scenarios are stitched onto an ongoing battle.
    pub start_turn: Turn,

    /// Skip `can_execute` and call `execute` directly
    ///
    /// Commands re-check their critical preconditions, so this exercises
    /// that second line of checks. Off by default.
    pub skip_precheck: bool,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            start_turn: 1,
            skip_precheck: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_starts_on_turn_one() {
        let config = ReplayConfig::default();
        assert_eq!(config.start_turn, 1);
        assert!(!config.skip_precheck);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: ReplayConfig = toml::from_str("seed = 7").expect("valid toml");
        assert_eq!(config.seed, 7);
        assert_eq!(config.start_turn, 1);
    }
}
