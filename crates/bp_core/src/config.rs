//! Session configuration.
//!
//! The playable variants of this game differ only in configuration (market
//! odds, goal-total line, match length), never in forked code paths, so
//! everything tunable lives here.

use serde::{Deserialize, Serialize};

/// Tunable parameters for one match session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Full match length in wall-clock milliseconds.
    pub total_duration_ms: u64,
    /// Pause after a goal before the ball respawns and play resumes.
    pub dwell_ms: u64,
    /// Recommended cadence for the external tick driver.
    pub tick_interval_ms: u64,
    /// Fixed stake per selection, in integer currency units.
    pub fixed_stake: u64,
    /// Opening account balance.
    pub initial_balance: u64,
    /// Over/under line for the total-goals market. Half-integer so a push is
    /// impossible. Variants shipped with 9.5 and 4.5; this is configuration,
    /// not a forked rule.
    pub total_goals_threshold: f64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            total_duration_ms: 45_000,
            dwell_ms: 2_000,
            tick_interval_ms: 100,
            fixed_stake: 100,
            initial_balance: 10_000,
            total_goals_threshold: 9.5,
        }
    }
}

impl SessionConfig {
    /// Compressed match for tests and demos.
    pub fn short_match() -> Self {
        Self {
            total_duration_ms: 5_000,
            dwell_ms: 500,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = SessionConfig::default();
        assert_eq!(config.total_duration_ms, 45_000);
        assert_eq!(config.dwell_ms, 2_000);
        assert_eq!(config.fixed_stake, 100);
        assert_eq!(config.initial_balance, 10_000);
    }

    #[test]
    fn test_threshold_is_a_half_integer() {
        let config = SessionConfig::default();
        assert_ne!(config.total_goals_threshold.fract(), 0.0);
    }
}
