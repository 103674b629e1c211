use serde::{Deserialize, Serialize};

use crate::combat::actor::ActorConfig;
use crate::error::ConfigError;

/// Seed used when the caller leaves it unset and does not draw one itself.
pub const DEFAULT_SEED: u64 = 0x5eed;
pub const DEFAULT_TRIALS: u32 = 1000;
pub const DEFAULT_MIN_TIME: u32 = 150;
pub const DEFAULT_MAX_TIME: u32 = 210;

/// Immutable parameters of one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub trials: u32,
    /// Shortest fight, in whole seconds.
    pub min_time: u32,
    /// Longest fight, in whole seconds. Lengths are drawn uniformly from `min_time..=max_time`.
    pub max_time: u32,
    pub seed: Option<u64>,
    /// Zero-based index of the trial whose combat log is kept.
    pub combat_log_trial: Option<u32>,
    pub actor: ActorConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            trials: DEFAULT_TRIALS,
            min_time: DEFAULT_MIN_TIME,
            max_time: DEFAULT_MAX_TIME,
            seed: None,
            combat_log_trial: None,
            actor: ActorConfig::default(),
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.trials == 0 {
            return Err(ConfigError::NoTrials);
        }
        if self.min_time == 0 {
            return Err(ConfigError::NonPositiveFightLength { min: self.min_time });
        }
        if self.min_time > self.max_time {
            return Err(ConfigError::InvertedFightLength {
                min: self.min_time,
                max: self.max_time,
            });
        }
        self.actor.validate()
    }

    pub fn effective_seed(&self) -> u64 {
        self.seed.unwrap_or(DEFAULT_SEED)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(SimulationConfig::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_bad_run_parameters() {
        let config = SimulationConfig {
            trials: 0,
            ..SimulationConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::NoTrials));

        let config = SimulationConfig {
            min_time: 0,
            ..SimulationConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::NonPositiveFightLength { min: 0 })
        );

        let config = SimulationConfig {
            min_time: 300,
            max_time: 200,
            ..SimulationConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvertedFightLength { min: 300, max: 200 })
        );
    }

    #[test]
    fn missing_fields_take_defaults() {
        let config: SimulationConfig =
            serde_json::from_str(r#"{"trials": 10, "seed": 42}"#).expect("parse");
        assert_eq!(config.trials, 10);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.min_time, DEFAULT_MIN_TIME);
        assert_eq!(config.actor, ActorConfig::default());
    }
}
