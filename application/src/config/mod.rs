//! Application-level configuration
//!
//! One container for the three domain configuration groups, loaded once per
//! process and shared across rounds. Loading from files and the environment
//! is an infrastructure concern; this module only defines the shape and the
//! validation applied after loading.

use serde::{Deserialize, Serialize};
use swarm_domain::{ConsensusConfig, DisputeThresholds, EligibilityConfig};
use thiserror::Error;

/// Error produced when a loaded configuration fails validation
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid consensus configuration: {0}")]
    InvalidConsensus(String),
}

/// Full engine configuration for the validation pipeline
///
/// Every field group has sensible defaults; a missing config file yields a
/// fully working engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Weighting and quorum parameters
    pub consensus: ConsensusConfig,
    /// Eligibility bounds for participant filtering
    pub eligibility: EligibilityConfig,
    /// Thresholds driving dispute remediation selection
    pub dispute: DisputeThresholds,
}

impl EngineConfig {
    /// Validate the loaded configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.consensus
            .validate()
            .map_err(ConfigError::InvalidConsensus)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: EngineConfig = toml::from_str(
            r#"
            [consensus]
            quorum_ratio = 0.75

            [eligibility]
            max_distance_km = 25.0
            "#,
        )
        .unwrap();

        assert_eq!(config.consensus.quorum_ratio, 0.75);
        // Untouched fields keep their defaults
        assert_eq!(config.consensus.min_participants, 3);
        assert_eq!(config.eligibility.max_distance_km, 25.0);
        assert_eq!(config.eligibility.min_capacity, 0.3);
        assert_eq!(config.dispute.mean_reputation, 0.7);
    }

    #[test]
    fn test_invalid_consensus_is_rejected() {
        let config = EngineConfig {
            consensus: ConsensusConfig {
                quorum_ratio: 1.5,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
