//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use swarm_application::EngineConfig;
use swarm_domain::{ConsensusConfig, DisputeThresholds, EligibilityConfig};

/// Swarm startup settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSwarmConfig {
    /// Roster file seeding the registry at startup
    pub roster: Option<PathBuf>,
}

/// Session history settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileHistoryConfig {
    /// JSONL audit log; in-memory only when unset
    pub audit_log: Option<PathBuf>,
}

/// Simulated classifier settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSimulationConfig {
    /// Fraction of agents that misread any given parcel
    pub error_rate: f64,
}

impl Default for FileSimulationConfig {
    fn default() -> Self {
        Self { error_rate: 0.15 }
    }
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Weighting and quorum settings
    pub consensus: ConsensusConfig,
    /// Eligibility bounds
    pub eligibility: EligibilityConfig,
    /// Dispute remediation thresholds
    pub dispute: DisputeThresholds,
    /// Swarm startup settings
    pub swarm: FileSwarmConfig,
    /// Session history settings
    pub history: FileHistoryConfig,
    /// Simulated classifier settings
    pub simulation: FileSimulationConfig,
}

impl FileConfig {
    /// The engine configuration embedded in this file
    pub fn engine(&self) -> EngineConfig {
        EngineConfig {
            consensus: self.consensus.clone(),
            eligibility: self.eligibility.clone(),
            dispute: self.dispute.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_empty_file_yields_defaults() {
        let config: FileConfig = toml::from_str("").unwrap();
        assert_eq!(config.consensus.quorum_ratio, 0.67);
        assert_eq!(config.eligibility.max_distance_km, 10.0);
        assert!(config.swarm.roster.is_none());
        assert!(config.history.audit_log.is_none());
        assert_eq!(config.simulation.error_rate, 0.15);
    }

    #[test]
    fn test_full_file_round_trips() {
        let config: FileConfig = toml::from_str(
            r#"
            [consensus]
            quorum_ratio = 0.7
            max_voting_time = 120

            [eligibility]
            max_distance_km = 50.0

            [dispute]
            mean_reputation = 0.65

            [swarm]
            roster = "agents.toml"

            [history]
            audit_log = "logs/session.jsonl"

            [simulation]
            error_rate = 0.05
            "#,
        )
        .unwrap();

        assert_eq!(config.consensus.quorum_ratio, 0.7);
        assert_eq!(config.consensus.max_voting_time, Duration::from_secs(120));
        assert_eq!(config.eligibility.max_distance_km, 50.0);
        assert_eq!(config.dispute.mean_reputation, 0.65);
        assert_eq!(config.swarm.roster, Some(PathBuf::from("agents.toml")));
        assert_eq!(config.simulation.error_rate, 0.05);

        let engine = config.engine();
        assert!(engine.validate().is_ok());
        assert_eq!(engine.consensus.quorum_ratio, 0.7);
    }
}
