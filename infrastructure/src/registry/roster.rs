//! Agent roster files
//!
//! A roster is a TOML file declaring the swarm's agents, used to seed the
//! registry at startup. Entries failing the admission check are reported,
//! not silently dropped.

use serde::{Deserialize, Serialize};
use std::path::Path;
use swarm_domain::{Agent, GeoPoint, LandClass};
use thiserror::Error;

/// Errors loading a roster file
#[derive(Error, Debug)]
pub enum RosterError {
    #[error("Failed to read roster file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse roster file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// One declared agent in a roster file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterEntry {
    pub id: String,
    pub model_version: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(default = "default_reputation")]
    pub reputation: f64,
    #[serde(default = "default_capacity")]
    pub capacity: f64,
    #[serde(default)]
    pub specializations: Vec<LandClass>,
}

fn default_reputation() -> f64 {
    0.5
}

fn default_capacity() -> f64 {
    1.0
}

impl RosterEntry {
    /// Convert the declaration into a domain agent, active as of now
    pub fn into_agent(self) -> Agent {
        let mut agent = Agent::new(
            self.id.as_str(),
            self.model_version,
            GeoPoint::new(self.lat, self.lon),
        )
        .with_reputation(self.reputation)
        .with_capacity(self.capacity);
        for class in self.specializations {
            agent = agent.with_specialization(class);
        }
        agent
    }
}

/// A parsed roster file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Roster {
    #[serde(default)]
    pub agents: Vec<RosterEntry>,
}

impl Roster {
    /// Load a roster from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RosterError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Convert all entries into domain agents
    pub fn into_agents(self) -> Vec<Agent> {
        self.agents.into_iter().map(RosterEntry::into_agent).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const ROSTER: &str = r#"
        [[agents]]
        id = "drone-01"
        model_version = "resnet-field-v3"
        lat = 45.1
        lon = 10.2
        reputation = 0.8
        specializations = ["forest", "water"]

        [[agents]]
        id = "sat-07"
        model_version = "sentinel-lc-v2"
        lat = 45.3
        lon = 10.1
    "#;

    #[test]
    fn test_parses_roster_with_defaults() {
        let roster: Roster = toml::from_str(ROSTER).unwrap();
        assert_eq!(roster.agents.len(), 2);

        let agents = roster.into_agents();
        assert_eq!(agents[0].id.as_str(), "drone-01");
        assert!(agents[0].is_specialist(&LandClass::Forest));
        // Unspecified fields fall back to neutral defaults
        assert_eq!(agents[1].reputation, 0.5);
        assert_eq!(agents[1].capacity, 1.0);
        assert!(agents[1].specializations.is_empty());
    }

    #[test]
    fn test_loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("agents.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(ROSTER.as_bytes()).unwrap();

        let roster = Roster::load(&path).unwrap();
        assert_eq!(roster.agents.len(), 2);
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let err = Roster::load("/nonexistent/agents.toml").unwrap_err();
        assert!(matches!(err, RosterError::Io(_)));
    }

    #[test]
    fn test_malformed_roster_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("agents.toml");
        std::fs::write(&path, "[[agents]]\nid = 42").unwrap();

        let err = Roster::load(&path).unwrap_err();
        assert!(matches!(err, RosterError::Parse(_)));
    }
}
