//! Agent entity
//!
//! An agent is one autonomous field validator (drone or satellite). The
//! registry owns agents exclusively; all other components work on snapshots.

use super::value_objects::AgentId;
use crate::core::error::RegistryError;
use crate::core::geo::GeoPoint;
use crate::core::land::LandClass;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Minimum reputation required to join the registry
pub const MIN_REGISTRATION_REPUTATION: f64 = 0.3;

/// Maximum allowed self-confidence threshold at registration
pub const MAX_CONFIDENCE_THRESHOLD: f64 = 0.9;

/// One field validator in the swarm
///
/// # Example
///
/// ```
/// use swarm_domain::{Agent, GeoPoint, LandClass};
///
/// let agent = Agent::new("drone-01", "resnet-field-v3", GeoPoint::new(46.2, 6.1))
///     .with_reputation(0.8)
///     .with_capacity(0.9)
///     .with_specialization(LandClass::Agricultural);
///
/// assert!(agent.admission_check().is_ok());
/// assert!(agent.is_specialist(&LandClass::Agricultural));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    /// Unique identifier
    pub id: AgentId,
    /// Classifier model/version tag running on this agent
    pub model_version: String,
    /// Minimum confidence the agent requires of itself before reporting
    pub confidence_threshold: f64,
    /// Historical accuracy proxy, 0.0 to 1.0
    pub reputation: f64,
    /// Current geographic position
    pub position: GeoPoint,
    /// Remaining operational capacity (battery), 0.0 to 1.0
    pub capacity: f64,
    /// Last-active timestamp (milliseconds since epoch)
    pub last_active_ms: u64,
    /// Land classes this agent specializes in
    pub specializations: BTreeSet<LandClass>,
}

impl Agent {
    /// Create a new agent with neutral defaults
    pub fn new(
        id: impl Into<AgentId>,
        model_version: impl Into<String>,
        position: GeoPoint,
    ) -> Self {
        Self {
            id: id.into(),
            model_version: model_version.into(),
            confidence_threshold: 0.5,
            reputation: 0.5,
            position,
            capacity: 1.0,
            last_active_ms: current_timestamp_ms(),
            specializations: BTreeSet::new(),
        }
    }

    // ==================== Builder Methods ====================

    pub fn with_reputation(mut self, reputation: f64) -> Self {
        self.reputation = reputation.clamp(0.0, 1.0);
        self
    }

    pub fn with_capacity(mut self, capacity: f64) -> Self {
        self.capacity = capacity.clamp(0.0, 1.0);
        self
    }

    pub fn with_confidence_threshold(mut self, threshold: f64) -> Self {
        self.confidence_threshold = threshold;
        self
    }

    pub fn with_specialization(mut self, class: LandClass) -> Self {
        self.specializations.insert(class);
        self
    }

    pub fn with_last_active_ms(mut self, timestamp_ms: u64) -> Self {
        self.last_active_ms = timestamp_ms;
        self
    }

    // ==================== Queries ====================

    /// Whether this agent specializes in the given land class
    pub fn is_specialist(&self, class: &LandClass) -> bool {
        self.specializations.contains(class)
    }

    /// Validate the registration contract
    ///
    /// Fails with [`RegistryError::LowReputation`] below the reputation
    /// floor, or [`RegistryError::ThresholdTooHigh`] when the agent's
    /// self-confidence threshold would let it suppress almost every report.
    pub fn admission_check(&self) -> Result<(), RegistryError> {
        if self.reputation < MIN_REGISTRATION_REPUTATION {
            return Err(RegistryError::LowReputation {
                reputation: self.reputation,
                minimum: MIN_REGISTRATION_REPUTATION,
            });
        }
        if self.confidence_threshold > MAX_CONFIDENCE_THRESHOLD {
            return Err(RegistryError::ThresholdTooHigh {
                threshold: self.confidence_threshold,
                maximum: MAX_CONFIDENCE_THRESHOLD,
            });
        }
        Ok(())
    }

    /// Mark the agent as active now
    pub fn touch(&mut self) {
        self.last_active_ms = current_timestamp_ms();
    }
}

/// Current timestamp in milliseconds since epoch
pub fn current_timestamp_ms() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
