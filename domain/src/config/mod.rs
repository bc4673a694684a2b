//! Round-independent engine tunables
//!
//! Three immutable configuration groups, loaded once per process:
//! consensus weighting and quorum parameters, eligibility bounds, and the
//! dispute-analysis thresholds. The dispute thresholds are empirically
//! chosen prototype constants; they are configuration defaults, not law.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Weighting and quorum parameters for the consensus calculator
///
/// The quality weight is implicit: `1 - confidence_weight - reputation_weight`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsensusConfig {
    /// Target fraction of eligible agents forming the base quorum
    pub quorum_ratio: f64,
    /// Weight of the vote's own confidence in its final weight
    pub confidence_weight: f64,
    /// Weight of the agent's reputation in the vote's final weight
    pub reputation_weight: f64,
    /// Minimum decision certainty below which a round is disputed
    pub consensus_threshold: f64,
    /// Upper bound on total vote-collection time for one round
    #[serde(with = "duration_secs")]
    pub max_voting_time: Duration,
    /// Minimum number of quality-surviving votes for a valid round
    pub min_participants: usize,
    /// Minimum normalized top-two weight margin before a round is disputed
    pub dispute_margin_threshold: f64,
    /// Votes with a quality score below this are discarded
    pub min_vote_quality: f64,
    /// Weight bonus when an agent votes within its specialization
    pub specialization_bonus: f64,
}

impl Default for ConsensusConfig {
    fn default() -> Self {
        Self {
            quorum_ratio: 0.67,
            confidence_weight: 0.4,
            reputation_weight: 0.3,
            consensus_threshold: 0.67,
            max_voting_time: Duration::from_secs(300),
            min_participants: 3,
            dispute_margin_threshold: 0.15,
            min_vote_quality: 0.6,
            specialization_bonus: 0.1,
        }
    }
}

impl ConsensusConfig {
    /// Implicit weight applied to the vote's image quality score
    pub fn quality_weight(&self) -> f64 {
        1.0 - self.confidence_weight - self.reputation_weight
    }

    /// Validate weight and threshold ranges
    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("quorum_ratio", self.quorum_ratio),
            ("confidence_weight", self.confidence_weight),
            ("reputation_weight", self.reputation_weight),
            ("consensus_threshold", self.consensus_threshold),
            ("dispute_margin_threshold", self.dispute_margin_threshold),
            ("min_vote_quality", self.min_vote_quality),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(format!("{} must be within [0, 1], got {}", name, value));
            }
        }
        if self.confidence_weight + self.reputation_weight > 1.0 {
            return Err(format!(
                "confidence_weight + reputation_weight must not exceed 1.0, got {}",
                self.confidence_weight + self.reputation_weight
            ));
        }
        if self.min_participants == 0 {
            return Err("min_participants must be at least 1".to_string());
        }
        Ok(())
    }
}

/// Bounds for the eligibility filter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EligibilityConfig {
    /// Maximum great-circle distance from agent to target, in km
    pub max_distance_km: f64,
    /// Minimum remaining operational capacity (battery)
    pub min_capacity: f64,
    /// Agents inactive longer than this are excluded, in seconds
    pub max_idle_secs: u64,
}

impl Default for EligibilityConfig {
    fn default() -> Self {
        Self {
            max_distance_km: 10.0,
            min_capacity: 0.3,
            max_idle_secs: 3600,
        }
    }
}

impl EligibilityConfig {
    /// Relax the distance bound (caller-side retry after an aborted round)
    pub fn with_max_distance_km(mut self, km: f64) -> Self {
        self.max_distance_km = km;
        self
    }
}

/// Thresholds driving dispute remediation selection
///
/// Prototype tuning numbers with no documented derivation; kept
/// configurable for exactly that reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisputeThresholds {
    /// Confidence variance above which extra votes are requested
    pub confidence_variance: f64,
    /// Quality variance above which a quality-filtered revote is requested
    pub quality_variance: f64,
    /// Latency variance bound, in squared milliseconds
    pub latency_variance: f64,
    /// Mean participant reputation below which recruitment is requested
    pub mean_reputation: f64,
    /// Distinct predicted classes beyond which a human review is required
    pub max_distinct_classes: usize,
}

impl Default for DisputeThresholds {
    fn default() -> Self {
        Self {
            confidence_variance: 0.08,
            quality_variance: 0.15,
            latency_variance: 50.0,
            mean_reputation: 0.7,
            max_distinct_classes: 3,
        }
    }
}

mod duration_secs {
    //! Serialize `Duration` as whole seconds in config files

    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_secs(u64::deserialize(d)?))
    }
}
