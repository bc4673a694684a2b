//! Validation votes and vote weighting
//!
//! A [`ValidationVote`] is one agent's report for one parcel in one round,
//! immutable once created. [`WeightedVote`] attaches the blended weight the
//! consensus calculator assigns to it.

use crate::agent::entities::Agent;
use crate::agent::value_objects::{AgentId, ParcelId};
use crate::config::ConsensusConfig;
use crate::core::geo::GeoPoint;
use crate::core::land::LandClass;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Tolerance when checking that a probability distribution sums to 1.0
pub const DISTRIBUTION_EPSILON: f64 = 1e-6;

/// One agent's classification report for one parcel
///
/// # Example
///
/// ```
/// use swarm_domain::{GeoPoint, LandClass, ValidationVote};
///
/// let vote = ValidationVote::new("drone-01", "parcel-9", LandClass::Forest, 0.85)
///     .with_quality(0.9)
///     .with_probability(LandClass::Forest, 0.85)
///     .with_probability(LandClass::Agricultural, 0.15);
///
/// assert!(vote.distribution_is_normalized());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationVote {
    /// Reporting agent
    pub agent_id: AgentId,
    /// Parcel under validation
    pub parcel_id: ParcelId,
    /// Predicted land class
    pub predicted: LandClass,
    /// Scalar confidence in the prediction, 0.0 to 1.0
    pub confidence: f64,
    /// Full probability distribution over land classes
    pub class_probabilities: BTreeMap<LandClass, f64>,
    /// Image/evidence quality score, 0.0 to 1.0
    pub quality_score: f64,
    /// Report timestamp (milliseconds since epoch)
    pub timestamp_ms: u64,
    /// Position the agent reported from
    pub reported_position: Option<GeoPoint>,
    /// Classifier processing latency, in milliseconds
    pub latency_ms: f64,
    /// Free-form evidence metadata
    pub evidence: BTreeMap<String, String>,
}

impl ValidationVote {
    pub fn new(
        agent_id: impl Into<AgentId>,
        parcel_id: impl Into<ParcelId>,
        predicted: LandClass,
        confidence: f64,
    ) -> Self {
        Self {
            agent_id: agent_id.into(),
            parcel_id: parcel_id.into(),
            predicted,
            confidence: confidence.clamp(0.0, 1.0),
            class_probabilities: BTreeMap::new(),
            quality_score: 0.0,
            timestamp_ms: crate::agent::entities::current_timestamp_ms(),
            reported_position: None,
            latency_ms: 0.0,
            evidence: BTreeMap::new(),
        }
    }

    // ==================== Builder Methods ====================

    pub fn with_quality(mut self, quality: f64) -> Self {
        self.quality_score = quality.clamp(0.0, 1.0);
        self
    }

    pub fn with_probability(mut self, class: LandClass, probability: f64) -> Self {
        self.class_probabilities.insert(class, probability);
        self
    }

    pub fn with_probabilities(mut self, probabilities: BTreeMap<LandClass, f64>) -> Self {
        self.class_probabilities = probabilities;
        self
    }

    pub fn with_latency_ms(mut self, latency_ms: f64) -> Self {
        self.latency_ms = latency_ms;
        self
    }

    pub fn with_position(mut self, position: GeoPoint) -> Self {
        self.reported_position = Some(position);
        self
    }

    pub fn with_evidence(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.evidence.insert(key.into(), value.into());
        self
    }

    // ==================== Queries ====================

    /// Whether the class probabilities sum to 1.0 within tolerance
    pub fn distribution_is_normalized(&self) -> bool {
        let total: f64 = self.class_probabilities.values().sum();
        (total - 1.0).abs() <= DISTRIBUTION_EPSILON
    }
}

/// A vote paired with its consensus weight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedVote {
    pub vote: ValidationVote,
    /// Blended weight in [0, 1]
    pub weight: f64,
}

impl WeightedVote {
    /// Pair a vote with a precomputed weight (clamped to [0, 1])
    pub fn new(vote: ValidationVote, weight: f64) -> Self {
        Self {
            vote,
            weight: weight.clamp(0.0, 1.0),
        }
    }

    /// Weigh a collected vote for the consensus tally
    ///
    /// Returns `None` when the vote's quality score is below
    /// `min_vote_quality`; the vote is discarded, not zero-weighted.
    /// Otherwise the weight blends confidence, agent reputation, and image
    /// quality by the configured coefficients, plus the specialization
    /// bonus when the agent predicted within its specialty.
    pub fn build(vote: ValidationVote, agent: &Agent, config: &ConsensusConfig) -> Option<Self> {
        if vote.quality_score < config.min_vote_quality {
            return None;
        }

        let mut weight = vote.confidence * config.confidence_weight
            + agent.reputation * config.reputation_weight
            + vote.quality_score * config.quality_weight();

        if agent.is_specialist(&vote.predicted) {
            weight += config.specialization_bonus;
        }

        Some(Self::new(vote, weight))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geo::GeoPoint;

    fn agent() -> Agent {
        Agent::new("drone-01", "resnet-field-v3", GeoPoint::new(45.0, 10.0)).with_reputation(0.8)
    }

    fn vote() -> ValidationVote {
        ValidationVote::new("drone-01", "parcel-9", LandClass::Agricultural, 0.9).with_quality(0.8)
    }

    #[test]
    fn test_weight_blends_configured_factors() {
        let config = ConsensusConfig::default();
        let weighted = WeightedVote::build(vote(), &agent(), &config).unwrap();
        // 0.9*0.4 + 0.8*0.3 + 0.8*0.3 = 0.84
        assert!((weighted.weight - 0.84).abs() < 1e-12);
    }

    #[test]
    fn test_specialization_bonus_applies() {
        let config = ConsensusConfig::default();
        let specialist = agent().with_specialization(LandClass::Agricultural);
        let weighted = WeightedVote::build(vote(), &specialist, &config).unwrap();
        assert!((weighted.weight - 0.94).abs() < 1e-12);
    }

    #[test]
    fn test_no_bonus_outside_specialty() {
        let config = ConsensusConfig::default();
        let specialist = agent().with_specialization(LandClass::Water);
        let weighted = WeightedVote::build(vote(), &specialist, &config).unwrap();
        assert!((weighted.weight - 0.84).abs() < 1e-12);
    }

    #[test]
    fn test_weight_is_clamped_to_one() {
        let config = ConsensusConfig::default();
        let perfect = ValidationVote::new("drone-01", "p", LandClass::Forest, 1.0)
            .with_quality(1.0);
        let specialist = agent()
            .with_reputation(1.0)
            .with_specialization(LandClass::Forest);
        let weighted = WeightedVote::build(perfect, &specialist, &config).unwrap();
        assert_eq!(weighted.weight, 1.0);
    }

    #[test]
    fn test_low_quality_vote_is_discarded() {
        let config = ConsensusConfig::default();
        let poor = vote().with_quality(0.5);
        assert!(WeightedVote::build(poor, &agent(), &config).is_none());
    }

    #[test]
    fn test_distribution_normalization_check() {
        let normalized = vote()
            .with_probability(LandClass::Agricultural, 0.9)
            .with_probability(LandClass::Residential, 0.1);
        assert!(normalized.distribution_is_normalized());

        let skewed = vote().with_probability(LandClass::Agricultural, 0.7);
        assert!(!skewed.distribution_is_normalized());
    }

    #[test]
    fn test_confidence_is_clamped() {
        let v = ValidationVote::new("a", "p", LandClass::Water, 1.7);
        assert_eq!(v.confidence, 1.0);
    }
}
