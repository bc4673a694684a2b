//! Dispute analysis and remediation selection
//!
//! A dispute is not a failure: the round still produced a decision, but
//! agreement fell below tolerance. This module computes statistics over the
//! conflicting votes and picks exactly one remediation strategy from an
//! ordered rule table. The strategy is a signal for a higher-level
//! orchestrator; no retry loop lives here.

use crate::agent::entities::Agent;
use crate::agent::value_objects::ParcelId;
use crate::config::DisputeThresholds;
use crate::quorum::consensus::ConsensusDecision;
use crate::quorum::vote::WeightedVote;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Urgency of a remediation strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Critical,
    High,
    Medium,
    Normal,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Priority::Critical => "critical",
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Normal => "normal",
        };
        write!(f, "{}", s)
    }
}

/// The remediation a disputed round asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemediationStrategy {
    /// Too many distinct classes in play; a human expert must look
    ExpertHumanReview,
    /// Confidence spread is wide; request additional votes
    ConfidenceWeightedConsensus,
    /// Participant pool is weak; recruit high-reliability agents
    HighReliabilityAgentRecruitment,
    /// Image quality varies too much; revote with a stricter quality floor
    QualityFilteredRevote,
    /// Latency spread suggests stale or strained agents; retry with timing bounds
    TimingOptimizedRetry,
    /// No specific pattern; revote under tightened criteria
    EnhancedCriteriaVoting,
}

impl RemediationStrategy {
    pub fn priority(&self) -> Priority {
        match self {
            RemediationStrategy::ExpertHumanReview => Priority::Critical,
            RemediationStrategy::ConfidenceWeightedConsensus => Priority::High,
            RemediationStrategy::HighReliabilityAgentRecruitment => Priority::High,
            RemediationStrategy::QualityFilteredRevote => Priority::Medium,
            RemediationStrategy::TimingOptimizedRetry => Priority::Medium,
            RemediationStrategy::EnhancedCriteriaVoting => Priority::Normal,
        }
    }

    /// Whether this strategy escalates beyond the automated pipeline
    pub fn requires_escalation(&self) -> bool {
        matches!(self, RemediationStrategy::ExpertHumanReview)
    }

    /// Whether a human reviewer must be pulled in
    pub fn requires_human_review(&self) -> bool {
        matches!(self, RemediationStrategy::ExpertHumanReview)
    }
}

impl std::fmt::Display for RemediationStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RemediationStrategy::ExpertHumanReview => "expert_human_review",
            RemediationStrategy::ConfidenceWeightedConsensus => "confidence_weighted_consensus",
            RemediationStrategy::HighReliabilityAgentRecruitment => {
                "high_reliability_agent_recruitment"
            }
            RemediationStrategy::QualityFilteredRevote => "quality_filtered_revote",
            RemediationStrategy::TimingOptimizedRetry => "timing_optimized_retry",
            RemediationStrategy::EnhancedCriteriaVoting => "enhanced_criteria_voting",
        };
        write!(f, "{}", s)
    }
}

/// Statistics over the conflicting votes of a disputed round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisputeStatistics {
    pub confidence_variance: f64,
    pub quality_variance: f64,
    /// Variance of processing latency, in squared milliseconds
    pub latency_variance: f64,
    pub distinct_classes: usize,
    pub mean_reputation: f64,
    pub reputation_variance: f64,
}

impl DisputeStatistics {
    /// Compute statistics from the tallied votes and the participants
    ///
    /// `participants` are the agents whose votes survived into the tally;
    /// reputation statistics come from their registry snapshots.
    pub fn from_votes(votes: &[WeightedVote], participants: &[Agent]) -> Self {
        let confidences: Vec<f64> = votes.iter().map(|wv| wv.vote.confidence).collect();
        let qualities: Vec<f64> = votes.iter().map(|wv| wv.vote.quality_score).collect();
        let latencies: Vec<f64> = votes.iter().map(|wv| wv.vote.latency_ms).collect();
        let reputations: Vec<f64> = participants.iter().map(|a| a.reputation).collect();

        let distinct: BTreeSet<_> = votes.iter().map(|wv| wv.vote.predicted).collect();

        Self {
            confidence_variance: variance(&confidences),
            quality_variance: variance(&qualities),
            latency_variance: variance(&latencies),
            distinct_classes: distinct.len(),
            mean_reputation: mean(&reputations),
            reputation_variance: variance(&reputations),
        }
    }
}

/// Pick exactly one remediation strategy from the ordered rule table
///
/// Rules are evaluated top to bottom; the first match wins. The final rule
/// always matches, so every disputed round gets a strategy.
pub fn select_strategy(
    stats: &DisputeStatistics,
    thresholds: &DisputeThresholds,
) -> RemediationStrategy {
    type Rule = (
        fn(&DisputeStatistics, &DisputeThresholds) -> bool,
        RemediationStrategy,
    );

    const RULES: &[Rule] = &[
        (
            |s, t| s.distinct_classes > t.max_distinct_classes,
            RemediationStrategy::ExpertHumanReview,
        ),
        (
            |s, t| s.confidence_variance > t.confidence_variance,
            RemediationStrategy::ConfidenceWeightedConsensus,
        ),
        (
            |s, t| s.mean_reputation < t.mean_reputation,
            RemediationStrategy::HighReliabilityAgentRecruitment,
        ),
        (
            |s, t| s.quality_variance > t.quality_variance,
            RemediationStrategy::QualityFilteredRevote,
        ),
        (
            |s, t| s.latency_variance > t.latency_variance,
            RemediationStrategy::TimingOptimizedRetry,
        ),
        (|_, _| true, RemediationStrategy::EnhancedCriteriaVoting),
    ];

    RULES
        .iter()
        .find(|(predicate, _)| predicate(stats, thresholds))
        .map(|(_, strategy)| *strategy)
        .expect("the fallback rule always matches")
}

/// Append-only record of one disputed round
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisputeRecord {
    /// Stable identifier: `dispute-<parcel>-<timestamp-ms>`
    pub dispute_id: String,
    pub parcel_id: ParcelId,
    /// The conflicting votes, as tallied
    pub votes: Vec<WeightedVote>,
    /// Computed disagreement statistics
    pub statistics: DisputeStatistics,
    /// The chosen remediation strategy
    pub strategy: RemediationStrategy,
    pub priority: Priority,
    pub escalated: bool,
    pub human_review: bool,
    /// `1 - decision_certainty`: how unsettled the round was
    pub resolution_confidence: f64,
    pub timestamp_ms: u64,
}

impl DisputeRecord {
    /// Analyze a disputed decision and produce its record
    pub fn analyze(
        decision: &ConsensusDecision,
        votes: &[WeightedVote],
        participants: &[Agent],
        thresholds: &DisputeThresholds,
    ) -> Self {
        let statistics = DisputeStatistics::from_votes(votes, participants);
        let strategy = select_strategy(&statistics, thresholds);
        let timestamp_ms = crate::agent::entities::current_timestamp_ms();

        Self {
            dispute_id: format!("dispute-{}-{}", decision.parcel_id, timestamp_ms),
            parcel_id: decision.parcel_id.clone(),
            votes: votes.to_vec(),
            statistics,
            strategy,
            priority: strategy.priority(),
            escalated: strategy.requires_escalation(),
            human_review: strategy.requires_human_review(),
            resolution_confidence: 1.0 - decision.decision_certainty,
            timestamp_ms,
        }
    }
}

/// Population mean; 0 for an empty slice
fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population variance; 0 for fewer than two samples
fn variance(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64
}
