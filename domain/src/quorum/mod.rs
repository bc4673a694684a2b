//! Weighted quorum consensus
//!
//! The algorithmic core of the swarm validation engine:
//!
//! - **Quorum sizing**: how many eligible agents one round needs
//! - **Vote weighting**: blending confidence, reputation, and quality
//! - **Consensus**: reducing weighted votes to a single decision
//! - **Dispute analysis**: remediation selection when agreement is weak
//! - **Reputation**: bounded trust feedback from ground truth

pub mod consensus;
pub mod dispute;
pub mod reputation;
pub mod sizing;
pub mod vote;

pub use consensus::{ConsensusDecision, QualitySummary, WeightedTally};
pub use dispute::{
    DisputeRecord, DisputeStatistics, Priority, RemediationStrategy, select_strategy,
};
pub use sizing::QuorumPlan;
pub use vote::{DISTRIBUTION_EPSILON, ValidationVote, WeightedVote};

use serde::{Deserialize, Serialize};

/// Phases of one validation round, for progress reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    /// Narrowing the registry to capable agents
    Eligibility,
    /// Collecting classifier votes from the selected agents
    Voting,
    /// Weighing votes and computing the decision
    Aggregation,
    /// Analyzing a disputed round
    DisputeReview,
}

impl RoundPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoundPhase::Eligibility => "eligibility",
            RoundPhase::Voting => "voting",
            RoundPhase::Aggregation => "aggregation",
            RoundPhase::DisputeReview => "dispute_review",
        }
    }
}

impl std::fmt::Display for RoundPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
