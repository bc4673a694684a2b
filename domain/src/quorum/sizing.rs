//! Dynamic quorum sizing
//!
//! Converts the eligible pool into a participation requirement before any
//! votes are collected. The base ratio is adjusted by pool quality and
//! proximity, clamped to a hard band, then floored by `min_participants`.

use crate::agent::eligibility::RankedAgent;
use crate::config::ConsensusConfig;
use serde::{Deserialize, Serialize};

/// Hard band for the adjusted quorum ratio
pub const MIN_QUORUM_RATIO: f64 = 0.5;
pub const MAX_QUORUM_RATIO: f64 = 0.9;

/// Extra agents selected beyond the quorum, as redundancy against the
/// post-vote quality filter
pub const SELECTION_REDUNDANCY: usize = 3;

/// Pool-quality adjustment: strong pools need a smaller quorum
const HIGH_REPUTATION_MEAN: f64 = 0.85;
const LOW_REPUTATION_MEAN: f64 = 0.70;
const REPUTATION_BONUS: f64 = 0.10;

/// Proximity adjustment: close pools need a smaller quorum
const NEAR_MEAN_DISTANCE_KM: f64 = 5.0;
const FAR_MEAN_DISTANCE_KM: f64 = 20.0;
const PROXIMITY_BONUS: f64 = 0.05;

/// The sizing decision for one round
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuorumPlan {
    /// Size of the eligible pool
    pub eligible_count: usize,
    /// `ceil(eligible * base_ratio)` before adjustments
    pub base_quorum: usize,
    /// Ratio after quality/proximity adjustment and clamping
    pub adjusted_ratio: f64,
    /// Votes required for a valid round (never below `min_participants`)
    pub quorum_needed: usize,
    /// Agents selected to vote: top `quorum_needed + 3` by suitability
    pub participants: Vec<RankedAgent>,
}

impl QuorumPlan {
    /// Size the quorum and select participants from a ranked eligible pool
    ///
    /// The pool must already be ordered by suitability (see
    /// [`crate::agent::eligibility::eligible_agents`]).
    pub fn build(eligible: &[RankedAgent], config: &ConsensusConfig) -> Self {
        let eligible_count = eligible.len();
        let base_quorum = (eligible_count as f64 * config.quorum_ratio).ceil() as usize;

        let adjusted_ratio = (config.quorum_ratio
            + reputation_adjustment(eligible)
            + proximity_adjustment(eligible))
        .clamp(MIN_QUORUM_RATIO, MAX_QUORUM_RATIO);

        let quorum_needed = ((eligible_count as f64 * adjusted_ratio).ceil() as usize)
            .max(config.min_participants);

        let selected = (quorum_needed + SELECTION_REDUNDANCY).min(eligible_count);
        let participants = eligible[..selected].to_vec();

        Self {
            eligible_count,
            base_quorum,
            adjusted_ratio,
            quorum_needed,
            participants,
        }
    }
}

/// −0.10 when the pool's mean reputation is strong, +0.10 when weak
fn reputation_adjustment(eligible: &[RankedAgent]) -> f64 {
    let Some(mean) = mean(eligible.iter().map(|r| r.agent.reputation)) else {
        return 0.0;
    };
    if mean > HIGH_REPUTATION_MEAN {
        -REPUTATION_BONUS
    } else if mean < LOW_REPUTATION_MEAN {
        REPUTATION_BONUS
    } else {
        0.0
    }
}

/// −0.05 when the pool is close to the target, +0.05 when far
fn proximity_adjustment(eligible: &[RankedAgent]) -> f64 {
    let Some(mean) = mean(eligible.iter().map(|r| r.distance_km)) else {
        return 0.0;
    };
    if mean < NEAR_MEAN_DISTANCE_KM {
        -PROXIMITY_BONUS
    } else if mean > FAR_MEAN_DISTANCE_KM {
        PROXIMITY_BONUS
    } else {
        0.0
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let mut sum = 0.0;
    let mut count = 0usize;
    for v in values {
        sum += v;
        count += 1;
    }
    (count > 0).then(|| sum / count as f64)
}
