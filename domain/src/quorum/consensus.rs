//! Weighted consensus aggregation
//!
//! Reduces the surviving weighted votes of one round to a single
//! [`ConsensusDecision`]. Weight and probability accumulation uses
//! compensated (Kahan) summation with explicit renormalization so the
//! "distribution sums to 1.0" invariant holds even under many small votes.

use crate::agent::value_objects::{AgentId, ParcelId};
use crate::config::ConsensusConfig;
use crate::core::land::LandClass;
use crate::quorum::vote::WeightedVote;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Quality metrics summarizing the accepted votes of a round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualitySummary {
    /// Mean scalar confidence of accepted votes
    pub mean_confidence: f64,
    /// Mean image quality of accepted votes
    pub mean_quality: f64,
    /// Votes discarded by the quality filter (or lost to failures/timeout)
    pub discarded_votes: usize,
}

/// The immutable output of one consensus round
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsensusDecision {
    /// Parcel this decision covers
    pub parcel_id: ParcelId,
    /// Class with the greatest accumulated weight
    pub winning_class: LandClass,
    /// Weighted probability mass on the winning class
    pub consensus_confidence: f64,
    /// Agents whose votes survived into the tally
    pub participants: Vec<AgentId>,
    /// Raw vote counts per predicted class
    pub vote_counts: BTreeMap<LandClass, usize>,
    /// Normalized weighted probability distribution (sums to 1.0)
    pub weighted_distribution: BTreeMap<LandClass, f64>,
    /// Winning weight divided by total weight, in [0, 1]
    pub decision_certainty: f64,
    /// Whether the round is disputed
    pub disputed: bool,
    /// Human-readable dispute trigger, when disputed
    pub dispute_reason: Option<String>,
    /// Decision timestamp (milliseconds since epoch)
    pub timestamp_ms: u64,
    /// Wall-clock duration of the round, in milliseconds
    pub round_duration_ms: u64,
    /// Quality summary over the accepted votes
    pub quality: QualitySummary,
}

impl ConsensusDecision {
    /// Normalized weight margin between the two strongest classes
    ///
    /// With a single voted class the runner-up weight is zero, so a
    /// unanimous round never trips the margin trigger.
    pub fn top_two_margin(distribution: &BTreeMap<LandClass, f64>) -> f64 {
        let mut weights: Vec<f64> = distribution.values().copied().collect();
        weights.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));
        match weights.as_slice() {
            [] => 0.0,
            [only] => *only,
            [first, second, ..] => first - second,
        }
    }
}

/// Accumulator for the weighted votes of one round
#[derive(Debug, Default)]
pub struct WeightedTally {
    accepted: Vec<WeightedVote>,
    discarded: usize,
}

impl WeightedTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a quality-surviving vote
    pub fn push(&mut self, vote: WeightedVote) {
        self.accepted.push(vote);
    }

    /// Record a vote lost to the quality filter, a classifier failure,
    /// or the voting deadline
    pub fn record_discard(&mut self) {
        self.discarded += 1;
    }

    /// Number of accepted votes
    pub fn accepted_count(&self) -> usize {
        self.accepted.len()
    }

    /// The accepted weighted votes
    pub fn votes(&self) -> &[WeightedVote] {
        &self.accepted
    }

    /// Reduce the tally to a decision
    ///
    /// Returns `None` when no votes were accepted; callers enforce the
    /// quorum minimum before asking for a decision. Dispute is flagged
    /// whenever certainty falls below `consensus_threshold` or the
    /// normalized top-two weight margin falls below
    /// `dispute_margin_threshold`.
    pub fn decide(
        &self,
        parcel_id: ParcelId,
        config: &ConsensusConfig,
        round_duration_ms: u64,
    ) -> Option<ConsensusDecision> {
        if self.accepted.is_empty() {
            return None;
        }

        let total_weight = kahan_sum(self.accepted.iter().map(|wv| wv.weight));
        if total_weight <= 0.0 {
            return None;
        }

        // Per-class accumulated weight and raw counts
        let mut class_weights: BTreeMap<LandClass, Vec<f64>> = BTreeMap::new();
        let mut vote_counts: BTreeMap<LandClass, usize> = BTreeMap::new();
        for wv in &self.accepted {
            class_weights
                .entry(wv.vote.predicted)
                .or_default()
                .push(wv.weight);
            *vote_counts.entry(wv.vote.predicted).or_insert(0) += 1;
        }
        let class_weights: BTreeMap<LandClass, f64> = class_weights
            .into_iter()
            .map(|(class, weights)| (class, kahan_sum(weights.into_iter())))
            .collect();

        // Winner: greatest accumulated weight, ties broken by canonical
        // class order for determinism
        let (winning_class, winning_weight) = class_weights
            .iter()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(class, weight)| (*class, *weight))?;

        let decision_certainty = (winning_weight / total_weight).clamp(0.0, 1.0);

        let weighted_distribution = self.weighted_distribution(&class_weights, total_weight);
        let consensus_confidence = weighted_distribution
            .get(&winning_class)
            .copied()
            .unwrap_or(0.0);

        // Margin uses accumulated class weights, normalized by total weight
        let normalized_weights: BTreeMap<LandClass, f64> = class_weights
            .iter()
            .map(|(class, weight)| (*class, weight / total_weight))
            .collect();
        let margin = ConsensusDecision::top_two_margin(&normalized_weights);

        let mut reasons = Vec::new();
        if decision_certainty < config.consensus_threshold {
            reasons.push(format!(
                "certainty {:.3} below consensus threshold {:.2}",
                decision_certainty, config.consensus_threshold
            ));
        }
        if margin < config.dispute_margin_threshold {
            reasons.push(format!(
                "top-two margin {:.3} below dispute threshold {:.2}",
                margin, config.dispute_margin_threshold
            ));
        }
        let disputed = !reasons.is_empty();

        let accepted_count = self.accepted.len() as f64;
        let quality = QualitySummary {
            mean_confidence: kahan_sum(self.accepted.iter().map(|wv| wv.vote.confidence))
                / accepted_count,
            mean_quality: kahan_sum(self.accepted.iter().map(|wv| wv.vote.quality_score))
                / accepted_count,
            discarded_votes: self.discarded,
        };

        Some(ConsensusDecision {
            parcel_id,
            winning_class,
            consensus_confidence,
            participants: self
                .accepted
                .iter()
                .map(|wv| wv.vote.agent_id.clone())
                .collect(),
            vote_counts,
            weighted_distribution,
            decision_certainty,
            disputed,
            dispute_reason: disputed.then(|| reasons.join("; ")),
            timestamp_ms: crate::agent::entities::current_timestamp_ms(),
            round_duration_ms,
            quality,
        })
    }

    /// Weighted class-probability mass, explicitly renormalized to sum to 1
    ///
    /// Each vote's probability vector is scaled by its weight. Votes that
    /// carry no distribution fall back to full mass on their predicted
    /// class. When the aggregate mass degenerates to zero the accumulated
    /// class weights serve as the distribution instead.
    fn weighted_distribution(
        &self,
        class_weights: &BTreeMap<LandClass, f64>,
        total_weight: f64,
    ) -> BTreeMap<LandClass, f64> {
        let mut mass: BTreeMap<LandClass, Vec<f64>> = BTreeMap::new();
        for wv in &self.accepted {
            if wv.vote.class_probabilities.is_empty() {
                mass.entry(wv.vote.predicted).or_default().push(wv.weight);
                continue;
            }
            for (class, probability) in &wv.vote.class_probabilities {
                mass.entry(*class).or_default().push(wv.weight * probability);
            }
        }

        let summed: BTreeMap<LandClass, f64> = mass
            .into_iter()
            .map(|(class, parts)| (class, kahan_sum(parts.into_iter())))
            .collect();
        let mass_total = kahan_sum(summed.values().copied());

        if mass_total > 0.0 {
            summed
                .into_iter()
                .map(|(class, m)| (class, m / mass_total))
                .collect()
        } else {
            class_weights
                .iter()
                .map(|(class, weight)| (*class, weight / total_weight))
                .collect()
        }
    }
}

/// Compensated summation for numerically stable accumulation
fn kahan_sum(values: impl Iterator<Item = f64>) -> f64 {
    let mut sum = 0.0;
    let mut compensation = 0.0;
    for value in values {
        let y = value - compensation;
        let t = sum + y;
        compensation = (t - sum) - y;
        sum = t;
    }
    sum
}
