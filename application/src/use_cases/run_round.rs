//! Run Round use case
//!
//! Orchestrates one full validation round: eligibility filtering, quorum
//! sizing, parallel vote collection bounded by the voting deadline, quality
//! filtering, weighted consensus, and dispute analysis.

use crate::ports::classifier::{Classification, ClassifierGateway, ParcelImagery};
use crate::ports::history::SessionHistory;
use crate::ports::progress::{NoProgress, RoundProgress};
use std::sync::Arc;
use std::time::Instant;
use swarm_domain::{
    Agent, AgentRegistry, ConsensusConfig, ConsensusDecision, DisputeRecord, DisputeThresholds,
    EligibilityConfig, GeoPoint, LandClass, ParcelId, QuorumPlan, RoundPhase, ValidationVote,
    WeightedTally, WeightedVote, eligible_agents,
};
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Errors that abort a validation round
///
/// Both variants mean no decision was produced; nothing is appended to the
/// session history. Callers may relax the eligibility bounds and retry.
#[derive(Error, Debug)]
pub enum RunRoundError {
    #[error("Only {eligible} eligible agents, quorum requires {required}")]
    InsufficientEligibleAgents { eligible: usize, required: usize },

    #[error("Only {accepted} votes survived, quorum requires {required}")]
    InsufficientQuorum { accepted: usize, required: usize },
}

/// Input for one validation round
#[derive(Debug, Clone)]
pub struct RunRoundInput {
    /// Parcel under validation
    pub parcel_id: ParcelId,
    /// Imagery the agents classify
    pub imagery: ParcelImagery,
    /// Parcel centroid, the reference for distance filtering
    pub target: GeoPoint,
    /// Expected land class, used to favor specialists during selection
    pub hint: Option<LandClass>,
}

impl RunRoundInput {
    pub fn new(parcel_id: impl Into<ParcelId>, imagery: ParcelImagery, target: GeoPoint) -> Self {
        Self {
            parcel_id: parcel_id.into(),
            imagery,
            target,
            hint: None,
        }
    }

    pub fn with_hint(mut self, hint: LandClass) -> Self {
        self.hint = Some(hint);
        self
    }
}

/// The product of a completed round
#[derive(Debug, Clone)]
pub struct RoundOutcome {
    /// The quorum sizing that governed the round
    pub plan: QuorumPlan,
    /// The consensus decision, possibly flagged as disputed
    pub decision: ConsensusDecision,
    /// Dispute analysis, present exactly when the decision is disputed
    pub dispute: Option<DisputeRecord>,
}

/// Use case for running one weighted consensus round
pub struct RunRoundUseCase<C: ClassifierGateway + 'static> {
    classifier: Arc<C>,
    registry: Arc<dyn AgentRegistry>,
    history: Arc<dyn SessionHistory>,
    consensus: ConsensusConfig,
    eligibility: EligibilityConfig,
    dispute: DisputeThresholds,
}

impl<C: ClassifierGateway + 'static> RunRoundUseCase<C> {
    pub fn new(
        classifier: Arc<C>,
        registry: Arc<dyn AgentRegistry>,
        history: Arc<dyn SessionHistory>,
    ) -> Self {
        Self {
            classifier,
            registry,
            history,
            consensus: ConsensusConfig::default(),
            eligibility: EligibilityConfig::default(),
            dispute: DisputeThresholds::default(),
        }
    }

    pub fn with_consensus_config(mut self, config: ConsensusConfig) -> Self {
        self.consensus = config;
        self
    }

    pub fn with_eligibility_config(mut self, config: EligibilityConfig) -> Self {
        self.eligibility = config;
        self
    }

    pub fn with_dispute_thresholds(mut self, thresholds: DisputeThresholds) -> Self {
        self.dispute = thresholds;
        self
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(&self, input: RunRoundInput) -> Result<RoundOutcome, RunRoundError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        input: RunRoundInput,
        progress: &dyn RoundProgress,
    ) -> Result<RoundOutcome, RunRoundError> {
        let started = Instant::now();
        info!("Starting validation round for parcel {}", input.parcel_id);

        // Phase 1: Eligibility and quorum sizing
        let plan = self.phase_eligibility(&input, progress).await?;

        // Phase 2: Parallel vote collection, bounded by the voting deadline
        let collected = self.phase_voting(&input, &plan, progress).await;

        // Phase 3: Quality filter and weighted tally
        let (tally, voters) = self.phase_aggregation(&input.parcel_id, collected, &plan, progress);

        // The quorum plan sizes participation; validity is floored by
        // min_participants after the quality filter
        if tally.accepted_count() < self.consensus.min_participants {
            warn!(
                "Round for parcel {} aborted: {} of {} required votes",
                input.parcel_id,
                tally.accepted_count(),
                self.consensus.min_participants
            );
            return Err(RunRoundError::InsufficientQuorum {
                accepted: tally.accepted_count(),
                required: self.consensus.min_participants,
            });
        }

        let round_duration_ms = started.elapsed().as_millis() as u64;
        let decision = tally
            .decide(input.parcel_id.clone(), &self.consensus, round_duration_ms)
            .ok_or(RunRoundError::InsufficientQuorum {
                accepted: 0,
                required: self.consensus.min_participants,
            })?;

        info!(
            "Parcel {} decided: {} (certainty {:.3}, {} votes, disputed: {})",
            decision.parcel_id,
            decision.winning_class,
            decision.decision_certainty,
            decision.participants.len(),
            decision.disputed
        );

        // Phase 4: Dispute analysis, only when the decision is contested
        let dispute = if decision.disputed {
            Some(self.phase_dispute(&decision, tally.votes(), &voters, progress))
        } else {
            None
        };

        self.history.record_decision(decision.clone());
        if let Some(record) = &dispute {
            self.history.record_dispute(record.clone());
        }

        Ok(RoundOutcome {
            plan,
            decision,
            dispute,
        })
    }

    /// Phase 1: Filter the registry snapshot and size the quorum
    async fn phase_eligibility(
        &self,
        input: &RunRoundInput,
        progress: &dyn RoundProgress,
    ) -> Result<QuorumPlan, RunRoundError> {
        info!("Phase 1: Eligibility");
        let agents = self.registry.snapshot().await;
        progress.on_phase_start(&RoundPhase::Eligibility, agents.len());

        let now_ms = swarm_domain::agent::entities::current_timestamp_ms();
        let eligible = eligible_agents(
            &agents,
            &input.target,
            input.hint,
            &self.eligibility,
            now_ms,
        );
        let plan = QuorumPlan::build(&eligible, &self.consensus);
        progress.on_phase_complete(&RoundPhase::Eligibility);

        debug!(
            "{} of {} agents eligible, quorum {} (ratio {:.2})",
            plan.eligible_count,
            agents.len(),
            plan.quorum_needed,
            plan.adjusted_ratio
        );

        if plan.eligible_count < self.consensus.min_participants {
            return Err(RunRoundError::InsufficientEligibleAgents {
                eligible: plan.eligible_count,
                required: self.consensus.min_participants,
            });
        }
        Ok(plan)
    }

    /// Phase 2: Query all selected agents in parallel
    ///
    /// The whole collection is bounded by `max_voting_time`; agents that
    /// have not answered when the deadline fires are aborted and counted
    /// as non-votes.
    async fn phase_voting(
        &self,
        input: &RunRoundInput,
        plan: &QuorumPlan,
        progress: &dyn RoundProgress,
    ) -> Vec<(Agent, Option<Classification>)> {
        info!("Phase 2: Voting ({} agents)", plan.participants.len());
        progress.on_phase_start(&RoundPhase::Voting, plan.participants.len());

        let mut join_set = JoinSet::new();
        for ranked in &plan.participants {
            let classifier = Arc::clone(&self.classifier);
            let agent = ranked.agent.clone();
            let imagery = input.imagery.clone();

            join_set.spawn(async move {
                let result = classifier.classify(&agent, &imagery).await;
                (agent, result)
            });
        }

        let mut collected = Vec::new();
        let deadline = tokio::time::sleep(self.consensus.max_voting_time);
        tokio::pin!(deadline);

        loop {
            tokio::select! {
                result = join_set.join_next() => {
                    match result {
                        None => break,
                        Some(Ok((agent, Ok(classification)))) => {
                            debug!("Agent {} voted {}", agent.id, classification.predicted);
                            progress.on_vote_resolved(&agent.id, true);
                            collected.push((agent, Some(classification)));
                        }
                        Some(Ok((agent, Err(e)))) => {
                            warn!("Agent {} failed to classify: {}", agent.id, e);
                            progress.on_vote_resolved(&agent.id, false);
                            collected.push((agent, None));
                        }
                        Some(Err(e)) => {
                            warn!("Vote task join error: {}", e);
                        }
                    }
                }
                _ = &mut deadline => {
                    let late = join_set.len();
                    warn!(
                        "Voting deadline reached for parcel {}, {} agents still pending",
                        input.parcel_id, late
                    );
                    join_set.abort_all();
                    break;
                }
            }
        }

        progress.on_phase_complete(&RoundPhase::Voting);
        collected
    }

    /// Phase 3: Weigh collected votes and discard the quality failures
    ///
    /// Returns the tally plus the agents whose votes survived, for the
    /// dispute statistics. Late agents never appear in `collected`; their
    /// absence surfaces as the gap between selected participants and
    /// resolved votes.
    fn phase_aggregation(
        &self,
        parcel_id: &ParcelId,
        collected: Vec<(Agent, Option<Classification>)>,
        plan: &QuorumPlan,
        progress: &dyn RoundProgress,
    ) -> (WeightedTally, Vec<Agent>) {
        info!("Phase 3: Aggregation");
        progress.on_phase_start(&RoundPhase::Aggregation, collected.len());

        let mut tally = WeightedTally::new();
        let mut voters = Vec::new();

        let lost_to_deadline = plan.participants.len().saturating_sub(collected.len());
        for _ in 0..lost_to_deadline {
            tally.record_discard();
        }

        for (agent, classification) in collected {
            let Some(classification) = classification else {
                tally.record_discard();
                continue;
            };
            let vote = Self::build_vote(&agent, parcel_id, classification);
            match WeightedVote::build(vote, &agent, &self.consensus) {
                Some(weighted) => {
                    tally.push(weighted);
                    voters.push(agent);
                }
                None => {
                    debug!("Agent {} vote discarded by quality filter", agent.id);
                    tally.record_discard();
                }
            }
        }

        progress.on_phase_complete(&RoundPhase::Aggregation);
        (tally, voters)
    }

    /// Phase 4: Analyze a disputed decision and select a remediation
    fn phase_dispute(
        &self,
        decision: &ConsensusDecision,
        votes: &[WeightedVote],
        voters: &[Agent],
        progress: &dyn RoundProgress,
    ) -> DisputeRecord {
        info!("Phase 4: Dispute review");
        progress.on_phase_start(&RoundPhase::DisputeReview, 1);

        let record = DisputeRecord::analyze(decision, votes, voters, &self.dispute);
        warn!(
            "Parcel {} disputed: strategy {} (priority {})",
            decision.parcel_id, record.strategy, record.priority
        );

        progress.on_phase_complete(&RoundPhase::DisputeReview);
        record
    }

    fn build_vote(
        agent: &Agent,
        parcel_id: &ParcelId,
        classification: Classification,
    ) -> ValidationVote {
        ValidationVote::new(
            agent.id.clone(),
            parcel_id.clone(),
            classification.predicted,
            classification.confidence,
        )
        .with_quality(classification.quality_score)
        .with_probabilities(classification.class_probabilities)
        .with_latency_ms(classification.latency_ms)
        .with_position(agent.position)
    }
}
