//! Progress notification port
//!
//! Defines the interface for reporting progress during a validation round.

use swarm_domain::{AgentId, RoundPhase};

/// Callback for progress updates during a validation round
///
/// Implementations live at the outer layers and can display progress in
/// various ways (console, service telemetry, etc.)
pub trait RoundProgress: Send + Sync {
    /// Called when a round phase starts
    fn on_phase_start(&self, phase: &RoundPhase, total_tasks: usize);

    /// Called when one agent's vote resolves (collected or lost)
    fn on_vote_resolved(&self, agent_id: &AgentId, collected: bool);

    /// Called when a round phase completes
    fn on_phase_complete(&self, phase: &RoundPhase);
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl RoundProgress for NoProgress {
    fn on_phase_start(&self, _phase: &RoundPhase, _total_tasks: usize) {}
    fn on_vote_resolved(&self, _agent_id: &AgentId, _collected: bool) {}
    fn on_phase_complete(&self, _phase: &RoundPhase) {}
}
