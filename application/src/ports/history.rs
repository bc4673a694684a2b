//! Session history port
//!
//! Process-wide, append-only logs of decisions and disputes. Appends must
//! be safe under concurrent rounds; no cross-record ordering is guaranteed
//! beyond arrival order per writer. Reads return snapshots.

use swarm_domain::{ConsensusDecision, DisputeRecord};

/// Append-only decision and dispute log
pub trait SessionHistory: Send + Sync {
    /// Append one round's decision
    fn record_decision(&self, decision: ConsensusDecision);

    /// Append one dispute record
    fn record_dispute(&self, record: DisputeRecord);

    /// Snapshot of all recorded decisions, in arrival order
    fn decisions(&self) -> Vec<ConsensusDecision>;

    /// Snapshot of all recorded disputes, in arrival order
    fn disputes(&self) -> Vec<DisputeRecord>;
}
