//! Console output formatting and progress reporting

use swarm_application::{RoundOutcome, RoundProgress};
use swarm_domain::{AgentId, RoundPhase, SessionReport};

/// Prints phase transitions and vote arrivals to stderr
pub struct ConsoleProgress;

impl RoundProgress for ConsoleProgress {
    fn on_phase_start(&self, phase: &RoundPhase, total_tasks: usize) {
        eprintln!("[{}] starting ({} tasks)", phase, total_tasks);
    }

    fn on_vote_resolved(&self, agent_id: &AgentId, collected: bool) {
        if collected {
            eprintln!("  vote from {}", agent_id);
        } else {
            eprintln!("  no vote from {}", agent_id);
        }
    }

    fn on_phase_complete(&self, phase: &RoundPhase) {
        eprintln!("[{}] done", phase);
    }
}

/// Human-readable round summary
pub fn format_outcome(outcome: &RoundOutcome) -> String {
    let decision = &outcome.decision;
    let mut out = String::new();

    out.push_str(&format!("Parcel:     {}\n", decision.parcel_id));
    out.push_str(&format!(
        "Decision:   {} (certainty {:.3}, confidence {:.3})\n",
        decision.winning_class, decision.decision_certainty, decision.consensus_confidence
    ));
    out.push_str(&format!(
        "Quorum:     {} needed of {} eligible, {} votes counted, {} discarded\n",
        outcome.plan.quorum_needed,
        outcome.plan.eligible_count,
        decision.participants.len(),
        decision.quality.discarded_votes
    ));

    out.push_str("Votes:      ");
    let counts: Vec<String> = decision
        .vote_counts
        .iter()
        .map(|(class, count)| format!("{} x{}", class, count))
        .collect();
    out.push_str(&counts.join(", "));
    out.push('\n');

    out.push_str(&format!("Duration:   {} ms\n", decision.round_duration_ms));

    match &outcome.dispute {
        Some(record) => {
            out.push_str(&format!(
                "Disputed:   yes ({})\n",
                decision.dispute_reason.as_deref().unwrap_or("unknown")
            ));
            out.push_str(&format!(
                "Remedy:     {} (priority {}{})\n",
                record.strategy,
                record.priority,
                if record.human_review {
                    ", human review"
                } else {
                    ""
                }
            ));
        }
        None => out.push_str("Disputed:   no\n"),
    }

    out
}

/// Human-readable session report
pub fn format_report(report: &SessionReport) -> String {
    let mut out = String::new();

    out.push_str(&format!("Rounds:          {}\n", report.rounds));
    out.push_str(&format!(
        "Disputes:        {} ({:.1}%)\n",
        report.disputes,
        report.dispute_rate * 100.0
    ));
    out.push_str(&format!("Mean certainty:  {:.3}\n", report.mean_certainty));
    out.push_str(&format!("Mean confidence: {:.3}\n", report.mean_confidence));
    out.push_str(&format!(
        "Mean duration:   {:.0} ms\n",
        report.mean_duration_ms
    ));
    out.push_str(&format!("Grade:           {}\n", report.grade));

    if !report.decisions_by_class.is_empty() {
        out.push_str("Decisions:       ");
        let counts: Vec<String> = report
            .decisions_by_class
            .iter()
            .map(|(class, count)| format!("{} x{}", class, count))
            .collect();
        out.push_str(&counts.join(", "));
        out.push('\n');
    }

    if !report.participation.is_empty() {
        out.push_str("Participation:\n");
        for (agent_id, rounds) in &report.participation {
            out.push_str(&format!("  {:20} {} rounds\n", agent_id.to_string(), rounds));
        }
    }

    out
}
