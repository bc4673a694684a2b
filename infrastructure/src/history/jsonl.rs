//! JSONL audit log for decisions and disputes
//!
//! Each record is serialized as a single JSON line with a `type` field and
//! an RFC 3339 `timestamp`, appended via a buffered writer. The file is the
//! durable audit trail; reads are served from an in-memory mirror.

use super::in_memory::InMemorySessionHistory;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use swarm_application::SessionHistory;
use swarm_domain::{ConsensusDecision, DisputeRecord};
use tracing::warn;

/// Session history that mirrors every append to a JSONL file
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Flushes after every record and
/// on `Drop`; a crashed process loses at most the record being written.
pub struct JsonlSessionHistory {
    memory: InMemorySessionHistory,
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlSessionHistory {
    /// Open the audit log, appending to an existing file
    ///
    /// Creates the file and parent directories if they don't exist.
    /// Returns `None` if the file cannot be opened.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!(
                "Could not create audit log directory {}: {}",
                parent.display(),
                e
            );
            return None;
        }

        let file = match OpenOptions::new().create(true).append(true).open(path) {
            Ok(f) => f,
            Err(e) => {
                warn!("Could not open audit log file {}: {}", path.display(), e);
                return None;
            }
        };

        Some(Self {
            memory: InMemorySessionHistory::new(),
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    /// Path of the audit log file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&self, record_type: &str, payload: serde_json::Value) {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

        let record = if let serde_json::Value::Object(mut map) = payload {
            map.insert(
                "type".to_string(),
                serde_json::Value::String(record_type.to_string()),
            );
            map.insert(
                "timestamp".to_string(),
                serde_json::Value::String(timestamp),
            );
            serde_json::Value::Object(map)
        } else {
            serde_json::json!({
                "type": record_type,
                "timestamp": timestamp,
                "data": payload,
            })
        };

        let Ok(line) = serde_json::to_string(&record) else {
            return;
        };

        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", line);
            let _ = writer.flush();
        }
    }
}

impl SessionHistory for JsonlSessionHistory {
    fn record_decision(&self, decision: ConsensusDecision) {
        match serde_json::to_value(&decision) {
            Ok(payload) => self.append("decision", payload),
            Err(e) => warn!("Could not serialize decision: {}", e),
        }
        self.memory.record_decision(decision);
    }

    fn record_dispute(&self, record: DisputeRecord) {
        match serde_json::to_value(&record) {
            Ok(payload) => self.append("dispute", payload),
            Err(e) => warn!("Could not serialize dispute: {}", e),
        }
        self.memory.record_dispute(record);
    }

    fn decisions(&self) -> Vec<ConsensusDecision> {
        self.memory.decisions()
    }

    fn disputes(&self) -> Vec<DisputeRecord> {
        self.memory.disputes()
    }
}

impl Drop for JsonlSessionHistory {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}

/// Replay an audit log into an in-memory history
///
/// Lines that fail to parse are skipped with a warning so a truncated tail
/// never prevents reporting on the rest of the session.
pub fn replay(path: impl AsRef<Path>) -> std::io::Result<InMemorySessionHistory> {
    let content = std::fs::read_to_string(path)?;
    let history = InMemorySessionHistory::new();

    for (number, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let value: serde_json::Value = match serde_json::from_str(line) {
            Ok(v) => v,
            Err(e) => {
                warn!("Skipping malformed audit log line {}: {}", number + 1, e);
                continue;
            }
        };
        match value.get("type").and_then(|t| t.as_str()) {
            Some("decision") => match serde_json::from_value::<ConsensusDecision>(value) {
                Ok(decision) => history.record_decision(decision),
                Err(e) => warn!("Skipping unreadable decision at line {}: {}", number + 1, e),
            },
            Some("dispute") => match serde_json::from_value::<DisputeRecord>(value) {
                Ok(record) => history.record_dispute(record),
                Err(e) => warn!("Skipping unreadable dispute at line {}: {}", number + 1, e),
            },
            other => {
                warn!(
                    "Skipping audit log line {} with unknown type {:?}",
                    number + 1,
                    other
                );
            }
        }
    }
    Ok(history)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::io::Read;
    use swarm_domain::{LandClass, ParcelId, QualitySummary};

    fn decision(parcel: &str) -> ConsensusDecision {
        ConsensusDecision {
            parcel_id: ParcelId::new(parcel),
            winning_class: LandClass::Water,
            consensus_confidence: 0.88,
            participants: vec!["drone-01".into()],
            vote_counts: BTreeMap::from([(LandClass::Water, 1)]),
            weighted_distribution: BTreeMap::from([(LandClass::Water, 1.0)]),
            decision_certainty: 0.88,
            disputed: false,
            dispute_reason: None,
            timestamp_ms: 1_700_000_000_000,
            round_duration_ms: 420,
            quality: QualitySummary {
                mean_confidence: 0.88,
                mean_quality: 0.8,
                discarded_votes: 0,
            },
        }
    }

    #[test]
    fn test_writes_one_json_line_per_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.jsonl");
        let history = JsonlSessionHistory::new(&path).unwrap();

        history.record_decision(decision("p-1"));
        history.record_decision(decision("p-2"));
        drop(history);

        let mut content = String::new();
        File::open(&path)
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();

        let lines: Vec<&str> = content.trim().lines().collect();
        assert_eq!(lines.len(), 2);
        for line in &lines {
            let value: serde_json::Value = serde_json::from_str(line).unwrap();
            assert_eq!(value["type"], "decision");
            assert!(value.get("timestamp").is_some());
            assert_eq!(value["winning_class"], "water");
        }
    }

    #[test]
    fn test_reads_come_from_the_memory_mirror() {
        let dir = tempfile::tempdir().unwrap();
        let history = JsonlSessionHistory::new(dir.path().join("s.jsonl")).unwrap();

        history.record_decision(decision("p-1"));
        assert_eq!(history.decisions().len(), 1);
        assert!(history.disputes().is_empty());
    }

    #[test]
    fn test_replay_restores_decisions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.jsonl");

        {
            let history = JsonlSessionHistory::new(&path).unwrap();
            history.record_decision(decision("p-1"));
            history.record_decision(decision("p-2"));
        }

        let restored = replay(&path).unwrap();
        let decisions = restored.decisions();
        assert_eq!(decisions.len(), 2);
        assert_eq!(decisions[0].parcel_id, ParcelId::new("p-1"));
        assert_eq!(decisions[0].winning_class, LandClass::Water);
    }

    #[test]
    fn test_replay_skips_malformed_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.jsonl");

        {
            let history = JsonlSessionHistory::new(&path).unwrap();
            history.record_decision(decision("p-1"));
        }
        let mut file = OpenOptions::new().append(true).open(&path).unwrap();
        writeln!(file, "{{ not json").unwrap();
        writeln!(file, "{{\"type\": \"mystery\"}}").unwrap();

        let restored = replay(&path).unwrap();
        assert_eq!(restored.decisions().len(), 1);
    }

    #[test]
    fn test_reopening_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.jsonl");

        {
            let history = JsonlSessionHistory::new(&path).unwrap();
            history.record_decision(decision("p-1"));
        }
        {
            let history = JsonlSessionHistory::new(&path).unwrap();
            history.record_decision(decision("p-2"));
        }

        let mut content = String::new();
        File::open(&path)
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content.trim().lines().count(), 2);
    }
}
