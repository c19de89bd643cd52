//! Audit log — the system's cross-agent observability record.
//!
//! An explicit, injected service rather than process-wide state: every agent
//! receives a handle through its `ActionContext` and appends each turn as it
//! happens, at every delegation depth, in call order. The log is append-only
//! and never pruned, so it is the one place an operator can reconstruct what
//! every agent said and did during a session.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Mutex;

use crate::turn::{ToolCallRequest, Turn};

/// One timestamped entry in the audit log.
#[derive(Debug, Clone, Serialize)]
pub struct AuditEntry {
    /// Which agent's session produced this entry
    pub agent: String,

    /// "user" or "assistant", mirroring the recorded turn
    pub role: crate::turn::Role,

    pub content: String,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCallRequest>,

    pub time: DateTime<Utc>,
}

/// Append-only, unbounded audit log, safe to share across delegation depths.
///
/// Concurrent appends are the only synchronization requirement, so a plain
/// mutex around the vector suffices.
#[derive(Debug, Default)]
pub struct AuditLog {
    entries: Mutex<Vec<AuditEntry>>,
}

impl AuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a turn for the named agent.
    pub fn append(&self, agent: &str, turn: &Turn) {
        let entry = AuditEntry {
            agent: agent.to_string(),
            role: turn.role,
            content: turn.content.clone(),
            tool_calls: turn.tool_calls.clone(),
            time: Utc::now(),
        };
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.push(entry);
    }

    /// A point-in-time copy of every entry, in call order.
    pub fn snapshot(&self) -> Vec<AuditEntry> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Entries recorded by one agent.
    pub fn for_agent(&self, agent: &str) -> Vec<AuditEntry> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|e| e.agent == agent)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
