use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

/// One line of the session trace.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TraceEvent {
    pub timestamp_ms: u128,
    pub seq: u64,

    pub page_id: String,

    /// Action id or a short description of the UI event
    pub event: String,
    pub outcome: Option<String>,

    pub completed_step_count: usize,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_fingerprint: Option<String>,
}

impl TraceEvent {
    pub fn now(seq: u64, page_id: &str, event: impl ToString) -> Self {
        // A clock before the epoch only loses the timestamp, not the record.
        let timestamp_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);
        Self {
            timestamp_ms,
            seq,
            page_id: page_id.to_string(),
            event: event.to_string(),
            outcome: None,
            completed_step_count: 0,
            schema_fingerprint: None,
        }
    }

    pub fn with_outcome(mut self, outcome: impl ToString) -> Self {
        self.outcome = Some(outcome.to_string());
        self
    }

    pub fn with_progress(mut self, completed_step_count: usize) -> Self {
        self.completed_step_count = completed_step_count;
        self
    }

    pub fn with_fingerprint(mut self, fingerprint: &str) -> Self {
        self.schema_fingerprint = Some(fingerprint.to_string());
        self
    }
}
