use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::{source::source_model::SourceKind, workflow::workflow_model::WorkflowPhase};

/// One line of the workflow trace file.
#[derive(Debug, Serialize)]
pub struct TraceEvent {
    pub timestamp_ms: u128,
    pub step: u64,

    pub phase: WorkflowPhase,
    pub event: String,

    pub source: Option<String>,
    pub fingerprint: Option<String>,

    pub outcome: Option<String>,
    pub detail: Option<String>,
}

impl TraceEvent {
    pub fn now(step: u64, phase: WorkflowPhase, event: impl ToString) -> Self {
        Self {
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or_default(),
            step,
            phase,
            event: event.to_string(),
            source: None,
            fingerprint: None,
            outcome: None,
            detail: None,
        }
    }

    pub fn with_source(mut self, kind: SourceKind, fingerprint: impl Into<String>) -> Self {
        self.source = Some(kind.as_str().to_string());
        self.fingerprint = Some(fingerprint.into());
        self
    }

    pub fn with_outcome(mut self, outcome: impl ToString) -> Self {
        self.outcome = Some(outcome.to_string());
        self
    }

    pub fn with_detail(mut self, detail: impl ToString) -> Self {
        self.detail = Some(detail.to_string());
        self
    }
}
