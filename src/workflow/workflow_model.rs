use std::time::Duration;

use serde::Serialize;

use crate::{
    client::client_model::AnalysisOutcome,
    progress::progress_model::ProgressConfig,
    source::source_model::{Preview, Selection},
};

/// Reference minimum time the analyzing phase stays on screen.
pub const MIN_VISIBLE_ANALYZING: Duration = Duration::from_millis(1500);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WorkflowPhase {
    Idle,
    Selected,
    Analyzing,
    Completed,
}

/// The single selection/result slot. Carrying the data inside each variant
/// makes "analyzing without a selection" unrepresentable.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowState {
    Idle,
    Selected {
        selection: Selection,
    },
    Analyzing {
        selection: Selection,
    },
    Completed {
        selection: Selection,
        outcome: AnalysisOutcome,
    },
}

impl WorkflowState {
    pub fn phase(&self) -> WorkflowPhase {
        match self {
            WorkflowState::Idle => WorkflowPhase::Idle,
            WorkflowState::Selected { .. } => WorkflowPhase::Selected,
            WorkflowState::Analyzing { .. } => WorkflowPhase::Analyzing,
            WorkflowState::Completed { .. } => WorkflowPhase::Completed,
        }
    }

    pub fn selection(&self) -> Option<&Selection> {
        match self {
            WorkflowState::Idle => None,
            WorkflowState::Selected { selection }
            | WorkflowState::Analyzing { selection }
            | WorkflowState::Completed { selection, .. } => Some(selection),
        }
    }

    pub fn preview(&self) -> Option<&Preview> {
        self.selection().map(|s| &s.preview)
    }

    pub fn outcome(&self) -> Option<&AnalysisOutcome> {
        match self {
            WorkflowState::Completed { outcome, .. } => Some(outcome),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowConfig {
    pub min_visible: Duration,
    pub progress: ProgressConfig,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            min_visible: MIN_VISIBLE_ANALYZING,
            progress: ProgressConfig::default(),
        }
    }
}

// ============================================================================
// Events for the presentation layer
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Destructive,
}

/// A toast-style message. Presentation decides how to show it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub severity: Severity,
    pub title: String,
    pub description: String,
}

impl Notification {
    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            severity: Severity::Destructive,
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            title: title.into(),
            description: description.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum WorkflowEvent {
    PhaseChanged {
        from: WorkflowPhase,
        to: WorkflowPhase,
    },
    Notice(Notification),
}
