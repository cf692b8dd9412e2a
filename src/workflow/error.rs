use thiserror::Error;

use crate::{source::error::SelectionError, workflow::workflow_model::WorkflowPhase};

#[derive(Debug, Error)]
pub enum WorkflowError {
    /// Source selector rejected the input; state is unchanged
    #[error(transparent)]
    Validation(#[from] SelectionError),

    /// `analyze` was triggered without a current selection
    #[error("No image selected: please upload an image or provide a URL")]
    NothingToAnalyze,

    /// Operation not reachable from the current phase
    #[error("cannot {operation} while {phase:?}")]
    InvalidTransition {
        operation: &'static str,
        phase: WorkflowPhase,
    },

    /// Caller cancelled an in-flight analysis
    #[error("analysis cancelled")]
    Cancelled,
}
