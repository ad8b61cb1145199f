use thiserror::Error;

use nurture_core::error::NurtureError;

/// Errors from the generation workflow.
///
/// Retrieval misses are not errors; the retrieve stage maps both an empty
/// result and a service failure to empty brochure context. A `Retrieval`
/// variant still exists so client implementations can report transport
/// failures to their callers and tests.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("retrieval error: {0}")]
    Retrieval(String),

    /// Upstream generation failure: timeout, quota, malformed response.
    #[error("completion error: {0}")]
    Completion(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl From<WorkflowError> for NurtureError {
    fn from(err: WorkflowError) -> Self {
        match err {
            WorkflowError::Retrieval(msg) => NurtureError::Retrieval(msg),
            WorkflowError::Completion(msg) => NurtureError::Completion(msg),
            WorkflowError::InvalidInput(msg) => NurtureError::Workflow(msg),
        }
    }
}
