use thiserror::Error;

use nurture_core::error::NurtureError;

/// Errors from outbound notification delivery.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("delivery failed: {0}")]
    Delivery(String),

    #[error("transport error: {0}")]
    Http(String),
}

impl From<reqwest::Error> for NotifyError {
    fn from(err: reqwest::Error) -> Self {
        NotifyError::Http(err.to_string())
    }
}

impl From<NotifyError> for NurtureError {
    fn from(err: NotifyError) -> Self {
        NurtureError::Notification(err.to_string())
    }
}
