use thiserror::Error;

use models::booking::BookingStatus;

/// Business errors for booking workflows
#[derive(Debug, Error)]
pub enum BookingError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("cannot transition from {} to {}", from.as_str(), to.as_str())]
    InvalidTransition { from: BookingStatus, to: BookingStatus },
    #[error("repository error: {0}")]
    Repository(String),
}
