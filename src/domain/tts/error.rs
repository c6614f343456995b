use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum TtsServiceError {
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error("text too long: {0}")]
    TooLong(String),
    #[error("upstream returned {status}: {message}")]
    Upstream { status: u16, message: String },
    #[error("upstream unavailable: {0}")]
    Unavailable(String),
    #[error("upstream timed out: {0}")]
    Timeout(String),
    #[error("upstream stream interrupted: {0}")]
    StreamInterrupted(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<reqwest::Error> for TtsServiceError {
    fn from(err: reqwest::Error) -> Self {
        let is_timeout = err.is_timeout();
        let message = err.without_url().to_string();
        if is_timeout {
            TtsServiceError::Timeout(message)
        } else {
            TtsServiceError::Unavailable(message)
        }
    }
}

impl From<TtsServiceError> for AppError {
    fn from(err: TtsServiceError) -> Self {
        match err {
            TtsServiceError::Invalid(msg) => AppError::BadRequest(msg),
            TtsServiceError::TooLong(msg) => AppError::PayloadTooLarge(msg),
            TtsServiceError::Upstream { status, message } => AppError::Upstream { status, message },
            TtsServiceError::Unavailable(msg) | TtsServiceError::StreamInterrupted(msg) => {
                AppError::BadGateway(msg)
            }
            TtsServiceError::Timeout(msg) => AppError::GatewayTimeout(msg),
            TtsServiceError::Other(e) => AppError::Internal(e.to_string()),
        }
    }
}
