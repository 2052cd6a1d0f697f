use models::NormalizeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("malformed input: {0}")]
    MalformedInput(String),
    #[error("invalid HTTP method: {0}")]
    InvalidMethod(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("not implemented: {0}")]
    NotImplemented(String),
    #[error("unsupported: {0}")]
    Unsupported(String),
    #[error("backend unavailable: {0}")]
    BackendUnavailable(String),
}

impl From<NormalizeError> for ServiceError {
    fn from(err: NormalizeError) -> Self {
        match err {
            NormalizeError::MalformedInput(msg) => Self::MalformedInput(msg),
            NormalizeError::InvalidMethod(method) => Self::InvalidMethod(method),
        }
    }
}
