use thiserror::Error;

/// Failures raised while turning a raw submission into a `Mock`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    #[error("malformed input: {0}")]
    MalformedInput(String),
    #[error("invalid HTTP method: {0}")]
    InvalidMethod(String),
}
