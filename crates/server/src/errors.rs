use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use common::types::StatusResponse;
use service::errors::ServiceError;
use thiserror::Error;
use tracing::{error, warn};

use crate::routes::pretty_json;

/// Error body in the same `{"status", "detail"}` shape as successful management replies.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub body: StatusResponse,
}

impl JsonApiError {
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self { status, body: StatusResponse::error(status, detail) }
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(err: ServiceError) -> Self {
        let status = match &err {
            ServiceError::MalformedInput(_) | ServiceError::InvalidMethod(_) => StatusCode::BAD_REQUEST,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::NotImplemented(_) => StatusCode::NOT_IMPLEMENTED,
            ServiceError::Unsupported(_) => StatusCode::METHOD_NOT_ALLOWED,
            ServiceError::BackendUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        };
        if status.is_server_error() && status != StatusCode::NOT_IMPLEMENTED {
            error!(error = %err, "storage backend failure");
        } else if status == StatusCode::BAD_REQUEST {
            warn!(error = %err, "rejected mock submission");
        }
        Self::new(status, err.to_string())
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        pretty_json(self.status, &self.body)
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("storage backend failed to start: {0}")]
    Storage(#[from] ServiceError),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_errors_map_to_statuses() {
        let cases = [
            (ServiceError::MalformedInput("x".into()), StatusCode::BAD_REQUEST),
            (ServiceError::InvalidMethod("HEAD".into()), StatusCode::BAD_REQUEST),
            (ServiceError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (ServiceError::NotImplemented("x".into()), StatusCode::NOT_IMPLEMENTED),
            (ServiceError::Unsupported("x".into()), StatusCode::METHOD_NOT_ALLOWED),
            (ServiceError::BackendUnavailable("x".into()), StatusCode::SERVICE_UNAVAILABLE),
        ];
        for (err, expected) in cases {
            let api: JsonApiError = err.into();
            assert_eq!(api.status, expected);
            assert!(api.body.status.starts_with(&expected.as_u16().to_string()));
            assert!(api.body.detail.is_some());
        }
    }
}
