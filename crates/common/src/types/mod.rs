use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug)]
pub struct Health {
    pub status: &'static str,
}

/// Body returned by mock registration and management requests.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct StatusResponse {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl StatusResponse {
    pub fn ok() -> Self {
        Self { status: status_line(StatusCode::OK), ..Self::default() }
    }

    pub fn error(code: StatusCode, detail: impl Into<String>) -> Self {
        Self { status: status_line(code), detail: Some(detail.into()), ..Self::default() }
    }
}

/// `"404 Not Found"` style status line.
pub fn status_line(code: StatusCode) -> String {
    format!("{} {}", code.as_u16(), code.canonical_reason().unwrap_or_default())
}
