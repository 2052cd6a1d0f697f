//! Multi-tenant routes: register a mock set, then call it under `/{id}/...`.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
};
use common::types::StatusResponse;

use crate::errors::JsonApiError;
use crate::routes::pretty_json;
use crate::state::AppState;

const USAGE: &str = r#"Hi!
To create an endpoint, do a POST request to the current URL.
The request should contain JSON of the following format:
{
    "/": {
        "GET": {
            "some_key": "some_val"
        },
        "POST": {
            "some_key": {
                "some_other_key": "some_val"
            }
        }
    },
    "/other_endpoint": {
        "DELETE": {
            "key": "value"
        }
    }
}
The response contains the URL your endpoints are served under.
"#;

pub async fn usage() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/plain")], USAGE)
}

/// Register a mock set; the reply carries its id and base URL.
pub async fn create(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, JsonApiError> {
    let id = state.mocks.create_mock(&body).await?;
    let host = headers
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("localhost");
    let resp = StatusResponse {
        url: Some(format!("http://{host}{}/{id}", state.prefix)),
        id: Some(id),
        ..StatusResponse::ok()
    };
    Ok(pretty_json(StatusCode::OK, &resp))
}

pub async fn root_options() -> Response {
    allow_response("OPTIONS,GET,POST")
}

pub async fn options_root(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, JsonApiError> {
    endpoint_options(&state, &id, "/").await
}

pub async fn options(
    State(state): State<AppState>,
    Path((id, endpoint)): Path<(String, String)>,
) -> Result<Response, JsonApiError> {
    endpoint_options(&state, &id, &endpoint_path(&endpoint)).await
}

pub async fn respond_root(
    State(state): State<AppState>,
    Path(id): Path<String>,
    method: Method,
) -> Result<Response, JsonApiError> {
    respond_with(&state, &id, "/", &method).await
}

pub async fn respond(
    State(state): State<AppState>,
    Path((id, endpoint)): Path<(String, String)>,
    method: Method,
) -> Result<Response, JsonApiError> {
    respond_with(&state, &id, &endpoint_path(&endpoint), &method).await
}

/// Wildcard capture -> stored path key; `users/` resolves like `users`.
pub(crate) fn endpoint_path(capture: &str) -> String {
    format!("/{}", capture.trim_matches('/'))
}

pub(crate) async fn respond_with(
    state: &AppState,
    id: &str,
    path: &str,
    method: &Method,
) -> Result<Response, JsonApiError> {
    let body = state.mocks.respond(id, path, method.as_str()).await?;
    Ok(pretty_json(StatusCode::OK, &body))
}

pub(crate) async fn endpoint_options(
    state: &AppState,
    id: &str,
    path: &str,
) -> Result<Response, JsonApiError> {
    let endpoint = state.mocks.resolve_endpoint(id, path).await?;
    Ok(allow_response(&endpoint.allow_header()))
}

pub(crate) fn allow_response(methods: &str) -> Response {
    match HeaderValue::from_str(methods) {
        Ok(value) => (
            StatusCode::OK,
            [(header::ALLOW, value.clone()), (header::ACCESS_CONTROL_ALLOW_METHODS, value)],
        )
            .into_response(),
        Err(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}
