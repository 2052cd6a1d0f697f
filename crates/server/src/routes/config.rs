//! Single-tenant routes: the snapshot is served from the root and managed
//! through `/__config__`.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{Method, StatusCode},
    response::Response,
};
use common::types::StatusResponse;
use service::storage::UpdateKind;

use crate::errors::JsonApiError;
use crate::routes::mocks::{endpoint_options, endpoint_path, respond_with};
use crate::routes::pretty_json;
use crate::state::AppState;

/// Current snapshot.
pub async fn show(State(state): State<AppState>) -> Result<Response, JsonApiError> {
    let mock = state.mocks.get_mock("").await?;
    Ok(pretty_json(StatusCode::OK, &*mock))
}

pub async fn replace(State(state): State<AppState>, body: Bytes) -> Result<Response, JsonApiError> {
    update(&state, &body, UpdateKind::Replace).await
}

pub async fn merge(State(state): State<AppState>, body: Bytes) -> Result<Response, JsonApiError> {
    update(&state, &body, UpdateKind::Merge).await
}

pub async fn clear(State(state): State<AppState>) -> Result<Response, JsonApiError> {
    update(&state, &[], UpdateKind::Clear).await
}

// Replies once memory is updated; the file write happens in the background.
async fn update(state: &AppState, body: &[u8], kind: UpdateKind) -> Result<Response, JsonApiError> {
    state.mocks.update_mock(body, kind).await?;
    Ok(pretty_json(StatusCode::OK, &StatusResponse::ok()))
}

pub async fn options_root(State(state): State<AppState>) -> Result<Response, JsonApiError> {
    endpoint_options(&state, "", "/").await
}

pub async fn options(
    State(state): State<AppState>,
    Path(endpoint): Path<String>,
) -> Result<Response, JsonApiError> {
    endpoint_options(&state, "", &endpoint_path(&endpoint)).await
}

pub async fn respond_root(State(state): State<AppState>, method: Method) -> Result<Response, JsonApiError> {
    respond_with(&state, "", "/", &method).await
}

pub async fn respond(
    State(state): State<AppState>,
    Path(endpoint): Path<String>,
    method: Method,
) -> Result<Response, JsonApiError> {
    respond_with(&state, "", &endpoint_path(&endpoint), &method).await
}
