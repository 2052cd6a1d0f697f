use axum::{
    handler::Handler,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, MethodRouter},
    Json, Router,
};
use common::types::Health;
use configs::BackendKind;
use serde::Serialize;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{error, Level};

use crate::state::AppState;

pub mod config;
pub mod mocks;

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Serialize `value` as pretty-printed JSON with the given status.
pub fn pretty_json<T: Serialize>(status: StatusCode, value: &T) -> Response {
    match serde_json::to_vec_pretty(value) {
        Ok(body) => (status, [(header::CONTENT_TYPE, "application/json")], body).into_response(),
        Err(e) => {
            error!(error = %e, "response serialization failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Route the five mockable methods to one handler.
fn mock_methods<H, T>(handler: H) -> MethodRouter<AppState>
where
    H: Handler<T, AppState>,
    T: 'static,
{
    get(handler.clone())
        .post(handler.clone())
        .put(handler.clone())
        .patch(handler.clone())
        .delete(handler)
}

/// Both `{prefix}` and `{prefix}/` for a non-empty prefix, `/` otherwise.
fn root_paths(prefix: &str) -> Vec<String> {
    if prefix.is_empty() {
        vec!["/".to_string()]
    } else {
        vec![prefix.to_string(), format!("{prefix}/")]
    }
}

fn ephemeral_routes(prefix: &str) -> Router<AppState> {
    let mut router = Router::new().route("/health", get(health));
    for root in root_paths(prefix) {
        router = router.route(
            &root,
            get(mocks::usage).post(mocks::create).options(mocks::root_options),
        );
    }
    router
        .route(
            &format!("{prefix}/:id"),
            mock_methods(mocks::respond_root).options(mocks::options_root),
        )
        .route(
            &format!("{prefix}/:id/*endpoint"),
            mock_methods(mocks::respond).options(mocks::options),
        )
}

fn static_routes(prefix: &str) -> Router<AppState> {
    let mut router = Router::new().route(
        &format!("{prefix}/__config__"),
        get(config::show).put(config::replace).patch(config::merge).delete(config::clear),
    );
    for root in root_paths(prefix) {
        router = router.route(
            &root,
            mock_methods(config::respond_root).options(config::options_root),
        );
    }
    router.route(
        &format!("{prefix}/*endpoint"),
        mock_methods(config::respond).options(config::options),
    )
}

/// Build the application router for the selected backend.
pub fn build_router(state: AppState, backend: BackendKind, cors: CorsLayer) -> Router {
    let routes = match backend {
        BackendKind::Ephemeral => ephemeral_routes(&state.prefix),
        BackendKind::Static => static_routes(&state.prefix),
    };

    routes
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // 每次请求创建 span，包含方法和路径，日志级别为 INFO
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                // 失败（5xx）时以 ERROR 记录
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
