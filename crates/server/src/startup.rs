use std::{future::Future, net::SocketAddr, sync::Arc};

use axum::Router;
use common::{admin_http, observability};
use configs::{AppConfig, BackendKind, StorageConfig};
use service::mocks::MockService;
use service::storage::{ephemeral::EphemeralStore, static_store::StaticStore, MockStore};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::errors::StartupError;
use crate::routes;
use crate::state::AppState;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Construct the configured backend. A static seed that cannot be loaded is fatal.
pub async fn build_store(storage: &StorageConfig) -> Result<Arc<dyn MockStore>, StartupError> {
    storage.validate().map_err(|e| StartupError::InvalidConfig(e.to_string()))?;
    let store: Arc<dyn MockStore> = match storage.backend {
        BackendKind::Ephemeral => {
            if !storage.address.is_empty() {
                // 内存实现，不连接外部地址，仅记录
                info!(address = %storage.address, "ephemeral backend runs in-process; address ignored");
            }
            Arc::new(EphemeralStore::new(storage.retention()))
        }
        BackendKind::Static => StaticStore::open(&storage.address).await?,
    };
    Ok(store)
}

/// Build the full application for a validated config.
pub async fn build_app(cfg: &AppConfig) -> Result<(Router, MockService), StartupError> {
    let store = build_store(&cfg.storage).await?;
    let mocks = MockService::new(store);
    let state = AppState::new(mocks.clone(), cfg.server.http_prefix.clone());
    let app = routes::build_router(state, cfg.storage.backend, build_cors());
    Ok((app, mocks))
}

async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for Ctrl+C; serving until killed");
        std::future::pending::<()>().await;
    }
    info!(event = "shutdown_signal", "received Ctrl+C, shutting down");
}

/// Public entry: serve until Ctrl+C.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    run_with_shutdown(cfg, ctrl_c()).await
}

/// Serve until `shutdown` resolves, then close the storage backend.
pub async fn run_with_shutdown<F>(mut cfg: AppConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    cfg.normalize_and_validate()
        .map_err(|e| StartupError::InvalidConfig(e.to_string()))?;

    let (app, mocks) = build_app(&cfg).await?;

    if let Some(admin_addr) = &cfg.server.admin_addr {
        admin_http::spawn_admin_server(admin_addr, observability::encode_metrics).await?;
    }

    let addr: SocketAddr = cfg.server.bind_addr().parse()?;
    let listener = TcpListener::bind(addr).await?;
    info!(
        %addr,
        backend = mocks.backend(),
        prefix = %cfg.server.http_prefix,
        "starting mock server"
    );
    axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;

    // 停机后关闭存储，静态模式下会等待最后一次快照写入
    mocks.close().await;
    info!(event = "storage_closed", backend = mocks.backend(), "storage backend closed");
    Ok(())
}
