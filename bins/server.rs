use dotenvy::dotenv;
use tracing::{error, info};
use uuid::Uuid;

fn init_logging(format: &str) {
    // 提前加载 .env，使得 RUST_LOG 等环境变量生效
    dotenv().ok();
    common::utils::logging::init_logging(format);
    info!(service = "mock_server", event = "logger_init", "tracing subscriber initialized");
}

fn main() -> std::process::ExitCode {
    dotenv().ok();
    let cfg = configs::AppConfig::load_and_validate();
    let log_format = cfg
        .as_ref()
        .map(|c| c.server.log_format.clone())
        .unwrap_or_else(|_| "compact".to_string());
    init_logging(&log_format);

    let cfg = match cfg {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(service = "mock_server", event = "config_invalid", error = %e, "failed to load configuration");
            return std::process::ExitCode::FAILURE;
        }
    };

    // 基础服务上下文（不含敏感信息）
    let service_id = Uuid::new_v4();
    let pid = std::process::id();
    let version = env!("CARGO_PKG_VERSION");

    // Panic 钩子：捕获异常并输出错误日志，便于排查问题
    std::panic::set_hook(Box::new({
        let service_id = service_id;
        move |info| {
            error!(
                service = "mock_server",
                event = "panic",
                %service_id,
                pid,
                message = %info,
                "unhandled panic occurred"
            );
        }
    }));

    let worker_threads = cfg.server.worker_threads;
    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(w) = worker_threads { builder.worker_threads(w); }

    let rt = match builder.build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(service = "mock_server", event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return std::process::ExitCode::FAILURE;
        }
    };

    info!(
        service = "mock_server",
        event = "start",
        %service_id,
        pid,
        version,
        backend = ?cfg.storage.backend,
        threads = worker_threads.unwrap_or_default(),
        "mock server starting"
    );

    // server::run 内部处理 Ctrl+C 并在退出前关闭存储
    rt.block_on(async move {
        match server::run(cfg).await {
            Ok(()) => {
                info!(service = "mock_server", event = "stop", %service_id, pid, "mock server stopped normally");
                std::process::ExitCode::SUCCESS
            }
            Err(e) => {
                error!(service = "mock_server", event = "run_failed", error = %e, "server::run returned error");
                std::process::ExitCode::FAILURE
            }
        }
    })
}
