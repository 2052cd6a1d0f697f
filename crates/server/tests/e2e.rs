use std::net::SocketAddr;
use std::path::PathBuf;

use configs::{AppConfig, BackendKind};
use reqwest::StatusCode as HttpStatusCode;
use serde_json::{json, Value};
use service::mocks::MockService;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use uuid::Uuid;

use server::startup::build_app;

struct TestApp {
    base_url: String,
    mocks: MockService,
    stop: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl TestApp {
    /// Stop serving and close the backend, like the binary does on Ctrl+C.
    async fn shutdown(self) {
        let _ = self.stop.send(());
        let _ = self.task.await;
        self.mocks.close().await;
    }
}

async fn start_server(cfg: AppConfig) -> anyhow::Result<TestApp> {
    let (app, mocks) = build_app(&cfg).await?;
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    let (stop, stopped) = oneshot::channel::<()>();
    let task = tokio::spawn(async move {
        let shutdown = async move {
            let _ = stopped.await;
        };
        if let Err(e) = axum::serve(listener, app).with_graceful_shutdown(shutdown).await {
            eprintln!("server error: {}", e);
        }
    });

    Ok(TestApp { base_url, mocks, stop, task })
}

fn client() -> reqwest::Client {
    reqwest::Client::builder().build().expect("reqwest client")
}

async fn seed_file(seed: Value) -> anyhow::Result<PathBuf> {
    let dir = PathBuf::from(format!("target/test-data/{}", Uuid::new_v4()));
    tokio::fs::create_dir_all(&dir).await?;
    let path = dir.join("mock.json");
    tokio::fs::write(&path, serde_json::to_vec_pretty(&seed)?).await?;
    Ok(path)
}

#[tokio::test]
async fn e2e_public_health() -> anyhow::Result<()> {
    let app = start_server(AppConfig::default()).await?;
    let res = client().get(format!("{}/health", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["status"], "ok");
    app.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn e2e_register_then_resolve() -> anyhow::Result<()> {
    let app = start_server(AppConfig::default()).await?;
    let c = client();

    let submitted = json!({"deep": {"nested": [1, 2, {"three": 3.5}], "flag": false, "none": null}});
    let res = c
        .post(format!("{}/", app.base_url))
        .json(&json!({"orders": {"get": submitted}}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let created = res.json::<Value>().await?;
    let url = created["url"].as_str().unwrap_or_default().to_string();
    assert!(url.ends_with(created["id"].as_str().unwrap_or("missing")));

    let res = c.get(format!("{}/{}/orders", app.base_url, created["id"].as_str().unwrap_or_default())).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.json::<Value>().await?, submitted);

    app.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn e2e_static_updates_reach_the_file() -> anyhow::Result<()> {
    let path = seed_file(json!({"/a": {"GET": {"x": 1}}})).await?;
    let mut cfg = AppConfig::default();
    cfg.storage.backend = BackendKind::Static;
    cfg.storage.address = path.to_string_lossy().into_owned();
    let app = start_server(cfg).await?;
    let c = client();

    let res = c
        .patch(format!("{}/__config__", app.base_url))
        .json(&json!({"/b": {"POST": {"y": 2}}}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);

    // served from memory immediately
    let res = c.post(format!("{}/b", app.base_url)).send().await?;
    assert_eq!(res.json::<Value>().await?, json!({"y": 2}));

    app.shutdown().await;

    let on_disk: Value = serde_json::from_slice(&tokio::fs::read(&path).await?)?;
    assert_eq!(on_disk, json!({"/a": {"GET": {"x": 1}}, "/b": {"POST": {"y": 2}}}));

    if let Some(dir) = path.parent() {
        let _ = tokio::fs::remove_dir_all(dir).await;
    }
    Ok(())
}
