use anyhow::anyhow;
use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
    /// Path prefix every mock route is mounted under, e.g. `/mocks`.
    #[serde(default)]
    pub http_prefix: String,
    /// Optional `/healthz` + `/metrics` listener.
    #[serde(default)]
    pub admin_addr: Option<String>,
    /// `compact` (default) or `json`.
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            worker_threads: Some(4),
            http_prefix: String::new(),
            admin_addr: None,
            log_format: default_log_format(),
        }
    }
}

/// Which storage backend serves mocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Multi-tenant, records expire after `retention_secs`.
    #[default]
    Ephemeral,
    /// Single mock mirrored to the file at `address`.
    Static,
}

impl std::str::FromStr for BackendKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ephemeral" => Ok(BackendKind::Ephemeral),
            "static" => Ok(BackendKind::Static),
            other => Err(anyhow!("unknown storage.backend '{other}'; expected ephemeral or static")),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: BackendKind,
    #[serde(default)]
    pub address: String,
    #[serde(default = "default_retention")]
    pub retention_secs: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            address: String::new(),
            retention_secs: default_retention(),
        }
    }
}

fn default_host() -> String { "127.0.0.1".into() }
fn default_port() -> u16 { 8000 }
fn default_log_format() -> String { "compact".into() }
fn default_retention() -> u64 { 24 * 60 * 60 }

fn config_path() -> String {
    std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string())
}

pub fn load_default() -> Result<AppConfig> {
    load_from_file(&config_path())
}

fn is_missing_file(err: &anyhow::Error) -> bool {
    err.downcast_ref::<std::io::Error>()
        .is_some_and(|e| e.kind() == std::io::ErrorKind::NotFound)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    parse(&content)
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Load `config.toml` (or `$CONFIG_PATH`); without a file, build from env vars.
    /// A file that exists but fails to parse is an error.
    pub fn load_and_validate() -> Result<Self> {
        Self::load_from_path_or_env(&config_path())
    }

    fn load_from_path_or_env(path: &str) -> Result<Self> {
        let mut cfg = match load_from_file(path) {
            Ok(cfg) => cfg,
            Err(e) if is_missing_file(&e) => Self::from_env()?,
            Err(e) => return Err(e.context(format!("invalid config file {path}"))),
        };
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Fallback used when no config file is present.
    pub fn from_env() -> Result<Self> {
        let mut cfg = AppConfig::default();
        if let Ok(host) = std::env::var("SERVER_HOST") {
            cfg.server.host = host;
        }
        if let Some(port) = std::env::var("SERVER_PORT").ok().and_then(|p| p.parse::<u16>().ok()) {
            cfg.server.port = port;
        }
        if let Ok(prefix) = std::env::var("HTTP_PREFIX") {
            cfg.server.http_prefix = prefix;
        }
        if let Ok(backend) = std::env::var("STORAGE_BACKEND") {
            cfg.storage.backend = backend.parse()?;
        }
        if let Ok(address) = std::env::var("STORAGE_ADDRESS") {
            cfg.storage.address = address;
        }
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.storage.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = default_host();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be within 1..=65535"));
        }
        if let Some(w) = self.worker_threads {
            if w == 0 { self.worker_threads = Some(4); }
        } else {
            self.worker_threads = Some(4);
        }
        self.http_prefix = normalize_prefix(&self.http_prefix);
        if let Some(addr) = &self.admin_addr {
            if addr.trim().is_empty() { self.admin_addr = None; }
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// `"mocks/"` -> `"/mocks"`, `"/"` -> `""`.
pub fn normalize_prefix(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}

impl StorageConfig {
    pub fn validate(&self) -> Result<()> {
        if self.backend == BackendKind::Static && self.address.trim().is_empty() {
            return Err(anyhow!("storage.address must point to the mock file when backend = \"static\""));
        }
        if self.retention_secs == 0 {
            return Err(anyhow!("storage.retention_secs must be > 0"));
        }
        Ok(())
    }

    pub fn retention(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.retention_secs)
    }
}
