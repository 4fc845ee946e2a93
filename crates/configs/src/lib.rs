use std::path::PathBuf;

use anyhow::{anyhow, Result};
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
    /// Largest accepted request body; posts carry images inline as base64.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            worker_threads: Some(4),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,
    #[serde(default = "default_upload_dir")]
    pub upload_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { data_file: default_data_file(), upload_dir: default_upload_dir() }
    }
}

fn default_host() -> String { "127.0.0.1".into() }
fn default_port() -> u16 { 5001 }
fn default_max_body_bytes() -> usize { 32 * 1024 * 1024 }
fn default_data_file() -> PathBuf { PathBuf::from("posts.json") }
fn default_upload_dir() -> PathBuf { PathBuf::from("uploads") }

fn config_path() -> String {
    std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string())
}

/// Read `path`; only a missing file falls back to [`AppConfig::from_env`].
pub fn load_or_env(path: &str) -> Result<AppConfig> {
    match std::fs::read_to_string(path) {
        Ok(content) => from_toml_str(&content).map_err(|e| anyhow!("{path}: {e}")),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(AppConfig::from_env()),
        Err(e) => Err(anyhow!("cannot read {path}: {e}")),
    }
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    from_toml_str(&content)
}

pub fn from_toml_str(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Load `config.toml` (or `CONFIG_PATH`), falling back to environment variables
    /// when the file is absent, then normalize.
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_or_env(&config_path())?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Build a config from `SERVER_HOST`, `SERVER_PORT`, `TOKIO_WORKER_THREADS`,
    /// `MAX_BODY_BYTES`, `DATA_FILE` and `UPLOAD_DIR`, with defaults for anything unset.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Ok(host) = std::env::var("SERVER_HOST") {
            cfg.server.host = host;
        }
        if let Some(port) = std::env::var("SERVER_PORT").ok().and_then(|p| p.parse::<u16>().ok()) {
            cfg.server.port = port;
        }
        if let Some(w) = std::env::var("TOKIO_WORKER_THREADS").ok().and_then(|v| v.parse::<usize>().ok()) {
            cfg.server.worker_threads = Some(w);
        }
        if let Some(n) = std::env::var("MAX_BODY_BYTES").ok().and_then(|v| v.parse::<usize>().ok()) {
            cfg.server.max_body_bytes = n;
        }
        if let Ok(path) = std::env::var("DATA_FILE") {
            cfg.storage.data_file = PathBuf::from(path);
        }
        if let Ok(dir) = std::env::var("UPLOAD_DIR") {
            cfg.storage.upload_dir = PathBuf::from(dir);
        }
        cfg
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.storage.validate()?;
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
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
        match self.worker_threads {
            Some(0) | None => self.worker_threads = Some(4),
            Some(_) => {}
        }
        if self.max_body_bytes == 0 {
            self.max_body_bytes = default_max_body_bytes();
        }
        Ok(())
    }
}

impl StorageConfig {
    pub fn validate(&self) -> Result<()> {
        if self.data_file.as_os_str().is_empty() {
            return Err(anyhow!("storage.data_file is empty"));
        }
        if self.upload_dir.as_os_str().is_empty() {
            return Err(anyhow!("storage.upload_dir is empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_uses_defaults() {
        let mut cfg = from_toml_str("").unwrap();
        cfg.normalize_and_validate().unwrap();
        assert_eq!(cfg.server.port, 5001);
        assert_eq!(cfg.server.worker_threads, Some(4));
        assert_eq!(cfg.storage.data_file, PathBuf::from("posts.json"));
        assert_eq!(cfg.storage.upload_dir, PathBuf::from("uploads"));
    }

    #[test]
    fn sections_override_defaults() {
        let cfg = from_toml_str(
            r#"
            [server]
            host = "0.0.0.0"
            port = 9000

            [storage]
            data_file = "data/posts.json"
            upload_dir = "data/uploads"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.bind_addr(), "0.0.0.0:9000");
        assert_eq!(cfg.storage.data_file, PathBuf::from("data/posts.json"));
        assert_eq!(cfg.storage.upload_dir, PathBuf::from("data/uploads"));
    }

    #[test]
    fn rejects_zero_port_and_blank_paths() {
        let mut cfg = from_toml_str("[server]\nport = 0\n").unwrap();
        assert!(cfg.normalize_and_validate().is_err());

        let mut cfg = from_toml_str("[storage]\nupload_dir = \"\"\n").unwrap();
        assert!(cfg.normalize_and_validate().is_err());
    }

    #[test]
    fn blank_host_and_zero_workers_are_normalized() {
        let mut cfg = from_toml_str("[server]\nhost = \" \"\nworker_threads = 0\n").unwrap();
        cfg.normalize_and_validate().unwrap();
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.worker_threads, Some(4));
    }

    #[test]
    fn missing_file_is_an_error() {
        let path = std::env::temp_dir().join(format!("postboard_cfg_{}.toml", uuid::Uuid::new_v4()));
        assert!(load_from_file(path.to_str().unwrap()).is_err());
    }

    #[test]
    fn missing_file_falls_back_to_env_defaults() {
        let path = std::env::temp_dir().join(format!("postboard_cfg_{}.toml", uuid::Uuid::new_v4()));
        assert!(load_or_env(path.to_str().unwrap()).is_ok());
    }

    #[test]
    fn malformed_file_is_not_replaced_by_defaults() {
        let path = std::env::temp_dir().join(format!("postboard_cfg_{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(&path, "[server]\nport = \"not-a-number\"\n").unwrap();
        let res = load_or_env(path.to_str().unwrap());
        let _ = std::fs::remove_file(&path);
        let err = res.expect_err("malformed config must fail");
        assert!(err.to_string().contains("postboard_cfg_"));
    }

    #[test]
    fn body_limit_defaults_and_overrides() {
        let mut cfg = from_toml_str("").unwrap();
        cfg.normalize_and_validate().unwrap();
        assert_eq!(cfg.server.max_body_bytes, 32 * 1024 * 1024);

        let mut cfg = from_toml_str("[server]\nmax_body_bytes = 1048576\n").unwrap();
        cfg.normalize_and_validate().unwrap();
        assert_eq!(cfg.server.max_body_bytes, 1024 * 1024);

        let mut cfg = from_toml_str("[server]\nmax_body_bytes = 0\n").unwrap();
        cfg.normalize_and_validate().unwrap();
        assert_eq!(cfg.server.max_body_bytes, 32 * 1024 * 1024);
    }
}
