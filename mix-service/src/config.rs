use anyhow::Context;
use mix_client::api::DEFAULT_BASE_URL;
use serde::Deserialize;
use std::{fs, path::Path};

const CONFIG_ENV: &str = "MIX_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "mix-config.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    pub base_url: String,
    pub timeout_ms: u64,
    pub max_retries: u32,
    pub retry_backoff_ms: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: 10_000,
            max_retries: 2,
            retry_backoff_ms: 500,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    pub bind_addr: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    pub metrics: Option<MetricsConfig>,
}

impl AppConfig {
    /// Load from `$MIX_CONFIG`, or `mix-config.toml` when unset.
    ///
    /// A missing default file falls back to built-in defaults; an explicitly
    /// configured path must exist.
    pub fn load() -> anyhow::Result<Self> {
        use std::env;

        let (path, explicit) = match env::var(CONFIG_ENV) {
            Ok(path) => (path, true),
            Err(_) => (DEFAULT_CONFIG_PATH.to_string(), false),
        };

        if !explicit && !Path::new(&path).exists() {
            tracing::info!(path = %path, "config file not found, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path).with_context(|| format!("failed to read config {path}"))?;
        Self::from_toml(&contents).with_context(|| format!("invalid config {path}"))
    }

    pub fn from_toml(contents: &str) -> anyhow::Result<Self> {
        let cfg: AppConfig = toml::from_str(contents)?;
        Ok(cfg)
    }
}
