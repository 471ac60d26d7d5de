// src/config/service.rs
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
    str::FromStr,
};

pub const ENV_CONFIG_PATH: &str = "EMOTION_CONFIG_PATH";
pub const DEFAULT_CONFIG_PATH: &str = "config/emotion.toml";

pub const DEFAULT_API_URL: &str =
    "https://sn-watson-emotion.labs.skills.network/v1/watson.runtime.nlp.v1/NlpService/EmotionPredict";
pub const DEFAULT_MODEL_ID: &str = "emotion_aggregated-workflow_lang_en_stock";

const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 4;
const DEFAULT_TIMEOUT_SECS: u64 = 10;

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    5000
}

/// Remote scoring endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmotionApiConfig {
    pub url: String,
    /// Sent as `grpc-metadata-mm-model-id`.
    pub model_id: String,
    pub connect_timeout_secs: u64,
    pub timeout_secs: u64,
}

impl Default for EmotionApiConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_API_URL.to_string(),
            model_id: DEFAULT_MODEL_ID.to_string(),
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    pub metrics_enabled: bool,
    pub emotion_api: EmotionApiConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            metrics_enabled: false,
            emotion_api: EmotionApiConfig::default(),
        }
    }
}

impl ServiceConfig {
    /// Load config using env var + fallbacks, then apply env overrides:
    /// 1) $EMOTION_CONFIG_PATH (must exist)
    /// 2) config/emotion.toml
    /// 3) built-in defaults
    pub fn load() -> Result<Self> {
        let mut cfg = match env::var(ENV_CONFIG_PATH) {
            Ok(p) => {
                let pb = PathBuf::from(p);
                if !pb.exists() {
                    return Err(anyhow!(
                        "{ENV_CONFIG_PATH} points to non-existent path {}",
                        pb.display()
                    ));
                }
                Self::load_from_file(&pb)?
            }
            Err(_) => {
                let default_p = Path::new(DEFAULT_CONFIG_PATH);
                if default_p.exists() {
                    Self::load_from_file(default_p)?
                } else {
                    Self::default()
                }
            }
        };
        cfg.apply_env_overrides()?;
        cfg.sanitize();
        Ok(cfg)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        Self::from_toml_str(&data).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        let mut cfg: ServiceConfig = toml::from_str(s)?;
        cfg.sanitize();
        Ok(cfg)
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Some(url) = env_string("EMOTION_API_URL") {
            self.emotion_api.url = url;
        }
        if let Some(model) = env_string("EMOTION_MODEL_ID") {
            self.emotion_api.model_id = model;
        }
        if let Some(secs) = env_parse("EMOTION_TIMEOUT_SECS")? {
            self.emotion_api.timeout_secs = secs;
        }
        if let Some(secs) = env_parse("EMOTION_CONNECT_TIMEOUT_SECS")? {
            self.emotion_api.connect_timeout_secs = secs;
        }
        if let Some(host) = env_string("HOST") {
            self.host = host;
        }
        if let Some(port) = env_parse("PORT")? {
            self.port = port;
        }
        if let Some(flag) = env_string("METRICS_ENABLED") {
            self.metrics_enabled = matches!(flag.to_ascii_lowercase().as_str(), "1" | "true");
        }
        Ok(())
    }

    /// Blank strings and zero timeouts fall back to defaults.
    fn sanitize(&mut self) {
        let api = &mut self.emotion_api;
        api.url = api.url.trim().to_string();
        if api.url.is_empty() {
            api.url = DEFAULT_API_URL.to_string();
        }
        api.model_id = api.model_id.trim().to_string();
        if api.model_id.is_empty() {
            api.model_id = DEFAULT_MODEL_ID.to_string();
        }
        if api.connect_timeout_secs == 0 {
            api.connect_timeout_secs = DEFAULT_CONNECT_TIMEOUT_SECS;
        }
        if api.timeout_secs == 0 {
            api.timeout_secs = DEFAULT_TIMEOUT_SECS;
        }
        if self.host.trim().is_empty() {
            self.host = default_host();
        }
    }

    /// `host:port` for the listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn env_string(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    env_string(key)
        .map(|v| v.parse::<T>().with_context(|| format!("invalid {key}={v}")))
        .transpose()
}
