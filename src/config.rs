use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_callback_path")]
    pub callback_path: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub hotlines: HotlineConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            callback_path: default_callback_path(),
            request_timeout_secs: default_request_timeout_secs(),
            max_body_bytes: default_max_body_bytes(),
            store: StoreConfig::default(),
            hotlines: HotlineConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Memory,
    Sqlite,
    Redis,
}

impl std::str::FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "sqlite" => Ok(Self::Sqlite),
            "redis" => Ok(Self::Redis),
            other => {
                anyhow::bail!("unknown store backend '{other}' (expected memory, sqlite or redis)")
            }
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    #[serde(default = "default_backend")]
    pub backend: StoreBackend,
    #[serde(default = "default_redis_url")]
    pub redis_url: String,
    /// Namespace prepended to redis keys (`prefix:sessionId`); empty = bare session id.
    #[serde(default)]
    pub key_prefix: String,
    #[serde(default = "default_sqlite_path")]
    pub sqlite_path: PathBuf,
    #[serde(default = "default_call_timeout_ms")]
    pub call_timeout_ms: u64,
    /// 0 disables expiry.
    #[serde(default)]
    pub session_ttl_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            redis_url: default_redis_url(),
            key_prefix: String::new(),
            sqlite_path: default_sqlite_path(),
            call_timeout_ms: default_call_timeout_ms(),
            session_ttl_secs: 0,
        }
    }
}

impl StoreConfig {
    pub fn call_timeout(&self) -> Duration {
        Duration::from_millis(self.call_timeout_ms)
    }

    pub fn session_ttl(&self) -> Option<Duration> {
        (self.session_ttl_secs > 0).then(|| Duration::from_secs(self.session_ttl_secs))
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct HotlineConfig {
    #[serde(default = "default_hotlines")]
    pub default: Vec<String>,
    /// County name (case-insensitive) to numbers.
    #[serde(default)]
    pub counties: HashMap<String, Vec<String>>,
}

impl Default for HotlineConfig {
    fn default() -> Self {
        Self {
            default: default_hotlines(),
            counties: HashMap::new(),
        }
    }
}

// Default functions
fn default_host() -> String {
    "127.0.0.1".into()
}
fn default_port() -> u16 {
    8080
}
fn default_callback_path() -> String {
    "/callbacks/ussd/screening".into()
}
fn default_request_timeout_secs() -> u64 {
    10
}
fn default_max_body_bytes() -> usize {
    16 * 1024
}
fn default_backend() -> StoreBackend {
    StoreBackend::Memory
}
fn default_redis_url() -> String {
    "redis://127.0.0.1/".into()
}
fn default_sqlite_path() -> PathBuf {
    PathBuf::from("data/sessions.db")
}
fn default_call_timeout_ms() -> u64 {
    3000
}
fn default_hotlines() -> Vec<String> {
    vec!["0716282395".into(), "07453423".into()]
}

/// Load config from TOML file with env var overrides.
pub fn load(path: &str) -> anyhow::Result<AppConfig> {
    let content = if std::path::Path::new(path).exists() {
        std::fs::read_to_string(path)?
    } else {
        tracing::warn!("Config file not found at {}, using defaults", path);
        String::new()
    };

    let mut config: AppConfig = toml::from_str(&content)?;
    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
    Ok(config)
}

fn apply_env_overrides(
    config: &mut AppConfig,
    var: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<()> {
    if let Some(v) = var("KOVI_HOST") {
        config.host = v;
    }
    if let Some(v) = var("KOVI_PORT") {
        config.port = v.parse()?;
    }
    if let Some(v) = var("KOVI_STORE_BACKEND") {
        config.store.backend = v.parse()?;
    }
    if let Some(v) = var("KOVI_REDIS_URL") {
        config.store.redis_url = v;
    }
    if let Some(v) = var("KOVI_SQLITE_PATH") {
        config.store.sqlite_path = PathBuf::from(v);
    }
    if let Some(v) = var("KOVI_SESSION_TTL_SECS") {
        config.store.session_ttl_secs = v.parse()?;
    }
    Ok(())
}
