use serde::{Deserialize, Serialize};

/// Main configuration structure for gitfolio.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// GitHub account and API access configuration
    #[serde(default)]
    pub github: GitHubConfig,

    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Portfolio cache configuration
    #[serde(default)]
    pub cache: CacheConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// GitHub account and API access configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct GitHubConfig {
    /// Account whose repositories are aggregated
    #[serde(default)]
    pub username: String,

    /// Personal access token. Optional; without it calls proceed
    /// unauthenticated with lower rate limits.
    #[serde(default)]
    pub token: Option<String>,

    /// GitHub REST API base URL
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Commit history lookback window in days
    #[serde(default = "default_lookback_days")]
    pub lookback_days: u32,
}

fn default_api_url() -> String {
    "https://api.github.com".to_string()
}

const fn default_lookback_days() -> u32 {
    365
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            username: String::new(),
            token: None,
            api_url: default_api_url(),
            lookback_days: default_lookback_days(),
        }
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

const fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Portfolio cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CacheConfig {
    /// Hard expiry for cached entries, in seconds
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,

    /// Minimum interval between staleness probes, in seconds
    #[serde(default = "default_probe_interval_secs")]
    pub probe_interval_secs: u64,
}

const fn default_ttl_secs() -> u64 {
    600
}

const fn default_probe_interval_secs() -> u64 {
    60
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
            probe_interval_secs: default_probe_interval_secs(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}
