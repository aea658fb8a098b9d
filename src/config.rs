use anyhow::{Context, Result};
use chrono::{FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use crate::constants::intervals::{MAX_ENTRY_TTL, MAX_WINDOW};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub server: ServerConfig,

    pub source: SourceConfig,

    pub rate_limit: RateLimitConfig,

    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub log_level: String,

    pub suppress_connection_errors: bool,

    /// Number of tokio worker threads (default: 2)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            suppress_connection_errors: false,
            worker_threads: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub enabled: bool,

    pub port: u16,

    pub cors_allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            port: 727,
            cors_allowed_origins: vec!["*".to_string()],
        }
    }
}

/// Upstream notice board settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Board page queried with `mode=list&srCategoryId=...`
    pub base_url: String,

    /// Page size requested from the board and kept per listing (default: 5)
    pub article_limit: usize,

    /// Hard deadline for a single board fetch in seconds (default: 5)
    pub request_timeout_seconds: u64,

    /// Rows read from the board for raw dumps and day listings (default: 30)
    pub scan_limit: usize,

    /// Offset of the board's local time from UTC, used to tell today from yesterday (default: 9)
    pub utc_offset_hours: i32,

    pub user_agent: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.ajou.ac.kr/kr/ajou/notice.do".to_string(),
            article_limit: 5,
            request_timeout_seconds: 5,
            scan_limit: 30,
            utc_offset_hours: 9,
            user_agent: "Noticebot/1.0".to_string(),
        }
    }
}

impl SourceConfig {
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    /// Board time zone. Out-of-range offsets fall back to UTC.
    #[must_use]
    pub fn utc_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_hours.saturating_mul(3600)).unwrap_or_else(|| Utc.fix())
    }
}

/// Per-client admission budget.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Requests allowed per window per client (default: 1)
    pub max_requests: u32,

    /// Window length in milliseconds (default: 1000)
    pub window_millis: u64,

    /// Lifetime of a client entry, counted from its creation (default: 3600)
    pub entry_ttl_seconds: u64,

    /// How often expired entries are swept (default: 60)
    pub sweep_interval_seconds: u64,

    /// Push `expires_at` forward on every admitted request.
    pub renew_on_hit: bool,

    /// Trusted proxy IP addresses allowed to provide forwarded client IP headers.
    ///
    /// When empty, forwarded headers are ignored and the socket peer address is used.
    pub trusted_proxy_ips: Vec<String>,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 1,
            window_millis: 1000,
            entry_ttl_seconds: 60 * 60,
            sweep_interval_seconds: 60,
            renew_on_hit: false,
            trusted_proxy_ips: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub metrics_enabled: bool,

    pub loki_enabled: bool,

    pub loki_url: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: true,
            loki_enabled: false,
            loki_url: "http://localhost:3100".to_string(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let paths = Self::config_paths();

        for path in &paths {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                return Self::load_from_path(path);
            }
        }

        info!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![Self::default_config_path()];

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("noticebot").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".noticebot").join("config.toml"));
        }

        paths
    }

    fn default_config_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    pub fn create_default_if_missing() -> Result<bool> {
        let path = Self::default_config_path();
        if path.exists() {
            Ok(false)
        } else {
            let config = Self::default();
            config.save_to_path(&path)?;
            info!("Created default config file: {}", path.display());
            Ok(true)
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            anyhow::bail!("server.port must be > 0");
        }

        if self.rate_limit.max_requests == 0 {
            anyhow::bail!("rate_limit.max_requests must be > 0");
        }

        let window = Duration::from_millis(self.rate_limit.window_millis);
        if window.is_zero() || window > MAX_WINDOW {
            anyhow::bail!(
                "rate_limit.window_millis must be between 1 and {}",
                MAX_WINDOW.as_millis()
            );
        }

        let ttl = Duration::from_secs(self.rate_limit.entry_ttl_seconds);
        if ttl.is_zero() || ttl > MAX_ENTRY_TTL {
            anyhow::bail!(
                "rate_limit.entry_ttl_seconds must be between 1 and {}",
                MAX_ENTRY_TTL.as_secs()
            );
        }

        if self.source.article_limit == 0 {
            anyhow::bail!("source.article_limit must be > 0");
        }

        if self.source.scan_limit < self.source.article_limit {
            anyhow::bail!("source.scan_limit must be >= source.article_limit");
        }

        if self.source.request_timeout_seconds == 0 {
            anyhow::bail!("source.request_timeout_seconds must be > 0");
        }

        if !(-12..=14).contains(&self.source.utc_offset_hours) {
            anyhow::bail!("source.utc_offset_hours must be between -12 and 14");
        }

        if self.source.base_url.is_empty() {
            anyhow::bail!("source.base_url cannot be empty");
        }

        url::Url::parse(&self.source.base_url)
            .with_context(|| format!("Invalid source.base_url: {}", self.source.base_url))?;

        if self.observability.loki_enabled {
            url::Url::parse(&self.observability.loki_url)
                .with_context(|| format!("Invalid Loki URL: {}", self.observability.loki_url))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.port, 727);
        assert_eq!(config.rate_limit.max_requests, 1);
        assert_eq!(config.rate_limit.window_millis, 1000);
        assert_eq!(config.rate_limit.entry_ttl_seconds, 3600);
        assert!(!config.rate_limit.renew_on_hit);
        assert_eq!(config.source.article_limit, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[source]"));
        assert!(toml_str.contains("[rate_limit]"));
    }

    #[test]
    fn test_config_deserialization() {
        let toml_str = r#"
            [general]
            log_level = "debug"

            [rate_limit]
            max_requests = 3
            trusted_proxy_ips = ["10.0.0.1"]
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.rate_limit.max_requests, 3);
        assert_eq!(config.rate_limit.trusted_proxy_ips, vec!["10.0.0.1"]);

        assert_eq!(config.rate_limit.window_millis, 1000);
        assert_eq!(config.server.port, 727);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.rate_limit.max_requests = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.source.base_url = "not a url".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.source.article_limit = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.source.request_timeout_seconds = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.source.scan_limit = 2;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.source.utc_offset_hours = 15;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.observability.loki_enabled = true;
        config.observability.loki_url = "::".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_bounds_admission_durations() {
        let mut config = Config::default();
        config.rate_limit.entry_ttl_seconds = u64::MAX;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.rate_limit.entry_ttl_seconds = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.rate_limit.window_millis = u64::MAX;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.rate_limit.entry_ttl_seconds = 24 * 60 * 60;
        config.rate_limit.window_millis = 60 * 60 * 1000;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_utc_offset() {
        let mut config = Config::default();
        assert_eq!(config.source.utc_offset().local_minus_utc(), 9 * 3600);

        config.source.utc_offset_hours = -5;
        assert_eq!(config.source.utc_offset().local_minus_utc(), -5 * 3600);

        config.source.utc_offset_hours = 40;
        assert_eq!(config.source.utc_offset().local_minus_utc(), 0);
    }

    #[test]
    fn test_save_and_load_roundtrip_keeps_overrides() {
        let path = std::env::temp_dir().join(format!(
            "noticebot-config-test-{}.toml",
            uuid::Uuid::new_v4()
        ));

        let mut config = Config::default();
        config.server.port = 8088;
        config.save_to_path(&path).unwrap();

        let loaded = Config::load_from_path(&path).unwrap();
        assert_eq!(loaded.server.port, 8088);

        let _ = std::fs::remove_file(&path);
    }
}
