//! Configuration management for the RoomSpa admin dashboard

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Backend REST API configuration
    #[serde(default)]
    pub backend: BackendConfig,

    /// Web server configuration
    #[serde(default)]
    pub webserver: WebServerConfig,

    /// Session cookie configuration
    #[serde(default)]
    pub session: SessionConfig,

    /// Live page polling configuration
    #[serde(default)]
    pub polling: PollingConfig,

    /// List page sizing
    #[serde(default)]
    pub pages: PageConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Backend REST API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Versioned API root, e.g. `http://localhost:8000/api/admin`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Web server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Session cookie configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Mark session cookies `Secure` (HTTPS only)
    #[serde(default)]
    pub secure_cookies: bool,
}

/// Live page polling configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingConfig {
    /// Live monitoring refresh period in seconds
    #[serde(default = "default_monitoring_secs")]
    pub monitoring_secs: u64,

    /// System health refresh period in seconds
    #[serde(default = "default_system_health_secs")]
    pub system_health_secs: u64,
}

/// List page sizing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageConfig {
    /// Rows requested per page for most list pages
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Rows requested per page on the coupons page
    #[serde(default = "default_coupon_page_size")]
    pub coupon_page_size: u32,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (json or text)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_base_url() -> String {
    "http://localhost:8000/api/admin".to_string()
}

const fn default_timeout_secs() -> u64 {
    30
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    3000
}

const fn default_monitoring_secs() -> u64 {
    5
}

const fn default_system_health_secs() -> u64 {
    10
}

const fn default_page_size() -> u32 {
    20
}

const fn default_coupon_page_size() -> u32 {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for WebServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            monitoring_secs: default_monitoring_secs(),
            system_health_secs: default_system_health_secs(),
        }
    }
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            coupon_page_size: default_coupon_page_size(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl BackendConfig {
    /// Request timeout as a [`Duration`]
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl PollingConfig {
    /// Live monitoring refresh period, never shorter than one second
    #[must_use]
    pub fn monitoring_period(&self) -> Duration {
        Duration::from_secs(self.monitoring_secs.max(1))
    }

    /// System health refresh period, never shorter than one second
    #[must_use]
    pub fn system_health_period(&self) -> Duration {
        Duration::from_secs(self.system_health_secs.max(1))
    }
}

impl Config {
    /// Load configuration from `config.*` in the working directory and the environment
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or parsed.
    pub fn load() -> crate::Result<Self> {
        Self::build(config::File::with_name("config").required(false))
    }

    /// Load configuration from an explicit file, overlaid with the environment
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or the configuration cannot be parsed.
    pub fn load_from(path: &Path) -> crate::Result<Self> {
        Self::build(config::File::from(path).required(true))
    }

    fn build<S>(file: S) -> crate::Result<Self>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let config = config::Config::builder()
            .add_source(file)
            .add_source(config::Environment::with_prefix("ROOMSPA").separator("__"))
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.validate()?;
        tracing::debug!(
            backend = %config.backend.base_url,
            port = config.webserver.port,
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Check values that serde defaults cannot guard
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an unusable backend URL or zero page sizes.
    pub fn validate(&self) -> crate::Result<()> {
        let base = self.backend.base_url.trim();
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(crate::Error::Configuration {
                message: format!("backend.base_url must be an http(s) URL, got '{base}'"),
            });
        }
        if self.pages.page_size == 0 || self.pages.coupon_page_size == 0 {
            return Err(crate::Error::Configuration {
                message: "page sizes must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_config_default() {
        let config = Config::default();

        assert_eq!(config.backend.base_url, "http://localhost:8000/api/admin");
        assert_eq!(config.backend.timeout_secs, 30);
        assert_eq!(config.webserver.host, "0.0.0.0");
        assert_eq!(config.webserver.port, 3000);
        assert!(!config.session.secure_cookies);
        assert_eq!(config.polling.monitoring_secs, 5);
        assert_eq!(config.polling.system_health_secs, 10);
        assert_eq!(config.pages.page_size, 20);
        assert_eq!(config.pages.coupon_page_size, 10);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, "text");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_config_deserialization() {
        let json_str = r#"{
            "backend": {"base_url": "https://api.roomspa.test/api/admin"},
            "webserver": {"port": 8081}
        }"#;

        let config: Config = serde_json::from_str(json_str).unwrap();

        assert_eq!(config.backend.base_url, "https://api.roomspa.test/api/admin");
        assert_eq!(config.backend.timeout_secs, 30);
        assert_eq!(config.webserver.host, "0.0.0.0");
        assert_eq!(config.webserver.port, 8081);
        assert_eq!(config.pages.page_size, 20);
    }

    #[test]
    fn test_polling_periods_have_a_floor() {
        let polling = PollingConfig {
            monitoring_secs: 0,
            system_health_secs: 10,
        };

        assert_eq!(polling.monitoring_period(), Duration::from_secs(1));
        assert_eq!(polling.system_health_period(), Duration::from_secs(10));
    }

    #[test]
    fn test_validate_rejects_non_http_base_url() {
        let mut config = Config::default();
        config.backend.base_url = "localhost:8000".to_string();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("backend.base_url"));
    }

    #[test]
    fn test_validate_rejects_zero_page_size() {
        let mut config = Config::default();
        config.pages.coupon_page_size = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[backend]\nbase_url = \"http://backend:9000/api/v1\"\ntimeout_secs = 5\n\n[polling]\nmonitoring_secs = 2\n"
        )
        .unwrap();

        let config = Config::load_from(file.path()).unwrap();

        assert_eq!(config.backend.base_url, "http://backend:9000/api/v1");
        assert_eq!(config.backend.timeout(), Duration::from_secs(5));
        assert_eq!(config.polling.monitoring_secs, 2);
        assert_eq!(config.polling.system_health_secs, 10);
    }

    #[test]
    fn test_load_from_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::load_from(&dir.path().join("absent.toml"));

        assert!(matches!(result, Err(crate::Error::Configuration { .. })));
    }

    #[test]
    fn test_config_serialization_roundtrip_keeps_sections() {
        let config = Config::default();
        let serialized = serde_json::to_value(&config).unwrap();

        assert_eq!(serialized["polling"]["monitoring_secs"], 5);
        assert_eq!(serialized["pages"]["coupon_page_size"], 10);
    }
}
