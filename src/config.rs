//! Configuration loading and constants.
//!
//! Loads application configuration from TOML files and defines constants for
//! HTTP cache headers, probe response labels, logging defaults and default
//! paths. `AppConfig` is the root configuration struct containing all settings.

use const_format::formatcp;
use serde::{Deserialize, Serialize};
use std::path::Path;

// =============================================================================
// HTTP Response Cache Control
// =============================================================================
// These constants control Cache-Control headers for upstream caches (nginx, CDNs).
// All values are in seconds.
//
// References:
// - RFC 9111 (HTTP Caching): https://httpwg.org/specs/rfc9111.html
// - RFC 5861 (stale-* extensions): https://httpwg.org/specs/rfc5861.html

/// Landing page - content only changes on deploy
pub const HTTP_CACHE_HOME_MAX_AGE: u32 = 60;
pub const HTTP_CACHE_HOME_SWR: u32 = 30;

/// Static assets (CSS, images) - long cache with immutable hint
pub const HTTP_CACHE_STATIC_MAX_AGE: u32 = 86400;

pub const CACHE_CONTROL_HOME: &str = formatcp!(
    "public, max-age={}, stale-while-revalidate={}",
    HTTP_CACHE_HOME_MAX_AGE,
    HTTP_CACHE_HOME_SWR
);

pub const CACHE_CONTROL_STATIC: &str =
    formatcp!("public, max-age={}, immutable", HTTP_CACHE_STATIC_MAX_AGE);

/// Probe responses and error pages must never be served from a cache
pub const CACHE_CONTROL_NO_STORE: &str = "no-store";

// =============================================================================
// Probe Labels
// =============================================================================

/// Body message for any non-GET request to a probe endpoint
pub const METHOD_NOT_ALLOWED_MESSAGE: &str = "Method not allowed";

/// Error label in the 500 body of the health endpoint
pub const HEALTH_FAILED_LABEL: &str = "Health check failed";

/// Error label in the 503 body of the readiness endpoint
pub const READINESS_FAILED_LABEL: &str = "Readiness check failed";

/// Placeholder status for connectivity checks in the health report
pub const CHECK_CONNECTED: &str = "connected";

/// Placeholder status for dependency checks in the readiness report
pub const CHECK_READY: &str = "ready";

/// Bytes per megabyte for memory snapshots
pub const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

// =============================================================================
// Environment Variables
// =============================================================================

/// Overrides `[app] environment`
pub const ENV_APP_ENV: &str = "APP_ENV";

/// Overrides `[app] version`
pub const ENV_APP_VERSION: &str = "APP_VERSION";

// =============================================================================
// Default Paths and Strings
// =============================================================================

/// Default configuration file path
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Default directory for template files
pub const DEFAULT_TEMPLATES_DIR: &str = "templates";

/// Default directory for static files
pub const DEFAULT_STATIC_DIR: &str = "static";

/// Default environment label when neither config nor `APP_ENV` set one
pub const DEFAULT_ENVIRONMENT: &str = "development";

/// Default site name shown in page titles and the header
pub const DEFAULT_SITE_NAME: &str = "LLM Platform";

/// Default tagline shown under the landing page title
pub const DEFAULT_TAGLINE: &str = "Organize your AI interactions into topic-based experiences with custom AI personalities, system prompts, and intelligent agents that optimize your workspace over time.";

/// Default log filter when RUST_LOG is not set
pub const DEFAULT_LOG_FILTER: &str = "llm_platform=debug,tower_http=debug";

/// Default log format (text or json)
pub const DEFAULT_LOG_FORMAT: &str = "text";

/// Seconds in-flight requests get to finish after SIGTERM/SIGINT
pub const DEFAULT_SHUTDOWN_GRACE_SECS: u64 = 30;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub http: HttpServerConfig,
    /// Identity reported by the health endpoint
    #[serde(default)]
    pub app: AppInfoConfig,
    #[serde(default)]
    pub ui: UiConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpServerConfig {
    #[serde(default = "HttpServerConfig::default_host")]
    pub host: String,
    #[serde(default = "HttpServerConfig::default_port")]
    pub port: u16,
    /// Grace period for in-flight requests during shutdown
    #[serde(default = "HttpServerConfig::default_shutdown_grace")]
    pub shutdown_grace_seconds: u64,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
            shutdown_grace_seconds: Self::default_shutdown_grace(),
        }
    }
}

impl HttpServerConfig {
    fn default_host() -> String {
        "0.0.0.0".to_string()
    }

    fn default_port() -> u16 {
        3000
    }

    fn default_shutdown_grace() -> u64 {
        DEFAULT_SHUTDOWN_GRACE_SECS
    }
}

/// Deployment identity. Both fields can be overridden from the environment.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppInfoConfig {
    #[serde(default = "AppInfoConfig::default_environment")]
    pub environment: String,
    #[serde(default = "AppInfoConfig::default_version")]
    pub version: String,
}

impl Default for AppInfoConfig {
    fn default() -> Self {
        Self {
            environment: Self::default_environment(),
            version: Self::default_version(),
        }
    }
}

impl AppInfoConfig {
    fn default_environment() -> String {
        DEFAULT_ENVIRONMENT.to_string()
    }

    fn default_version() -> String {
        env!("CARGO_PKG_VERSION").to_string()
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UiConfig {
    /// Site title shown in header and page titles
    #[serde(default = "UiConfig::default_site_name")]
    pub site_name: String,
    #[serde(default = "UiConfig::default_tagline")]
    pub tagline: String,
    /// Directory containing the Tera templates
    #[serde(default = "UiConfig::default_templates_dir")]
    pub templates_dir: String,
    /// Directory served under /static
    #[serde(default = "UiConfig::default_static_dir")]
    pub static_dir: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            site_name: Self::default_site_name(),
            tagline: Self::default_tagline(),
            templates_dir: Self::default_templates_dir(),
            static_dir: Self::default_static_dir(),
        }
    }
}

impl UiConfig {
    fn default_site_name() -> String {
        DEFAULT_SITE_NAME.to_string()
    }

    fn default_tagline() -> String {
        DEFAULT_TAGLINE.to_string()
    }

    fn default_templates_dir() -> String {
        DEFAULT_TEMPLATES_DIR.to_string()
    }

    fn default_static_dir() -> String {
        DEFAULT_STATIC_DIR.to_string()
    }

    /// Glob pattern matching every template under `templates_dir`
    pub fn template_glob(&self) -> String {
        format!("{}/**/*", self.templates_dir.trim_end_matches('/'))
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log format: "text" (human-readable, default) or "json" (structured)
    #[serde(default = "LoggingConfig::default_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: DEFAULT_LOG_FORMAT.to_string(),
        }
    }
}

impl LoggingConfig {
    fn default_format() -> String {
        DEFAULT_LOG_FORMAT.to_string()
    }

    pub fn is_json(&self) -> bool {
        self.format == "json"
    }
}

impl AppConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `APP_ENV` / `APP_VERSION` overrides from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary lookup. Empty values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(environment) = non_empty(ENV_APP_ENV) {
            self.app.environment = environment;
        }
        if let Some(version) = non_empty(ENV_APP_VERSION) {
            self.app.version = version;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.http.port == 0 {
            return Err(ConfigError::Validation(
                "http.port must be non-zero".to_string(),
            ));
        }

        match self.logging.format.as_str() {
            "text" | "json" => Ok(()),
            other => Err(ConfigError::Validation(format!(
                "logging.format must be \"text\" or \"json\", got {:?}",
                other
            ))),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Configuration error: {0}")]
    Validation(String),
}
