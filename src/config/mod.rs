//! Configuration management
//!
//! This module handles loading and parsing configuration for The Game Loop site.
//! Configuration can be loaded from:
//! - config.yml file
//! - Environment variables (override file settings)
//!
//! Missing optional values are filled with sensible defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Content API configuration
    #[serde(default)]
    pub strapi: StrapiConfig,
    /// Site presentation settings
    #[serde(default)]
    pub site: SiteConfig,
    /// Theme configuration
    #[serde(default)]
    pub theme: ThemeConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
    /// CORS allowed origin
    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origin() -> String {
    "http://localhost:4200".to_string()
}

/// Content API (Strapi) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrapiConfig {
    /// Base URL of the CMS, without the `/api` suffix
    #[serde(default = "default_strapi_url")]
    pub url: String,
    /// Bearer token sent with every request (empty = anonymous)
    #[serde(default)]
    pub api_token: String,
    /// Start degraded and serve fallback content only
    #[serde(default)]
    pub offline: bool,
    /// Substitute fallback content when a list query returns zero records
    #[serde(default = "default_empty_as_failure")]
    pub empty_as_failure: bool,
    /// Request timeout in seconds (unset = transport default)
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
}

impl Default for StrapiConfig {
    fn default() -> Self {
        Self {
            url: default_strapi_url(),
            api_token: String::new(),
            offline: false,
            empty_as_failure: default_empty_as_failure(),
            timeout_seconds: None,
        }
    }
}

fn default_strapi_url() -> String {
    "http://localhost:1337".to_string()
}

fn default_empty_as_failure() -> bool {
    true
}

/// Site presentation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Site title shown in the header and page titles
    #[serde(default = "default_site_title")]
    pub title: String,
    /// Maximum records requested by list pages
    #[serde(default = "default_list_limit")]
    pub list_limit: u32,
    /// Query length at which search runs while typing
    #[serde(default = "default_search_min_chars")]
    pub search_min_chars: usize,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: default_site_title(),
            list_limit: default_list_limit(),
            search_min_chars: default_search_min_chars(),
        }
    }
}

fn default_site_title() -> String {
    "The Game Loop".to_string()
}

fn default_list_limit() -> u32 {
    25
}

fn default_search_min_chars() -> usize {
    3
}

/// Theme configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeConfig {
    /// Directory whose templates override the embedded ones
    #[serde(default = "default_theme_path")]
    pub path: PathBuf,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            path: default_theme_path(),
        }
    }
}

fn default_theme_path() -> PathBuf {
    PathBuf::from("themes")
}

/// Error type for configuration parsing
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    FileRead {
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{path}': {message}")]
    ParseError {
        path: String,
        message: String,
    },
}

impl Config {
    /// Load configuration from file
    ///
    /// If the file doesn't exist, returns default configuration.
    /// If the file exists but is invalid YAML, returns an error with details.
    pub fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.display().to_string(),
            source: e,
        })?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = serde_yaml::from_str(&content).map_err(|e| {
            ConfigError::ParseError {
                path: path.display().to_string(),
                message: format_yaml_error(&e),
            }
        })?;

        Ok(config)
    }

    /// Load configuration from file with environment variable overrides
    ///
    /// Environment variables:
    /// - GAMELOOP_SERVER_HOST
    /// - GAMELOOP_SERVER_PORT
    /// - GAMELOOP_SERVER_CORS_ORIGIN
    /// - STRAPI_URL
    /// - STRAPI_API_TOKEN
    /// - GAMELOOP_STRAPI_OFFLINE
    /// - GAMELOOP_STRAPI_EMPTY_AS_FAILURE
    /// - GAMELOOP_SITE_TITLE
    /// - GAMELOOP_SITE_LIST_LIMIT
    /// - GAMELOOP_THEME_PATH
    pub fn load_with_env(path: &std::path::Path) -> anyhow::Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides to the configuration
    fn apply_env_overrides(&mut self) {
        // Server configuration
        if let Ok(host) = std::env::var("GAMELOOP_SERVER_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("GAMELOOP_SERVER_PORT") {
            if let Ok(port) = port.parse::<u16>() {
                self.server.port = port;
            }
        }
        if let Ok(cors_origin) = std::env::var("GAMELOOP_SERVER_CORS_ORIGIN") {
            self.server.cors_origin = cors_origin;
        }

        // Content API configuration
        if let Ok(url) = std::env::var("STRAPI_URL") {
            if !url.trim().is_empty() {
                self.strapi.url = url;
            }
        }
        if let Ok(token) = std::env::var("STRAPI_API_TOKEN") {
            self.strapi.api_token = token;
        }
        if let Some(offline) = env_bool("GAMELOOP_STRAPI_OFFLINE") {
            self.strapi.offline = offline;
        }
        if let Some(empty_as_failure) = env_bool("GAMELOOP_STRAPI_EMPTY_AS_FAILURE") {
            self.strapi.empty_as_failure = empty_as_failure;
        }

        // Site configuration
        if let Ok(title) = std::env::var("GAMELOOP_SITE_TITLE") {
            self.site.title = title;
        }
        if let Ok(limit) = std::env::var("GAMELOOP_SITE_LIST_LIMIT") {
            if let Ok(limit) = limit.parse::<u32>() {
                self.site.list_limit = limit;
            }
        }

        // Theme configuration
        if let Ok(path) = std::env::var("GAMELOOP_THEME_PATH") {
            self.theme.path = PathBuf::from(path);
        }
    }
}

/// Parse a boolean environment variable, ignoring unrecognised values
fn env_bool(key: &str) -> Option<bool> {
    let value = std::env::var(key).ok()?;
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Format YAML parsing error with location and context
fn format_yaml_error(e: &serde_yaml::Error) -> String {
    if let Some(location) = e.location() {
        format!(
            "at line {}, column {}: {}",
            location.line(),
            location.column(),
            e
        )
    } else {
        e.to_string()
    }
}

// Shared mutex for all config tests that modify environment variables.
#[cfg(test)]
static CONFIG_ENV_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());

#[cfg(test)]
const ENV_KEYS: &[&str] = &[
    "GAMELOOP_SERVER_HOST",
    "GAMELOOP_SERVER_PORT",
    "GAMELOOP_SERVER_CORS_ORIGIN",
    "STRAPI_URL",
    "STRAPI_API_TOKEN",
    "GAMELOOP_STRAPI_OFFLINE",
    "GAMELOOP_STRAPI_EMPTY_AS_FAILURE",
    "GAMELOOP_SITE_TITLE",
    "GAMELOOP_SITE_LIST_LIMIT",
    "GAMELOOP_THEME_PATH",
];

#[cfg(test)]
fn clear_env() {
    for key in ENV_KEYS {
        std::env::remove_var(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn lock_env() -> std::sync::MutexGuard<'static, ()> {
        super::CONFIG_ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner())
    }

    #[test]
    fn test_load_missing_file_returns_defaults() {
        let path = std::path::Path::new("nonexistent_config.yml");
        let config = Config::load(path).unwrap();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.strapi.url, "http://localhost:1337");
        assert!(config.strapi.api_token.is_empty());
        assert!(!config.strapi.offline);
        assert!(config.strapi.empty_as_failure);
        assert_eq!(config.strapi.timeout_seconds, None);
        assert_eq!(config.site.title, "The Game Loop");
        assert_eq!(config.site.list_limit, 25);
        assert_eq!(config.site.search_min_chars, 3);
        assert_eq!(config.theme.path, PathBuf::from("themes"));
    }

    #[test]
    fn test_load_empty_file_returns_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "").unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.site.title, "The Game Loop");
    }

    #[test]
    fn test_load_partial_config_fills_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "strapi:\n  url: \"https://cms.example.com\"\n").unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.strapi.url, "https://cms.example.com");
        assert!(config.strapi.empty_as_failure);
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_load_full_config() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"
server:
  host: "127.0.0.1"
  port: 9000
  cors_origin: "https://thegameloop.dev"
strapi:
  url: "https://cms.thegameloop.dev"
  api_token: "secret-token"
  offline: true
  empty_as_failure: false
  timeout_seconds: 15
site:
  title: "Loop"
  list_limit: 50
  search_min_chars: 2
theme:
  path: "custom_themes"
"#).unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.cors_origin, "https://thegameloop.dev");
        assert_eq!(config.strapi.url, "https://cms.thegameloop.dev");
        assert_eq!(config.strapi.api_token, "secret-token");
        assert!(config.strapi.offline);
        assert!(!config.strapi.empty_as_failure);
        assert_eq!(config.strapi.timeout_seconds, Some(15));
        assert_eq!(config.site.title, "Loop");
        assert_eq!(config.site.list_limit, 50);
        assert_eq!(config.site.search_min_chars, 2);
        assert_eq!(config.theme.path, PathBuf::from("custom_themes"));
    }

    #[test]
    fn test_load_invalid_yaml_returns_error() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "server:\n  port: not_a_number\n").unwrap();

        let err = Config::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("parse"));
    }

    #[test]
    fn test_load_malformed_yaml_returns_error() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "server:\n  host: [invalid yaml").unwrap();

        assert!(Config::load(file.path()).is_err());
    }

    #[test]
    fn test_env_override_server_config() {
        let _guard = lock_env();
        clear_env();

        let mut file = NamedTempFile::new().unwrap();
        write!(file, "server:\n  port: 8080\n").unwrap();

        std::env::set_var("GAMELOOP_SERVER_HOST", "192.168.1.1");
        std::env::set_var("GAMELOOP_SERVER_PORT", "3000");

        let config = Config::load_with_env(file.path()).unwrap();

        assert_eq!(config.server.host, "192.168.1.1");
        assert_eq!(config.server.port, 3000);

        clear_env();
    }

    #[test]
    fn test_env_override_strapi_config() {
        let _guard = lock_env();
        clear_env();

        let mut file = NamedTempFile::new().unwrap();
        write!(file, "").unwrap();

        std::env::set_var("STRAPI_URL", "https://cms.example.com");
        std::env::set_var("STRAPI_API_TOKEN", "abc123");
        std::env::set_var("GAMELOOP_STRAPI_OFFLINE", "true");
        std::env::set_var("GAMELOOP_STRAPI_EMPTY_AS_FAILURE", "no");

        let config = Config::load_with_env(file.path()).unwrap();

        assert_eq!(config.strapi.url, "https://cms.example.com");
        assert_eq!(config.strapi.api_token, "abc123");
        assert!(config.strapi.offline);
        assert!(!config.strapi.empty_as_failure);

        clear_env();
    }

    #[test]
    fn test_env_override_blank_strapi_url_ignored() {
        let _guard = lock_env();
        clear_env();

        let mut file = NamedTempFile::new().unwrap();
        write!(file, "").unwrap();

        std::env::set_var("STRAPI_URL", "  ");

        let config = Config::load_with_env(file.path()).unwrap();
        assert_eq!(config.strapi.url, "http://localhost:1337");

        clear_env();
    }

    #[test]
    fn test_env_override_invalid_values_ignored() {
        let _guard = lock_env();
        clear_env();

        let mut file = NamedTempFile::new().unwrap();
        write!(file, "server:\n  port: 8080\nsite:\n  list_limit: 10\n").unwrap();

        std::env::set_var("GAMELOOP_SERVER_PORT", "not_a_number");
        std::env::set_var("GAMELOOP_SITE_LIST_LIMIT", "-5");
        std::env::set_var("GAMELOOP_STRAPI_OFFLINE", "maybe");

        let config = Config::load_with_env(file.path()).unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.site.list_limit, 10);
        assert!(!config.strapi.offline);

        clear_env();
    }

    #[test]
    fn test_env_override_site_and_theme() {
        let _guard = lock_env();
        clear_env();

        let mut file = NamedTempFile::new().unwrap();
        write!(file, "").unwrap();

        std::env::set_var("GAMELOOP_SITE_TITLE", "Loop Weekly");
        std::env::set_var("GAMELOOP_SITE_LIST_LIMIT", "12");
        std::env::set_var("GAMELOOP_THEME_PATH", "/var/themes");

        let config = Config::load_with_env(file.path()).unwrap();

        assert_eq!(config.site.title, "Loop Weekly");
        assert_eq!(config.site.list_limit, 12);
        assert_eq!(config.theme.path, PathBuf::from("/var/themes"));

        clear_env();
    }
}
