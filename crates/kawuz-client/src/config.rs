//! # Client Configuration
//!
//! Where the backend lives and how the storefront paces itself.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     KAWUZ_BASE_URL=http://shop.local/api                               │
//! │     KAWUZ_LOGIN_DELAY_MS=0                                             │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/kawuz-storefront/storefront.toml (Linux)                 │
//! │     ~/Library/Application Support/pl.kawuz.storefront/... (macOS)      │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     http://localhost:8080/api, 500 ms login delay, 300 ms debounce     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # storefront.toml
//! [api]
//! base_url = "http://localhost:8080/api"
//! timeout_secs = 15
//! connect_timeout_secs = 5
//!
//! [ui]
//! login_transition_delay_ms = 500
//! search_debounce_ms = 300
//! currency_suffix = "zł"
//!
//! [storage]
//! theme_path = "/home/ola/.config/kawuz-storefront/theme.toml"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{ClientError, ClientResult};

/// Default backend root, including the `/api` prefix.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

const CONFIG_FILE: &str = "storefront.toml";
const THEME_FILE: &str = "theme.toml";

// =============================================================================
// Sections
// =============================================================================

/// Backend connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Whole-request timeout.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout() -> u64 {
    15
}

fn default_connect_timeout() -> u64 {
    5
}

impl Default for ApiSettings {
    fn default() -> Self {
        ApiSettings {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

/// Presentation pacing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiSettings {
    /// Pause between a login/registration success notice and the route change.
    #[serde(default = "default_login_delay")]
    pub login_transition_delay_ms: u64,

    /// Only the last keyword typed within this window is searched.
    #[serde(default = "default_debounce")]
    pub search_debounce_ms: u64,

    #[serde(default = "default_currency_suffix")]
    pub currency_suffix: String,
}

fn default_login_delay() -> u64 {
    500
}

fn default_debounce() -> u64 {
    300
}

fn default_currency_suffix() -> String {
    kawuz_core::CURRENCY_SUFFIX.to_string()
}

impl Default for UiSettings {
    fn default() -> Self {
        UiSettings {
            login_transition_delay_ms: default_login_delay(),
            search_debounce_ms: default_debounce(),
            currency_suffix: default_currency_suffix(),
        }
    }
}

/// Durable client storage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Theme file; `None` means the platform config dir.
    #[serde(default)]
    pub theme_path: Option<PathBuf>,
}

// =============================================================================
// Client Config
// =============================================================================

/// Complete storefront client configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub ui: UiSettings,

    #[serde(default)]
    pub storage: StorageSettings,
}

impl ClientConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (storefront.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ClientResult<Self> {
        let mut config = Self::from_file(config_path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(config_path: Option<PathBuf>) -> ClientResult<Self> {
        match config_path.or_else(Self::default_config_path) {
            Some(path) if path.exists() => {
                info!(?path, "Loading storefront config from file");
                let contents = std::fs::read_to_string(&path)?;
                Ok(toml::from_str(&contents)?)
            }
            Some(path) => {
                debug!(?path, "Config file not found, using defaults");
                Ok(Self::default())
            }
            None => Ok(Self::default()),
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ClientResult<()> {
        let url = Url::parse(&self.api.base_url)?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ClientError::InvalidConfig(format!(
                "base_url must start with http:// or https://, got: {}",
                self.api.base_url
            )));
        }

        if self.api.timeout_secs == 0 {
            return Err(ClientError::InvalidConfig(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        if self.api.connect_timeout_secs == 0 {
            return Err(ClientError::InvalidConfig(
                "connect_timeout_secs must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("KAWUZ_BASE_URL") {
            debug!(url = %url, "Overriding base URL from environment");
            self.api.base_url = url;
        }

        if let Ok(secs) = std::env::var("KAWUZ_TIMEOUT_SECS") {
            match secs.parse::<u64>() {
                Ok(s) => self.api.timeout_secs = s,
                Err(_) => warn!(value = %secs, "Ignoring invalid KAWUZ_TIMEOUT_SECS"),
            }
        }

        if let Ok(ms) = std::env::var("KAWUZ_LOGIN_DELAY_MS") {
            match ms.parse::<u64>() {
                Ok(v) => self.ui.login_transition_delay_ms = v,
                Err(_) => warn!(value = %ms, "Ignoring invalid KAWUZ_LOGIN_DELAY_MS"),
            }
        }

        if let Ok(ms) = std::env::var("KAWUZ_SEARCH_DEBOUNCE_MS") {
            match ms.parse::<u64>() {
                Ok(v) => self.ui.search_debounce_ms = v,
                Err(_) => warn!(value = %ms, "Ignoring invalid KAWUZ_SEARCH_DEBOUNCE_MS"),
            }
        }

        if let Ok(path) = std::env::var("KAWUZ_THEME_PATH") {
            self.storage.theme_path = Some(PathBuf::from(path));
        }
    }

    fn project_dirs() -> Option<directories::ProjectDirs> {
        directories::ProjectDirs::from("pl", "kawuz", "storefront")
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Base URL with a guaranteed trailing slash, ready for `Url::join`.
    pub fn base_url(&self) -> ClientResult<Url> {
        let mut raw = self.api.base_url.trim().to_string();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        Ok(Url::parse(&raw)?)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.api.connect_timeout_secs)
    }

    pub fn login_delay(&self) -> Duration {
        Duration::from_millis(self.ui.login_transition_delay_ms)
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.ui.search_debounce_ms)
    }

    /// Theme file path: configured, or the platform config dir.
    pub fn theme_path(&self) -> Option<PathBuf> {
        self.storage
            .theme_path
            .clone()
            .or_else(|| Self::project_dirs().map(|dirs| dirs.config_dir().join(THEME_FILE)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.ui.login_transition_delay_ms, 500);
        assert_eq!(config.ui.search_debounce_ms, 300);
        assert_eq!(config.ui.currency_suffix, "zł");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = ClientConfig::default();

        config.api.base_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());

        config.api.base_url = "not a url".to_string();
        assert!(config.validate().is_err());

        config.api.base_url = "https://shop.example.com/api".to_string();
        assert!(config.validate().is_ok());

        config.api.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_base_url_join_keeps_api_prefix() {
        let config = ClientConfig::default();
        let url = config.base_url().unwrap().join("auth/me").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/api/auth/me");
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: ClientConfig = toml::from_str(
            r#"
            [ui]
            login_transition_delay_ms = 0
            "#,
        )
        .unwrap();
        assert_eq!(config.ui.login_transition_delay_ms, 0);
        assert_eq!(config.ui.search_debounce_ms, 300);
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_from_file_reads_sections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storefront.toml");
        std::fs::write(
            &path,
            "[api]\nbase_url = \"http://127.0.0.1:9000/api\"\n\n[ui]\nsearch_debounce_ms = 50\n",
        )
        .unwrap();

        let loaded = ClientConfig::from_file(Some(path)).unwrap();
        assert_eq!(loaded.api.base_url, "http://127.0.0.1:9000/api");
        assert_eq!(loaded.ui.search_debounce_ms, 50);
        assert_eq!(loaded.ui.login_transition_delay_ms, 500);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = ClientConfig::from_file(Some(dir.path().join("absent.toml"))).unwrap();
        assert_eq!(loaded, ClientConfig::default());
    }

    #[test]
    fn test_toml_serialization() {
        let toml_str = toml::to_string_pretty(&ClientConfig::default()).unwrap();
        assert!(toml_str.contains("[api]"));
        assert!(toml_str.contains("[ui]"));
    }
}
