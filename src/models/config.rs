//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// API endpoint and HTTP behavior
    #[serde(default)]
    pub api: ApiConfig,

    /// Credential and preference persistence
    #[serde(default)]
    pub session: SessionConfig,

    /// UI language settings
    #[serde(default)]
    pub locale: LocaleConfig,

    /// Log output settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        let base = self.api.base_url()?;
        if base.cannot_be_a_base() {
            return Err(AppError::config("api.base_url cannot be a base URL"));
        }
        if self.api.user_agent.trim().is_empty() {
            return Err(AppError::config("api.user_agent is empty"));
        }
        if self.api.timeout_secs == 0 {
            return Err(AppError::config("api.timeout_secs must be > 0"));
        }
        if self.session.token_key.trim().is_empty() || self.session.language_key.trim().is_empty()
        {
            return Err(AppError::config("session storage keys must not be empty"));
        }
        if self.session.token_key == self.session.language_key {
            return Err(AppError::config(
                "session.token_key and session.language_key must differ",
            ));
        }
        if self.locale.supported.is_empty() {
            return Err(AppError::config("No supported languages defined"));
        }
        if !self.locale.supports(&self.locale.default_language) {
            return Err(AppError::config(format!(
                "locale.default_language '{}' is not in locale.supported",
                self.locale.default_language
            )));
        }
        Ok(())
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL every endpoint path is joined onto
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Path prefixes sent without the bearer token
    #[serde(default = "defaults::excluded_routes")]
    pub excluded_routes: Vec<String>,
}

impl ApiConfig {
    /// Parsed base URL, always ending in `/` so relative joins keep its path.
    pub fn base_url(&self) -> Result<Url> {
        let mut raw = self.base_url.trim().to_string();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        Ok(Url::parse(&raw)?)
    }

    /// Whether a request path must go out without credentials.
    pub fn is_excluded(&self, path: &str) -> bool {
        let path = path.split('?').next().unwrap_or(path);
        let path = format!("/{}", path.trim_start_matches('/'));
        self.excluded_routes
            .iter()
            .any(|route| path == *route || path.starts_with(&format!("{route}/")))
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            excluded_routes: defaults::excluded_routes(),
        }
    }
}

/// Where the credential and durable preferences are kept.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Directory for file-backed stores
    #[serde(default = "defaults::storage_dir")]
    pub storage_dir: PathBuf,

    /// Key of the bearer token in the session store
    #[serde(default = "defaults::token_key")]
    pub token_key: String,

    /// Key of the selected language in the durable store
    #[serde(default = "defaults::language_key")]
    pub language_key: String,
}

impl SessionConfig {
    pub fn session_dir(&self) -> PathBuf {
        self.storage_dir.join("session")
    }

    pub fn durable_dir(&self) -> PathBuf {
        self.storage_dir.join("local")
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            storage_dir: defaults::storage_dir(),
            token_key: defaults::token_key(),
            language_key: defaults::language_key(),
        }
    }
}

/// UI language settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocaleConfig {
    /// Language used until the user picks one
    #[serde(default = "defaults::default_language")]
    pub default_language: String,

    /// Languages the user may select
    #[serde(default = "defaults::supported_languages")]
    pub supported: Vec<String>,

    /// Directory holding `{language}.toml` translation tables
    #[serde(default = "defaults::locale_dir")]
    pub dir: PathBuf,
}

impl LocaleConfig {
    pub fn supports(&self, language: &str) -> bool {
        self.supported.iter().any(|l| l == language)
    }
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            default_language: defaults::default_language(),
            supported: defaults::supported_languages(),
            dir: defaults::locale_dir(),
        }
    }
}

/// Log output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter used when `RUST_LOG` is unset
    #[serde(default = "defaults::log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    // API defaults
    pub fn base_url() -> String {
        "http://localhost:8080/api/".into()
    }
    pub fn user_agent() -> String {
        "flightclaim/0.1".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn excluded_routes() -> Vec<String> {
        vec![
            "/auth/signin".to_string(),
            "/auth/sign-in".to_string(),
            "/auth/register".to_string(),
            "/auth/reset-password".to_string(),
        ]
    }

    // Session defaults
    pub fn storage_dir() -> PathBuf {
        PathBuf::from("storage")
    }
    pub fn token_key() -> String {
        "auth_token".into()
    }
    pub fn language_key() -> String {
        "language".into()
    }

    // Locale defaults
    pub fn default_language() -> String {
        "en".into()
    }
    pub fn supported_languages() -> Vec<String> {
        vec!["en".to_string(), "ro".to_string()]
    }
    pub fn locale_dir() -> PathBuf {
        PathBuf::from("locale")
    }

    // Logging defaults
    pub fn log_level() -> String {
        "info".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_default_config_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_base_url() {
        let mut config = Config::default();
        config.api.base_url = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_timeout() {
        let mut config = Config::default();
        config.api.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_unsupported_default_language() {
        let mut config = Config::default();
        config.locale.default_language = "fr".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn base_url_gains_trailing_slash() {
        let api = ApiConfig {
            base_url: "https://claims.example.com/api".to_string(),
            ..ApiConfig::default()
        };
        let url = api.base_url().unwrap().join("cases").unwrap();
        assert_eq!(url.as_str(), "https://claims.example.com/api/cases");
    }

    #[test]
    fn excluded_routes_match_paths() {
        let api = ApiConfig::default();
        assert!(api.is_excluded("/auth/signin"));
        assert!(api.is_excluded("auth/register"));
        assert!(api.is_excluded("/auth/reset-password?token=x"));
        assert!(!api.is_excluded("/auth/forgot-password"));
        assert!(!api.is_excluded("/cases"));
        assert!(!api.is_excluded("/auth/signin-extra"));
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [api]
            base_url = "https://claims.example.com/api"
            "#,
        )
        .unwrap();
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.session.token_key, "auth_token");
        assert!(config.validate().is_ok());
    }
}
