//! Client configuration for the deploy console.
//!
//! Settings come from the environment first (optionally seeded from
//! `.env.local`), and command-line flags override them.
//!
//! # Storage Structure
//!
//! Local state lives under `~/.jnlp-deploy/`:
//!
//! ```text
//! ~/.jnlp-deploy/
//! ├── config/
//! │   └── .env.local   # Environment overrides
//! └── history          # REPL history
//! ```
//!
//! # Environment Variables
//!
//! - `DEPLOY_SERVER_URL`: Base URL of the deploy servlet
//! - `DEPLOY_LOCALE`: Phrase table locale (defaults to the system language)
//! - `DEPLOY_TIMEOUT_SECS`: Request timeout; no timeout when unset
//! - `DEPLOY_STATE_DIR`: Override the state directory

use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::Duration;

use url::Url;

use crate::error::{DeployError, Result};

/// Environment variable for the server base URL.
pub const SERVER_URL_ENV: &str = "DEPLOY_SERVER_URL";

/// Environment variable for the phrase locale.
pub const LOCALE_ENV: &str = "DEPLOY_LOCALE";

/// Environment variable for the request timeout in seconds.
pub const TIMEOUT_ENV: &str = "DEPLOY_TIMEOUT_SECS";

/// Environment variable for a custom state directory.
pub const STATE_DIR_ENV: &str = "DEPLOY_STATE_DIR";

/// Base URL used when none is configured.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:8080/jnlp/";

/// Locale used when the system language cannot be determined.
pub const DEFAULT_LOCALE: &str = "en";

const DEFAULT_STATE_DIR: &str = ".jnlp-deploy";
const CONFIG_SUBDIR: &str = "config";

static STATE_DIR_CACHE: OnceLock<PathBuf> = OnceLock::new();

/// Get the deploy console state directory.
///
/// 1. `DEPLOY_STATE_DIR` if set
/// 2. `~/.jnlp-deploy` if the home directory is known
/// 3. `.jnlp-deploy` in the current directory
pub fn state_dir() -> PathBuf {
    STATE_DIR_CACHE
        .get_or_init(|| {
            std::env::var(STATE_DIR_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|_| {
                    dirs::home_dir()
                        .map(|h| h.join(DEFAULT_STATE_DIR))
                        .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_DIR))
                })
        })
        .clone()
}

/// Get the user config directory.
pub fn config_dir() -> PathBuf {
    state_dir().join(CONFIG_SUBDIR)
}

/// Get the `.env.local` file path.
pub fn env_file() -> PathBuf {
    config_dir().join(".env.local")
}

/// Get the REPL history file path.
pub fn history_file() -> PathBuf {
    state_dir().join("history")
}

/// Ensure the state directory exists, creating it if necessary.
///
/// # Errors
/// Returns an error if the directory cannot be created.
pub fn ensure_state_dir() -> std::io::Result<()> {
    let dir = state_dir();
    if !dir.exists() {
        std::fs::create_dir_all(&dir)?;
    }
    Ok(())
}

/// Turns a POSIX locale (`en_US.UTF-8`) into a language tag (`en-US`).
///
/// Returns `None` for empty, `C` and `POSIX` locales.
pub fn normalize_locale(raw: &str) -> Option<String> {
    let tag = raw
        .split(['.', '@'])
        .next()
        .unwrap_or_default()
        .trim()
        .replace('_', "-");
    match tag.as_str() {
        "" | "C" | "POSIX" => None,
        _ => Some(tag),
    }
}

/// Locale from `DEPLOY_LOCALE`, then `LC_ALL`, then `LANG`, else `en`.
pub fn default_locale() -> String {
    if let Ok(locale) = std::env::var(LOCALE_ENV) {
        if !locale.trim().is_empty() {
            return locale.trim().to_string();
        }
    }
    ["LC_ALL", "LANG"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find_map(|raw| normalize_locale(&raw))
        .unwrap_or_else(|| DEFAULT_LOCALE.to_string())
}

/// Connection settings of the deploy client.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Base URL of the deploy servlet; always ends with `/`.
    pub server_url: Url,

    /// Phrase table locale tag.
    pub locale: String,

    /// Request timeout; `None` leaves requests unbounded.
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    /// Create a configuration for the given base URL.
    pub fn new(server_url: &str) -> Result<Self> {
        Ok(Self {
            server_url: parse_base_url(server_url)?,
            locale: DEFAULT_LOCALE.to_string(),
            timeout: None,
        })
    }

    /// Create a configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let server_url =
            std::env::var(SERVER_URL_ENV).unwrap_or_else(|_| DEFAULT_SERVER_URL.to_string());
        let mut config = Self::new(&server_url)?.with_locale(default_locale());
        if let Ok(secs) = std::env::var(TIMEOUT_ENV) {
            config = config.with_timeout(Some(parse_timeout(&secs)?));
        }
        Ok(config)
    }

    /// Replace the base URL.
    pub fn with_server_url(mut self, server_url: &str) -> Result<Self> {
        self.server_url = parse_base_url(server_url)?;
        Ok(self)
    }

    /// Set the phrase locale.
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// `B/_list`
    pub fn list_url(&self) -> Url {
        self.url_for(&["_list"])
    }

    /// `B/locale_<tag>.json`
    pub fn locale_url(&self, locale: &str) -> Url {
        self.url_for(&[&format!("locale_{locale}.json")])
    }

    /// `B/deploy/<project>/<resource>`
    pub fn deploy_url(&self, project: &str, resource: &str) -> Url {
        self.url_for(&["deploy", project, resource])
    }

    /// `B/<project>/<resource>`
    pub fn runtime_url(&self, project: &str, resource: &str) -> Url {
        self.url_for(&[project, resource])
    }

    fn url_for(&self, segments: &[&str]) -> Url {
        let mut url = self.server_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

fn parse_base_url(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw.trim())
        .map_err(|e| DeployError::Config(format!("invalid server url {raw:?}: {e}")))?;
    if url.cannot_be_a_base() {
        return Err(DeployError::Config(format!(
            "server url cannot be used as a base: {raw}"
        )));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn parse_timeout(raw: &str) -> Result<Duration> {
    raw.trim()
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|_| DeployError::Config(format!("invalid {TIMEOUT_ENV}: {raw:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_dir_name() {
        let dir = state_dir();
        assert!(dir.is_absolute() || dir.ends_with(".jnlp-deploy"));
    }

    #[test]
    fn test_env_file_name() {
        let file = env_file();
        assert!(file.ends_with(".env.local"));
        assert!(file.parent().is_some_and(|p| p.ends_with("config")));
    }

    #[test]
    fn test_history_file_name() {
        assert!(history_file().ends_with("history"));
    }

    #[test]
    fn test_normalize_locale() {
        assert_eq!(normalize_locale("en_US.UTF-8").as_deref(), Some("en-US"));
        assert_eq!(normalize_locale("zh_CN").as_deref(), Some("zh-CN"));
        assert_eq!(normalize_locale("de_DE@euro").as_deref(), Some("de-DE"));
        assert_eq!(normalize_locale("C"), None);
        assert_eq!(normalize_locale("POSIX"), None);
        assert_eq!(normalize_locale(""), None);
    }

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let config = ClientConfig::new("http://host:8080/jnlp").unwrap();
        assert_eq!(config.server_url.as_str(), "http://host:8080/jnlp/");
        assert_eq!(config.list_url().as_str(), "http://host:8080/jnlp/_list");
    }

    #[test]
    fn test_endpoint_urls() {
        let config = ClientConfig::new(DEFAULT_SERVER_URL).unwrap();
        assert_eq!(
            config.deploy_url("crm", "_libs").as_str(),
            "http://localhost:8080/jnlp/deploy/crm/_libs"
        );
        assert_eq!(
            config.runtime_url("crm", "crm.jnlp").as_str(),
            "http://localhost:8080/jnlp/crm/crm.jnlp"
        );
        assert_eq!(
            config.locale_url("en-US").as_str(),
            "http://localhost:8080/jnlp/locale_en-US.json"
        );
    }

    #[test]
    fn test_project_name_is_escaped() {
        let config = ClientConfig::new("http://host/").unwrap();
        assert_eq!(
            config.deploy_url("a b", "_project").as_str(),
            "http://host/deploy/a%20b/_project"
        );
    }

    #[test]
    fn test_invalid_urls() {
        assert!(matches!(
            ClientConfig::new("not a url"),
            Err(DeployError::Config(_))
        ));
        assert!(matches!(
            ClientConfig::new("mailto:ops@example.com"),
            Err(DeployError::Config(_))
        ));
    }

    #[test]
    fn test_builders() {
        let config = ClientConfig::new(DEFAULT_SERVER_URL)
            .unwrap()
            .with_locale("zh-CN")
            .with_timeout(Some(Duration::from_secs(30)))
            .with_server_url("https://deploy.example.com/app")
            .unwrap();
        assert_eq!(config.locale, "zh-CN");
        assert_eq!(config.timeout, Some(Duration::from_secs(30)));
        assert_eq!(config.server_url.as_str(), "https://deploy.example.com/app/");
    }

    #[test]
    fn test_parse_timeout() {
        assert_eq!(parse_timeout("15").unwrap(), Duration::from_secs(15));
        assert!(parse_timeout("soon").is_err());
    }
}
