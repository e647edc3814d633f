//! Shared configuration for the bedwatch CLI.
//!
//! TOML profiles, token resolution (env + keyring + plaintext), the
//! keyring-backed session store, and translation to
//! `bedwatch_core::MonitorConfig`. The CLI adds flag-aware wrappers on top.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use bedwatch_api::{MemorySession, SessionProvider};
use bedwatch_core::config::{DEFAULT_API_URL, DEFAULT_POLL_INTERVAL};
use bedwatch_core::{MonitorConfig, TlsVerification};

/// Keyring service name; entries are keyed `{profile}/token`.
pub const KEYRING_SERVICE: &str = "bedwatch";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named backend profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}

/// A named backend profile.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Profile {
    /// API base URL (e.g., "http://localhost:8000/api/").
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Email used by `bedwatch login` when none is given.
    pub email: Option<String>,

    /// Session token (plaintext -- prefer keyring or env var).
    pub token: Option<String>,

    /// Environment variable name containing the session token.
    pub token_env: Option<String>,

    /// Request timeout override (seconds).
    pub timeout: Option<u64>,

    /// Live-update interval (seconds).
    pub poll_interval_secs: Option<u64>,

    /// Show demo data when the backend is unreachable (default: true).
    pub demo_fallback: Option<bool>,

    /// Accept invalid TLS certificates.
    pub insecure: Option<bool>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            email: None,
            token: None,
            token_env: None,
            timeout: None,
            poll_interval_secs: None,
            demo_fallback: None,
            insecure: None,
        }
    }
}

fn default_api_url() -> String {
    DEFAULT_API_URL.into()
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("org", "bedwatch", "bedwatch").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("bedwatch");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file path. A missing file yields the defaults.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("BEDWATCH_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist or is broken.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_else(|e| {
        warn!(error = %e, "ignoring unreadable config file");
        Config::default()
    })
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Token resolution ────────────────────────────────────────────────

fn keyring_entry(profile_name: &str) -> Result<keyring::Entry, keyring::Error> {
    keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/token"))
}

fn env_token(profile: &Profile) -> Option<SecretString> {
    let name = profile.token_env.as_deref()?;
    std::env::var(name).ok().map(SecretString::from)
}

fn plaintext_token(profile: &Profile) -> Option<SecretString> {
    profile.token.clone().map(SecretString::from)
}

fn keyring_token(profile_name: &str) -> Option<SecretString> {
    keyring_entry(profile_name)
        .and_then(|entry| entry.get_password())
        .ok()
        .map(SecretString::from)
}

/// Resolve the session token: `token_env` variable, then the system
/// keyring, then plaintext in the profile.
pub fn resolve_token(profile: &Profile, profile_name: &str) -> Option<SecretString> {
    env_token(profile)
        .or_else(|| keyring_token(profile_name))
        .or_else(|| plaintext_token(profile))
}

/// Store a token in the system keyring for `profile_name`.
pub fn store_token(profile_name: &str, token: &SecretString) -> Result<(), ConfigError> {
    keyring_entry(profile_name)?.set_password(token.expose_secret())?;
    Ok(())
}

/// Remove the keyring token for `profile_name`. Missing entries are fine.
pub fn delete_token(profile_name: &str) -> Result<(), ConfigError> {
    match keyring_entry(profile_name)?.delete_credential() {
        Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
        Err(e) => Err(e.into()),
    }
}

// ── Sessions ────────────────────────────────────────────────────────

/// Session stored in the system keyring under `bedwatch` / `{profile}/token`.
///
/// `clear` deletes the entry, so an expired session is forgotten across
/// invocations.
#[derive(Debug, Clone)]
pub struct KeyringSession {
    profile: String,
}

impl KeyringSession {
    pub fn new(profile_name: impl Into<String>) -> Self {
        Self {
            profile: profile_name.into(),
        }
    }
}

impl SessionProvider for KeyringSession {
    fn token(&self) -> Option<SecretString> {
        keyring_token(&self.profile)
    }

    fn store(&self, token: SecretString) {
        if let Err(e) = store_token(&self.profile, &token) {
            warn!(profile = %self.profile, error = %e, "could not save session to keyring");
        }
    }

    fn clear(&self) {
        if let Err(e) = delete_token(&self.profile) {
            warn!(profile = %self.profile, error = %e, "could not remove session from keyring");
        }
    }
}

/// Pick the session provider for a profile.
///
/// A token from the environment or plaintext config wins over the keyring
/// following [`resolve_token`]'s order; such tokens live in memory only.
/// Otherwise the keyring session is used, so `login` persists.
pub fn session_for(profile: &Profile, profile_name: &str) -> Arc<dyn SessionProvider> {
    if let Some(token) = env_token(profile) {
        debug!(profile = profile_name, "using token from environment");
        return Arc::new(MemorySession::with_token(token.expose_secret()));
    }
    if let Some(token) = plaintext_token(profile) {
        if keyring_token(profile_name).is_none() {
            debug!(profile = profile_name, "using plaintext token from config");
            return Arc::new(MemorySession::with_token(token.expose_secret()));
        }
    }
    Arc::new(KeyringSession::new(profile_name))
}

// ── Translation to MonitorConfig ────────────────────────────────────

/// Build a `MonitorConfig` from a profile, with no CLI flag overrides.
pub fn profile_to_monitor_config(profile: &Profile) -> Result<MonitorConfig, ConfigError> {
    let api_url: url::Url = profile
        .api_url
        .parse()
        .map_err(|_| ConfigError::Validation {
            field: "api_url".into(),
            reason: format!("invalid URL: {}", profile.api_url),
        })?;

    let tls = if profile.insecure.unwrap_or(false) {
        TlsVerification::DangerAcceptInvalid
    } else {
        TlsVerification::SystemDefaults
    };

    let poll_interval = match profile.poll_interval_secs {
        Some(0) => {
            return Err(ConfigError::Validation {
                field: "poll_interval_secs".into(),
                reason: "must be at least 1".into(),
            });
        }
        Some(secs) => Duration::from_secs(secs),
        None => DEFAULT_POLL_INTERVAL,
    };

    Ok(MonitorConfig {
        api_url,
        tls,
        timeout: Duration::from_secs(profile.timeout.unwrap_or_else(default_timeout)),
        poll_interval,
        demo_fallback: profile.demo_fallback.unwrap_or(true),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.default_profile.as_deref(), Some("default"));
        assert_eq!(cfg.defaults.output, "table");
        assert!(cfg.profiles.is_empty());
    }

    #[test]
    fn profiles_parse_from_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
default_profile = "staging"

[defaults]
output = "json"

[profiles.staging]
api_url = "https://staging.example.org/api"
email = "admin@hospital.com"
poll_interval_secs = 10
demo_fallback = false

[profiles.local]
"#,
        )
        .unwrap();

        let cfg = load_config_from(&path).unwrap();
        assert_eq!(cfg.default_profile.as_deref(), Some("staging"));
        assert_eq!(cfg.defaults.output, "json");
        assert_eq!(cfg.defaults.timeout, 30);

        let staging = &cfg.profiles["staging"];
        assert_eq!(staging.email.as_deref(), Some("admin@hospital.com"));
        assert_eq!(staging.demo_fallback, Some(false));

        assert_eq!(cfg.profiles["local"].api_url, DEFAULT_API_URL);
    }

    #[test]
    fn save_then_load_keeps_profiles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.profiles.insert(
            "default".into(),
            Profile {
                api_url: "http://10.0.0.5:8000/api/".into(),
                timeout: Some(5),
                ..Profile::default()
            },
        );
        save_config_to(&cfg, &path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded.profiles["default"], cfg.profiles["default"]);
    }

    #[test]
    fn monitor_config_from_profile() {
        let profile = Profile {
            api_url: "https://beds.example.org/api".into(),
            timeout: Some(12),
            poll_interval_secs: Some(45),
            demo_fallback: Some(false),
            insecure: Some(true),
            ..Profile::default()
        };

        let mc = profile_to_monitor_config(&profile).unwrap();
        assert_eq!(mc.api_url.as_str(), "https://beds.example.org/api");
        assert_eq!(mc.timeout, Duration::from_secs(12));
        assert_eq!(mc.poll_interval, Duration::from_secs(45));
        assert!(!mc.demo_fallback);
        assert_eq!(mc.tls, TlsVerification::DangerAcceptInvalid);
    }

    #[test]
    fn monitor_config_defaults() {
        let mc = profile_to_monitor_config(&Profile::default()).unwrap();
        assert_eq!(mc.poll_interval, DEFAULT_POLL_INTERVAL);
        assert!(mc.demo_fallback);
        assert_eq!(mc.tls, TlsVerification::SystemDefaults);
    }

    #[test]
    fn bad_url_and_zero_interval_are_rejected() {
        let bad_url = Profile {
            api_url: "not a url".into(),
            ..Profile::default()
        };
        assert!(matches!(
            profile_to_monitor_config(&bad_url),
            Err(ConfigError::Validation { ref field, .. }) if field == "api_url"
        ));

        let zero = Profile {
            poll_interval_secs: Some(0),
            ..Profile::default()
        };
        assert!(profile_to_monitor_config(&zero).is_err());
    }

    #[test]
    fn token_from_named_env_var_wins() {
        // PATH is always set in test environments.
        let expected = std::env::var("PATH").unwrap();
        let profile = Profile {
            token_env: Some("PATH".into()),
            token: Some("plaintext".into()),
            ..Profile::default()
        };
        let token = resolve_token(&profile, "test-env-wins").unwrap();
        assert_eq!(token.expose_secret(), expected);
    }
}
