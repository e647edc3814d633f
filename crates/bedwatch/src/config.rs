//! CLI configuration -- thin wrapper around `bedwatch_config` shared types.
//!
//! Re-exports the shared types and adds CLI-specific resolution that
//! respects `GlobalOpts` flag overrides (--api-url, --token, etc.).

use std::sync::Arc;
use std::time::Duration;

use bedwatch_core::{MemorySession, MonitorConfig, SessionProvider, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use bedwatch_config::{
    Config, Defaults, Profile, config_path, load_config_or_default, save_config, session_for,
    store_token,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// The active profile. An explicitly requested profile must exist; the
/// implicit default may be missing, in which case built-in defaults apply.
pub fn active_profile(global: &GlobalOpts, config: &Config) -> Result<(String, Profile), CliError> {
    let name = active_profile_name(global, config);
    match config.profiles.get(&name) {
        Some(profile) => Ok((name, profile.clone())),
        None if global.profile.is_some() => Err(CliError::ProfileNotFound {
            available: available_profiles(config),
            name,
        }),
        None => Ok((name, Profile::default())),
    }
}

pub fn available_profiles(config: &Config) -> String {
    let mut names: Vec<_> = config.profiles.keys().cloned().collect();
    if names.is_empty() {
        return "(none)".into();
    }
    names.sort();
    names.join(", ")
}

/// Translate a `Profile` + global flags into a `MonitorConfig`.
///
/// CLI flag overrides take priority over profile values.
pub fn resolve_profile(
    profile: &Profile,
    defaults: &Defaults,
    global: &GlobalOpts,
) -> Result<MonitorConfig, CliError> {
    let mut monitor = bedwatch_config::profile_to_monitor_config(profile)?;

    // 1. API URL (flag > env > profile)
    if let Some(ref url_str) = global.api_url {
        monitor.api_url = url_str.parse().map_err(|_| CliError::Validation {
            field: "api-url".into(),
            reason: format!("invalid URL: {url_str}"),
        })?;
    }

    // 2. TLS verification
    if global.insecure {
        monitor.tls = TlsVerification::DangerAcceptInvalid;
    }

    // 3. Timeout (flag > profile > defaults)
    monitor.timeout = Duration::from_secs(
        global
            .timeout
            .or(profile.timeout)
            .unwrap_or(defaults.timeout),
    );

    Ok(monitor)
}

/// Session for this invocation: `--token` wins, then the profile's chain.
pub fn resolve_session(
    profile: &Profile,
    profile_name: &str,
    global: &GlobalOpts,
) -> Arc<dyn SessionProvider> {
    match global.token {
        Some(ref token) => Arc::new(MemorySession::with_token(token.as_str())),
        None => session_for(profile, profile_name),
    }
}
