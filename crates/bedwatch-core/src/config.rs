// ── Runtime connection configuration ──
//
// These types describe how to reach the backend and how the views behave.
// They never touch disk: the CLI builds a `MonitorConfig` from its profile
// and hands it in, together with a session provider.

use std::time::Duration;

use url::Url;

/// Default backend location, matching a locally running API server.
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api/";

/// Default live-update polling interval.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// TLS verification strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Skip verification (self-signed development backends).
    DangerAcceptInvalid,
}

/// Configuration for talking to one backend.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// API base URL (e.g., `http://localhost:8000/api/`).
    pub api_url: Url,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Request timeout.
    pub timeout: Duration,
    /// How often live updates refetch the dashboard.
    pub poll_interval: Duration,
    /// Substitute demo data when the backend is unreachable.
    pub demo_fallback: bool,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            api_url: Url::parse(DEFAULT_API_URL).expect("default API URL is valid"),
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            poll_interval: DEFAULT_POLL_INTERVAL,
            demo_fallback: true,
        }
    }
}
