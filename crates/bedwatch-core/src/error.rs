// ── Core error types ──
//
// User-facing errors from bedwatch-core. Consumers never match on HTTP
// status codes directly: the `From<bedwatch_api::Error>` impl translates
// transport-layer errors into domain-appropriate variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach backend at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out")]
    Timeout,

    // ── Session errors ───────────────────────────────────────────────
    #[error("Login required: the session is missing or has expired")]
    LoginRequired,

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Not found: {entity_type} {identifier}")]
    NotFound {
        entity_type: String,
        identifier: String,
    },

    #[error("Not enough data: {message}")]
    InsufficientData { message: String },

    #[error("{0}")]
    ValidationFailed(#[from] FormError),

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Why a hospital form was rejected. Checked in declaration order; the
/// first failing rule wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Hospital name is required")]
    MissingName,

    #[error("Location is required")]
    MissingLocation,

    #[error("Total beds must be greater than 0")]
    NonPositiveTotalBeds,

    #[error("ICU beds cannot be negative")]
    NegativeIcuBeds,

    #[error("ICU beds ({icu}) cannot exceed total beds ({total})")]
    IcuExceedsTotal { icu: i64, total: i64 },
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<bedwatch_api::Error> for CoreError {
    fn from(err: bedwatch_api::Error) -> Self {
        match err {
            bedwatch_api::Error::LoginRequired => CoreError::LoginRequired,
            bedwatch_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            bedwatch_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            bedwatch_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            bedwatch_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            bedwatch_api::Error::Api {
                status: 404,
                message,
            } => CoreError::NotFound {
                entity_type: "resource".into(),
                identifier: message,
            },
            bedwatch_api::Error::Api {
                status: 400,
                message,
            } => CoreError::InsufficientData { message },
            bedwatch_api::Error::Api { status, message } => CoreError::Api {
                message,
                status: Some(status),
            },
            bedwatch_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_and_bad_request_get_domain_variants() {
        let nf: CoreError = bedwatch_api::Error::Api {
            status: 404,
            message: "Hospital not found".into(),
        }
        .into();
        assert!(matches!(nf, CoreError::NotFound { .. }));

        let short: CoreError = bedwatch_api::Error::Api {
            status: 400,
            message: "Insufficient historical data".into(),
        }
        .into();
        assert!(matches!(short, CoreError::InsufficientData { .. }));

        let other: CoreError = bedwatch_api::Error::Api {
            status: 500,
            message: "boom".into(),
        }
        .into();
        assert!(matches!(other, CoreError::Api { status: Some(500), .. }));
    }

    #[test]
    fn expired_session_maps_to_login_required() {
        let err: CoreError = bedwatch_api::Error::LoginRequired.into();
        assert!(matches!(err, CoreError::LoginRequired));
    }
}
