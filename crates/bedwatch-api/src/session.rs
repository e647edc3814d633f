use std::sync::{PoisonError, RwLock};

use secrecy::SecretString;

/// Source of the bearer token attached to every request.
///
/// The client never reads persistent storage itself: whoever builds the
/// [`ApiClient`](crate::ApiClient) hands in a provider. `clear` is called
/// when the backend rejects the session on a protected endpoint.
pub trait SessionProvider: Send + Sync {
    /// The current bearer token, if a session exists.
    fn token(&self) -> Option<SecretString>;

    /// Persist a freshly issued token.
    fn store(&self, token: SecretString);

    /// Evict the stored token.
    fn clear(&self);
}

/// In-process session storage.
///
/// Used by tests and for tokens supplied on the command line or through the
/// environment, where nothing should be written to disk.
#[derive(Debug, Default)]
pub struct MemorySession {
    token: RwLock<Option<SecretString>>,
}

impl MemorySession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(SecretString::from(token.into()))),
        }
    }
}

impl SessionProvider for MemorySession {
    fn token(&self) -> Option<SecretString> {
        self.token.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn store(&self, token: SecretString) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token);
    }

    fn clear(&self) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}
