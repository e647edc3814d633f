// Session endpoints.
//
// The login call is exempt from session eviction: a 401 here means wrong
// credentials, not an expired token.

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{LoginRequest, LoginResponse};

impl ApiClient {
    /// Exchange email + password for a bearer token and store it in the
    /// session provider.
    ///
    /// `POST auth/login`
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<(), Error> {
        debug!(email, "logging in");

        let body = LoginRequest {
            email,
            password: password.expose_secret(),
        };
        let resp: LoginResponse = self.post("auth/login", &body).await.map_err(|e| match e {
            Error::Api {
                status: 400 | 401 | 403,
                message,
            } => Error::Authentication { message },
            other => other,
        })?;

        self.session().store(SecretString::from(resp.access_token));
        debug!(token_type = %resp.token_type, "login successful");
        Ok(())
    }

    /// Drop the local session. The backend issues stateless tokens, so
    /// nothing is sent over the wire.
    pub fn logout(&self) {
        self.session().clear();
        debug!("session cleared");
    }
}
