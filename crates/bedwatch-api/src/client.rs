// Hand-crafted async HTTP client for the bedwatch backend.
//
// Base path: configurable, `/api/` by default
// Auth: `Authorization: Bearer <token>` from the injected session provider

use std::sync::Arc;

use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::error::Error;
use crate::session::SessionProvider;
use crate::transport::TransportConfig;

/// Path prefixes that never require a session. A 401 from one of these is
/// reported as-is instead of evicting the stored token.
const SESSION_EXEMPT_PREFIXES: &[&str] = &["public", "auth"];

// ── Error response shape from the backend ────────────────────────────

#[derive(serde::Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    detail: Option<serde_json::Value>,
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the bedwatch REST API.
///
/// Every request attaches the bearer token from the [`SessionProvider`] when
/// one is present. Endpoint groups (hospitals, EHR, predictions, auth,
/// public) are implemented as inherent methods in sibling modules to keep
/// this one focused on transport mechanics.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    session: Arc<dyn SessionProvider>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a client for `base_url` (e.g. `http://localhost:8000/api`).
    pub fn new(
        base_url: &str,
        session: Arc<dyn SessionProvider>,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self {
            http,
            base_url,
            session,
        })
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn with_client(
        http: reqwest::Client,
        base_url: &str,
        session: Arc<dyn SessionProvider>,
    ) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self {
            http,
            base_url,
            session,
        })
    }

    /// Guarantee a trailing slash so relative joins land under the base path.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        Ok(url)
    }

    /// The API base URL (always ends with `/`).
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The session provider backing this client.
    pub fn session(&self) -> &Arc<dyn SessionProvider> {
        &self.session
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Append a relative path (e.g. `"hospitals/3"`) to the base URL,
    /// percent-encoding each segment.
    fn url(&self, path: &str) -> Result<Url, Error> {
        self.url_from_segments(path.split('/'))
    }

    /// Append pre-split segments. Each one is encoded whole, so a `/`
    /// inside caller data stays in its segment.
    fn url_from_segments<'a>(
        &self,
        segments: impl IntoIterator<Item = &'a str>,
    ) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn is_session_exempt(path: &str) -> bool {
        let group = path.split('/').next().unwrap_or_default();
        SESSION_EXEMPT_PREFIXES.contains(&group)
    }

    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.session.token() {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        }
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url}");

        let resp = self.authorize(self.http.get(url)).send().await?;
        self.handle_response(path, resp).await
    }

    /// GET where some segments carry caller data (e.g. a city name).
    pub(crate) async fn get_segments<T: DeserializeOwned>(
        &self,
        segments: &[&str],
    ) -> Result<T, Error> {
        let url = self.url_from_segments(segments.iter().copied())?;
        debug!("GET {url}");

        let group = segments.first().copied().unwrap_or_default();
        let resp = self.authorize(self.http.get(url)).send().await?;
        self.handle_response(group, resp).await
    }

    pub(crate) async fn get_with_params<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url} params={params:?}");

        let resp = self
            .authorize(self.http.get(url).query(params))
            .send()
            .await?;
        self.handle_response(path, resp).await
    }

    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        let resp = self.authorize(self.http.post(url).json(body)).send().await?;
        self.handle_response(path, resp).await
    }

    pub(crate) async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        let resp = self.authorize(self.http.post(url)).send().await?;
        self.handle_response(path, resp).await
    }

    pub(crate) async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("PUT {url}");

        let resp = self.authorize(self.http.put(url).json(body)).send().await?;
        self.handle_response(path, resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(
        &self,
        path: &str,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            serde_json::from_str(&body).map_err(|e| {
                let preview: String = body.chars().take(200).collect();
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body: body.clone(),
                }
            })
        } else if status == reqwest::StatusCode::UNAUTHORIZED && !Self::is_session_exempt(path) {
            warn!(path, "session rejected; evicting stored token");
            self.session.clear();
            Err(Error::LoginRequired)
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    async fn parse_error(status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        let raw = resp.text().await.unwrap_or_default();

        let detail = serde_json::from_str::<ErrorResponse>(&raw)
            .ok()
            .and_then(|e| e.detail)
            .map(|d| match d {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            });

        Error::Api {
            status: status.as_u16(),
            message: detail.unwrap_or_else(|| {
                if raw.is_empty() {
                    status.to_string()
                } else {
                    raw
                }
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemorySession;

    fn client(base: &str) -> ApiClient {
        ApiClient::with_client(
            reqwest::Client::new(),
            base,
            Arc::new(MemorySession::new()),
        )
        .expect("valid base url")
    }

    #[test]
    fn base_url_gains_trailing_slash() {
        let c = client("http://localhost:8000/api");
        assert_eq!(c.base_url().as_str(), "http://localhost:8000/api/");
    }

    #[test]
    fn url_appends_and_encodes_segments() {
        let c = client("http://localhost:8000/api/");
        let url = c.url("public/recommendation/New Delhi").expect("url");
        assert_eq!(
            url.as_str(),
            "http://localhost:8000/api/public/recommendation/New%20Delhi"
        );
    }

    #[test]
    fn segments_keep_slashes_encoded() {
        let c = client("http://localhost:8000/api/");
        let url = c
            .url_from_segments(["public", "recommendation", "Hubli/Dharwad"])
            .expect("url");
        assert_eq!(
            url.as_str(),
            "http://localhost:8000/api/public/recommendation/Hubli%2FDharwad"
        );
    }

    #[test]
    fn public_and_auth_paths_are_exempt() {
        assert!(ApiClient::is_session_exempt("public/hospitals"));
        assert!(ApiClient::is_session_exempt("auth/login"));
        assert!(!ApiClient::is_session_exempt("hospitals"));
        assert!(!ApiClient::is_session_exempt("publicity/x"));
    }
}
