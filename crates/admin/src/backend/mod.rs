//! Client for the hosted backend.
//!
//! The backend exposes two HTTP surfaces under one base URL:
//!
//! - **REST** (`/rest/v1/<table>`): row reads and writes with filters in the
//!   query string (see [`TableQuery`]).
//! - **Auth** (`/auth/v1/...`): password sign-in, token refresh and logout
//!   (see [`auth`]).
//!
//! Every request carries the anon key as `apikey`. `Authorization` carries
//! the signed-in session's access token when one is attached, else the anon
//! key.

pub mod auth;
pub mod query;

pub use query::{Order, TableQuery};

use std::sync::Arc;

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;
use tokio::sync::watch;
use url::Url;

use crate::config::BackendConfig;

use auth::AuthSession;

/// Error code the REST layer returns when a single-row read matched no rows.
pub const NO_ROWS_CODE: &str = "PGRST116";

const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";
const RETURN_REPRESENTATION: &str = "return=representation";

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend returned an error response.
    #[error("API error: {status} - {message}")]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
    },

    /// Rate limited by the backend.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Missing or rejected credentials.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Failed to parse response.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Could not build a request URL.
    #[error("Invalid URL: {0}")]
    Url(String),
}

impl BackendError {
    /// The backend error code, when the response carried one.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Api { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    /// Whether a single-row read matched nothing.
    #[must_use]
    pub fn is_no_rows(&self) -> bool {
        self.code() == Some(NO_ROWS_CODE)
    }
}

/// Error body shapes of both surfaces, merged.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    code: Option<serde_json::Value>,
    error_code: Option<String>,
    message: Option<String>,
    msg: Option<String>,
    error_description: Option<String>,
}

impl ErrorBody {
    fn code(&self) -> Option<String> {
        self.error_code.clone().or_else(|| {
            self.code.as_ref().map(|code| match code {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            })
        })
    }

    fn message(self) -> Option<String> {
        self.message.or(self.msg).or(self.error_description)
    }
}

/// Backend API client.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct BackendClient {
    inner: Arc<BackendClientInner>,
}

struct BackendClientInner {
    client: reqwest::Client,
    base_url: String,
    anon_key: SecretString,
    session: Option<watch::Receiver<Option<AuthSession>>>,
}

impl BackendClient {
    /// Create a new backend client.
    ///
    /// # Errors
    ///
    /// Returns error if the API key is not a valid header value or the HTTP
    /// client fails to build.
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "apikey",
            HeaderValue::from_str(config.anon_key.expose_secret())
                .map_err(|e| BackendError::Parse(format!("Invalid API key format: {e}")))?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(BackendClientInner {
                client,
                base_url: config.url.as_str().trim_end_matches('/').to_string(),
                anon_key: config.anon_key.clone(),
                session: None,
            }),
        })
    }

    /// A client that authorizes requests with the session published on
    /// `session`, falling back to the anon key while signed out.
    #[must_use]
    pub fn with_session(&self, session: watch::Receiver<Option<AuthSession>>) -> Self {
        Self {
            inner: Arc::new(BackendClientInner {
                client: self.inner.client.clone(),
                base_url: self.inner.base_url.clone(),
                anon_key: self.inner.anon_key.clone(),
                session: Some(session),
            }),
        }
    }

    /// Backend base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, BackendError> {
        let raw = format!("{}/{}", self.inner.base_url, path.trim_start_matches('/'));
        Url::parse(&raw).map_err(|e| BackendError::Url(format!("{raw}: {e}")))
    }

    fn table_url(&self, query: &TableQuery) -> Result<Url, BackendError> {
        self.endpoint(&format!("rest/v1/{}", query.table()))
    }

    pub(crate) fn auth_url(&self, path: &str) -> Result<Url, BackendError> {
        self.endpoint(&format!("auth/v1/{path}"))
    }

    /// Bearer token for the current request.
    fn bearer(&self) -> String {
        self.inner
            .session
            .as_ref()
            .and_then(|rx| {
                rx.borrow()
                    .as_ref()
                    .map(|session| session.access_token.expose_secret().to_string())
            })
            .unwrap_or_else(|| self.inner.anon_key.expose_secret().to_string())
    }

    pub(crate) fn request(&self, method: reqwest::Method, url: Url) -> reqwest::RequestBuilder {
        self.request_as(method, url, &self.bearer())
    }

    /// A request authorized with `bearer` instead of the current session.
    pub(crate) fn request_as(
        &self,
        method: reqwest::Method,
        url: Url,
        bearer: &str,
    ) -> reqwest::RequestBuilder {
        self.inner.client.request(method, url).bearer_auth(bearer)
    }

    /// Read every row matching `query`.
    pub(crate) async fn select<T: serde::de::DeserializeOwned>(
        &self,
        query: &TableQuery,
    ) -> Result<Vec<T>, BackendError> {
        let url = self.table_url(query)?;
        let response = self
            .request(reqwest::Method::GET, url)
            .query(&query.to_pairs())
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Read exactly one row; `None` when nothing matched.
    pub(crate) async fn select_single<T: serde::de::DeserializeOwned>(
        &self,
        query: &TableQuery,
    ) -> Result<Option<T>, BackendError> {
        let url = self.table_url(query)?;
        let response = self
            .request(reqwest::Method::GET, url)
            .query(&query.to_pairs())
            .header(ACCEPT, SINGLE_OBJECT)
            .send()
            .await?;

        match self.handle_response(response).await {
            Ok(row) => Ok(Some(row)),
            Err(err) if err.is_no_rows() => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Insert one row and return it as stored.
    pub(crate) async fn insert<T, B>(&self, table: &'static str, body: &B) -> Result<T, BackendError>
    where
        T: serde::de::DeserializeOwned,
        B: serde::Serialize + Sync,
    {
        let url = self.table_url(&TableQuery::from(table))?;
        let response = self
            .request(reqwest::Method::POST, url)
            .header("Prefer", RETURN_REPRESENTATION)
            .header(ACCEPT, SINGLE_OBJECT)
            .json(body)
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Update the single row matching `query` and return it as stored.
    pub(crate) async fn update<T, B>(&self, query: &TableQuery, body: &B) -> Result<T, BackendError>
    where
        T: serde::de::DeserializeOwned,
        B: serde::Serialize + Sync,
    {
        let url = self.table_url(query)?;
        let response = self
            .request(reqwest::Method::PATCH, url)
            .query(&query.filter_pairs())
            .header("Prefer", RETURN_REPRESENTATION)
            .header(ACCEPT, SINGLE_OBJECT)
            .json(body)
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Delete every row matching `query`.
    pub(crate) async fn delete(&self, query: &TableQuery) -> Result<(), BackendError> {
        let url = self.table_url(query)?;
        let response = self
            .request(reqwest::Method::DELETE, url)
            .query(&query.filter_pairs())
            .send()
            .await?;

        if response.status().is_success() {
            return Ok(());
        }

        Err(self.parse_error(response).await)
    }

    /// Handle API response and parse JSON.
    pub(crate) async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, BackendError> {
        if response.status().is_success() {
            return response
                .json()
                .await
                .map_err(|e| BackendError::Parse(format!("Failed to parse response: {e}")));
        }

        Err(self.parse_error(response).await)
    }

    /// Parse an error response from either surface.
    pub(crate) async fn parse_error(&self, response: reqwest::Response) -> BackendError {
        let status = response.status().as_u16();

        if status == 429 {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            return BackendError::RateLimited(retry_after);
        }

        let text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        let body: ErrorBody = serde_json::from_str(&text).unwrap_or_default();
        let code = body.code();
        let message = body.message().unwrap_or(text);

        if status == 401 || status == 403 {
            return BackendError::Unauthorized(message);
        }

        BackendError::Api {
            status,
            code,
            message,
        }
    }
}

impl std::fmt::Debug for BackendClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendClient")
            .field("base_url", &self.inner.base_url)
            .field("session_attached", &self.inner.session.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn client(url: &str) -> BackendClient {
        BackendClient::new(&BackendConfig {
            url: Url::parse(url).unwrap(),
            anon_key: SecretString::from("anon-key-for-tests".to_string()),
            request_timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    #[test]
    fn test_endpoints_join_under_base() {
        let client = client("https://abc.supabase.co/");
        let url = client.table_url(&TableQuery::from("members")).unwrap();
        assert_eq!(url.as_str(), "https://abc.supabase.co/rest/v1/members");

        let url = client.auth_url("token").unwrap();
        assert_eq!(url.as_str(), "https://abc.supabase.co/auth/v1/token");
    }

    #[test]
    fn test_bearer_falls_back_to_anon_key() {
        let client = client("https://abc.supabase.co");
        assert_eq!(client.bearer(), "anon-key-for-tests");

        let (_tx, rx) = watch::channel(None);
        let with_session = client.with_session(rx);
        assert_eq!(with_session.bearer(), "anon-key-for-tests");
    }

    #[test]
    fn test_no_rows_detection() {
        let err = BackendError::Api {
            status: 406,
            code: Some(NO_ROWS_CODE.to_string()),
            message: "JSON object requested, multiple (or no) rows returned".to_string(),
        };
        assert!(err.is_no_rows());
        assert!(!BackendError::Parse("bad".to_string()).is_no_rows());
    }

    #[test]
    fn test_error_body_merges_shapes() {
        let rest: ErrorBody =
            serde_json::from_str(r#"{"code":"23505","message":"duplicate key"}"#).unwrap();
        assert_eq!(rest.code().as_deref(), Some("23505"));
        assert_eq!(rest.message().as_deref(), Some("duplicate key"));

        let auth: ErrorBody = serde_json::from_str(
            r#"{"code":400,"error_code":"invalid_credentials","msg":"Invalid login credentials"}"#,
        )
        .unwrap();
        assert_eq!(auth.code().as_deref(), Some("invalid_credentials"));
        assert_eq!(auth.message().as_deref(), Some("Invalid login credentials"));
    }
}
