//! Password sign-in and token refresh against the backend's auth surface.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;
use tracing::instrument;

use courtyard_core::Email;

use super::{BackendClient, BackendError};

/// Errors from sign-in, refresh and sign-out.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Email or password rejected.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// The refresh token is no longer accepted; sign in again.
    #[error("Session expired, sign in again")]
    SessionExpired,

    /// Any other backend failure.
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// The signed-in operator.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthUser {
    pub id: String,
    pub email: Option<String>,
}

/// A signed-in session.
///
/// Implements `Debug` manually to redact the tokens.
#[derive(Clone)]
pub struct AuthSession {
    pub access_token: SecretString,
    pub refresh_token: SecretString,
    pub expires_at: DateTime<Utc>,
    pub user: AuthUser,
}

impl AuthSession {
    /// Whether the access token has expired at `now`.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// How long until the token should be refreshed, `margin` ahead of expiry.
    #[must_use]
    pub fn refresh_in(&self, now: DateTime<Utc>, margin: Duration) -> std::time::Duration {
        (self.expires_at - margin - now)
            .to_std()
            .unwrap_or(std::time::Duration::ZERO)
    }
}

impl std::fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSession")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .field("user", &self.user)
            .finish()
    }
}

/// Token grant response.
#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    expires_in: i64,
    expires_at: Option<i64>,
    user: AuthUser,
}

impl TokenResponse {
    fn into_session(self, now: DateTime<Utc>) -> AuthSession {
        let expires_at = self
            .expires_at
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .unwrap_or_else(|| now + Duration::seconds(self.expires_in));

        AuthSession {
            access_token: SecretString::from(self.access_token),
            refresh_token: SecretString::from(self.refresh_token),
            expires_at,
            user: self.user,
        }
    }
}

/// Session lifecycle operations against an auth provider.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Exchange an email and password for a session.
    async fn sign_in_with_password(
        &self,
        email: &Email,
        password: &SecretString,
    ) -> Result<AuthSession, AuthError>;

    /// Exchange a refresh token for a new session.
    async fn refresh(&self, refresh_token: &SecretString) -> Result<AuthSession, AuthError>;

    /// Revoke the session server-side.
    async fn sign_out(&self, session: &AuthSession) -> Result<(), AuthError>;
}

impl BackendClient {
    async fn token_grant(
        &self,
        grant_type: &str,
        body: serde_json::Value,
    ) -> Result<TokenResponse, BackendError> {
        let url = self.auth_url("token")?;
        let response = self
            .request(reqwest::Method::POST, url)
            .query(&[("grant_type", grant_type)])
            .json(&body)
            .send()
            .await?;
        self.handle_response(response).await
    }

    fn logout_request(
        &self,
        session: &AuthSession,
    ) -> Result<reqwest::RequestBuilder, BackendError> {
        let url = self.auth_url("logout")?;
        Ok(self.request_as(
            reqwest::Method::POST,
            url,
            session.access_token.expose_secret(),
        ))
    }
}

/// Rejected grants come back as 400 with an `invalid_grant`/`invalid_credentials` code.
fn is_rejected_grant(err: &BackendError) -> bool {
    matches!(
        err,
        BackendError::Api { status: 400, .. } | BackendError::Unauthorized(_)
    )
}

#[async_trait]
impl Authenticator for BackendClient {
    #[instrument(skip(self, password), fields(email = %email))]
    async fn sign_in_with_password(
        &self,
        email: &Email,
        password: &SecretString,
    ) -> Result<AuthSession, AuthError> {
        let body = serde_json::json!({
            "email": email.as_str(),
            "password": password.expose_secret(),
        });

        match self.token_grant("password", body).await {
            Ok(token) => Ok(token.into_session(Utc::now())),
            Err(err) if is_rejected_grant(&err) => Err(AuthError::InvalidCredentials),
            Err(err) => Err(err.into()),
        }
    }

    #[instrument(skip_all)]
    async fn refresh(&self, refresh_token: &SecretString) -> Result<AuthSession, AuthError> {
        let body = serde_json::json!({ "refresh_token": refresh_token.expose_secret() });

        match self.token_grant("refresh_token", body).await {
            Ok(token) => Ok(token.into_session(Utc::now())),
            Err(err) if is_rejected_grant(&err) => Err(AuthError::SessionExpired),
            Err(err) => Err(err.into()),
        }
    }

    #[instrument(skip_all, fields(user_id = %session.user.id))]
    async fn sign_out(&self, session: &AuthSession) -> Result<(), AuthError> {
        let response = self
            .logout_request(session)?
            .send()
            .await
            .map_err(BackendError::from)?;

        if response.status().is_success() {
            return Ok(());
        }

        Err(self.parse_error(response).await.into())
    }
}
