//! Unified error handling for the console.

use std::sync::Arc;

use thiserror::Error;

use crate::backend::BackendError;
use crate::backend::auth::AuthError;
use crate::config::ConfigError;
use crate::models::member_form::FieldErrors;

/// Application-level error type for the console.
#[derive(Debug, Error)]
pub enum AppError {
    /// A gateway call failed.
    #[error("Backend error: {0}")]
    Backend(Arc<BackendError>),

    /// The member form was rejected before anything was sent.
    #[error("Validation failed: {0}")]
    Validation(#[from] FieldErrors),

    /// Sign-in, refresh or sign-out failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Console configuration is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The backend rejected the session or anon key; sign in again.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
}

impl From<BackendError> for AppError {
    fn from(err: BackendError) -> Self {
        Self::from(Arc::new(err))
    }
}

impl From<Arc<BackendError>> for AppError {
    fn from(err: Arc<BackendError>) -> Self {
        match err.as_ref() {
            BackendError::Unauthorized(message) => Self::Unauthorized(message.clone()),
            _ => Self::Backend(err),
        }
    }
}

impl AppError {
    /// Whether this error originates outside the operator's control.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        matches!(self, Self::Backend(_) | Self::Config(_))
    }

    /// Message safe to show an operator.
    ///
    /// Backend failures hide their details; everything else is already
    /// phrased for display.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Backend(_) => "The backend could not complete the request".to_string(),
            Self::Validation(errors) => errors.to_string(),
            Self::NotFound(what) => format!("{what} not found"),
            Self::Auth(err) => err.to_string(),
            Self::Unauthorized(_) => "Your session has ended, sign in again".to_string(),
            Self::Config(_) => self.to_string(),
        }
    }

    /// Log the error, capturing server-side failures with Sentry.
    pub fn report(&self) {
        if self.is_server_error() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Console operation failed"
            );
        } else {
            tracing::warn!(error = %self, "Console operation rejected");
        }
    }
}

/// Set the Sentry user context from the signed-in operator.
pub fn set_sentry_user(user_id: &str, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}
