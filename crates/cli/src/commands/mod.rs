//! Console commands.
//!
//! Every command runs against a [`Console`]; [`connect`] builds one over the
//! hosted backend and signs the operator in when credentials are available.
//!
//! # Environment Variables
//!
//! - `COURTYARD_BACKEND_URL` / `COURTYARD_BACKEND_ANON_KEY` - Backend connection
//! - `COURTYARD_OPERATOR_EMAIL` - Operator to sign in as (or `--operator`)
//! - `COURTYARD_OPERATOR_PASSWORD` - That operator's password

pub mod dashboard;
pub mod id_cards;
pub mod login;
pub mod members;

use courtyard_admin::backend::auth::{AuthError, AuthSession};
use courtyard_admin::config::{ConfigError, ConsoleConfig};
use courtyard_admin::services::SessionManager;
use courtyard_admin::{AppError, BackendClient, Console};
use courtyard_core::Email;
use secrecy::SecretString;
use thiserror::Error;

const PASSWORD_VAR: &str = "COURTYARD_OPERATOR_PASSWORD";

/// Errors a command can end with.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    App(#[from] AppError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Argument that parsed but is not acceptable.
    #[error("Invalid {0}: {1}")]
    InvalidArgument(&'static str, String),
}

impl CliError {
    /// Log the failure; backend and internal failures also go to Sentry.
    pub fn report(&self) {
        match self {
            Self::App(err) => err.report(),
            other => tracing::error!("Command failed: {other}"),
        }
    }
}

/// Operator credentials for password sign-in.
pub struct Credentials {
    pub email: Email,
    pub password: SecretString,
}

impl Credentials {
    /// Credentials for `email`, with the password taken from the environment.
    ///
    /// # Errors
    ///
    /// Returns `CliError::InvalidArgument` for a malformed email, or
    /// `CliError::MissingEnvVar` when no password is set.
    pub fn from_env(email: &str) -> Result<Self, CliError> {
        let email =
            Email::parse(email).map_err(|e| CliError::InvalidArgument("email", e.to_string()))?;
        let password = std::env::var(PASSWORD_VAR)
            .map(SecretString::from)
            .map_err(|_| CliError::MissingEnvVar(PASSWORD_VAR))?;
        Ok(Self { email, password })
    }
}

/// A connected console and the session that authorizes it.
pub struct Connection {
    pub console: Console<BackendClient>,
    manager: SessionManager<BackendClient>,
}

impl Connection {
    #[must_use]
    pub fn session(&self) -> Option<AuthSession> {
        self.manager.current()
    }

    /// Revoke the session, if any, and stop the refresh listener.
    pub async fn close(mut self) {
        self.manager.sign_out().await;
        self.manager.shutdown();
    }
}

/// Connect to the backend, signing in when `credentials` are given.
///
/// Without credentials requests carry only the anon key, so the backend's
/// row-level policies decide what is visible.
///
/// # Errors
///
/// Returns `CliError::App` if the client cannot be built, or
/// `CliError::Auth` if sign-in fails.
pub async fn connect(
    config: &ConsoleConfig,
    credentials: Option<&Credentials>,
) -> Result<Connection, CliError> {
    let (console, manager) = Console::connect(config)?;

    if let Some(credentials) = credentials {
        manager
            .sign_in(&credentials.email, &credentials.password)
            .await?;
    } else {
        tracing::warn!("No operator credentials; requests use the anon key only");
    }

    Ok(Connection { console, manager })
}
