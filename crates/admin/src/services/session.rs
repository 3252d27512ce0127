//! Operator session lifecycle.
//!
//! The current session lives in a `watch` channel. [`SessionManager::start`]
//! spawns the listener that refreshes the access token ahead of expiry;
//! [`SessionManager::shutdown`] stops it and publishes the signed-out state.
//! The backend client reads the same channel for its bearer token.

use std::sync::Arc;

use chrono::Utc;
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, instrument, warn};

use courtyard_core::Email;

use crate::backend::auth::{AuthError, AuthSession, Authenticator};
use crate::error::{clear_sentry_user, set_sentry_user};

/// How long before expiry the token is refreshed.
pub const DEFAULT_REFRESH_MARGIN: chrono::Duration = chrono::Duration::seconds(60);

/// Wait between attempts after a transient refresh failure.
const RETRY_DELAY: std::time::Duration = std::time::Duration::from_secs(30);

pub type SessionReceiver = watch::Receiver<Option<AuthSession>>;

pub struct SessionManager<A: Authenticator + 'static> {
    auth: Arc<A>,
    sender: Arc<watch::Sender<Option<AuthSession>>>,
    refresh_task: Option<JoinHandle<()>>,
}

impl<A: Authenticator + 'static> SessionManager<A> {
    /// Start signed out, with the refresh listener running.
    #[must_use]
    pub fn start(auth: Arc<A>) -> Self {
        Self::start_with_margin(auth, DEFAULT_REFRESH_MARGIN)
    }

    #[must_use]
    pub fn start_with_margin(auth: Arc<A>, margin: chrono::Duration) -> Self {
        let (sender, _) = watch::channel(None);
        let sender = Arc::new(sender);
        let refresh_task = tokio::spawn(refresh_loop(
            Arc::clone(&auth),
            Arc::clone(&sender),
            margin,
        ));

        Self {
            auth,
            sender,
            refresh_task: Some(refresh_task),
        }
    }

    /// The session as of now, `None` when signed out.
    #[must_use]
    pub fn current(&self) -> Option<AuthSession> {
        self.sender.borrow().clone()
    }

    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        self.sender.borrow().is_some()
    }

    /// A receiver that observes every session change.
    #[must_use]
    pub fn subscribe(&self) -> SessionReceiver {
        self.sender.subscribe()
    }

    /// Sign in with email and password and publish the session.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` when the backend rejects the
    /// credentials, or `AuthError::Backend` when it cannot be reached. The
    /// published state is left unchanged on failure.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn sign_in(
        &self,
        email: &Email,
        password: &SecretString,
    ) -> Result<AuthSession, AuthError> {
        let session = self.auth.sign_in_with_password(email, password).await?;

        set_sentry_user(&session.user.id, session.user.email.as_deref());
        info!(user_id = %session.user.id, expires_at = %session.expires_at, "Signed in");
        self.sender.send_replace(Some(session.clone()));
        Ok(session)
    }

    /// Revoke the session on the backend and publish the signed-out state.
    ///
    /// The local state is cleared even when the backend call fails.
    #[instrument(skip(self))]
    pub async fn sign_out(&self) {
        let Some(session) = self.sender.send_replace(None) else {
            return;
        };

        if let Err(err) = self.auth.sign_out(&session).await {
            warn!(error = %err, "Backend sign-out failed; local session cleared");
        }
        clear_sentry_user();
        info!(user_id = %session.user.id, "Signed out");
    }

    /// Stop the refresh listener and publish the signed-out state.
    pub fn shutdown(&mut self) {
        if let Some(task) = self.refresh_task.take() {
            task.abort();
        }
        if self.sender.send_replace(None).is_some() {
            clear_sentry_user();
        }
    }
}

impl<A: Authenticator + 'static> Drop for SessionManager<A> {
    fn drop(&mut self) {
        if let Some(task) = self.refresh_task.take() {
            task.abort();
        }
    }
}

async fn refresh_loop<A: Authenticator>(
    auth: Arc<A>,
    sender: Arc<watch::Sender<Option<AuthSession>>>,
    margin: chrono::Duration,
) {
    let mut rx = sender.subscribe();

    loop {
        let current = rx.borrow_and_update().clone();
        let Some(session) = current else {
            if rx.changed().await.is_err() {
                return;
            }
            continue;
        };

        let wait = session.refresh_in(Utc::now(), margin);
        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    return;
                }
            }
            () = tokio::time::sleep(wait) => {
                let outcome = tokio::select! {
                    outcome = auth.refresh(&session.refresh_token) => outcome,
                    changed = rx.changed() => {
                        if changed.is_err() {
                            return;
                        }
                        continue;
                    }
                };

                match outcome {
                    Ok(next) => {
                        let expires_at = next.expires_at;
                        if replace_if_current(&sender, &session, Some(next)) {
                            info!(%expires_at, "Session refreshed");
                        }
                    }
                    Err(AuthError::SessionExpired | AuthError::InvalidCredentials) => {
                        if replace_if_current(&sender, &session, None) {
                            warn!(user_id = %session.user.id, "Session expired; signing out");
                            clear_sentry_user();
                        }
                    }
                    Err(err) => {
                        warn!(error = %err, "Session refresh failed; retrying");
                        tokio::select! {
                            changed = rx.changed() => {
                                if changed.is_err() {
                                    return;
                                }
                            }
                            () = tokio::time::sleep(RETRY_DELAY) => {}
                        }
                    }
                }
            }
        }
    }
}

/// Publish `next` only while `refreshed` is still the current session.
fn replace_if_current(
    sender: &watch::Sender<Option<AuthSession>>,
    refreshed: &AuthSession,
    next: Option<AuthSession>,
) -> bool {
    sender.send_if_modified(|current| {
        let still_current = current.as_ref().is_some_and(|c| {
            c.refresh_token.expose_secret() == refreshed.refresh_token.expose_secret()
        });
        if still_current {
            *current = next;
        }
        still_current
    })
}
