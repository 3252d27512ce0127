//! Credential check.

use chrono::Local;
use tracing::info;

use super::{CliError, Connection};

/// Report the signed-in operator and when the session expires.
///
/// # Errors
///
/// Returns `CliError::MissingEnvVar` when the connection carries no session.
pub fn show(connection: &Connection) -> Result<(), CliError> {
    let session = connection
        .session()
        .ok_or(CliError::MissingEnvVar("COURTYARD_OPERATOR_EMAIL"))?;

    info!(
        "Signed in as {} ({})",
        session.user.email.as_deref().unwrap_or("no email"),
        session.user.id
    );
    info!(
        "Session expires {}",
        session.expires_at.with_timezone(&Local).format("%b %-d, %Y %H:%M")
    );
    Ok(())
}
