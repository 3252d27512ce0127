//! Console flows against a hosted backend.
//!
//! These tests require:
//! - `COURTYARD_BACKEND_URL` and `COURTYARD_BACKEND_ANON_KEY` for a backend
//!   with the members schema
//! - `COURTYARD_OPERATOR_EMAIL` and `COURTYARD_OPERATOR_PASSWORD` for an
//!   operator allowed to write members
//!
//! Run with: cargo test -p courtyard-integration-tests -- --ignored

use courtyard_admin::backend::auth::AuthError;
use courtyard_admin::services::{ProfileOutcome, SessionManager};
use courtyard_admin::{BackendClient, Console, ConsoleConfig};
use courtyard_admin::models::MemberForm;
use courtyard_core::{Email, MemberId};
use secrecy::SecretString;

fn env(name: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| panic!("{name} must be set"))
}

async fn signed_in() -> (Console<BackendClient>, SessionManager<BackendClient>) {
    let config = ConsoleConfig::from_env().expect("backend configuration");
    let (console, session) = Console::connect(&config).expect("backend client");

    let email = Email::parse(&env("COURTYARD_OPERATOR_EMAIL")).expect("operator email");
    let password = SecretString::from(env("COURTYARD_OPERATOR_PASSWORD"));
    session
        .sign_in(&email, &password)
        .await
        .expect("operator sign-in");

    (console, session)
}

#[tokio::test]
#[ignore = "Requires a running backend and operator credentials"]
async fn test_wrong_password_is_rejected() {
    let config = ConsoleConfig::from_env().expect("backend configuration");
    let (_console, session) = Console::connect(&config).expect("backend client");

    let email = Email::parse(&env("COURTYARD_OPERATOR_EMAIL")).expect("operator email");
    let err = session
        .sign_in(&email, &SecretString::from("definitely-wrong".to_string()))
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::InvalidCredentials));
    assert!(session.current().is_none());
}

#[tokio::test]
#[ignore = "Requires a running backend and operator credentials"]
async fn test_members_table_and_dashboard_agree() {
    let (console, mut session) = signed_in().await;

    let params = console.members_view_params();
    let page = console.members().list(&params).await.expect("members list");
    let overview = console.dashboard().overview().await.expect("dashboard");

    assert_eq!(page.total_count, overview.stats.total_members);
    assert_eq!(
        overview.id_cards.created + overview.id_cards.pending,
        overview.stats.total_members
    );

    session.shutdown();
}

#[tokio::test]
#[ignore = "Requires a running backend and operator credentials"]
async fn test_create_show_delete_member() {
    let (console, mut session) = signed_in().await;
    let suffix = MemberId::random().to_string();
    let suffix = suffix.get(..8).unwrap_or("test");

    let form = MemberForm {
        name: format!("Integration {suffix}"),
        email: format!("integration+{suffix}@example.com"),
        unit: "T-1".to_string(),
        building: "Test Block".to_string(),
        ..MemberForm::default()
    };
    let created = console.members().create(&form).await.expect("create member");

    let outcome = console.profiles().load(created.id).await;
    let profile = outcome.profile().expect("created member has a profile");
    assert_eq!(profile.member.email, form.email);
    assert!(!profile.has_failures());

    console.members().delete(created.id).await.expect("delete member");
    assert!(matches!(
        console.profiles().load(created.id).await,
        ProfileOutcome::NotFound
    ));

    session.sign_out().await;
    session.shutdown();
}
