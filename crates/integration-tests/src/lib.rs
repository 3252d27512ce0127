//! Integration tests for Courtyard.
//!
//! # Running Tests
//!
//! ```bash
//! # In-memory tests
//! cargo test -p courtyard-integration-tests
//!
//! # Live backend tests (needs COURTYARD_BACKEND_URL, COURTYARD_BACKEND_ANON_KEY,
//! # COURTYARD_OPERATOR_EMAIL and COURTYARD_OPERATOR_PASSWORD)
//! cargo test -p courtyard-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `member_directory` - List engine, validation and mutations through the console
//! - `profiles` - Profile aggregation, ID cards and dashboard
//! - `live_backend` - The same flows against a hosted backend

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use courtyard_admin::Console;
use courtyard_admin::config::{BackendConfig, CacheConfig, ConsoleConfig};
use courtyard_admin::testing::{InMemoryGateway, fixtures};
use courtyard_core::{Member, MemberStatus};
use secrecy::SecretString;

/// Configuration for in-memory consoles; the backend section is never used.
///
/// # Panics
///
/// Never: the URL is a constant.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn test_config() -> ConsoleConfig {
    ConsoleConfig {
        backend: BackendConfig {
            url: "http://localhost:54321".parse().unwrap(),
            anon_key: SecretString::from("in-memory-anon-key".to_string()),
            request_timeout: Duration::from_secs(5),
        },
        cache: CacheConfig::default(),
        default_page_size: 10,
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
    }
}

/// A console over a fresh in-memory gateway.
#[must_use]
pub fn console() -> (Console<InMemoryGateway>, Arc<InMemoryGateway>) {
    let gateway = Arc::new(InMemoryGateway::default());
    (Console::new(test_config(), Arc::clone(&gateway)), gateway)
}

/// Day `n` of a fixed month, for deterministic creation order.
///
/// # Panics
///
/// Never: the base date is a constant.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn day(n: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 1, 9, 0, 0).unwrap() + chrono::Duration::days(n)
}

/// Seed `count` residents named `Resident 1..=count`, created one day
/// apart; every third is inactive and every even one has a card.
pub fn seed_residents(gateway: &InMemoryGateway, count: i64) -> Vec<Member> {
    (1..=count)
        .map(|n| {
            let mut member = fixtures::member_created_at(&format!("Resident {n}"), day(n));
            member.member_id = format!("M-{n:04}");
            member.id_card_created = n % 2 == 0;
            if n % 3 == 0 {
                member.status = MemberStatus::Inactive;
            }
            gateway.seed_member(member)
        })
        .collect()
}
