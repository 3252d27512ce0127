//! Member profile aggregation.
//!
//! A profile is the member record plus its four dependent collections. The
//! record is loaded first; only when it exists are the collections
//! requested, concurrently, each keeping its own [`QueryState`] so one
//! failing collection never blanks the others.

use std::sync::Arc;

use chrono::{DateTime, TimeZone};
use tracing::{instrument, warn};

use courtyard_core::{
    AccessLog, Document, Member, MemberId, Payment, Vehicle, format_phone_display,
};

use crate::backend::BackendError;
use crate::cache::{Collection, QueryState};
use crate::filters::{emergency_contact, initials, relative_access_time};
use crate::gateway::Gateway;

use super::queries::Queries;

/// Profile page tab.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ProfileTab {
    #[default]
    Overview,
    Payments,
    Documents,
}

impl ProfileTab {
    pub const ALL: &'static [Self] = &[Self::Overview, Self::Payments, Self::Documents];

    /// Collections the tab shows.
    #[must_use]
    pub const fn collections(self) -> &'static [Collection] {
        match self {
            Self::Overview => &[Collection::Vehicles, Collection::AccessLogs],
            Self::Payments => &[Collection::Payments],
            Self::Documents => &[Collection::Documents],
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Overview => "Overview",
            Self::Payments => "Payments",
            Self::Documents => "Documents",
        }
    }
}

impl std::str::FromStr for ProfileTab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|tab| tab.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown profile tab: {s}"))
    }
}

/// A loaded member with the state of each collection.
#[derive(Debug, Clone)]
pub struct MemberProfile {
    pub member: Arc<Member>,
    pub vehicles: QueryState<Arc<Vec<Vehicle>>>,
    pub payments: QueryState<Arc<Vec<Payment>>>,
    pub access_logs: QueryState<Arc<Vec<AccessLog>>>,
    pub documents: QueryState<Arc<Vec<Document>>>,
    tab: ProfileTab,
}

/// Outcome of loading a profile.
#[derive(Debug, Clone)]
pub enum ProfileOutcome {
    NotFound,
    Failed(Arc<BackendError>),
    Loaded(Box<MemberProfile>),
}

impl ProfileOutcome {
    #[must_use]
    pub fn profile(&self) -> Option<&MemberProfile> {
        match self {
            Self::Loaded(profile) => Some(profile),
            _ => None,
        }
    }
}

/// Display values derived from a profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileSummary {
    pub name: String,
    pub initials: String,
    pub member_number: String,
    /// `"<unit> • <member type>"`
    pub location: String,
    pub phone: String,
    pub emergency_contact: String,
    pub last_access: String,
    pub last_access_location: Option<String>,
    /// Counts are `None` until the collection is ready.
    pub vehicle_count: Option<usize>,
    pub payment_count: Option<usize>,
    pub access_log_count: Option<usize>,
    pub document_count: Option<usize>,
}

fn count<T>(state: &QueryState<Arc<Vec<T>>>) -> Option<usize> {
    state.ready().map(|items| items.len())
}

impl MemberProfile {
    #[must_use]
    pub const fn tab(&self) -> ProfileTab {
        self.tab
    }

    /// Switch tabs. Data already loaded is kept as is.
    pub const fn select_tab(&mut self, tab: ProfileTab) {
        self.tab = tab;
    }

    /// Whether any collection failed to load.
    #[must_use]
    pub const fn has_failures(&self) -> bool {
        self.vehicles.error().is_some()
            || self.payments.error().is_some()
            || self.access_logs.error().is_some()
            || self.documents.error().is_some()
    }

    #[must_use]
    pub fn summary<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> ProfileSummary
    where
        Tz::Offset: std::fmt::Display,
    {
        let m = &self.member;
        ProfileSummary {
            name: m.name.clone(),
            initials: initials(&m.name),
            member_number: m.member_id.clone(),
            location: format!("{} • {}", m.unit, m.member_type),
            phone: format_phone_display(m.phone_country_code.as_deref(), m.phone.as_deref()),
            emergency_contact: emergency_contact(
                m.emergency_contact_name.as_deref(),
                m.emergency_contact_relationship.as_deref(),
            ),
            last_access: relative_access_time(m.last_access, now),
            last_access_location: m.last_access_location.clone(),
            vehicle_count: count(&self.vehicles),
            payment_count: count(&self.payments),
            access_log_count: count(&self.access_logs),
            document_count: count(&self.documents),
        }
    }
}

/// Loads member profiles through the query cache.
pub struct ProfileService<G> {
    queries: Queries<G>,
}

impl<G: Gateway> ProfileService<G> {
    #[must_use]
    pub const fn new(queries: Queries<G>) -> Self {
        Self { queries }
    }

    /// Load the member, then its collections concurrently.
    #[instrument(skip(self), fields(member_id = %id))]
    pub async fn load(&self, id: MemberId) -> ProfileOutcome {
        let member = match self.queries.member(id).await {
            Ok(Some(member)) => member,
            Ok(None) => return ProfileOutcome::NotFound,
            Err(err) => {
                warn!(error = %err, "Member failed to load");
                return ProfileOutcome::Failed(err);
            }
        };

        let (vehicles, payments, access_logs, documents) = tokio::join!(
            self.queries.vehicles(id),
            self.queries.payments(id),
            self.queries.access_logs(id),
            self.queries.documents(id),
        );

        let profile = MemberProfile {
            member,
            vehicles: vehicles.into(),
            payments: payments.into(),
            access_logs: access_logs.into(),
            documents: documents.into(),
            tab: ProfileTab::default(),
        };

        if profile.has_failures() {
            warn!("Some profile collections failed to load");
        }

        ProfileOutcome::Loaded(Box::new(profile))
    }

    /// Re-read every collection of an open profile, keeping its tab.
    ///
    /// Unchanged collections come from the cache; only invalidated ones
    /// reach the gateway.
    pub async fn refresh(&self, profile: &mut MemberProfile) {
        let id = profile.member.id;
        let (vehicles, payments, access_logs, documents) = tokio::join!(
            self.queries.vehicles(id),
            self.queries.payments(id),
            self.queries.access_logs(id),
            self.queries.documents(id),
        );
        profile.vehicles = vehicles.into();
        profile.payments = payments.into();
        profile.access_logs = access_logs.into();
        profile.documents = documents.into();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;
    use crate::cache::QueryCache;
    use crate::config::CacheConfig;
    use crate::testing::{InMemoryGateway, fixtures};

    fn service(gateway: &Arc<InMemoryGateway>) -> ProfileService<InMemoryGateway> {
        ProfileService::new(Queries::new(
            Arc::clone(gateway),
            QueryCache::new(&CacheConfig::default()),
        ))
    }

    #[tokio::test]
    async fn test_missing_member_never_requests_collections() {
        let gateway = Arc::new(InMemoryGateway::default());
        let outcome = service(&gateway).load(MemberId::random()).await;

        assert!(matches!(outcome, ProfileOutcome::NotFound));
        let calls = gateway.calls();
        assert_eq!(calls.get_member, 1);
        assert_eq!(calls.collection_reads(), 0);
    }

    #[tokio::test]
    async fn test_failed_member_reports_single_failure() {
        let gateway = Arc::new(InMemoryGateway::default());
        gateway.fail_on("get_member");

        let outcome = service(&gateway).load(MemberId::random()).await;
        assert!(matches!(outcome, ProfileOutcome::Failed(_)));
        assert_eq!(gateway.calls().collection_reads(), 0);
    }

    #[tokio::test]
    async fn test_failing_collection_keeps_the_others() {
        let gateway = Arc::new(InMemoryGateway::default());
        let member = gateway.seed_member(fixtures::member("Asha Rao"));
        gateway.seed_vehicle(fixtures::vehicle(member.id));
        gateway.seed_payment(fixtures::payment(member.id, 1500));
        gateway.fail_on("list_documents");

        let outcome = service(&gateway).load(member.id).await;
        let profile = outcome.profile().unwrap();

        assert!(profile.documents.error().is_some());
        assert_eq!(profile.vehicles.ready().unwrap().len(), 1);
        assert_eq!(profile.payments.ready().unwrap().len(), 1);
        assert!(profile.access_logs.ready().unwrap().is_empty());
        assert!(profile.has_failures());

        let summary = profile.summary(&Utc::now());
        assert_eq!(summary.vehicle_count, Some(1));
        assert_eq!(summary.document_count, None);
    }

    #[tokio::test]
    async fn test_failed_collection_is_refetched_after_recovery() {
        let gateway = Arc::new(InMemoryGateway::default());
        let member = gateway.seed_member(fixtures::member("Asha Rao"));
        gateway.seed_document(fixtures::document(member.id, "Lease agreement"));
        gateway.fail_on("list_documents");
        let service = service(&gateway);

        let ProfileOutcome::Loaded(mut profile) = service.load(member.id).await else {
            panic!("profile should load");
        };
        assert!(profile.documents.error().is_some());

        gateway.recover("list_documents");
        let before = gateway.calls();
        service.refresh(&mut profile).await;
        let after = gateway.calls();

        assert_eq!(after.list_documents, before.list_documents + 1);
        assert_eq!(after.collection_reads(), before.collection_reads() + 1);
        assert_eq!(profile.documents.ready().unwrap().len(), 1);
        assert!(!profile.has_failures());
    }

    #[tokio::test]
    async fn test_tab_switch_does_not_refetch() {
        let gateway = Arc::new(InMemoryGateway::default());
        let member = gateway.seed_member(fixtures::member("Asha Rao"));
        let service = service(&gateway);

        let ProfileOutcome::Loaded(mut profile) = service.load(member.id).await else {
            panic!("profile should load");
        };
        let before = gateway.calls();

        profile.select_tab(ProfileTab::Payments);
        service.refresh(&mut profile).await;
        profile.select_tab(ProfileTab::Documents);
        service.refresh(&mut profile).await;

        assert_eq!(profile.tab(), ProfileTab::Documents);
        assert_eq!(gateway.calls(), before);
    }

    #[tokio::test]
    async fn test_summary_values() {
        let gateway = Arc::new(InMemoryGateway::default());
        let now = Utc::now();
        let mut seeded = fixtures::member("asha rao kumar");
        seeded.unit = "4B".to_string();
        seeded.phone = Some("98765 43210".to_string());
        seeded.phone_country_code = Some("+91".to_string());
        seeded.emergency_contact_name = Some("Ravi".to_string());
        seeded.emergency_contact_relationship = Some("Brother".to_string());
        seeded.last_access = Some(now - Duration::minutes(5));
        let member = gateway.seed_member(seeded);

        let outcome = service(&gateway).load(member.id).await;
        let summary = outcome.profile().unwrap().summary(&now);

        assert_eq!(summary.initials, "AR");
        assert_eq!(summary.location, "4B • Owner");
        assert_eq!(summary.phone, "🇮🇳 +91 98765 43210");
        assert_eq!(summary.emergency_contact, "Ravi (Brother)");
        assert_eq!(summary.last_access, "5 min ago");
        assert_eq!(summary.vehicle_count, Some(0));
    }

    #[test]
    fn test_tab_collections() {
        assert_eq!(
            ProfileTab::Overview.collections(),
            &[Collection::Vehicles, Collection::AccessLogs]
        );
        assert_eq!("payments".parse::<ProfileTab>().unwrap(), ProfileTab::Payments);
    }
}
