//! Query cache for gateway reads.
//!
//! Results are keyed per logical query ([`QueryKey`]) in a `moka` cache.
//! Concurrent reads of the same key share one load, failed loads are never
//! stored, and mutations drop whole key families by prefix
//! ([`KeyPrefix`]) so the next read refetches.
//!
//! Key layout:
//!
//! | key                      | segments                                  |
//! |--------------------------|-------------------------------------------|
//! | members list             | `members / list / <search>`               |
//! | one member               | `members / <id>`                          |
//! | member sub-collection    | `members / <id> / vehicles` (etc.)        |
//! | dashboard stats          | `dashboard / stats`                       |
//! | recent members           | `dashboard / recent / <limit>`            |

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use moka::future::Cache;
use tracing::debug;

use courtyard_core::{AccessLog, DashboardStats, Document, Member, MemberId, Payment, Vehicle};

use crate::backend::BackendError;
use crate::config::CacheConfig;

/// A member's dependent collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Vehicles,
    Payments,
    AccessLogs,
    Documents,
}

impl Collection {
    pub const ALL: &'static [Self] = &[
        Self::Vehicles,
        Self::Payments,
        Self::AccessLogs,
        Self::Documents,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Vehicles => "vehicles",
            Self::Payments => "payments",
            Self::AccessLogs => "access_logs",
            Self::Documents => "documents",
        }
    }
}

/// One logical query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    Members { search: Option<String> },
    Member(MemberId),
    MemberCollection(MemberId, Collection),
    DashboardStats,
    RecentMembers(usize),
}

impl QueryKey {
    /// The members list, normalizing blank searches to none.
    #[must_use]
    pub fn members(search: Option<&str>) -> Self {
        Self::Members {
            search: search
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        }
    }

    /// Path segments used for prefix invalidation.
    #[must_use]
    pub fn segments(&self) -> Vec<String> {
        match self {
            Self::Members { search } => vec![
                "members".to_string(),
                "list".to_string(),
                search.clone().unwrap_or_default(),
            ],
            Self::Member(id) => vec!["members".to_string(), id.to_string()],
            Self::MemberCollection(id, collection) => vec![
                "members".to_string(),
                id.to_string(),
                collection.as_str().to_string(),
            ],
            Self::DashboardStats => vec!["dashboard".to_string(), "stats".to_string()],
            Self::RecentMembers(limit) => vec![
                "dashboard".to_string(),
                "recent".to_string(),
                limit.to_string(),
            ],
        }
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments().join("/"))
    }
}

/// A family of keys sharing leading segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPrefix(Vec<String>);

impl KeyPrefix {
    /// Every members list, whatever the search.
    #[must_use]
    pub fn member_lists() -> Self {
        Self(vec!["members".to_string(), "list".to_string()])
    }

    /// A member's record and all of its collections.
    #[must_use]
    pub fn member(id: MemberId) -> Self {
        Self(vec!["members".to_string(), id.to_string()])
    }

    /// One collection of one member.
    #[must_use]
    pub fn collection(id: MemberId, collection: Collection) -> Self {
        Self(vec![
            "members".to_string(),
            id.to_string(),
            collection.as_str().to_string(),
        ])
    }

    /// Stats and recent members.
    #[must_use]
    pub fn dashboard() -> Self {
        Self(vec!["dashboard".to_string()])
    }

    /// Whether `key` belongs to this family.
    #[must_use]
    pub fn matches(&self, key: &QueryKey) -> bool {
        key.segments().starts_with(&self.0)
    }
}

impl fmt::Display for KeyPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/*", self.0.join("/"))
    }
}

/// Load state of one query as exposed to views.
#[derive(Debug, Clone)]
pub enum QueryState<T> {
    Loading,
    Ready(T),
    Failed(Arc<BackendError>),
}

impl<T> QueryState<T> {
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    #[must_use]
    pub const fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub const fn error(&self) -> Option<&Arc<BackendError>> {
        match self {
            Self::Failed(err) => Some(err),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> QueryState<U> {
        match self {
            Self::Loading => QueryState::Loading,
            Self::Ready(value) => QueryState::Ready(f(value)),
            Self::Failed(err) => QueryState::Failed(err),
        }
    }
}

impl<T> From<Result<T, Arc<BackendError>>> for QueryState<T> {
    fn from(result: Result<T, Arc<BackendError>>) -> Self {
        match result {
            Ok(value) => Self::Ready(value),
            Err(err) => Self::Failed(err),
        }
    }
}

/// Cached value, one variant per result shape.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Members(Arc<Vec<Member>>),
    Member(Option<Arc<Member>>),
    Vehicles(Arc<Vec<Vehicle>>),
    Payments(Arc<Vec<Payment>>),
    AccessLogs(Arc<Vec<AccessLog>>),
    Documents(Arc<Vec<Document>>),
    DashboardStats(DashboardStats),
}

/// A result type the cache can hold.
pub trait Cacheable: Sized {
    fn into_value(self) -> CacheValue;
    fn from_value(value: CacheValue) -> Option<Self>;
}

macro_rules! cacheable {
    ($ty:ty, $variant:ident) => {
        impl Cacheable for $ty {
            fn into_value(self) -> CacheValue {
                CacheValue::$variant(self)
            }

            fn from_value(value: CacheValue) -> Option<Self> {
                match value {
                    CacheValue::$variant(inner) => Some(inner),
                    _ => None,
                }
            }
        }
    };
}

cacheable!(Arc<Vec<Member>>, Members);
cacheable!(Option<Arc<Member>>, Member);
cacheable!(Arc<Vec<Vehicle>>, Vehicles);
cacheable!(Arc<Vec<Payment>>, Payments);
cacheable!(Arc<Vec<AccessLog>>, AccessLogs);
cacheable!(Arc<Vec<Document>>, Documents);
cacheable!(DashboardStats, DashboardStats);

/// Shared query cache. Cheap to clone.
#[derive(Clone)]
pub struct QueryCache {
    inner: Cache<QueryKey, CacheValue>,
}

impl QueryCache {
    #[must_use]
    pub fn new(config: &CacheConfig) -> Self {
        let inner = Cache::builder()
            .max_capacity(config.max_capacity)
            .time_to_live(config.time_to_live)
            .build();
        Self { inner }
    }

    /// Return the cached result for `key`, or run `load` once and cache it.
    ///
    /// Concurrent callers for the same key wait on the same load. A failed
    /// load is returned to every waiter and not cached.
    ///
    /// # Errors
    ///
    /// Returns the load's error, shared between waiters.
    pub async fn fetch<T, F, Fut>(&self, key: QueryKey, load: F) -> Result<T, Arc<BackendError>>
    where
        T: Cacheable,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, BackendError>>,
    {
        if let Some(value) = self.inner.get(&key).await {
            debug!(key = %key, "Query cache hit");
            return Self::unwrap_value(&key, value);
        }

        debug!(key = %key, "Query cache miss");
        let value = self
            .inner
            .try_get_with(key.clone(), async move { load().await.map(Cacheable::into_value) })
            .await?;
        Self::unwrap_value(&key, value)
    }

    /// The cached result for `key`, without loading.
    pub async fn peek<T: Cacheable>(&self, key: &QueryKey) -> Option<T> {
        self.inner.get(key).await.and_then(T::from_value)
    }

    /// Load state for `key` as a view sees it before fetching.
    pub async fn state<T: Cacheable>(&self, key: &QueryKey) -> QueryState<T> {
        self.peek(key)
            .await
            .map_or(QueryState::Loading, QueryState::Ready)
    }

    /// Drop one key.
    pub async fn invalidate(&self, key: &QueryKey) {
        debug!(key = %key, "Invalidating query");
        self.inner.invalidate(key).await;
    }

    /// Drop every key in the family. Returns how many were dropped.
    pub async fn invalidate_prefix(&self, prefix: &KeyPrefix) -> usize {
        let stale: Vec<QueryKey> = self
            .inner
            .iter()
            .filter(|(key, _)| prefix.matches(key))
            .map(|(key, _)| QueryKey::clone(&key))
            .collect();

        for key in &stale {
            self.inner.invalidate(key).await;
        }

        debug!(prefix = %prefix, dropped = stale.len(), "Invalidated query family");
        stale.len()
    }

    /// Drop everything.
    pub fn invalidate_all(&self) {
        self.inner.invalidate_all();
    }

    fn unwrap_value<T: Cacheable>(key: &QueryKey, value: CacheValue) -> Result<T, Arc<BackendError>> {
        T::from_value(value).ok_or_else(|| {
            Arc::new(BackendError::Parse(format!(
                "cached value for {key} has an unexpected shape"
            )))
        })
    }
}

impl fmt::Debug for QueryCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryCache")
            .field("entries", &self.inner.entry_count())
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use super::*;

    fn cache() -> QueryCache {
        QueryCache::new(&CacheConfig::default())
    }

    async fn load_stats(calls: &AtomicUsize) -> Result<DashboardStats, BackendError> {
        calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(20)).await;
        Ok(DashboardStats {
            total_members: 3,
            ..DashboardStats::default()
        })
    }

    #[tokio::test]
    async fn test_concurrent_fetches_share_one_load() {
        let cache = cache();
        let calls = AtomicUsize::new(0);

        let (a, b) = tokio::join!(
            cache.fetch(QueryKey::DashboardStats, || load_stats(&calls)),
            cache.fetch(QueryKey::DashboardStats, || load_stats(&calls)),
        );

        assert_eq!(a.unwrap().total_members, 3);
        assert_eq!(b.unwrap().total_members, 3);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let again: DashboardStats = cache
            .fetch(QueryKey::DashboardStats, || load_stats(&calls))
            .await
            .unwrap();
        assert_eq!(again.total_members, 3);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let cache = cache();
        let calls = AtomicUsize::new(0);

        let failed: Result<DashboardStats, _> = cache
            .fetch(QueryKey::DashboardStats, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(BackendError::Parse("boom".to_string()))
            })
            .await;
        assert!(failed.is_err());
        assert!(cache.state::<DashboardStats>(&QueryKey::DashboardStats).await.is_loading());

        let recovered = cache
            .fetch(QueryKey::DashboardStats, || load_stats(&calls))
            .await;
        assert!(recovered.is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_prefix_invalidation() {
        let cache = cache();
        let id = MemberId::random();
        let other = MemberId::random();
        let empty = || async { Ok(Arc::new(Vec::<Vehicle>::new())) };

        cache
            .fetch(QueryKey::MemberCollection(id, Collection::Vehicles), empty)
            .await
            .unwrap();
        cache
            .fetch(QueryKey::MemberCollection(other, Collection::Vehicles), empty)
            .await
            .unwrap();
        cache
            .fetch(QueryKey::DashboardStats, || async {
                Ok(DashboardStats::default())
            })
            .await
            .unwrap();

        let dropped = cache.invalidate_prefix(&KeyPrefix::member(id)).await;
        assert_eq!(dropped, 1);
        assert!(
            cache
                .peek::<Arc<Vec<Vehicle>>>(&QueryKey::MemberCollection(id, Collection::Vehicles))
                .await
                .is_none()
        );
        assert!(
            cache
                .peek::<Arc<Vec<Vehicle>>>(&QueryKey::MemberCollection(
                    other,
                    Collection::Vehicles
                ))
                .await
                .is_some()
        );
        assert!(cache.peek::<DashboardStats>(&QueryKey::DashboardStats).await.is_some());
    }

    #[test]
    fn test_key_prefixes() {
        let id = MemberId::random();
        assert!(KeyPrefix::member_lists().matches(&QueryKey::members(Some("rao"))));
        assert!(KeyPrefix::member_lists().matches(&QueryKey::members(None)));
        assert!(!KeyPrefix::member_lists().matches(&QueryKey::Member(id)));
        assert!(KeyPrefix::member(id).matches(&QueryKey::Member(id)));
        assert!(
            KeyPrefix::collection(id, Collection::Payments)
                .matches(&QueryKey::MemberCollection(id, Collection::Payments))
        );
        assert!(
            !KeyPrefix::collection(id, Collection::Payments)
                .matches(&QueryKey::MemberCollection(id, Collection::Documents))
        );
        assert!(KeyPrefix::dashboard().matches(&QueryKey::RecentMembers(5)));
    }

    #[test]
    fn test_blank_search_shares_the_unsearched_key() {
        assert_eq!(QueryKey::members(Some("  ")), QueryKey::members(None));
        assert_eq!(QueryKey::members(None).to_string(), "members/list/");
    }

    #[test]
    fn test_shape_mismatch_is_an_error() {
        let err = QueryCache::unwrap_value::<DashboardStats>(
            &QueryKey::DashboardStats,
            CacheValue::Member(None),
        )
        .unwrap_err();
        assert!(err.to_string().contains("unexpected shape"));
    }
}
