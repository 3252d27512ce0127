//! Cached gateway reads shared by every service.

use std::sync::Arc;

use courtyard_core::{
    AccessLog, DashboardStats, Document, Member, MemberId, Payment, Vehicle,
};

use crate::backend::BackendError;
use crate::cache::{Collection, KeyPrefix, QueryCache, QueryKey};
use crate::gateway::Gateway;

/// Result of a cached read.
pub type QueryResult<T> = Result<T, Arc<BackendError>>;

/// Gateway plus cache. Cheap to clone; clones share both.
pub struct Queries<G> {
    gateway: Arc<G>,
    cache: QueryCache,
}

impl<G> Clone for Queries<G> {
    fn clone(&self) -> Self {
        Self {
            gateway: Arc::clone(&self.gateway),
            cache: self.cache.clone(),
        }
    }
}

impl<G: Gateway> Queries<G> {
    #[must_use]
    pub const fn new(gateway: Arc<G>, cache: QueryCache) -> Self {
        Self { gateway, cache }
    }

    #[must_use]
    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    #[must_use]
    pub const fn cache(&self) -> &QueryCache {
        &self.cache
    }

    /// The members list, optionally narrowed server-side.
    pub async fn members(&self, search: Option<&str>) -> QueryResult<Arc<Vec<Member>>> {
        let key = QueryKey::members(search);
        let search = match &key {
            QueryKey::Members { search } => search.clone(),
            _ => None,
        };
        self.cache
            .fetch(key, || async move {
                self.gateway
                    .list_members(search.as_deref())
                    .await
                    .map(Arc::new)
            })
            .await
    }

    /// One member; `None` when the id does not exist.
    pub async fn member(&self, id: MemberId) -> QueryResult<Option<Arc<Member>>> {
        self.cache
            .fetch(QueryKey::Member(id), || async move {
                self.gateway.get_member(id).await.map(|m| m.map(Arc::new))
            })
            .await
    }

    pub async fn vehicles(&self, id: MemberId) -> QueryResult<Arc<Vec<Vehicle>>> {
        self.cache
            .fetch(
                QueryKey::MemberCollection(id, Collection::Vehicles),
                || async move { self.gateway.list_vehicles(id).await.map(Arc::new) },
            )
            .await
    }

    pub async fn payments(&self, id: MemberId) -> QueryResult<Arc<Vec<Payment>>> {
        self.cache
            .fetch(
                QueryKey::MemberCollection(id, Collection::Payments),
                || async move { self.gateway.list_payments(id).await.map(Arc::new) },
            )
            .await
    }

    pub async fn access_logs(&self, id: MemberId) -> QueryResult<Arc<Vec<AccessLog>>> {
        self.cache
            .fetch(
                QueryKey::MemberCollection(id, Collection::AccessLogs),
                || async move { self.gateway.list_access_logs(id).await.map(Arc::new) },
            )
            .await
    }

    pub async fn documents(&self, id: MemberId) -> QueryResult<Arc<Vec<Document>>> {
        self.cache
            .fetch(
                QueryKey::MemberCollection(id, Collection::Documents),
                || async move { self.gateway.list_documents(id).await.map(Arc::new) },
            )
            .await
    }

    pub async fn dashboard_stats(&self) -> QueryResult<DashboardStats> {
        self.cache
            .fetch(QueryKey::DashboardStats, || async move {
                self.gateway.dashboard_stats().await
            })
            .await
    }

    pub async fn recent_members(&self, limit: usize) -> QueryResult<Arc<Vec<Member>>> {
        self.cache
            .fetch(QueryKey::RecentMembers(limit), || async move {
                self.gateway.recent_members(limit).await.map(Arc::new)
            })
            .await
    }

    /// Drop everything derived from the members table.
    pub(crate) async fn invalidate_member_lists(&self) {
        self.cache.invalidate_prefix(&KeyPrefix::member_lists()).await;
        self.cache.invalidate_prefix(&KeyPrefix::dashboard()).await;
    }
}
