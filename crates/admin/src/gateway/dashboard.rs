use async_trait::async_trait;
use serde::Deserialize;
use tracing::instrument;

use courtyard_core::{DashboardStats, Member, MemberStatus};

use crate::backend::{BackendClient, BackendError, Order, TableQuery};

use super::PaymentGateway;

/// Aggregates for the dashboard.
#[async_trait]
pub trait DashboardGateway: Send + Sync {
    /// Member counts by status and ID-card flag, plus completed revenue.
    async fn dashboard_stats(&self) -> Result<DashboardStats, BackendError>;

    /// The `limit` most recently created members, newest first.
    async fn recent_members(&self, limit: usize) -> Result<Vec<Member>, BackendError>;
}

#[derive(Deserialize)]
struct MemberFlagsRow {
    status: MemberStatus,
    #[serde(default)]
    id_card_created: bool,
}

#[async_trait]
impl DashboardGateway for BackendClient {
    #[instrument(skip(self))]
    async fn dashboard_stats(&self) -> Result<DashboardStats, BackendError> {
        let members_query = TableQuery::from("members").select("status,id_card_created");
        let (members, payments) = tokio::join!(
            self.select::<MemberFlagsRow>(&members_query),
            self.payments_summary(),
        );

        let members = members?;
        Ok(DashboardStats::from_rows(
            members
                .into_iter()
                .map(|row| (row.status, row.id_card_created)),
            payments?,
        ))
    }

    #[instrument(skip(self))]
    async fn recent_members(&self, limit: usize) -> Result<Vec<Member>, BackendError> {
        let query = TableQuery::from("members")
            .order("created_at", Order::Desc)
            .limit(limit);
        self.select(&query).await
    }
}
