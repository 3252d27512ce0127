use async_trait::async_trait;
use tracing::instrument;

use courtyard_core::{AccessLog, AccessLogId, MemberId, NewAccessLog};

use crate::backend::{BackendClient, BackendError, Order, TableQuery};

const TABLE: &str = "access_logs";

/// Gate and door access history.
#[async_trait]
pub trait AccessLogGateway: Send + Sync {
    /// A member's access attempts, most recent first.
    async fn list_access_logs(&self, member: MemberId) -> Result<Vec<AccessLog>, BackendError>;

    async fn create_access_log(&self, entry: &NewAccessLog) -> Result<AccessLog, BackendError>;

    async fn delete_access_log(&self, id: AccessLogId) -> Result<(), BackendError>;
}

#[async_trait]
impl AccessLogGateway for BackendClient {
    #[instrument(skip(self), fields(member_id = %member))]
    async fn list_access_logs(&self, member: MemberId) -> Result<Vec<AccessLog>, BackendError> {
        let query = TableQuery::from(TABLE)
            .eq("member_id", member)
            .order("accessed_at", Order::Desc);
        self.select(&query).await
    }

    #[instrument(skip_all, fields(member_id = %entry.member_id))]
    async fn create_access_log(&self, entry: &NewAccessLog) -> Result<AccessLog, BackendError> {
        self.insert(TABLE, entry).await
    }

    #[instrument(skip(self), fields(access_log_id = %id))]
    async fn delete_access_log(&self, id: AccessLogId) -> Result<(), BackendError> {
        self.delete(&TableQuery::from(TABLE).eq("id", id)).await
    }
}
