use async_trait::async_trait;
use tracing::instrument;

use courtyard_core::{Member, MemberId};

use crate::backend::{BackendClient, BackendError, Order, TableQuery};
use crate::models::member_form::{MemberUpdate, NewMember};

/// Columns a member search matches against.
pub const MEMBER_SEARCH_COLUMNS: &[&str] = &["name", "email", "member_id"];

const TABLE: &str = "members";

/// Member directory operations.
#[async_trait]
pub trait MemberGateway: Send + Sync {
    /// Every member ordered by member number, optionally narrowed by a
    /// case-insensitive search over name, email and member number.
    async fn list_members(&self, search: Option<&str>) -> Result<Vec<Member>, BackendError>;

    /// One member, or `None` if the id does not exist.
    async fn get_member(&self, id: MemberId) -> Result<Option<Member>, BackendError>;

    async fn create_member(&self, member: &NewMember) -> Result<Member, BackendError>;

    async fn update_member(
        &self,
        id: MemberId,
        changes: &MemberUpdate,
    ) -> Result<Member, BackendError>;

    /// Delete a member. The backend cascades to its dependents.
    async fn delete_member(&self, id: MemberId) -> Result<(), BackendError>;
}

#[async_trait]
impl MemberGateway for BackendClient {
    #[instrument(skip(self))]
    async fn list_members(&self, search: Option<&str>) -> Result<Vec<Member>, BackendError> {
        let mut query = TableQuery::from(TABLE).order("member_id", Order::Asc);
        if let Some(term) = search {
            query = query.search_any(MEMBER_SEARCH_COLUMNS, term);
        }
        self.select(&query).await
    }

    #[instrument(skip(self), fields(member_id = %id))]
    async fn get_member(&self, id: MemberId) -> Result<Option<Member>, BackendError> {
        self.select_single(&TableQuery::from(TABLE).eq("id", id))
            .await
    }

    #[instrument(skip_all, fields(unit = %member.payload.unit))]
    async fn create_member(&self, member: &NewMember) -> Result<Member, BackendError> {
        self.insert(TABLE, member).await
    }

    #[instrument(skip(self, changes), fields(member_id = %id))]
    async fn update_member(
        &self,
        id: MemberId,
        changes: &MemberUpdate,
    ) -> Result<Member, BackendError> {
        self.update(&TableQuery::from(TABLE).eq("id", id), changes)
            .await
    }

    #[instrument(skip(self), fields(member_id = %id))]
    async fn delete_member(&self, id: MemberId) -> Result<(), BackendError> {
        self.delete(&TableQuery::from(TABLE).eq("id", id)).await
    }
}
