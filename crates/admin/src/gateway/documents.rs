use async_trait::async_trait;
use tracing::instrument;

use courtyard_core::{Document, DocumentId, MemberId, NewDocument};

use crate::backend::{BackendClient, BackendError, Order, TableQuery};

const TABLE: &str = "documents";

/// Files attached to a member.
#[async_trait]
pub trait DocumentGateway: Send + Sync {
    /// A member's documents, most recently uploaded first.
    async fn list_documents(&self, member: MemberId) -> Result<Vec<Document>, BackendError>;

    async fn create_document(&self, document: &NewDocument) -> Result<Document, BackendError>;

    async fn delete_document(&self, id: DocumentId) -> Result<(), BackendError>;
}

#[async_trait]
impl DocumentGateway for BackendClient {
    #[instrument(skip(self), fields(member_id = %member))]
    async fn list_documents(&self, member: MemberId) -> Result<Vec<Document>, BackendError> {
        let query = TableQuery::from(TABLE)
            .eq("member_id", member)
            .order("uploaded_at", Order::Desc);
        self.select(&query).await
    }

    #[instrument(skip_all, fields(member_id = %document.member_id))]
    async fn create_document(&self, document: &NewDocument) -> Result<Document, BackendError> {
        self.insert(TABLE, document).await
    }

    #[instrument(skip(self), fields(document_id = %id))]
    async fn delete_document(&self, id: DocumentId) -> Result<(), BackendError> {
        self.delete(&TableQuery::from(TABLE).eq("id", id)).await
    }
}
