//! Documents attached to a member (leases, IDs, NOCs).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{DocumentId, MemberId};

/// A stored file reference belonging to one member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub member_id: MemberId,
    pub document_name: String,
    pub document_type: String,
    pub file_url: String,
    /// Size in bytes.
    pub file_size: Option<i64>,
    pub mime_type: Option<String>,
    pub uploaded_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Document {
    /// Whether the document has an expiry at or before `now`.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expiry| expiry <= now)
    }
}

/// Insert payload for a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewDocument {
    pub member_id: MemberId,
    pub document_name: String,
    pub document_type: String,
    pub file_url: String,
    pub file_size: Option<i64>,
    pub mime_type: Option<String>,
    pub uploaded_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}
