//! Access log entries (gate, lobby, amenity entries).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{AccessLogId, AccessStatus, MemberId};

/// One access attempt by a member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessLog {
    pub id: AccessLogId,
    pub member_id: MemberId,
    pub location: String,
    pub access_method: String,
    pub status: AccessStatus,
    pub accessed_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for an access log entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewAccessLog {
    pub member_id: MemberId,
    pub location: String,
    pub access_method: String,
    pub status: AccessStatus,
    pub accessed_at: DateTime<Utc>,
}
