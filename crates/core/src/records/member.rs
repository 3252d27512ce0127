//! Member (resident) record.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{MemberId, MemberStatus, MemberType};

/// A resident record (owner or tenant) in the association directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Row id.
    pub id: MemberId,
    /// Human-readable member number (e.g. `M-0042`).
    pub member_id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub phone_country_code: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub occupation: Option<String>,
    pub unit: String,
    pub building: String,
    pub residential_address: Option<String>,
    pub mailing_address: Option<String>,
    pub member_type: MemberType,
    pub status: MemberStatus,
    /// Whether a digital ID card has been issued.
    #[serde(default)]
    pub id_card_created: bool,
    pub move_in_date: Option<NaiveDate>,
    pub move_out_date: Option<NaiveDate>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_relationship: Option<String>,
    pub emergency_contact_phone: Option<String>,
    pub emergency_contact_email: Option<String>,
    pub last_access: Option<DateTime<Utc>>,
    pub last_access_location: Option<String>,
    pub avatar_url: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Member {
    /// Whether the member is currently active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == MemberStatus::Active
    }
}
