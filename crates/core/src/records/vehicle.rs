//! Vehicle records registered to a member.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{MemberId, VehicleId};

/// A vehicle belonging to exactly one member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: VehicleId,
    pub member_id: MemberId,
    pub vehicle_name: String,
    pub vehicle_type: String,
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub color: Option<String>,
    pub license_plate: String,
    pub icon: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Vehicle {
    /// `"<year> <make> <model>"`, skipping missing parts.
    #[must_use]
    pub fn description(&self) -> String {
        let year = self.year.map(|y| y.to_string());
        [year.as_deref(), self.make.as_deref(), self.model.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.trim().is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Insert payload for a vehicle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewVehicle {
    pub member_id: MemberId,
    pub vehicle_name: String,
    pub vehicle_type: String,
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub color: Option<String>,
    pub license_plate: String,
    pub icon: String,
}

/// Partial update for a vehicle. Unset fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VehicleChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub make: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_plate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_description_skips_missing_parts() {
        let now = Utc::now();
        let vehicle = Vehicle {
            id: VehicleId::random(),
            member_id: MemberId::random(),
            vehicle_name: "Family car".to_string(),
            vehicle_type: "Car".to_string(),
            make: Some("Honda".to_string()),
            model: None,
            year: Some(2021),
            color: None,
            license_plate: "KA01AB1234".to_string(),
            icon: "directions_car".to_string(),
            created_at: now,
            updated_at: now,
        };
        assert_eq!(vehicle.description(), "2021 Honda");
    }

    #[test]
    fn test_changes_only_serialize_set_fields() {
        let changes = VehicleChanges {
            color: Some("Red".to_string()),
            ..Default::default()
        };
        assert_eq!(serde_json::to_string(&changes).unwrap(), r#"{"color":"Red"}"#);
    }
}
