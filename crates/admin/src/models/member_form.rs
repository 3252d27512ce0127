//! Member create/edit form and its validation.
//!
//! The form holds raw operator input. Validation checks every field, keeps
//! the first failing rule per field, and only on success produces one of
//! the two write payloads:
//!
//! - [`NewMember`]: the form fields plus every optional profile field sent
//!   as an explicit `null`.
//! - [`MemberEdit`]: the form fields only.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use courtyard_core::{DEFAULT_PHONE_COUNTRY_CODE, Email, Member, MemberStatus, MemberType};

/// A field of the member form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormField {
    Name,
    Email,
    Phone,
    Unit,
    Building,
    MemberType,
    Status,
}

impl FormField {
    /// Backend column name of the field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Unit => "unit",
            Self::Building => "building",
            Self::MemberType => "member_type",
            Self::Status => "status",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One message per invalid field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<FormField, String>);

impl FieldErrors {
    /// Record a message for `field` unless an earlier rule already failed it.
    pub fn insert(&mut self, field: FormField, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    /// Message for `field`, if it failed.
    #[must_use]
    pub fn get(&self, field: FormField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, field: FormField) -> bool {
        self.0.contains_key(&field)
    }

    /// Failed fields in form order.
    pub fn fields(&self) -> impl Iterator<Item = FormField> + '_ {
        self.0.keys().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

/// Raw member form input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub phone_country_code: String,
    pub unit: String,
    pub building: String,
    pub member_type: String,
    pub status: String,
}

impl Default for MemberForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            phone: String::new(),
            phone_country_code: DEFAULT_PHONE_COUNTRY_CODE.to_string(),
            unit: String::new(),
            building: String::new(),
            member_type: MemberType::default().to_string(),
            status: MemberStatus::default().to_string(),
        }
    }
}

impl MemberForm {
    /// Prefill the form for editing `member`.
    #[must_use]
    pub fn from_member(member: &Member) -> Self {
        Self {
            name: member.name.clone(),
            email: member.email.clone(),
            phone: member.phone.clone().unwrap_or_default(),
            phone_country_code: member
                .phone_country_code
                .clone()
                .unwrap_or_else(|| DEFAULT_PHONE_COUNTRY_CODE.to_string()),
            unit: member.unit.clone(),
            building: member.building.clone(),
            member_type: member.member_type.to_string(),
            status: member.status.to_string(),
        }
    }

    /// Validate for creating a member.
    ///
    /// # Errors
    ///
    /// Returns the failing fields when any rule is violated.
    pub fn validate_create(&self) -> Result<NewMember, FieldErrors> {
        self.validate().map(|payload| NewMember {
            payload,
            profile: ProfileDefaults::default(),
        })
    }

    /// Validate for editing an existing member.
    ///
    /// # Errors
    ///
    /// Returns the failing fields when any rule is violated.
    pub fn validate_edit(&self) -> Result<MemberEdit, FieldErrors> {
        self.validate().map(|payload| MemberEdit { payload })
    }

    fn validate(&self) -> Result<MemberPayload, FieldErrors> {
        let mut errors = FieldErrors::default();

        let name = self.name.trim();
        if name.is_empty() {
            errors.insert(FormField::Name, "Name is required");
        }

        let email = self.email.trim();
        if email.is_empty() {
            errors.insert(FormField::Email, "Email is required");
        } else if Email::parse(email).is_err() {
            errors.insert(FormField::Email, "Enter a valid email");
        }

        let unit = self.unit.trim();
        if unit.is_empty() {
            errors.insert(FormField::Unit, "Unit is required");
        }

        let building = self.building.trim();
        if building.is_empty() {
            errors.insert(FormField::Building, "Building is required");
        }

        let member_type = self.member_type.parse::<MemberType>();
        if member_type.is_err() {
            errors.insert(FormField::MemberType, "Member type must be Owner or Tenant");
        }

        let status = self.status.parse::<MemberStatus>();
        if status.is_err() {
            errors.insert(FormField::Status, "Status must be Active or Inactive");
        }

        match (member_type, status) {
            (Ok(member_type), Ok(status)) if errors.is_empty() => Ok(MemberPayload {
                name: name.to_string(),
                email: email.to_string(),
                phone: non_empty(&self.phone),
                phone_country_code: Some(
                    non_empty(&self.phone_country_code)
                        .unwrap_or_else(|| DEFAULT_PHONE_COUNTRY_CODE.to_string()),
                ),
                unit: unit.to_string(),
                building: building.to_string(),
                member_type,
                status,
            }),
            _ => Err(errors),
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// The normalized fields the form edits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberPayload {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub phone_country_code: Option<String>,
    pub unit: String,
    pub building: String,
    pub member_type: MemberType,
    pub status: MemberStatus,
}

/// Optional profile columns a new member starts without.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProfileDefaults {
    pub date_of_birth: Option<NaiveDate>,
    pub occupation: Option<String>,
    pub residential_address: Option<String>,
    pub mailing_address: Option<String>,
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
}

/// Insert payload for a member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewMember {
    #[serde(flatten)]
    pub payload: MemberPayload,
    #[serde(flatten)]
    pub profile: ProfileDefaults,
}

/// Update payload from the edit form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberEdit {
    #[serde(flatten)]
    pub payload: MemberPayload,
}

/// Flag-only update, used when issuing an ID card.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MemberFlags {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_card_created: Option<bool>,
}

/// Any partial member update the console sends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum MemberUpdate {
    Edit(MemberEdit),
    Flags(MemberFlags),
}

impl From<MemberEdit> for MemberUpdate {
    fn from(edit: MemberEdit) -> Self {
        Self::Edit(edit)
    }
}

impl From<MemberFlags> for MemberUpdate {
    fn from(flags: MemberFlags) -> Self {
        Self::Flags(flags)
    }
}

impl MemberUpdate {
    /// Apply the update to a local copy of the row.
    pub fn apply_to(&self, member: &mut Member) {
        match self {
            Self::Edit(MemberEdit { payload }) => {
                member.name.clone_from(&payload.name);
                member.email.clone_from(&payload.email);
                member.phone.clone_from(&payload.phone);
                member
                    .phone_country_code
                    .clone_from(&payload.phone_country_code);
                member.unit.clone_from(&payload.unit);
                member.building.clone_from(&payload.building);
                member.member_type = payload.member_type;
                member.status = payload.status;
            }
            Self::Flags(flags) => {
                if let Some(created) = flags.id_card_created {
                    member.id_card_created = created;
                }
            }
        }
    }
}
