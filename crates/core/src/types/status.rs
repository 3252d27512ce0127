//! Status enums for members and their dependent records.
//!
//! The backend stores these as capitalised text (`"Active"`, `"Owner"`), so
//! every enum serializes with its variant name verbatim.

use serde::{Deserialize, Serialize};

/// Error returned when parsing one of the status enums from text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind}: {value}")]
pub struct ParseStatusError {
    /// Which enum was being parsed.
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

macro_rules! text_enum {
    ($(#[$meta:meta])* $name:ident, $kind:literal, { $($(#[$vmeta:meta])* $variant:ident),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// The backend's text representation.
            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => stringify!($variant)),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = ParseStatusError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim() {
                    $(stringify!($variant) => Ok(Self::$variant),)+
                    _ => Err(ParseStatusError {
                        kind: $kind,
                        value: s.to_owned(),
                    }),
                }
            }
        }
    };
}

text_enum!(
    /// Residency type of a member.
    MemberType, "member type", {
        /// Owns the unit.
        Owner,
        /// Rents the unit.
        Tenant,
    }
);

text_enum!(
    /// Membership status.
    MemberStatus, "member status", {
        Active,
        Inactive,
    }
);

text_enum!(
    /// Payment lifecycle status.
    PaymentStatus, "payment status", {
        Pending,
        Completed,
        Failed,
        Refunded,
    }
);

text_enum!(
    /// Outcome of a gate or door access attempt.
    AccessStatus, "access status", {
        Granted,
        Denied,
    }
);

#[allow(clippy::derivable_impls)]
impl Default for MemberType {
    fn default() -> Self {
        Self::Owner
    }
}

#[allow(clippy::derivable_impls)]
impl Default for MemberStatus {
    fn default() -> Self {
        Self::Active
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_text() {
        for status in PaymentStatus::ALL {
            assert_eq!(status.as_str().parse::<PaymentStatus>().unwrap(), *status);
        }
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        let err = "active".parse::<MemberStatus>().unwrap_err();
        assert_eq!(err.kind, "member status");
        assert_eq!(err.to_string(), "invalid member status: active");
    }

    #[test]
    fn test_serde_uses_backend_text() {
        let json = serde_json::to_string(&MemberType::Tenant).unwrap();
        assert_eq!(json, "\"Tenant\"");
        let parsed: AccessStatus = serde_json::from_str("\"Denied\"").unwrap();
        assert_eq!(parsed, AccessStatus::Denied);
    }

    #[test]
    fn test_defaults_match_new_member_form() {
        assert_eq!(MemberType::default(), MemberType::Owner);
        assert_eq!(MemberStatus::default(), MemberStatus::Active);
    }
}
