//! Core types for Courtyard.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod phone;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use phone::{CountryCode, DEFAULT_PHONE_COUNTRY_CODE, PHONE_COUNTRY_CODES, format_phone_display};
pub use status::*;
