//! Courtyard Core - Shared types library.
//!
//! This crate provides the record types used across all Courtyard components:
//! - `admin` - Console library (gateway, cache, list engine, profile aggregation)
//! - `cli` - Command-line front end for the console
//!
//! # Architecture
//!
//! The core crate contains only types and pure helpers - no I/O, no HTTP
//! clients. Rows are owned by the hosted backend; everything here is a
//! transient in-memory copy.
//!
//! # Modules
//!
//! - [`types`] - Newtype ids, emails, status enums and phone formatting
//! - [`records`] - Backend row shapes (members and their dependents)

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod records;
pub mod types;

pub use records::*;
pub use types::*;
