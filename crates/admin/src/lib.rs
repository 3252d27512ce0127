//! Courtyard Admin library.
//!
//! The console core for a residential association: a gateway over the
//! hosted backend's REST and auth surfaces, a query cache with request
//! de-duplication, the member list engine, profile aggregation, form
//! validation, ID-card issuance and the dashboard.
//!
//! Front ends (the `cy-cli` binary, tests) drive it through [`state::Console`].
//!
//! # Security
//!
//! The backend anon key and the operator's session tokens are held as
//! `SecretString`s and redacted from `Debug` output. Row-level access is
//! enforced by the backend; the console sends whichever token is current.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod backend;
pub mod cache;
pub mod components;
pub mod config;
pub mod error;
pub mod filters;
pub mod gateway;
pub mod models;
pub mod services;
pub mod state;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use backend::{BackendClient, BackendError};
pub use config::ConsoleConfig;
pub use error::AppError;
pub use state::Console;
