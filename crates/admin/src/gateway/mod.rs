//! Typed gateway operations per entity.
//!
//! Each entity gets one trait so tests can substitute an in-memory backend.
//! [`BackendClient`](crate::backend::BackendClient) implements all of them
//! over the REST surface.
//!
//! Single-record reads return `Ok(None)` for a missing row; only transport
//! and backend failures are errors.

mod access_logs;
mod dashboard;
mod documents;
mod members;
mod payments;
mod vehicles;

pub use access_logs::AccessLogGateway;
pub use dashboard::DashboardGateway;
pub use documents::DocumentGateway;
pub use members::{MEMBER_SEARCH_COLUMNS, MemberGateway};
pub use payments::PaymentGateway;
pub use vehicles::VehicleGateway;

/// Every gateway the console uses.
pub trait Gateway:
    MemberGateway
    + VehicleGateway
    + PaymentGateway
    + AccessLogGateway
    + DocumentGateway
    + DashboardGateway
    + 'static
{
}

impl<T> Gateway for T where
    T: MemberGateway
        + VehicleGateway
        + PaymentGateway
        + AccessLogGateway
        + DocumentGateway
        + DashboardGateway
        + 'static
{
}
