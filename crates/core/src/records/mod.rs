//! Backend row shapes.
//!
//! Every record here mirrors one table of the hosted backend. Nullable
//! columns are `Option`s; the remaining columns are always present.

pub mod access_log;
pub mod dashboard;
pub mod document;
pub mod member;
pub mod payment;
pub mod vehicle;

pub use access_log::{AccessLog, NewAccessLog};
pub use dashboard::DashboardStats;
pub use document::{Document, NewDocument};
pub use member::Member;
pub use payment::{NewPayment, Payment, PaymentChanges, PaymentsSummary};
pub use vehicle::{NewVehicle, Vehicle, VehicleChanges};
