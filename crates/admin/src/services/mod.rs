//! Console services over the gateway and query cache.
//!
//! # Services
//!
//! - `queries` - Cached reads shared by every service
//! - `members` - Member list, validated create/edit, delete and dependent records
//! - `profile` - Member profile aggregation with per-collection state
//! - `id_cards` - ID-card studio grid and issuance
//! - `dashboard` - Stats, ID-card split and recent members
//! - `session` - Operator sign-in and token refresh

pub mod dashboard;
pub mod id_cards;
pub mod members;
pub mod profile;
pub mod queries;
pub mod session;

pub use dashboard::{DashboardService, IdCardSplit, Overview};
pub use id_cards::{IdCard, IdCardService, SelectedCard, StudioView};
pub use members::MemberService;
pub use profile::{MemberProfile, ProfileOutcome, ProfileService, ProfileSummary, ProfileTab};
pub use queries::{Queries, QueryResult};
pub use session::{DEFAULT_REFRESH_MARGIN, SessionManager, SessionReceiver};
