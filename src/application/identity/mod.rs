//! Identity module: authentication and authorization
//!
//! `UserService` owns registration, login, token verification and the
//! approval flow; `gate` holds the role checks applied to verified accounts.

pub mod gate;
pub mod service;

pub use gate::{require_approved, require_owner_or_admin, require_role};
pub use service::{AuthResult, Registration, UserService};
