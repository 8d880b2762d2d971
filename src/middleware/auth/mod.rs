//! Authentication / authorization middleware.
//!
//! - `gate`: every request except the login endpoint must carry a valid bearer token
//! - `role`: per-route role requirement backed by `RoleGuard`

pub mod gate;
pub mod role;

pub use gate::LOGIN_PATH;
pub use role::require_role;
