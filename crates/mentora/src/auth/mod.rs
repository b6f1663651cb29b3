//! Authentication module.
//!
//! Request-pipeline stage that validates a bearer credential and attaches the
//! identity context before downstream handlers run, plus the role gate applied
//! at route registration. Token verification is stateless: signature and
//! expiry against the shared secret, no database lookup.

mod claims;
mod config;
mod error;
mod middleware;

pub use claims::{Claims, Identity};
pub use config::{AuthConfig, ConfigValidationError};
pub use error::AuthError;
pub use middleware::{AuthState, RoleSet, auth_middleware, require_role};

/// Role labels used by the platform.
///
/// The auth core treats roles as opaque strings; these constants exist so the
/// rest of the crate spells them consistently.
pub mod roles {
    pub const STUDENT: &str = "STUDENT";
    pub const MENTOR: &str = "MENTOR";
    pub const ADMIN: &str = "ADMIN";

    /// Labels accepted when assigning a role to an account.
    pub const ALL: &[&str] = &[STUDENT, MENTOR, ADMIN];
}
