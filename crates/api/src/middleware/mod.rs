//! Authentication and authorization middleware extractors.
//!
//! - [`auth::AuthUser`] -- The live, active user behind a Bearer access token.
//! - [`rbac::RequireAdmin`] -- Requires the `admin` role.

pub mod auth;
pub mod rbac;
