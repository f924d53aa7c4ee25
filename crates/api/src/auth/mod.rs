//! Authentication and authorization primitives.
//!
//! - [`jwt`] -- access/refresh token signers and their configuration.
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`session`] -- registration and login, producing a token pair.
//! - [`refresh`] -- refresh-token exchange with rotation.
//! - [`gate`] -- bearer-token authorization with live subject lookup.
//! - [`cookies`] -- `Set-Cookie` values for the token pair.

pub mod cookies;
pub mod gate;
pub mod jwt;
pub mod password;
pub mod refresh;
pub mod session;
