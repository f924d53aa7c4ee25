//! Domain types and pure helpers shared by the shopgate crates.
//!
//! Nothing in here touches the network, the database, or the filesystem.

pub mod error;
pub mod roles;
pub mod sanitize;
pub mod types;
pub mod uploads;
pub mod validation;
