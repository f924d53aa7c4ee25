//! Store seams used by the API layer.
//!
//! The auth and catalog services depend on these traits rather than on a
//! concrete pool, so the same code runs against PostgreSQL in production
//! and against [`memory`] stores in tests and local demos.

use async_trait::async_trait;
use shopgate_core::roles::Role;
use shopgate_core::types::DbId;

use crate::models::product::{CreateProduct, Product, UpdateProduct};
use crate::models::user::{CreateUser, User};

pub mod memory;
pub mod postgres;

pub use memory::{MemoryProductStore, MemoryUserStore};
pub use postgres::{PgProductStore, PgUserStore};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique index rejected the write (e.g. racing registrations).
    #[error("Duplicate value violates unique constraint: {0}")]
    UniqueViolation(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Credential lookups and account creation.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Find a user by email or username.
    async fn find_by_identity(&self, identity: &str) -> Result<Option<User>, StoreError>;

    async fn find_by_id(&self, id: DbId) -> Result<Option<User>, StoreError>;

    /// Single compound check: does any user hold this email OR this username?
    async fn exists(&self, email: &str, username: &str) -> Result<bool, StoreError>;

    async fn create(&self, input: &CreateUser) -> Result<User, StoreError>;

    /// Toggle account activation. Returns `false` if the user does not exist.
    async fn set_active(&self, id: DbId, is_active: bool) -> Result<bool, StoreError>;

    /// Change a user's role. Returns `false` if the user does not exist.
    async fn set_role(&self, id: DbId, role: Role) -> Result<bool, StoreError>;
}

/// Product catalog persistence.
#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn create(&self, input: &CreateProduct) -> Result<Product, StoreError>;

    /// All products, newest first.
    async fn list(&self) -> Result<Vec<Product>, StoreError>;

    async fn update(&self, id: DbId, input: &UpdateProduct)
        -> Result<Option<Product>, StoreError>;

    async fn delete(&self, id: DbId) -> Result<bool, StoreError>;
}
