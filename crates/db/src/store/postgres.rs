//! PostgreSQL-backed stores delegating to the sqlx repositories.

use async_trait::async_trait;
use shopgate_core::roles::Role;
use shopgate_core::types::DbId;

use super::{ProductStore, StoreError, UserStore};
use crate::models::product::{CreateProduct, Product, UpdateProduct};
use crate::models::user::{CreateUser, User};
use crate::repositories::{ProductRepo, UserRepo};
use crate::DbPool;

/// PostgreSQL unique_violation SQLSTATE.
const UNIQUE_VIOLATION: &str = "23505";

/// Map unique-index violations to [`StoreError::UniqueViolation`].
fn classify(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
            let constraint = db_err.constraint().unwrap_or("unknown").to_string();
            tracing::debug!(%constraint, "Unique constraint violated");
            return StoreError::UniqueViolation(constraint);
        }
    }
    StoreError::Database(err)
}

#[derive(Clone)]
pub struct PgUserStore {
    pool: DbPool,
}

impl PgUserStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_identity(&self, identity: &str) -> Result<Option<User>, StoreError> {
        Ok(UserRepo::find_by_identity(&self.pool, identity).await?)
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<User>, StoreError> {
        Ok(UserRepo::find_by_id(&self.pool, id).await?)
    }

    async fn exists(&self, email: &str, username: &str) -> Result<bool, StoreError> {
        Ok(UserRepo::exists_by_email_or_username(&self.pool, email, username).await?)
    }

    async fn create(&self, input: &CreateUser) -> Result<User, StoreError> {
        UserRepo::create(&self.pool, input).await.map_err(classify)
    }

    async fn set_active(&self, id: DbId, is_active: bool) -> Result<bool, StoreError> {
        Ok(UserRepo::set_active(&self.pool, id, is_active).await?)
    }

    async fn set_role(&self, id: DbId, role: Role) -> Result<bool, StoreError> {
        Ok(UserRepo::set_role(&self.pool, id, role).await?)
    }
}

#[derive(Clone)]
pub struct PgProductStore {
    pool: DbPool,
}

impl PgProductStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductStore for PgProductStore {
    async fn create(&self, input: &CreateProduct) -> Result<Product, StoreError> {
        ProductRepo::create(&self.pool, input).await.map_err(classify)
    }

    async fn list(&self) -> Result<Vec<Product>, StoreError> {
        Ok(ProductRepo::list(&self.pool).await?)
    }

    async fn update(
        &self,
        id: DbId,
        input: &UpdateProduct,
    ) -> Result<Option<Product>, StoreError> {
        ProductRepo::update(&self.pool, id, input)
            .await
            .map_err(classify)
    }

    async fn delete(&self, id: DbId) -> Result<bool, StoreError> {
        Ok(ProductRepo::delete(&self.pool, id).await?)
    }
}
