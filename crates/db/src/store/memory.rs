//! In-process stores.
//!
//! Used by the integration tests and by `STORE_BACKEND=memory` for local
//! runs without PostgreSQL. Uniqueness of username and email is enforced
//! under the write lock, mirroring the `uq_users_*` indexes.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use shopgate_core::roles::Role;
use shopgate_core::types::DbId;
use tokio::sync::RwLock;

use super::{ProductStore, StoreError, UserStore};
use crate::models::product::{CreateProduct, Product, UpdateProduct};
use crate::models::user::{CreateUser, User};

struct Table<T> {
    last_id: DbId,
    rows: BTreeMap<DbId, T>,
}

// Manual impl: the derive would demand `T: Default`.
impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            last_id: 0,
            rows: BTreeMap::new(),
        }
    }
}

impl<T> Table<T> {
    fn next_id(&mut self) -> DbId {
        self.last_id += 1;
        self.last_id
    }
}

#[derive(Default)]
pub struct MemoryUserStore {
    inner: RwLock<Table<User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_identity(&self, identity: &str) -> Result<Option<User>, StoreError> {
        let table = self.inner.read().await;
        let by_email = table.rows.values().find(|u| u.email == identity);
        let found = by_email.or_else(|| table.rows.values().find(|u| u.username == identity));
        Ok(found.cloned())
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<User>, StoreError> {
        Ok(self.inner.read().await.rows.get(&id).cloned())
    }

    async fn exists(&self, email: &str, username: &str) -> Result<bool, StoreError> {
        let table = self.inner.read().await;
        Ok(table
            .rows
            .values()
            .any(|u| u.email == email || u.username == username))
    }

    async fn create(&self, input: &CreateUser) -> Result<User, StoreError> {
        let mut table = self.inner.write().await;

        if table.rows.values().any(|u| u.email == input.email) {
            return Err(StoreError::UniqueViolation("uq_users_email".into()));
        }
        if table.rows.values().any(|u| u.username == input.username) {
            return Err(StoreError::UniqueViolation("uq_users_username".into()));
        }

        let now = Utc::now();
        let user = User {
            id: table.next_id(),
            full_name: input.full_name.clone(),
            username: input.username.clone(),
            email: input.email.clone(),
            password_hash: input.password_hash.clone(),
            role: input.role,
            profile_photo: None,
            two_fa_secret: None,
            two_fa_enabled: None,
            two_fa_qr: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        table.rows.insert(user.id, user.clone());
        Ok(user)
    }

    async fn set_active(&self, id: DbId, is_active: bool) -> Result<bool, StoreError> {
        let mut table = self.inner.write().await;
        Ok(match table.rows.get_mut(&id) {
            Some(user) => {
                user.is_active = is_active;
                user.updated_at = Utc::now();
                true
            }
            None => false,
        })
    }

    async fn set_role(&self, id: DbId, role: Role) -> Result<bool, StoreError> {
        let mut table = self.inner.write().await;
        Ok(match table.rows.get_mut(&id) {
            Some(user) => {
                user.role = role;
                user.updated_at = Utc::now();
                true
            }
            None => false,
        })
    }
}

#[derive(Default)]
pub struct MemoryProductStore {
    inner: RwLock<Table<Product>>,
}

impl MemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductStore for MemoryProductStore {
    async fn create(&self, input: &CreateProduct) -> Result<Product, StoreError> {
        let mut table = self.inner.write().await;
        let now = Utc::now();
        let product = Product {
            id: table.next_id(),
            title: input.title.clone(),
            description: input.description.clone(),
            price: input.price,
            main_image: input.main_image.clone(),
            secondary_images: input.secondary_images.clone(),
            link: input.link.clone(),
            status: input.status,
            created_at: now,
            updated_at: now,
        };
        table.rows.insert(product.id, product.clone());
        Ok(product)
    }

    async fn list(&self) -> Result<Vec<Product>, StoreError> {
        let table = self.inner.read().await;
        // Ids are monotonic, so reverse id order is newest first.
        Ok(table.rows.values().rev().cloned().collect())
    }

    async fn update(
        &self,
        id: DbId,
        input: &UpdateProduct,
    ) -> Result<Option<Product>, StoreError> {
        let mut table = self.inner.write().await;
        let Some(product) = table.rows.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(title) = &input.title {
            product.title = title.clone();
        }
        if let Some(description) = &input.description {
            product.description = description.clone();
        }
        if let Some(price) = input.price {
            product.price = price;
        }
        if let Some(main_image) = &input.main_image {
            product.main_image = main_image.clone();
        }
        if let Some(images) = &input.secondary_images {
            product.secondary_images = images.clone();
        }
        if let Some(link) = &input.link {
            product.link = Some(link.clone());
        }
        if let Some(status) = input.status {
            product.status = status;
        }
        product.updated_at = Utc::now();

        Ok(Some(product.clone()))
    }

    async fn delete(&self, id: DbId) -> Result<bool, StoreError> {
        Ok(self.inner.write().await.rows.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::product::ProductStatus;
    use assert_matches::assert_matches;

    fn new_user(username: &str, email: &str) -> CreateUser {
        CreateUser {
            full_name: "Test User".into(),
            username: username.into(),
            email: email.into(),
            password_hash: "$argon2id$placeholder".into(),
            role: Role::User,
        }
    }

    fn new_product(title: &str) -> CreateProduct {
        CreateProduct {
            title: title.into(),
            description: "desc".into(),
            price: 10.0,
            main_image: "/uploads/products/a.png".into(),
            secondary_images: vec![],
            link: None,
            status: ProductStatus::Active,
        }
    }

    #[tokio::test]
    async fn identity_lookup_matches_email_or_username() {
        let store = MemoryUserStore::new();
        let created = store.create(&new_user("alice", "alice@x.com")).await.unwrap();

        let by_email = store.find_by_identity("alice@x.com").await.unwrap().unwrap();
        let by_name = store.find_by_identity("alice").await.unwrap().unwrap();
        assert_eq!(by_email.id, created.id);
        assert_eq!(by_name.id, created.id);
        assert!(store.find_by_identity("bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn exists_is_a_compound_check() {
        let store = MemoryUserStore::new();
        store.create(&new_user("alice", "alice@x.com")).await.unwrap();

        assert!(store.exists("alice@x.com", "someone").await.unwrap());
        assert!(store.exists("other@x.com", "alice").await.unwrap());
        assert!(!store.exists("other@x.com", "someone").await.unwrap());
    }

    #[tokio::test]
    async fn duplicate_create_is_a_unique_violation() {
        let store = MemoryUserStore::new();
        store.create(&new_user("alice", "alice@x.com")).await.unwrap();

        let err = store
            .create(&new_user("alice", "fresh@x.com"))
            .await
            .unwrap_err();
        assert_matches!(err, StoreError::UniqueViolation(c) if c == "uq_users_username");
    }

    #[tokio::test]
    async fn new_users_default_to_active() {
        let store = MemoryUserStore::new();
        let user = store.create(&new_user("alice", "alice@x.com")).await.unwrap();
        assert!(user.is_active);

        assert!(store.set_active(user.id, false).await.unwrap());
        assert!(!store.find_by_id(user.id).await.unwrap().unwrap().is_active);
        assert!(!store.set_active(999, false).await.unwrap());
    }

    #[tokio::test]
    async fn products_list_newest_first_and_update_partially() {
        let store = MemoryProductStore::new();
        let first = store.create(&new_product("Lamp")).await.unwrap();
        store.create(&new_product("Chair")).await.unwrap();

        let titles: Vec<_> = store.list().await.unwrap().into_iter().map(|p| p.title).collect();
        assert_eq!(titles, vec!["Chair", "Lamp"]);

        let patch = UpdateProduct {
            price: Some(25.0),
            ..Default::default()
        };
        let updated = store.update(first.id, &patch).await.unwrap().unwrap();
        assert_eq!(updated.price, 25.0);
        assert_eq!(updated.title, "Lamp");

        assert!(store.update(42, &patch).await.unwrap().is_none());
        assert!(store.delete(first.id).await.unwrap());
        assert!(!store.delete(first.id).await.unwrap());
    }
}
