//! Repository tests against a live PostgreSQL database.
//!
//! Run with `DATABASE_URL=... cargo test -p shopgate-db -- --ignored`.

use assert_matches::assert_matches;
use shopgate_core::roles::Role;
use shopgate_db::models::product::{CreateProduct, ProductStatus, UpdateProduct};
use shopgate_db::models::user::CreateUser;
use shopgate_db::repositories::{ProductRepo, UserRepo};
use shopgate_db::store::{PgUserStore, StoreError, UserStore};
use sqlx::PgPool;

fn new_user(username: &str, email: &str) -> CreateUser {
    CreateUser {
        full_name: "Repo Test".into(),
        username: username.into(),
        email: email.into(),
        password_hash: "$argon2id$v=19$placeholder".into(),
        role: Role::User,
    }
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn user_defaults_and_identity_lookup(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("alice", "alice@x.com"))
        .await
        .unwrap();
    assert_eq!(user.role, Role::User);
    assert!(user.is_active);

    let by_email = UserRepo::find_by_identity(&pool, "alice@x.com").await.unwrap();
    let by_name = UserRepo::find_by_identity(&pool, "alice").await.unwrap();
    assert_eq!(by_email.map(|u| u.id), Some(user.id));
    assert_eq!(by_name.map(|u| u.id), Some(user.id));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn compound_exists_check(pool: PgPool) {
    UserRepo::create(&pool, &new_user("alice", "alice@x.com"))
        .await
        .unwrap();

    assert!(UserRepo::exists_by_email_or_username(&pool, "alice@x.com", "nobody").await.unwrap());
    assert!(UserRepo::exists_by_email_or_username(&pool, "nobody@x.com", "alice").await.unwrap());
    assert!(!UserRepo::exists_by_email_or_username(&pool, "nobody@x.com", "nobody").await.unwrap());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn unique_index_surfaces_as_unique_violation(pool: PgPool) {
    let store = PgUserStore::new(pool);
    store.create(&new_user("alice", "alice@x.com")).await.unwrap();

    let err = store
        .create(&new_user("alice2", "alice@x.com"))
        .await
        .unwrap_err();
    assert_matches!(err, StoreError::UniqueViolation(c) if c == "uq_users_email");
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn role_and_activation_updates(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("bob", "bob@x.com"))
        .await
        .unwrap();

    assert!(UserRepo::set_role(&pool, user.id, Role::Admin).await.unwrap());
    assert!(UserRepo::set_active(&pool, user.id, false).await.unwrap());

    let reloaded = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert_eq!(reloaded.role, Role::Admin);
    assert!(!reloaded.is_active);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn product_crud(pool: PgPool) {
    let created = ProductRepo::create(
        &pool,
        &CreateProduct {
            title: "Lamp".into(),
            description: "Desk lamp".into(),
            price: 19.5,
            main_image: "/uploads/products/lamp.png".into(),
            secondary_images: vec!["/uploads/products/lamp2.png".into()],
            link: None,
            status: ProductStatus::Active,
        },
    )
    .await
    .unwrap();

    let patch = UpdateProduct {
        status: Some(ProductStatus::Inactive),
        ..Default::default()
    };
    let updated = ProductRepo::update(&pool, created.id, &patch)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.status, ProductStatus::Inactive);
    assert_eq!(updated.title, "Lamp");

    assert_eq!(ProductRepo::list(&pool).await.unwrap().len(), 1);
    assert!(ProductRepo::delete(&pool, created.id).await.unwrap());
    assert!(ProductRepo::find_by_id(&pool, created.id).await.unwrap().is_none());
}
