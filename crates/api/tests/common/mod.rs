#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{header, Method, Request, Response};
use axum::{Extension, Router};
use chrono::Duration;
use http_body_util::BodyExt;
use serde_json::Value;
use shopgate_api::app::build_app;
use shopgate_api::auth::jwt::{AuthConfig, TokenSettings};
use shopgate_api::config::{RateLimitConfig, ServerConfig, StoreBackend};
use shopgate_api::state::AppState;
use shopgate_db::store::{MemoryProductStore, MemoryUserStore};
use tempfile::TempDir;
use tower::ServiceExt;

/// A fully wired app over in-memory stores.
///
/// Holds the temporary upload directory; it is removed when this is dropped.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub users: Arc<MemoryUserStore>,
    pub uploads: TempDir,
}

impl TestApp {
    /// A fresh router handle; each request consumes one.
    pub fn app(&self) -> Router {
        self.router.clone()
    }

    pub fn uploads_dir(&self) -> PathBuf {
        self.uploads.path().to_path_buf()
    }
}

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config(uploads_dir: PathBuf) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        production: false,
        store_backend: StoreBackend::Memory,
        database_url: None,
        uploads_dir,
        rate_limit: RateLimitConfig::default(),
        auth: AuthConfig {
            access: TokenSettings {
                secret: "test-access-secret".into(),
                lifetime: Duration::minutes(15),
            },
            refresh: TokenSettings {
                secret: "test-refresh-secret".into(),
                lifetime: Duration::days(7),
            },
        },
    }
}

/// Peer address every test request appears to come from.
pub const TEST_PEER: &str = "127.0.0.1:40000";

/// Build the full application router with all middleware layers over
/// in-memory stores.
pub fn build_test_app() -> TestApp {
    let uploads = TempDir::new().unwrap();
    let users = Arc::new(MemoryUserStore::new());
    let products = Arc::new(MemoryProductStore::new());

    let state = AppState::new(test_config(uploads.path().to_path_buf()), users.clone(), products);

    TestApp {
        router: with_test_peer(build_app(state.clone()).unwrap()),
        state,
        users,
        uploads,
    }
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

fn json_request(method: Method, uri: &str, token: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn empty_request(method: Method, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, empty_request(Method::GET, uri, None)).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, empty_request(Method::GET, uri, Some(token))).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, json_request(Method::POST, uri, None, &body)).await
}

pub async fn post_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response<Body> {
    send(app, json_request(Method::POST, uri, Some(token), &body)).await
}

pub async fn put_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response<Body> {
    send(app, json_request(Method::PUT, uri, Some(token), &body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, empty_request(Method::DELETE, uri, Some(token))).await
}

/// Send an arbitrary prepared request.
pub async fn request(app: Router, request: Request<Body>) -> Response<Body> {
    send(app, request).await
}

/// Register a user through the API and return the response `data`.
pub async fn register(app: Router, full_name: &str, user_name: &str, email: &str) -> Value {
    let body = serde_json::json!({
        "fullName": full_name,
        "userName": user_name,
        "email": email,
        "password": "secret1",
    });
    let response = post_json(app, "/api/auth/register", body).await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

/// Register `name` and return its access token.
pub async fn access_token_for(test: &TestApp, name: &str) -> (i64, String) {
    let data = register(test.app(), name, name, &format!("{name}@x.com")).await;
    let id = data["user"]["id"].as_i64().unwrap();
    let token = data["accessToken"].as_str().unwrap().to_string();
    (id, token)
}

/// Register `name`, promote it to admin directly in the store, and return its token.
pub async fn admin_token(test: &TestApp, name: &str) -> String {
    use shopgate_core::roles::Role;
    use shopgate_db::store::UserStore;

    let (id, token) = access_token_for(test, name).await;
    test.users.set_role(id, Role::Admin).await.unwrap();
    token
}

/// Stand in for the connect info `axum::serve` attaches to each request.
fn with_test_peer(router: Router) -> Router {
    let peer: SocketAddr = TEST_PEER.parse().unwrap();
    router.layer(Extension(ConnectInfo(peer)))
}
