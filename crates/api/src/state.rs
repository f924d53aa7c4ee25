use std::sync::Arc;
use std::time::Instant;

use shopgate_db::store::{ProductStore, UserStore};

use crate::auth::gate::AuthGate;
use crate::auth::jwt::TokenSigners;
use crate::auth::refresh::TokenRefresher;
use crate::auth::session::SessionIssuer;
use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub users: Arc<dyn UserStore>,
    pub products: Arc<dyn ProductStore>,
    /// Access and refresh signers, also consulted for cookie lifetimes.
    pub signers: Arc<TokenSigners>,
    pub sessions: SessionIssuer,
    pub refresher: TokenRefresher,
    pub gate: AuthGate,
    /// Process start, reported as uptime by `/health`.
    pub started_at: Instant,
}

impl AppState {
    /// Wire the auth services over the given stores.
    pub fn new(
        config: ServerConfig,
        users: Arc<dyn UserStore>,
        products: Arc<dyn ProductStore>,
    ) -> Self {
        let signers = Arc::new(TokenSigners::new(&config.auth));

        Self {
            sessions: SessionIssuer::new(users.clone(), signers.clone()),
            refresher: TokenRefresher::new(users.clone(), signers.clone()),
            gate: AuthGate::new(users.clone(), signers.clone()),
            config: Arc::new(config),
            users,
            products,
            signers,
            started_at: Instant::now(),
        }
    }
}
