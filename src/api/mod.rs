//! API module
//!
//! HTTP endpoints, shared state and middleware.

pub mod middleware;
pub mod routes;

use std::sync::Arc;

use axum::{middleware as axum_middleware, Router};
use tower_http::trace::TraceLayer;

use crate::auth::{SessionAuthority, SignedSessionAuthority};
use crate::config::Config;
use crate::store::LedgerStore;

pub use routes::{protected_routes, public_routes};

/// State shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub store: LedgerStore,
    pub config: Arc<Config>,
    pub sessions: Arc<dyn SessionAuthority>,
}

impl AppState {
    /// State with locally signed sessions keyed by `config.session_secret`.
    pub fn new(store: LedgerStore, config: Config) -> Self {
        let sessions = Arc::new(SignedSessionAuthority::new(config.session_secret.clone()));
        Self {
            store,
            config: Arc::new(config),
            sessions,
        }
    }

    /// Swap in another identity provider.
    pub fn with_sessions(mut self, sessions: Arc<dyn SessionAuthority>) -> Self {
        self.sessions = sessions;
        self
    }
}

/// Build the application router
pub fn create_router(state: AppState) -> Router {
    // Axum layers run last-added first: logging -> session gate -> handler
    let protected = protected_routes().layer(axum_middleware::from_fn_with_state(
        state.clone(),
        middleware::require_session,
    ));

    Router::new()
        .merge(public_routes())
        .merge(protected)
        .layer(axum_middleware::from_fn(middleware::logging_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
