//! Route table and shared state. One route per method+path; everything
//! else falls through to the standard 404 envelope.

use std::sync::Arc;

use axum::{
    Router,
    extract::FromRef,
    http::{Method, header},
    routing::{get, post},
};
use axum_extra::extract::cookie::Key;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::config::Config;
use crate::db::ConnectionManager;
use crate::error::CafeError;
use crate::handlers::{admin, health, posts};

#[derive(Clone)]
pub struct CafeState {
    pub manager: Arc<ConnectionManager>,
    pub config: Arc<Config>,
    key: Key,
}

impl CafeState {
    pub fn new(config: Config) -> Self {
        let key = match config.session_secret.as_deref() {
            Some(secret) if secret.len() >= 64 => Key::from(secret.as_bytes()),
            Some(_) => {
                warn!("CAFE_SESSION_SECRET is shorter than 64 bytes; using a random key");
                Key::generate()
            }
            None => Key::generate(),
        };
        Self {
            manager: Arc::new(ConnectionManager::new(&config)),
            config: Arc::new(config),
            key,
        }
    }
}

impl FromRef<CafeState> for Key {
    fn from_ref(state: &CafeState) -> Key {
        state.key.clone()
    }
}

pub fn cafe_router(state: CafeState) -> Router {
    // Deliberately open cross-origin policy: any origin, fixed method and
    // header allow-lists. Not a security boundary.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        .route("/api/health", get(health::health_handler))
        .route(
            "/api/posts",
            get(posts::list_posts).post(posts::create_post),
        )
        .route(
            "/api/posts/{id}",
            get(posts::get_post)
                .put(posts::update_post)
                .delete(posts::delete_post),
        )
        .route("/api/login", post(admin::login))
        .route("/api/logout", post(admin::logout))
        .fallback(unmatched_route)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn unmatched_route() -> CafeError {
    CafeError::NotFound
}
