use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

pub mod error;
pub mod handlers;
pub mod state;

pub use state::AppState;

pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::permissive();

    Router::new()
        .route("/", get(handlers::status))
        .route("/api/session", post(handlers::create_session))
        .route(
            "/api/session/:session_id/history",
            get(handlers::get_history).delete(handlers::clear_history),
        )
        .route("/api/chat", get(handlers::chat))
        .route("/api/articles", get(handlers::list_articles))
        .layer(cors)
        .with_state(Arc::new(state))
}

pub mod prelude {
    pub use super::{create_app, AppState};
    pub use nw_core::{Article, Error, Result};
}
