use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

pub mod handlers;
pub mod state;

pub use state::AppState;

pub async fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::permissive();

    Router::new()
        .route("/api/load-data", post(handlers::load_data))
        .route("/api/fetch-news", post(handlers::fetch_news))
        .route("/api/praison-status", get(handlers::praison_status))
        .route("/api/chat", post(handlers::chat))
        .route("/api/dashboard", post(handlers::dashboard))
        .route("/api/dashboard/filters", get(handlers::dashboard_filters))
        .route("/api/companies", get(handlers::companies))
        .route("/api/latest-news", get(handlers::latest_news))
        .route("/api/health", get(handlers::health))
        .layer(cors)
        .with_state(Arc::new(state))
}

pub mod prelude {
    pub use crate::AppState;
    pub use msme_core::{Error, Result};
}
