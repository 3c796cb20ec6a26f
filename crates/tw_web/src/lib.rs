use axum::{
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tw_core::{Error, Result};

pub mod handlers;
pub mod response;
pub mod state;

pub use response::{ApiError, ApiResponse};
pub use state::AppState;

/// Builds the API router.
///
/// With `client_origin` set only that origin may call the API from a browser,
/// otherwise CORS is left open.
pub fn create_app(state: AppState, client_origin: Option<&str>) -> Result<Router> {
    let cors = match client_origin {
        Some(origin) => {
            let origin = origin
                .parse::<HeaderValue>()
                .map_err(|e| Error::Config(format!("Invalid client origin '{}': {}", origin, e)))?;
            CorsLayer::new()
                .allow_origin(origin)
                .allow_methods([Method::GET, Method::POST])
                .allow_headers(Any)
        }
        None => CorsLayer::permissive(),
    };

    Ok(Router::new()
        .route("/api/health", get(handlers::health))
        .route("/api/articles/generate", post(handlers::generate_articles))
        .route("/api/articles/all", get(handlers::list_articles))
        .route("/api/articles/:slug", get(handlers::get_article))
        .layer(cors)
        .with_state(Arc::new(state)))
}
