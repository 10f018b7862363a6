//! HTTP API layer for vidshare.
//!
//! - **Endpoints**: users, videos, comments, likes, tweets, playlists,
//!   subscriptions and the channel dashboard
//! - **Extractors**: authentication, JSON / query / multipart input
//! - **Middleware**: bearer-token authentication
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

use axum::{Router, extract::DefaultBodyLimit, middleware as axum_middleware};
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};
use vidshare_common::AppError;

pub use endpoints::router;
use middleware::AppState;

/// The complete application: routes, JSON fallback and the middleware stack.
pub fn app(state: AppState, max_upload_bytes: usize) -> Router {
    router()
        .fallback(not_found)
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth_middleware,
        ))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

async fn not_found() -> AppError {
    AppError::NotFound("Route not found".to_string())
}
