//! Health check endpoint.

use axum::{Router, routing::get};

use crate::{
    middleware::AppState,
    response::{ApiResponse, Empty},
};

pub fn router() -> Router<AppState> {
    Router::new().route("/healthcheck", get(healthcheck))
}

async fn healthcheck() -> ApiResponse<Empty> {
    ApiResponse::message("Server is running")
}
