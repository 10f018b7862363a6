//! API endpoints.

mod comments;
mod dashboard;
mod health;
mod likes;
mod playlists;
mod subscriptions;
mod tweets;
mod users;
mod videos;

use axum::Router;

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .nest("/users", users::router())
        .nest("/videos", videos::router())
        .nest("/comments", comments::router())
        .nest("/likes", likes::router())
        .nest("/tweets", tweets::router())
        .nest("/playlist", playlists::router())
        .nest("/subscriptions", subscriptions::router())
        .nest("/dashboard", dashboard::router())
}
