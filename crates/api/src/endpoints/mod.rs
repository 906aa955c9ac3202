//! API endpoints.

mod connections;
mod contests;
mod feeds;
mod guardianships;
mod notifications;
mod votes;

use axum::Router;

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/contests", contests::router())
        .nest("/feeds", feeds::router())
        .nest("/votes", votes::router())
        .nest("/connections", connections::router())
        .nest("/guardianships", guardianships::router())
        .nest("/notifications", notifications::router())
}
