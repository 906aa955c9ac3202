//! API middleware.

#![allow(missing_docs)]

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use pawgram_core::{
    ConnectionService, ContestService, FeedService, GuardianshipService, LeaderboardService,
    NotificationService, VoteService,
};
use pawgram_db::repositories::{PhotoRepository, UserRepository};

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub contest_service: ContestService,
    pub leaderboard_service: LeaderboardService,
    pub feed_service: FeedService,
    pub connection_service: ConnectionService,
    pub guardianship_service: GuardianshipService,
    pub vote_service: VoteService,
    pub notification_service: NotificationService,
    pub user_repo: UserRepository,
    pub photo_repo: PhotoRepository,
}

/// Authentication middleware.
///
/// Resolves a `Bearer` token to a user and stores it in request
/// extensions for [`crate::extractors::AuthUser`] to pick up. Requests
/// without a valid token pass through unauthenticated; handlers that
/// require a user reject them.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(auth_header) = req.headers().get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
        && let Ok(Some(user)) = state.user_repo.find_by_token(token).await
    {
        req.extensions_mut().insert(user);
    }

    next.run(req).await
}
