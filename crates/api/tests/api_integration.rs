//! API integration tests.
//!
//! These tests drive the router end to end over mock databases.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    middleware, Router,
};
use pawgram_api::{auth_middleware, router as api_router, AppState};
use pawgram_common::Clock;
use pawgram_core::{
    ConnectionService, ContestService, FeedService, GuardianshipService, LeaderboardService,
    NotificationService, VoteService,
};
use pawgram_db::entities::{contest, user};
use pawgram_db::repositories::{
    ConnectionRepository, ContestEntryRepository, ContestRepository, GuardianRequestRepository,
    NotificationRepository, PetRepository, PhotoRepository, UserRepository, VoteRepository,
};
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
use std::sync::Arc;
use tower::ServiceExt;

fn create_test_user(id: &str, nickname: &str, token: &str) -> user::Model {
    user::Model {
        id: id.to_string(),
        username: nickname.to_lowercase(),
        nickname: nickname.to_string(),
        avatar_url: None,
        token: Some(token.to_string()),
        created_at: chrono::Utc::now().into(),
        updated_at: None,
    }
}

/// Build app state where every repository shares one mock connection.
/// Query results are consumed in request order, so each test queues
/// exactly the rows its request will ask for.
fn create_test_state(db: DatabaseConnection) -> AppState {
    let db = Arc::new(db);
    let clock = Clock::system();

    let user_repo = UserRepository::new(Arc::clone(&db));
    let pet_repo = PetRepository::new(Arc::clone(&db));
    let photo_repo = PhotoRepository::new(Arc::clone(&db));
    let contest_repo = ContestRepository::new(Arc::clone(&db));
    let entry_repo = ContestEntryRepository::new(Arc::clone(&db));
    let connection_repo = ConnectionRepository::new(Arc::clone(&db));
    let guardian_repo = GuardianRequestRepository::new(Arc::clone(&db));
    let vote_repo = VoteRepository::new(Arc::clone(&db));
    let notification_repo = NotificationRepository::new(Arc::clone(&db));

    let notification_service = NotificationService::new(notification_repo, clock.clone());
    let contest_service =
        ContestService::new(contest_repo.clone(), entry_repo.clone(), clock.clone());
    let leaderboard_service = LeaderboardService::new(
        contest_repo.clone(),
        entry_repo.clone(),
        photo_repo.clone(),
        pet_repo.clone(),
        user_repo.clone(),
        clock.clone(),
    );
    let feed_service = FeedService::new(
        connection_repo.clone(),
        photo_repo.clone(),
        pet_repo.clone(),
        user_repo.clone(),
        contest_repo.clone(),
        entry_repo.clone(),
        clock.clone(),
    );
    let connection_service =
        ConnectionService::new(connection_repo, user_repo.clone(), clock.clone());
    let guardianship_service =
        GuardianshipService::new(guardian_repo, pet_repo, user_repo.clone(), clock.clone());
    let vote_service = VoteService::new(vote_repo, photo_repo.clone(), contest_repo, entry_repo, clock);

    AppState {
        contest_service,
        leaderboard_service,
        feed_service,
        connection_service,
        guardianship_service,
        vote_service,
        notification_service,
        user_repo,
        photo_repo,
    }
}

fn create_test_router(db: DatabaseConnection) -> Router {
    let state = create_test_state(db);
    Router::new()
        .nest("/api", api_router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .with_state(state)
}

#[tokio::test]
async fn test_unknown_endpoint_returns_404() {
    let app = create_test_router(
        MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
    );

    let response = app
        .oneshot(
            Request::builder()
                .uri("/nonexistent/endpoint")
                .method("GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_friends_feed_requires_auth() {
    let app = create_test_router(
        MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
    );

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/feeds/friends")
                .method("POST")
                .header("Content-Type", "application/json")
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_leaderboard_without_contest_returns_sentinel() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<contest::Model>::new()])
        .into_connection();
    let app = create_test_router(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/contests/leaderboard")
                .method("POST")
                .header("Content-Type", "application/json")
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json["data"]["contestId"], "");
    assert_eq!(json["data"]["contestPrompt"], "No Active Contest");
    assert_eq!(json["data"]["leaderboard"], serde_json::json!([]));
}

#[tokio::test]
async fn test_current_contest_when_none_is_null() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<contest::Model>::new()])
        .into_connection();
    let app = create_test_router(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/contests/current")
                .method("POST")
                .header("Content-Type", "application/json")
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert!(json["data"].is_null());
}

#[tokio::test]
async fn test_unread_count_with_bearer_token() {
    let user = create_test_user("u1", "Alex", "test_token");
    let count_row = std::collections::BTreeMap::from([(
        "num_items",
        sea_orm::Value::BigInt(Some(2)),
    )]);

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        // Auth middleware resolves the token, then the handler counts.
        .append_query_results([[user]])
        .append_query_results([[count_row]])
        .into_connection();
    let app = create_test_router(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/notifications/unread-count")
                .method("POST")
                .header("Content-Type", "application/json")
                .header("Authorization", "Bearer test_token")
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json["data"]["count"], 2);
}

#[tokio::test]
async fn test_toggle_vote_with_invalid_json_is_rejected() {
    let app = create_test_router(
        MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
    );

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/votes/toggle")
                .method("POST")
                .header("Content-Type", "application/json")
                .body(Body::from("invalid json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(
        response.status() == StatusCode::BAD_REQUEST
            || response.status() == StatusCode::UNPROCESSABLE_ENTITY
            || response.status() == StatusCode::UNAUTHORIZED
    );
}
