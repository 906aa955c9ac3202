//! Pawgram server entry point.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{middleware, Router};
use pawgram_api::{auth_middleware, router as api_router, AppState};
use pawgram_common::{Clock, Config};
use pawgram_core::{
    ConnectionService, ContestService, FeedService, GuardianshipService, LeaderboardService,
    NotificationService, VoteService,
};
use pawgram_db::repositories::{
    ConnectionRepository, ContestEntryRepository, ContestRepository, GuardianRequestRepository,
    NotificationRepository, PetRepository, PhotoRepository, UserRepository, VoteRepository,
};
use sea_orm::{ConnectOptions, Database};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

/// Periodically rotates expired contests and backfills a fresh one.
///
/// This is the scheduler composing the two lifecycle passes: flip expired
/// contests inactive, then make sure an active contest exists again.
async fn contest_rotation_task(contest_service: ContestService, interval_secs: u64) {
    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));

    loop {
        interval.tick().await;

        match contest_service.rotate_expired_contests().await {
            Ok(rotated) if rotated > 0 => {
                info!(rotated, "Contest rotation pass deactivated contests");
            }
            Ok(_) => {}
            Err(e) => {
                tracing::error!(error = %e, "Contest rotation pass failed");
                continue;
            }
        }

        if let Err(e) = contest_service.ensure_active_contest().await {
            tracing::error!(error = %e, "Failed to ensure an active contest");
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pawgram=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting pawgram server...");

    // Load configuration (.env first, then config files + environment)
    dotenvy::dotenv().ok();
    let config = Config::load()?;

    // Connect to database
    let mut db_opts = ConnectOptions::new(&config.database.url);
    db_opts
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections);

    let db = Database::connect(db_opts).await?;
    info!("Connected to database");

    // Run migrations
    info!("Running database migrations...");
    pawgram_db::migrate(&db).await?;
    info!("Migrations completed");

    let db = Arc::new(db);
    let clock = Clock::system();

    // Initialize repositories
    let user_repo = UserRepository::new(db.clone());
    let pet_repo = PetRepository::new(db.clone());
    let photo_repo = PhotoRepository::new(db.clone());
    let contest_repo = ContestRepository::new(db.clone());
    let entry_repo = ContestEntryRepository::new(db.clone());
    let connection_repo = ConnectionRepository::new(db.clone());
    let guardian_repo = GuardianRequestRepository::new(db.clone());
    let vote_repo = VoteRepository::new(db.clone());
    let notification_repo = NotificationRepository::new(db.clone());

    // Initialize services
    let notification_service = NotificationService::new(notification_repo, clock.clone());

    let mut contest_service =
        ContestService::new(contest_repo.clone(), entry_repo.clone(), clock.clone());
    contest_service.set_default_duration_days(config.contest.duration_days);

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

    let mut connection_service =
        ConnectionService::new(connection_repo, user_repo.clone(), clock.clone());
    connection_service.set_notifications(notification_service.clone());

    let mut guardianship_service = GuardianshipService::new(
        guardian_repo,
        pet_repo,
        user_repo.clone(),
        clock.clone(),
    );
    guardianship_service.set_notifications(notification_service.clone());

    let vote_service = VoteService::new(
        vote_repo,
        photo_repo.clone(),
        contest_repo,
        entry_repo,
        clock,
    );

    let state = AppState {
        contest_service: contest_service.clone(),
        leaderboard_service,
        feed_service,
        connection_service,
        guardianship_service,
        vote_service,
        notification_service,
        user_repo,
        photo_repo,
    };

    // Build router
    let app = Router::new()
        .nest("/api", api_router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start the contest rotation scheduler
    info!("Starting contest rotation task...");
    tokio::spawn(contest_rotation_task(
        contest_service,
        config.contest.rotation_interval_secs,
    ));

    // Start server with graceful shutdown
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
