//! HTTP API layer for pawgram.
//!
//! This crate provides the REST API surface for the contest and feed
//! engine:
//!
//! - **Endpoints**: contests, leaderboard, feeds, votes, connections,
//!   guardianships, notifications
//! - **Extractors**: bearer-token authentication
//! - **Middleware**: application state and auth
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
pub use middleware::{auth_middleware, AppState};
