//! Business logic services.

#![allow(missing_docs)]

pub mod connection;
pub mod contest;
pub mod feed;
pub mod guardianship;
pub mod leaderboard;
pub mod notification;
pub mod vote;

pub use connection::ConnectionService;
pub use contest::{ContestService, CreateContestInput};
pub use feed::{ContestFeedItem, FeedService, FriendsFeedItem, GlobalFeedItem};
pub use guardianship::GuardianshipService;
pub use leaderboard::{Leaderboard, LeaderboardEntry, LeaderboardService};
pub use notification::NotificationService;
pub use vote::VoteService;
