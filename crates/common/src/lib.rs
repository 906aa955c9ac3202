//! Common utilities and shared types for pawgram.
//!
//! This crate provides foundational components used across all pawgram crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **ID Generation**: ULID-based unique identifiers via [`IdGenerator`]
//! - **Clock**: Injectable time source via [`Clock`]
//! - **References**: Typed `collection/id` document paths via [`EntityRef`]
//!
//! # Example
//!
//! ```no_run
//! use pawgram_common::{Config, IdGenerator, AppResult};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     let id_gen = IdGenerator::new();
//!     let id = id_gen.generate();
//!     println!("Generated ID: {}", id);
//!     Ok(())
//! }
//! ```

pub mod clock;
pub mod config;
pub mod error;
pub mod id;
pub mod reference;

pub use clock::Clock;
pub use config::Config;
pub use error::{AppError, AppResult};
pub use id::IdGenerator;
pub use reference::{EntityRef, RefKind};
