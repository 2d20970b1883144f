//! Cached roster repository over SQLite
//!
//! A Rust library backing a desktop team-management application: players,
//! coaches, and teams persisted in a relational store and served from
//! bounded in-memory caches so listing views and detail lookups avoid
//! repeated database round-trips.
//!
//! ## Features
//!
//! - **Cache-aside reads**: detail lookups hit the per-entity cache first
//!   and read through to SQLite on a miss
//! - **Database-before-cache writes**: mutations commit to the database
//!   before the cache is touched, so cached data never diverges from
//!   committed rows
//! - **Bounded caches**: LRU entry bound plus time-since-write expiration
//! - **Snapshot backup/restore**: versioned JSON export written atomically,
//!   validated import with per-record failure reporting
//! - **Pluggable validation**: domain rules enter through the [`Validate`]
//!   trait at repository construction
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use rosterdb::{Database, RosterConfig, RosterRepository, Team, TeamId};
//!
//! fn main() -> rosterdb::Result<()> {
//!     let config = RosterConfig::default();
//!     let db = Arc::new(Database::open(&config.database_path)?);
//!     let repo = RosterRepository::with_default_validator(db, &config);
//!
//!     let team = repo.save_team(&Team {
//!         id: TeamId::new(0),
//!         name: "Atlas".to_string(),
//!         founded_year: 1902,
//!     })?;
//!
//!     // Served from cache; no second database round trip.
//!     let fetched = repo.get_team(team.id)?;
//!     assert_eq!(fetched, team);
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod config;
pub mod dao;
pub mod database;
pub mod error;
pub mod models;
pub mod repository;
pub mod storage;
pub mod validation;

// Re-export commonly used types
pub use cache::CachePolicy;
pub use config::{RosterConfig, WritePolicy};
pub use database::Database;
pub use error::{Result, RosterError};
pub use models::{
    Coach, CoachId, EntityKind, Player, PlayerId, Position, Specialty, Team, TeamId,
};
pub use repository::{CachedRepository, RosterRepository};
pub use storage::{export_all, import_all, ImportReport, Snapshot};
pub use validation::{RosterValidator, Validate};
