//! Runtime configuration for the roster store
//!
//! Everything a caller decides at construction time: where the database
//! and backups live, how the caches evict, and how `update` reconciles
//! the cache.

use std::path::PathBuf;

use crate::cache::CachePolicy;

/// How `update` reconciles the cache after a successful database write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WritePolicy {
    /// Drop the cached entry; the next read pays a database round trip.
    #[default]
    Invalidate,
    /// Replace the cached entry with the updated value, keeping reads
    /// I/O-free after updates.
    Refresh,
}

/// Construction-time settings for [`crate::RosterRepository`].
#[derive(Debug, Clone)]
pub struct RosterConfig {
    pub database_path: PathBuf,
    pub backup_dir: PathBuf,
    pub cache: CachePolicy,
    pub write_policy: WritePolicy,
}

impl Default for RosterConfig {
    fn default() -> Self {
        let base = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
        let root = base.join("rosterdb");
        Self {
            database_path: root.join("roster.db"),
            backup_dir: root.join("backup"),
            cache: CachePolicy::default(),
            write_policy: WritePolicy::default(),
        }
    }
}
