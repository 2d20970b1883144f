//! Entity records managed by the roster store
//!
//! Plain data: attributes only, no behavior beyond parsing/formatting of
//! the enum-coded columns.

mod coach;
mod ids;
mod player;
mod team;


pub use coach::{Coach, Specialty};
pub use ids::{CoachId, PlayerId, TeamId};
pub use player::{Player, Position};
pub use team::Team;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Discriminates the three entity types in errors and import reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Team,
    Player,
    Coach,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Team => "team",
            EntityKind::Player => "player",
            EntityKind::Coach => "coach",
        };
        write!(f, "{}", name)
    }
}
