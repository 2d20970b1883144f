//! Team record.

use serde::{Deserialize, Serialize};

use super::ids::TeamId;

/// A team that players and coaches belong to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub founded_year: i32,
}
