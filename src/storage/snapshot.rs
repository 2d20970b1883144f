//! Versioned snapshot document.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::{Result, RosterError};
use crate::models::{Coach, Player, Team};
use crate::repository::RosterRepository;

/// Format version written to every snapshot; imports accept only this.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Complete point-in-time export of the roster dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,
    pub teams: Vec<Team>,
    pub players: Vec<Player>,
    pub coaches: Vec<Coach>,
}

impl Snapshot {
    /// Capture the current dataset through the repository's listing reads.
    pub fn capture(repository: &RosterRepository) -> Result<Self> {
        Ok(Self {
            version: SNAPSHOT_VERSION,
            teams: repository.get_teams()?,
            players: repository.get_players()?,
            coaches: repository.get_coaches()?,
        })
    }

    /// Structural checks performed before an import writes anything.
    ///
    /// A snapshot is importable only when the version matches, every
    /// record carries its persisted id, and every referenced team id
    /// resolves inside the snapshot itself.
    pub fn validate(&self) -> Result<()> {
        if self.version != SNAPSHOT_VERSION {
            return Err(RosterError::Format(format!(
                "unsupported snapshot version {} (expected {})",
                self.version, SNAPSHOT_VERSION
            )));
        }

        if self.teams.iter().any(|t| !t.id.is_assigned())
            || self.players.iter().any(|p| !p.id.is_assigned())
            || self.coaches.iter().any(|c| !c.id.is_assigned())
        {
            return Err(RosterError::Format(
                "snapshot contains a record without an assigned id".to_string(),
            ));
        }

        let team_ids: HashSet<i64> = self.teams.iter().map(|t| t.id.as_i64()).collect();
        for player in &self.players {
            if !team_ids.contains(&player.team_id.as_i64()) {
                return Err(RosterError::Format(format!(
                    "player {} references missing team {}",
                    player.id, player.team_id
                )));
            }
        }
        for coach in &self.coaches {
            if !team_ids.contains(&coach.team_id.as_i64()) {
                return Err(RosterError::Format(format!(
                    "coach {} references missing team {}",
                    coach.id, coach.team_id
                )));
            }
        }

        Ok(())
    }
}
