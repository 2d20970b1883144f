//! Player record and position coding.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::{PlayerId, TeamId};
use crate::error::RosterError;

/// Field position of a player.
///
/// Stored in the database and in snapshots as the short code
/// (`GK`/`DF`/`MF`/`FW`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    #[serde(rename = "GK")]
    Goalkeeper,
    #[serde(rename = "DF")]
    Defender,
    #[serde(rename = "MF")]
    Midfielder,
    #[serde(rename = "FW")]
    Forward,
}

impl Position {
    /// Short code used for the TEXT column and snapshot encoding.
    pub fn code(&self) -> &'static str {
        match self {
            Position::Goalkeeper => "GK",
            Position::Defender => "DF",
            Position::Midfielder => "MF",
            Position::Forward => "FW",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Position {
    type Err = RosterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GK" => Ok(Position::Goalkeeper),
            "DF" => Ok(Position::Defender),
            "MF" => Ok(Position::Midfielder),
            "FW" => Ok(Position::Forward),
            other => Err(RosterError::InvalidPosition {
                value: other.to_string(),
            }),
        }
    }
}

/// A rostered player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub position: Position,
    pub squad_number: u8,
    pub join_date: NaiveDate,
    pub team_id: TeamId,
}
