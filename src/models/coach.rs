//! Coach record and specialty coding.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::{CoachId, TeamId};
use crate::error::RosterError;

/// Coaching role within the staff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Specialty {
    #[serde(rename = "HEAD")]
    Head,
    #[serde(rename = "ASSISTANT")]
    Assistant,
    #[serde(rename = "GOALKEEPING")]
    Goalkeeping,
}

impl Specialty {
    pub fn code(&self) -> &'static str {
        match self {
            Specialty::Head => "HEAD",
            Specialty::Assistant => "ASSISTANT",
            Specialty::Goalkeeping => "GOALKEEPING",
        }
    }
}

impl fmt::Display for Specialty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Specialty {
    type Err = RosterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "HEAD" => Ok(Specialty::Head),
            "ASSISTANT" => Ok(Specialty::Assistant),
            "GOALKEEPING" => Ok(Specialty::Goalkeeping),
            other => Err(RosterError::InvalidSpecialty {
                value: other.to_string(),
            }),
        }
    }
}

/// A member of the coaching staff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coach {
    pub id: CoachId,
    pub name: String,
    pub specialty: Specialty,
    pub team_id: TeamId,
}
