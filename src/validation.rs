//! Domain validation for roster entities
//!
//! The repository consumes validation through the [`Validate`] trait, so
//! applications can swap in their own rules; [`RosterValidator`] carries
//! the stock ones.

use chrono::{Datelike, Local};

use crate::models::{Coach, Player, Team};

/// Validation capability consumed by the repository on `save`/`update`.
///
/// An empty list means the entity is acceptable; otherwise each entry is
/// one human-readable violation.
pub trait Validate: Send + Sync {
    fn validate_team(&self, team: &Team) -> Vec<String>;
    fn validate_player(&self, player: &Player) -> Vec<String>;
    fn validate_coach(&self, coach: &Coach) -> Vec<String>;
}

const EARLIEST_FOUNDING_YEAR: i32 = 1850;

/// Stock roster rules.
pub struct RosterValidator;

impl Validate for RosterValidator {
    fn validate_team(&self, team: &Team) -> Vec<String> {
        let mut violations = Vec::new();
        if team.name.trim().is_empty() {
            violations.push("team name must not be empty".to_string());
        }
        let current_year = Local::now().year();
        if team.founded_year < EARLIEST_FOUNDING_YEAR || team.founded_year > current_year {
            violations.push(format!(
                "founding year must be between {} and {}: {}",
                EARLIEST_FOUNDING_YEAR, current_year, team.founded_year
            ));
        }
        violations
    }

    fn validate_player(&self, player: &Player) -> Vec<String> {
        let mut violations = Vec::new();
        if player.name.trim().is_empty() {
            violations.push("player name must not be empty".to_string());
        }
        if player.squad_number < 1 || player.squad_number > 99 {
            violations.push(format!(
                "squad number must be between 1 and 99: {}",
                player.squad_number
            ));
        }
        if player.join_date > Local::now().date_naive() {
            violations.push(format!(
                "join date must not be in the future: {}",
                player.join_date
            ));
        }
        violations
    }

    fn validate_coach(&self, coach: &Coach) -> Vec<String> {
        let mut violations = Vec::new();
        if coach.name.trim().is_empty() {
            violations.push("coach name must not be empty".to_string());
        }
        violations
    }
}
