//! Team persistence.

use log::debug;
use rusqlite::{params, Row};
use std::sync::Arc;

use super::EntityDao;
use crate::database::Database;
use crate::error::{Result, RosterError};
use crate::models::{EntityKind, Team, TeamId};

const TEAM_SELECT_SQL: &str = "SELECT id, name, founded_year FROM teams";

/// SQLite-backed team DAO.
pub struct TeamDao {
    db: Arc<Database>,
}

impl TeamDao {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Look a team up by its exact name.
    pub fn find_by_name(&self, name: &str) -> Result<Option<Team>> {
        let result = self.db.query_row(
            &format!("{TEAM_SELECT_SQL} WHERE name = ?"),
            params![name],
            row_to_team,
        );

        match result {
            Ok(team) => Ok(Some(team)),
            Err(RosterError::Persistence(rusqlite::Error::QueryReturnedNoRows)) => Ok(None),
            Err(err) => Err(err),
        }
    }
}

impl EntityDao for TeamDao {
    type Entity = Team;

    fn kind(&self) -> EntityKind {
        EntityKind::Team
    }

    fn entity_id(entity: &Team) -> i64 {
        entity.id.as_i64()
    }

    fn find_by_id(&self, id: i64) -> Result<Team> {
        let result = self.db.query_row(
            &format!("{TEAM_SELECT_SQL} WHERE id = ?"),
            params![id],
            row_to_team,
        );

        match result {
            Err(RosterError::Persistence(rusqlite::Error::QueryReturnedNoRows)) => {
                Err(RosterError::NotFound {
                    kind: EntityKind::Team,
                    id,
                })
            }
            other => other,
        }
    }

    fn find_all(&self) -> Result<Vec<Team>> {
        self.db.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!("{TEAM_SELECT_SQL} ORDER BY name"))?;
            let rows = stmt.query_map([], row_to_team)?;

            let mut teams = Vec::new();
            for row in rows {
                teams.push(row?);
            }
            Ok(teams)
        })
    }

    fn insert(&self, team: &Team) -> Result<Team> {
        self.db.with_conn(|conn| {
            let explicit_id = team.id.is_assigned().then(|| team.id.as_i64());
            conn.execute(
                "INSERT INTO teams (id, name, founded_year) VALUES (?, ?, ?)",
                params![explicit_id, team.name, team.founded_year],
            )?;

            let id = explicit_id.unwrap_or_else(|| conn.last_insert_rowid());
            debug!("inserted team {} with id {}", team.name, id);
            Ok(Team {
                id: TeamId::new(id),
                ..team.clone()
            })
        })
    }

    fn update(&self, team: &Team) -> Result<Team> {
        let changed = self.db.execute(
            "UPDATE teams SET name = ?, founded_year = ? WHERE id = ?",
            params![team.name, team.founded_year, team.id.as_i64()],
        )?;

        if changed == 0 {
            return Err(RosterError::NotFound {
                kind: EntityKind::Team,
                id: team.id.as_i64(),
            });
        }
        Ok(team.clone())
    }

    fn delete(&self, id: i64) -> Result<bool> {
        let changed = self.db.execute("DELETE FROM teams WHERE id = ?", params![id])?;
        Ok(changed > 0)
    }

    fn count(&self) -> Result<u64> {
        let count: i64 = self
            .db
            .query_row("SELECT COUNT(*) FROM teams", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn delete_all(&self) -> Result<usize> {
        self.db.execute("DELETE FROM teams", [])
    }
}

fn row_to_team(row: &Row<'_>) -> rusqlite::Result<Team> {
    Ok(Team {
        id: TeamId::new(row.get(0)?),
        name: row.get(1)?,
        founded_year: row.get(2)?,
    })
}
