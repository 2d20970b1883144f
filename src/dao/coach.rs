//! Coach persistence.

use log::debug;
use rusqlite::{params, Row};
use std::sync::Arc;

use super::{invalid_column, EntityDao};
use crate::database::Database;
use crate::error::{Result, RosterError};
use crate::models::{Coach, CoachId, EntityKind, Specialty, TeamId};

const COACH_SELECT_SQL: &str = "SELECT id, name, specialty, team_id FROM coaches";

/// SQLite-backed coach DAO.
pub struct CoachDao {
    db: Arc<Database>,
}

impl CoachDao {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }
}

impl EntityDao for CoachDao {
    type Entity = Coach;

    fn kind(&self) -> EntityKind {
        EntityKind::Coach
    }

    fn entity_id(entity: &Coach) -> i64 {
        entity.id.as_i64()
    }

    fn find_by_id(&self, id: i64) -> Result<Coach> {
        let result = self.db.query_row(
            &format!("{COACH_SELECT_SQL} WHERE id = ?"),
            params![id],
            row_to_coach,
        );

        match result {
            Err(RosterError::Persistence(rusqlite::Error::QueryReturnedNoRows)) => {
                Err(RosterError::NotFound {
                    kind: EntityKind::Coach,
                    id,
                })
            }
            other => other,
        }
    }

    fn find_all(&self) -> Result<Vec<Coach>> {
        self.db.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!("{COACH_SELECT_SQL} ORDER BY name"))?;
            let rows = stmt.query_map([], row_to_coach)?;

            let mut coaches = Vec::new();
            for row in rows {
                coaches.push(row?);
            }
            Ok(coaches)
        })
    }

    fn insert(&self, coach: &Coach) -> Result<Coach> {
        self.db.with_conn(|conn| {
            let explicit_id = coach.id.is_assigned().then(|| coach.id.as_i64());
            conn.execute(
                "INSERT INTO coaches (id, name, specialty, team_id) VALUES (?, ?, ?, ?)",
                params![
                    explicit_id,
                    coach.name,
                    coach.specialty.code(),
                    coach.team_id.as_i64(),
                ],
            )?;

            let id = explicit_id.unwrap_or_else(|| conn.last_insert_rowid());
            debug!("inserted coach {} with id {}", coach.name, id);
            Ok(Coach {
                id: CoachId::new(id),
                ..coach.clone()
            })
        })
    }

    fn update(&self, coach: &Coach) -> Result<Coach> {
        let changed = self.db.execute(
            "UPDATE coaches SET name = ?, specialty = ?, team_id = ? WHERE id = ?",
            params![
                coach.name,
                coach.specialty.code(),
                coach.team_id.as_i64(),
                coach.id.as_i64(),
            ],
        )?;

        if changed == 0 {
            return Err(RosterError::NotFound {
                kind: EntityKind::Coach,
                id: coach.id.as_i64(),
            });
        }
        Ok(coach.clone())
    }

    fn delete(&self, id: i64) -> Result<bool> {
        let changed = self.db.execute("DELETE FROM coaches WHERE id = ?", params![id])?;
        Ok(changed > 0)
    }

    fn count(&self) -> Result<u64> {
        let count: i64 = self
            .db
            .query_row("SELECT COUNT(*) FROM coaches", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn delete_all(&self) -> Result<usize> {
        self.db.execute("DELETE FROM coaches", [])
    }
}

fn row_to_coach(row: &Row<'_>) -> rusqlite::Result<Coach> {
    let specialty_text: String = row.get(2)?;
    let specialty = specialty_text
        .parse::<Specialty>()
        .map_err(|err| invalid_column(2, err))?;

    Ok(Coach {
        id: CoachId::new(row.get(0)?),
        name: row.get(1)?,
        specialty,
        team_id: TeamId::new(row.get(3)?),
    })
}
