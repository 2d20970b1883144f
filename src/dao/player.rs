//! Player persistence.

use log::debug;
use rusqlite::{params, Row};
use std::sync::Arc;

use super::{encode_date, decode_date, invalid_column, EntityDao};
use crate::database::Database;
use crate::error::{Result, RosterError};
use crate::models::{EntityKind, Player, PlayerId, Position, TeamId};

const PLAYER_SELECT_SQL: &str =
    "SELECT id, name, position, squad_number, join_date, team_id FROM players";

/// SQLite-backed player DAO.
pub struct PlayerDao {
    db: Arc<Database>,
}

impl PlayerDao {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// All players assigned to one team, by squad number.
    pub fn find_by_team(&self, team_id: TeamId) -> Result<Vec<Player>> {
        self.db.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "{PLAYER_SELECT_SQL} WHERE team_id = ? ORDER BY squad_number"
            ))?;
            let rows = stmt.query_map(params![team_id.as_i64()], row_to_player)?;

            let mut players = Vec::new();
            for row in rows {
                players.push(row?);
            }
            Ok(players)
        })
    }
}

impl EntityDao for PlayerDao {
    type Entity = Player;

    fn kind(&self) -> EntityKind {
        EntityKind::Player
    }

    fn entity_id(entity: &Player) -> i64 {
        entity.id.as_i64()
    }

    fn find_by_id(&self, id: i64) -> Result<Player> {
        let result = self.db.query_row(
            &format!("{PLAYER_SELECT_SQL} WHERE id = ?"),
            params![id],
            row_to_player,
        );

        match result {
            Err(RosterError::Persistence(rusqlite::Error::QueryReturnedNoRows)) => {
                Err(RosterError::NotFound {
                    kind: EntityKind::Player,
                    id,
                })
            }
            other => other,
        }
    }

    fn find_all(&self) -> Result<Vec<Player>> {
        self.db.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!("{PLAYER_SELECT_SQL} ORDER BY name"))?;
            let rows = stmt.query_map([], row_to_player)?;

            let mut players = Vec::new();
            for row in rows {
                players.push(row?);
            }
            Ok(players)
        })
    }

    fn insert(&self, player: &Player) -> Result<Player> {
        self.db.with_conn(|conn| {
            let explicit_id = player.id.is_assigned().then(|| player.id.as_i64());
            conn.execute(
                "INSERT INTO players (id, name, position, squad_number, join_date, team_id)
                 VALUES (?, ?, ?, ?, ?, ?)",
                params![
                    explicit_id,
                    player.name,
                    player.position.code(),
                    player.squad_number,
                    encode_date(player.join_date),
                    player.team_id.as_i64(),
                ],
            )?;

            let id = explicit_id.unwrap_or_else(|| conn.last_insert_rowid());
            debug!("inserted player {} with id {}", player.name, id);
            Ok(Player {
                id: PlayerId::new(id),
                ..player.clone()
            })
        })
    }

    fn update(&self, player: &Player) -> Result<Player> {
        let changed = self.db.execute(
            "UPDATE players
             SET name = ?, position = ?, squad_number = ?, join_date = ?, team_id = ?
             WHERE id = ?",
            params![
                player.name,
                player.position.code(),
                player.squad_number,
                encode_date(player.join_date),
                player.team_id.as_i64(),
                player.id.as_i64(),
            ],
        )?;

        if changed == 0 {
            return Err(RosterError::NotFound {
                kind: EntityKind::Player,
                id: player.id.as_i64(),
            });
        }
        Ok(player.clone())
    }

    fn delete(&self, id: i64) -> Result<bool> {
        let changed = self.db.execute("DELETE FROM players WHERE id = ?", params![id])?;
        Ok(changed > 0)
    }

    fn count(&self) -> Result<u64> {
        let count: i64 = self
            .db
            .query_row("SELECT COUNT(*) FROM players", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn delete_all(&self) -> Result<usize> {
        self.db.execute("DELETE FROM players", [])
    }
}

fn row_to_player(row: &Row<'_>) -> rusqlite::Result<Player> {
    let position_text: String = row.get(2)?;
    let position = position_text
        .parse::<Position>()
        .map_err(|err| invalid_column(2, err))?;

    let date_text: String = row.get(4)?;
    let join_date = decode_date(4, &date_text)?;

    Ok(Player {
        id: PlayerId::new(row.get(0)?),
        name: row.get(1)?,
        position,
        squad_number: row.get(3)?,
        join_date,
        team_id: TeamId::new(row.get(5)?),
    })
}
