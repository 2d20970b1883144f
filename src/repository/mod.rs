//! Cached repository over the DAO layer
//!
//! The single authoritative API for entity access. Reads are cache-aside:
//! check the in-memory cache, fall through to the DAO on a miss, populate
//! on the way out. Writes commit to the database first and touch the
//! cache only afterwards, inside a per-entity-type write lock; the cache
//! never shows a state the database does not have.

use log::debug;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::cache::{CachePolicy, RosterCache};
use crate::config::{RosterConfig, WritePolicy};
use crate::dao::{CoachDao, EntityDao, PlayerDao, TeamDao};
use crate::database::Database;
use crate::error::{Result, RosterError};
use crate::models::{Coach, CoachId, Player, PlayerId, Team, TeamId};
use crate::validation::{RosterValidator, Validate};

#[cfg(test)]
mod tests;

/// One entity type's DAO paired with its cache.
///
/// Generic core behind [`RosterRepository`]; the facade instantiates one
/// per entity type.
pub struct CachedRepository<D: EntityDao> {
    dao: D,
    cache: RosterCache<i64, D::Entity>,
    write_policy: WritePolicy,
    write_lock: Mutex<()>,
}

impl<D: EntityDao> CachedRepository<D> {
    pub fn new(dao: D, cache_policy: CachePolicy, write_policy: WritePolicy) -> Self {
        Self {
            dao,
            cache: RosterCache::new(cache_policy),
            write_policy,
            write_lock: Mutex::new(()),
        }
    }

    /// Cache hit or read-through. Not-found is reported, never cached.
    pub fn get(&self, id: i64) -> Result<D::Entity> {
        if let Some(hit) = self.cache.get(&id) {
            return Ok(hit);
        }

        debug!("{} {} not cached, reading from database", self.dao.kind(), id);
        let entity = self.dao.find_by_id(id)?;
        self.cache.put(id, entity.clone());
        Ok(entity)
    }

    /// Canonical listing straight from the database, warming the cache
    /// with each returned entity as a side effect.
    pub fn get_all(&self) -> Result<Vec<D::Entity>> {
        let entities = self.dao.find_all()?;
        for entity in &entities {
            self.cache.put(D::entity_id(entity), entity.clone());
        }
        Ok(entities)
    }

    /// Run a custom DAO listing and warm the cache with its results.
    pub(crate) fn find_with<F>(&self, f: F) -> Result<Vec<D::Entity>>
    where
        F: FnOnce(&D) -> Result<Vec<D::Entity>>,
    {
        let entities = f(&self.dao)?;
        for entity in &entities {
            self.cache.put(D::entity_id(entity), entity.clone());
        }
        Ok(entities)
    }

    /// Insert, then populate the cache with the persisted entity. On
    /// insert failure the cache is left untouched.
    pub fn save(&self, entity: &D::Entity) -> Result<D::Entity> {
        let _write = self.write_lock.lock().unwrap();
        let persisted = self.dao.insert(entity)?;
        self.cache.put(D::entity_id(&persisted), persisted.clone());
        Ok(persisted)
    }

    /// Update the database row, then refresh or invalidate the cached
    /// copy per the write policy. On failure the cache keeps serving the
    /// last committed value.
    pub fn update(&self, entity: &D::Entity) -> Result<D::Entity> {
        let _write = self.write_lock.lock().unwrap();
        let updated = self.dao.update(entity)?;

        let id = D::entity_id(&updated);
        match self.write_policy {
            WritePolicy::Refresh => self.cache.put(id, updated.clone()),
            WritePolicy::Invalidate => self.cache.invalidate(&id),
        }
        Ok(updated)
    }

    /// Delete the row and evict the cache entry. Eviction happens whether
    /// the row existed or was already absent, but never on a hard
    /// persistence error.
    pub fn delete(&self, id: i64) -> Result<bool> {
        let _write = self.write_lock.lock().unwrap();
        let deleted = self.dao.delete(id)?;
        self.cache.invalidate(&id);
        debug!("deleted {} {} (existed: {})", self.dao.kind(), id, deleted);
        Ok(deleted)
    }

    pub fn count(&self) -> Result<u64> {
        self.dao.count()
    }

    pub(crate) fn dao(&self) -> &D {
        &self.dao
    }

    pub(crate) fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }

    pub(crate) fn write_guard(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().unwrap()
    }
}

/// Exclusive hold on every entity type's write path, taken for the
/// duration of a bulk import.
pub(crate) struct ImportGuard<'a> {
    _teams: MutexGuard<'a, ()>,
    _players: MutexGuard<'a, ()>,
    _coaches: MutexGuard<'a, ()>,
}

/// Facade combining the three cached repositories with validation.
///
/// Construction is explicit: the database handle, configuration, and
/// validator are passed in; the repository owns its caches for its own
/// lifetime and nothing outlives it.
pub struct RosterRepository {
    teams: CachedRepository<TeamDao>,
    players: CachedRepository<PlayerDao>,
    coaches: CachedRepository<CoachDao>,
    validator: Arc<dyn Validate>,
}

impl RosterRepository {
    pub fn new(db: Arc<Database>, config: &RosterConfig, validator: Arc<dyn Validate>) -> Self {
        Self {
            teams: CachedRepository::new(
                TeamDao::new(db.clone()),
                config.cache,
                config.write_policy,
            ),
            players: CachedRepository::new(
                PlayerDao::new(db.clone()),
                config.cache,
                config.write_policy,
            ),
            coaches: CachedRepository::new(CoachDao::new(db), config.cache, config.write_policy),
            validator,
        }
    }

    /// Construct with the stock [`RosterValidator`] rules.
    pub fn with_default_validator(db: Arc<Database>, config: &RosterConfig) -> Self {
        Self::new(db, config, Arc::new(RosterValidator))
    }

    fn check(violations: Vec<String>) -> Result<()> {
        if violations.is_empty() {
            Ok(())
        } else {
            Err(RosterError::Validation { violations })
        }
    }

    // Teams

    pub fn get_team(&self, id: TeamId) -> Result<Team> {
        self.teams.get(id.as_i64())
    }

    pub fn get_teams(&self) -> Result<Vec<Team>> {
        self.teams.get_all()
    }

    pub fn save_team(&self, team: &Team) -> Result<Team> {
        Self::check(self.validator.validate_team(team))?;
        self.teams.save(team)
    }

    pub fn update_team(&self, team: &Team) -> Result<Team> {
        Self::check(self.validator.validate_team(team))?;
        self.teams.update(team)
    }

    pub fn delete_team(&self, id: TeamId) -> Result<bool> {
        self.teams.delete(id.as_i64())
    }

    // Players

    pub fn get_player(&self, id: PlayerId) -> Result<Player> {
        self.players.get(id.as_i64())
    }

    pub fn get_players(&self) -> Result<Vec<Player>> {
        self.players.get_all()
    }

    /// Players of one team in squad-number order.
    pub fn players_by_team(&self, team_id: TeamId) -> Result<Vec<Player>> {
        self.players.find_with(|dao| dao.find_by_team(team_id))
    }

    pub fn save_player(&self, player: &Player) -> Result<Player> {
        Self::check(self.validator.validate_player(player))?;
        self.players.save(player)
    }

    pub fn update_player(&self, player: &Player) -> Result<Player> {
        Self::check(self.validator.validate_player(player))?;
        self.players.update(player)
    }

    pub fn delete_player(&self, id: PlayerId) -> Result<bool> {
        self.players.delete(id.as_i64())
    }

    // Coaches

    pub fn get_coach(&self, id: CoachId) -> Result<Coach> {
        self.coaches.get(id.as_i64())
    }

    pub fn get_coaches(&self) -> Result<Vec<Coach>> {
        self.coaches.get_all()
    }

    pub fn save_coach(&self, coach: &Coach) -> Result<Coach> {
        Self::check(self.validator.validate_coach(coach))?;
        self.coaches.save(coach)
    }

    pub fn update_coach(&self, coach: &Coach) -> Result<Coach> {
        Self::check(self.validator.validate_coach(coach))?;
        self.coaches.update(coach)
    }

    pub fn delete_coach(&self, id: CoachId) -> Result<bool> {
        self.coaches.delete(id.as_i64())
    }

    /// Drop every cached entry across all entity types.
    ///
    /// Each per-type clear is atomic from a reader's perspective;
    /// concurrent reads observe misses, never a torn cache.
    pub fn invalidate_caches(&self) {
        self.teams.invalidate_all();
        self.players.invalidate_all();
        self.coaches.invalidate_all();
    }

    /// Block every write path for the duration of a bulk import.
    pub(crate) fn begin_import(&self) -> ImportGuard<'_> {
        ImportGuard {
            _teams: self.teams.write_guard(),
            _players: self.players.write_guard(),
            _coaches: self.coaches.write_guard(),
        }
    }

    pub(crate) fn team_dao(&self) -> &TeamDao {
        self.teams.dao()
    }

    pub(crate) fn player_dao(&self) -> &PlayerDao {
        self.players.dao()
    }

    pub(crate) fn coach_dao(&self) -> &CoachDao {
        self.coaches.dao()
    }
}
