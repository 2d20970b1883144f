//! Unit tests for the cached repository

use super::*;
use crate::dao::EntityDao;
use crate::models::{EntityKind, Position, Specialty};
use chrono::NaiveDate;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

/// DAO wrapper that counts read operations, to verify which lookups the
/// cache absorbed.
struct CountingDao<D: EntityDao> {
    inner: D,
    finds: Arc<AtomicUsize>,
}

impl<D: EntityDao> CountingDao<D> {
    fn new(inner: D) -> (Self, Arc<AtomicUsize>) {
        let finds = Arc::new(AtomicUsize::new(0));
        (
            Self {
                inner,
                finds: finds.clone(),
            },
            finds,
        )
    }
}

impl<D: EntityDao> EntityDao for CountingDao<D> {
    type Entity = D::Entity;

    fn kind(&self) -> EntityKind {
        self.inner.kind()
    }

    fn entity_id(entity: &Self::Entity) -> i64 {
        D::entity_id(entity)
    }

    fn find_by_id(&self, id: i64) -> crate::Result<Self::Entity> {
        self.finds.fetch_add(1, Ordering::SeqCst);
        self.inner.find_by_id(id)
    }

    fn find_all(&self) -> crate::Result<Vec<Self::Entity>> {
        self.inner.find_all()
    }

    fn insert(&self, entity: &Self::Entity) -> crate::Result<Self::Entity> {
        self.inner.insert(entity)
    }

    fn update(&self, entity: &Self::Entity) -> crate::Result<Self::Entity> {
        self.inner.update(entity)
    }

    fn delete(&self, id: i64) -> crate::Result<bool> {
        self.inner.delete(id)
    }

    fn count(&self) -> crate::Result<u64> {
        self.inner.count()
    }

    fn delete_all(&self) -> crate::Result<usize> {
        self.inner.delete_all()
    }
}

fn test_db() -> Arc<Database> {
    Arc::new(Database::open_in_memory().unwrap())
}

fn counting_team_repo(
    db: Arc<Database>,
    write_policy: WritePolicy,
) -> (CachedRepository<CountingDao<TeamDao>>, Arc<AtomicUsize>) {
    let (dao, finds) = CountingDao::new(TeamDao::new(db));
    (
        CachedRepository::new(dao, CachePolicy::default(), write_policy),
        finds,
    )
}

fn new_team(name: &str) -> Team {
    Team {
        id: TeamId::new(0),
        name: name.to_string(),
        founded_year: 1902,
    }
}

fn new_player(name: &str, number: u8, team_id: TeamId) -> Player {
    Player {
        id: PlayerId::new(0),
        name: name.to_string(),
        position: Position::Goalkeeper,
        squad_number: number,
        join_date: NaiveDate::from_ymd_opt(2023, 7, 1).unwrap(),
        team_id,
    }
}

#[test]
fn test_save_populates_cache() {
    let (repo, finds) = counting_team_repo(test_db(), WritePolicy::Invalidate);

    let saved = repo.save(&new_team("Atlas")).unwrap();
    let fetched = repo.get(saved.id.as_i64()).unwrap();

    assert_eq!(fetched, saved);
    assert_eq!(finds.load(Ordering::SeqCst), 0);
}

#[test]
fn test_get_miss_reads_database_once() {
    let (repo, finds) = counting_team_repo(test_db(), WritePolicy::Invalidate);
    let saved = repo.save(&new_team("Atlas")).unwrap();

    // Evict, then read twice: one database round trip, then a hit.
    repo.invalidate_all();
    repo.get(saved.id.as_i64()).unwrap();
    repo.get(saved.id.as_i64()).unwrap();

    assert_eq!(finds.load(Ordering::SeqCst), 1);
}

#[test]
fn test_get_missing_id_is_not_cached() {
    let (repo, finds) = counting_team_repo(test_db(), WritePolicy::Invalidate);

    assert!(repo.get(42).unwrap_err().is_not_found());
    assert!(repo.get(42).unwrap_err().is_not_found());

    // No negative caching: both lookups hit the database.
    assert_eq!(finds.load(Ordering::SeqCst), 2);
}

#[test]
fn test_get_all_warms_cache() {
    let (repo, finds) = counting_team_repo(test_db(), WritePolicy::Invalidate);
    repo.save(&new_team("Atlas")).unwrap();
    repo.save(&new_team("Rovers")).unwrap();
    repo.invalidate_all();

    let all = repo.get_all().unwrap();
    assert_eq!(all.len(), 2);

    for team in &all {
        let fetched = repo.get(team.id.as_i64()).unwrap();
        assert_eq!(&fetched, team);
    }
    assert_eq!(finds.load(Ordering::SeqCst), 0);
}

#[test]
fn test_update_with_invalidate_policy() {
    let (repo, finds) = counting_team_repo(test_db(), WritePolicy::Invalidate);
    let saved = repo.save(&new_team("Atlas")).unwrap();

    let renamed = Team {
        name: "Atlas 1902".to_string(),
        ..saved.clone()
    };
    repo.update(&renamed).unwrap();

    // Next read pays one round trip and sees the new value.
    let fetched = repo.get(saved.id.as_i64()).unwrap();
    assert_eq!(fetched.name, "Atlas 1902");
    assert_eq!(finds.load(Ordering::SeqCst), 1);
}

#[test]
fn test_update_with_refresh_policy() {
    let (repo, finds) = counting_team_repo(test_db(), WritePolicy::Refresh);
    let saved = repo.save(&new_team("Atlas")).unwrap();

    let renamed = Team {
        name: "Atlas 1902".to_string(),
        ..saved.clone()
    };
    repo.update(&renamed).unwrap();

    // The refreshed entry serves the read without touching the database.
    let fetched = repo.get(saved.id.as_i64()).unwrap();
    assert_eq!(fetched.name, "Atlas 1902");
    assert_eq!(finds.load(Ordering::SeqCst), 0);
}

#[test]
fn test_failed_update_leaves_cache_untouched() {
    let (repo, finds) = counting_team_repo(test_db(), WritePolicy::Refresh);
    let saved = repo.save(&new_team("Atlas")).unwrap();

    let ghost = Team {
        id: TeamId::new(999),
        ..new_team("Ghost")
    };
    assert!(repo.update(&ghost).unwrap_err().is_not_found());

    // The committed value is still served from cache.
    let fetched = repo.get(saved.id.as_i64()).unwrap();
    assert_eq!(fetched, saved);
    assert_eq!(finds.load(Ordering::SeqCst), 0);
}

#[test]
fn test_failed_insert_leaves_cache_untouched() {
    let (repo, finds) = counting_team_repo(test_db(), WritePolicy::Invalidate);
    let saved = repo.save(&new_team("Atlas")).unwrap();

    // Duplicate id: the insert fails and nothing replaces the cached row.
    let dup = Team {
        id: saved.id,
        ..new_team("Impostor")
    };
    assert!(repo.save(&dup).is_err());

    let fetched = repo.get(saved.id.as_i64()).unwrap();
    assert_eq!(fetched.name, "Atlas");
    assert_eq!(finds.load(Ordering::SeqCst), 0);
}

#[test]
fn test_delete_evicts_and_reports() {
    let (repo, _finds) = counting_team_repo(test_db(), WritePolicy::Invalidate);
    let saved = repo.save(&new_team("Atlas")).unwrap();
    let id = saved.id.as_i64();

    assert!(repo.delete(id).unwrap());
    assert!(repo.get(id).unwrap_err().is_not_found());
    assert!(repo.dao().find_by_id(id).unwrap_err().is_not_found());

    // Idempotent cleanup: deleting an absent id is Ok(false).
    assert!(!repo.delete(id).unwrap());
}

#[test]
fn test_failed_delete_keeps_cache_entry() {
    let db = test_db();
    let teams = RosterRepository::with_default_validator(db.clone(), &RosterConfig::default());
    let team = teams.save_team(&new_team("Atlas")).unwrap();
    teams.save_player(&new_player("Ana", 1, team.id)).unwrap();

    // Foreign key makes this a hard persistence error, not a not-found.
    let err = teams.delete_team(team.id).unwrap_err();
    assert!(!err.is_not_found());

    // The cached team survives the failed delete and is still served.
    assert_eq!(teams.get_team(team.id).unwrap(), team);
}

#[test]
fn test_save_scenario_assigns_id_and_serves_update() {
    let db = test_db();
    let repo = RosterRepository::with_default_validator(db, &RosterConfig::default());

    let team = repo.save_team(&new_team("Atlas")).unwrap();
    let ana = repo
        .save_player(&new_player("Ana", 1, team.id))
        .unwrap();
    assert!(ana.id.is_assigned());
    assert_eq!(repo.get_player(ana.id).unwrap(), ana);

    let moved = Player {
        position: Position::Defender,
        ..ana.clone()
    };
    repo.update_player(&moved).unwrap();

    // Cache and database agree on the new position.
    assert_eq!(repo.get_player(ana.id).unwrap().position, Position::Defender);
    assert_eq!(
        repo.player_dao().find_by_id(ana.id.as_i64()).unwrap().position,
        Position::Defender
    );
}

#[test]
fn test_validation_rejects_before_any_write() {
    let db = test_db();
    let repo = RosterRepository::with_default_validator(db, &RosterConfig::default());
    let team = repo.save_team(&new_team("Atlas")).unwrap();

    let err = repo
        .save_player(&new_player("Ana", 0, team.id))
        .unwrap_err();
    match err {
        RosterError::Validation { violations } => {
            assert_eq!(violations.len(), 1);
            assert!(violations[0].contains("squad number"));
        }
        other => panic!("Expected Validation error, got {other:?}"),
    }

    assert_eq!(repo.player_dao().count().unwrap(), 0);
}

#[test]
fn test_players_by_team_warms_cache() {
    let db = test_db();
    let repo = RosterRepository::with_default_validator(db, &RosterConfig::default());
    let team = repo.save_team(&new_team("Atlas")).unwrap();
    let ana = repo.save_player(&new_player("Ana", 9, team.id)).unwrap();
    let bea = repo.save_player(&new_player("Bea", 1, team.id)).unwrap();
    repo.invalidate_caches();

    let squad = repo.players_by_team(team.id).unwrap();
    assert_eq!(
        squad.iter().map(|p| p.id).collect::<Vec<_>>(),
        vec![bea.id, ana.id]
    );
    assert_eq!(repo.get_player(ana.id).unwrap(), ana);
}

#[test]
fn test_coach_round_trip_through_facade() {
    let db = test_db();
    let repo = RosterRepository::with_default_validator(db, &RosterConfig::default());
    let team = repo.save_team(&new_team("Atlas")).unwrap();

    let mia = repo
        .save_coach(&Coach {
            id: CoachId::new(0),
            name: "Mia".to_string(),
            specialty: Specialty::Goalkeeping,
            team_id: team.id,
        })
        .unwrap();

    assert_eq!(repo.get_coach(mia.id).unwrap(), mia);
    assert!(repo.delete_coach(mia.id).unwrap());
    assert!(repo.get_coach(mia.id).unwrap_err().is_not_found());
}

#[test]
fn test_concurrent_updates_converge() {
    let db = test_db();
    let config = RosterConfig {
        write_policy: WritePolicy::Refresh,
        ..RosterConfig::default()
    };
    let repo = Arc::new(RosterRepository::with_default_validator(db, &config));
    let team = repo.save_team(&new_team("Atlas")).unwrap();

    let handles: Vec<_> = ["North", "South"]
        .into_iter()
        .map(|tag| {
            let repo = repo.clone();
            let base = team.clone();
            thread::spawn(move || {
                for round in 0..25 {
                    let renamed = Team {
                        name: format!("Atlas {tag} {round}"),
                        ..base.clone()
                    };
                    repo.update_team(&renamed).unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    // Whichever database write landed last is also what the cache serves:
    // no interleaving may produce a third, never-persisted value.
    let cached = repo.get_team(team.id).unwrap();
    let persisted = repo.team_dao().find_by_id(team.id.as_i64()).unwrap();
    assert_eq!(cached, persisted);
}
