//! Snapshot backup and restore
//!
//! Out-of-band export/import of the entire dataset as a versioned JSON
//! document. Exports land atomically (temp file, then rename); imports
//! validate the whole document before writing anything and report
//! per-record outcomes instead of rolling back.

mod snapshot;


pub use snapshot::{Snapshot, SNAPSHOT_VERSION};

use log::{debug, warn};
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::dao::EntityDao;
use crate::error::{Result, RosterError};
use crate::models::EntityKind;
use crate::repository::RosterRepository;

/// Reference to one snapshot record in an import report.
#[derive(Debug, Clone, Serialize)]
pub struct RecordRef {
    pub kind: EntityKind,
    pub id: i64,
}

/// One record that could not be persisted during import.
#[derive(Debug, Clone, Serialize)]
pub struct ImportFailure {
    pub record: RecordRef,
    pub reason: String,
}

/// Per-record outcome of an import. There is no cross-record transaction:
/// failed records are enumerated here and successes stay persisted.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportReport {
    pub imported: Vec<RecordRef>,
    pub failed: Vec<ImportFailure>,
}

impl ImportReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Serialize the full dataset to `path`.
///
/// Either the whole document lands or none of it does: the snapshot is
/// written to a temporary file beside the destination and renamed over it.
pub fn export_all(repository: &RosterRepository, path: &Path) -> Result<()> {
    let snapshot = Snapshot::capture(repository)?;
    debug!(
        "exporting {} teams, {} players, {} coaches to {}",
        snapshot.teams.len(),
        snapshot.players.len(),
        snapshot.coaches.len(),
        path.display()
    );

    let contents = serde_json::to_string_pretty(&snapshot)?;
    write_atomic(path, &contents)
}

/// Restore the dataset at `path` into the repository.
///
/// Version, structure, and referential integrity are checked before any
/// write; a failure there leaves database and caches untouched. The
/// import itself blocks every write path, clears the caches, and persists
/// teams before the players and coaches that reference them.
pub fn import_all(repository: &RosterRepository, path: &Path) -> Result<ImportReport> {
    debug!("importing snapshot from {}", path.display());
    let text = fs::read_to_string(path)?;
    let snapshot: Snapshot =
        serde_json::from_str(&text).map_err(|err| RosterError::Format(err.to_string()))?;
    import_snapshot(repository, &snapshot)
}

/// As [`import_all`], for an already-parsed snapshot.
pub fn import_snapshot(repository: &RosterRepository, snapshot: &Snapshot) -> Result<ImportReport> {
    snapshot.validate()?;

    let _import = repository.begin_import();
    repository.invalidate_caches();

    let mut report = ImportReport::default();
    import_records(repository.team_dao(), &snapshot.teams, &mut report);
    import_records(repository.player_dao(), &snapshot.players, &mut report);
    import_records(repository.coach_dao(), &snapshot.coaches, &mut report);

    // Readers racing the import may have re-cached pre-import rows;
    // clear again so only post-import state is ever served.
    repository.invalidate_caches();

    debug!(
        "import finished: {} records imported, {} failed",
        report.imported.len(),
        report.failed.len()
    );
    Ok(report)
}

fn import_records<D: EntityDao>(dao: &D, records: &[D::Entity], report: &mut ImportReport) {
    for record in records {
        let record_ref = RecordRef {
            kind: dao.kind(),
            id: D::entity_id(record),
        };
        match dao.insert(record) {
            Ok(_) => report.imported.push(record_ref),
            Err(err) => {
                warn!(
                    "failed to import {} {}: {}",
                    record_ref.kind, record_ref.id, err
                );
                report.failed.push(ImportFailure {
                    record: record_ref,
                    reason: err.to_string(),
                });
            }
        }
    }
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&parent)?;

    let mut file = tempfile::NamedTempFile::new_in(&parent)?;
    file.write_all(contents.as_bytes())?;
    file.persist(path)
        .map_err(|err| RosterError::Io(err.error))?;
    Ok(())
}
