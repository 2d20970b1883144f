//! Data access objects for the roster store
//!
//! One DAO per entity type, each mapping its entity to SQLite rows with
//! explicit, hand-written row↔entity conversions. The shared [`EntityDao`]
//! trait is the seam the cached repository composes over.

mod coach;
mod player;
mod team;


pub use coach::CoachDao;
pub use player::PlayerDao;
pub use team::TeamDao;

use chrono::NaiveDate;

use crate::error::Result;
use crate::models::EntityKind;

/// CRUD surface shared by all entity DAOs.
///
/// Every operation is a single statement or a small fixed sequence held
/// under the connection lock; cross-entity composition lives in the
/// repository layer.
pub trait EntityDao: Send + Sync {
    type Entity: Clone + Send;

    /// Entity type this DAO persists, used in errors and reports.
    fn kind(&self) -> EntityKind;

    /// Raw identifier of an entity value.
    fn entity_id(entity: &Self::Entity) -> i64;

    /// Fails with `NotFound` when the id is absent.
    fn find_by_id(&self, id: i64) -> Result<Self::Entity>;

    /// Snapshot of all rows in canonical listing order (by name).
    fn find_all(&self) -> Result<Vec<Self::Entity>>;

    /// Insert the entity, letting the database assign the id when it is
    /// unassigned; a nonzero id is honored verbatim. Returns the persisted
    /// entity including its id.
    fn insert(&self, entity: &Self::Entity) -> Result<Self::Entity>;

    /// Fails with `NotFound` when no row matches the entity's id.
    fn update(&self, entity: &Self::Entity) -> Result<Self::Entity>;

    /// Returns `Ok(true)` when a row was deleted, `Ok(false)` when the id
    /// was already absent.
    fn delete(&self, id: i64) -> Result<bool>;

    /// Number of persisted rows.
    fn count(&self) -> Result<u64>;

    /// Remove every row, returning how many were deleted.
    fn delete_all(&self) -> Result<usize>;
}

pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

pub(crate) fn encode_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub(crate) fn decode_date(index: usize, text: &str) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(text, DATE_FORMAT)
        .map_err(|err| invalid_column(index, err))
}

pub(crate) fn invalid_column(
    index: usize,
    err: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(index, rusqlite::types::Type::Text, Box::new(err))
}
