//! Error types for the roster store

use thiserror::Error;

use crate::models::EntityKind;

pub type Result<T> = std::result::Result<T, RosterError>;

#[derive(Error, Debug)]
pub enum RosterError {
    #[error("{kind} with id {id} not found")]
    NotFound { kind: EntityKind, id: i64 },

    #[error("database failure: {0}")]
    Persistence(#[from] rusqlite::Error),

    #[error("snapshot format error: {0}")]
    Format(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("validation failed: {}", violations.join("; "))]
    Validation { violations: Vec<String> },

    #[error("invalid position: {value}")]
    InvalidPosition { value: String },

    #[error("invalid specialty: {value}")]
    InvalidSpecialty { value: String },
}

impl RosterError {
    /// Whether this error is a plain "identifier absent" outcome.
    ///
    /// Callers frequently treat absence as a normal result rather than a
    /// failure; this avoids matching on the variant at every call site.
    pub fn is_not_found(&self) -> bool {
        matches!(self, RosterError::NotFound { .. })
    }
}

impl From<serde_json::Error> for RosterError {
    fn from(err: serde_json::Error) -> Self {
        RosterError::Format(err.to_string())
    }
}
