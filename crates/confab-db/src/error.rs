use confab_types::enums::UnknownLiteral;
use rusqlite::ffi;
use thiserror::Error;

pub type Result<T, E = DbError> = std::result::Result<T, E>;

/// Persistence errors, split by the constraint class that failed so callers
/// can map them onto distinct HTTP statuses.
#[derive(Debug, Error)]
pub enum DbError {
    /// UNIQUE or PRIMARY KEY constraint hit (duplicate email, duplicate
    /// (user, panel) favorite, second preference for a user, ...).
    #[error("uniqueness violation: {0}")]
    Unique(String),

    /// Foreign key points at a nonexistent parent row.
    #[error("referential integrity violation: {0}")]
    ForeignKey(String),

    /// CHECK constraint or enum literal outside its declared set.
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("database lock poisoned")]
    LockPoisoned,

    #[error(transparent)]
    Sqlite(rusqlite::Error),
}

impl From<rusqlite::Error> for DbError {
    fn from(err: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(e, ref msg) = err {
            let detail = || msg.clone().unwrap_or_else(|| "constraint failed".into());
            match e.extended_code {
                ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
                    return DbError::Unique(detail());
                }
                ffi::SQLITE_CONSTRAINT_FOREIGNKEY => return DbError::ForeignKey(detail()),
                ffi::SQLITE_CONSTRAINT_CHECK => return DbError::Validation(detail()),
                _ => {}
            }
        }
        DbError::Sqlite(err)
    }
}

impl From<UnknownLiteral> for DbError {
    fn from(err: UnknownLiteral) -> Self {
        DbError::Validation(err.to_string())
    }
}
