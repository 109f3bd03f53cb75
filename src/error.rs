//! Typed failures returned by the location and weather services.

/// Errors surfaced by the core. The HTTP layer maps each variant to a
/// status code; nothing in the core logs, retries or swallows them.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    // ---
    #[error("location not found: {0}")]
    LocationNotFound(String),

    #[error("location code {0} already exists")]
    DuplicateResource(String),

    #[error("invalid input: {0}")]
    Invalid(String),

    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// True when the database rejected a write because of a primary key or
/// unique constraint.
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(|db_err| db_err.is_unique_violation())
}
