//! Shared error mapping and pagination casts for Diesel repositories.

use tracing::debug;

use super::pool::PoolError;

/// Map pool errors into a repository-specific connection error constructor.
pub(crate) fn map_basic_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    connection(message)
}

/// Map common Diesel error variants into query/connection constructors.
///
/// `NotFound` and query-builder failures map to query errors; closed
/// connections map to connection errors.
pub(crate) fn map_basic_diesel_error<E, Q, C>(
    error: diesel::result::Error,
    query: Q,
    connection: C,
) -> E
where
    Q: Fn(&'static str) -> E,
    C: Fn(&'static str) -> E,
{
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => query("record not found"),
        DieselError::QueryBuilderError(_) => query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection("database connection error")
        }
        DieselError::DatabaseError(_, _) => query("database error"),
        _ => query("database error"),
    }
}

/// Like [`map_basic_diesel_error`] but routes unique constraint violations
/// through `on_unique`, for writes into tables with a natural key.
pub(crate) fn map_write_diesel_error<E, U, Q, C>(
    error: diesel::result::Error,
    on_unique: U,
    query: Q,
    connection: C,
) -> E
where
    U: FnOnce() -> E,
    Q: Fn(&'static str) -> E,
    C: Fn(&'static str) -> E,
{
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    if let DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) = &error {
        debug!(message = info.message(), "unique constraint violated");
        return on_unique();
    }
    map_basic_diesel_error(error, query, connection)
}

/// Collect row conversion results, mapping the first failure message into a
/// repository error.
pub(crate) fn collect_rows<T, E, I, F>(rows: I, map_err: F) -> Result<Vec<T>, E>
where
    I: Iterator<Item = Result<T, String>>,
    F: Fn(String) -> E,
{
    rows.map(|row| row.map_err(&map_err)).collect()
}

/// Clamp a pagination offset into the `i64` range Diesel expects.
pub(crate) fn to_sql_offset(offset: u64) -> i64 {
    i64::try_from(offset).unwrap_or(i64::MAX)
}

/// Page size as the `i64` Diesel expects.
pub(crate) fn to_sql_limit(limit: u32) -> i64 {
    i64::from(limit)
}
