//! Shared Diesel error mapping for the dashboard repositories.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Constraint violations some repositories translate into domain variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintViolation {
    Unique,
    ForeignKey,
}

/// Map pool errors into a repository-specific connection error constructor.
pub fn map_basic_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    connection(message)
}

/// Map Diesel failures into query or connection constructors.
///
/// Constraint violations are offered to `constraint` first; returning `None`
/// falls back to a generic query error.
pub fn map_diesel_error_with<E, Q, C, V>(
    error: DieselError,
    query: Q,
    connection: C,
    constraint: V,
) -> E
where
    Q: Fn(&'static str) -> E,
    C: Fn(&'static str) -> E,
    V: FnOnce(ConstraintViolation, Option<&str>) -> Option<E>,
{
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(
                ?kind,
                message = info.message(),
                constraint = info.constraint_name(),
                "diesel operation failed"
            );
        }
        _ => debug!(%error, "diesel operation failed"),
    }

    match error {
        DieselError::NotFound => query("record not found"),
        DieselError::QueryBuilderError(_) => query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection("database connection error")
        }
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            constraint(ConstraintViolation::Unique, info.constraint_name())
                .unwrap_or_else(|| query("unique constraint violated"))
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
            constraint(ConstraintViolation::ForeignKey, info.constraint_name())
                .unwrap_or_else(|| query("foreign key constraint violated"))
        }
        _ => query("database error"),
    }
}

/// [`map_diesel_error_with`] for repositories without constraint handling.
pub fn map_basic_diesel_error<E, Q, C>(error: DieselError, query: Q, connection: C) -> E
where
    Q: Fn(&'static str) -> E,
    C: Fn(&'static str) -> E,
{
    map_diesel_error_with(error, query, connection, |_, _| None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel::result::DatabaseErrorInformation;
    use rstest::rstest;

    #[derive(Debug, PartialEq, Eq)]
    enum Mapped {
        Query(&'static str),
        Connection(String),
        Duplicate,
    }

    struct Info(Option<&'static str>);

    impl DatabaseErrorInformation for Info {
        fn message(&self) -> &str {
            "violation"
        }
        fn details(&self) -> Option<&str> {
            None
        }
        fn hint(&self) -> Option<&str> {
            None
        }
        fn table_name(&self) -> Option<&str> {
            None
        }
        fn column_name(&self) -> Option<&str> {
            None
        }
        fn constraint_name(&self) -> Option<&str> {
            self.0
        }
        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    fn database_error(kind: DatabaseErrorKind, constraint: Option<&'static str>) -> DieselError {
        DieselError::DatabaseError(kind, Box::new(Info(constraint)))
    }

    fn map(error: DieselError) -> Mapped {
        map_diesel_error_with(
            error,
            Mapped::Query,
            |message| Mapped::Connection(message.to_owned()),
            |violation, name| {
                (violation == ConstraintViolation::Unique
                    && name == Some("users_username_key"))
                .then_some(Mapped::Duplicate)
            },
        )
    }

    #[rstest]
    fn unique_violation_is_offered_to_handler() {
        let mapped = map(database_error(
            DatabaseErrorKind::UniqueViolation,
            Some("users_username_key"),
        ));
        assert_eq!(mapped, Mapped::Duplicate);
    }

    #[rstest]
    fn unhandled_violation_falls_back_to_query() {
        let mapped = map(database_error(DatabaseErrorKind::ForeignKeyViolation, None));
        assert_eq!(mapped, Mapped::Query("foreign key constraint violated"));
    }

    #[rstest]
    fn closed_connection_maps_to_connection() {
        let mapped = map(database_error(DatabaseErrorKind::ClosedConnection, None));
        assert_eq!(
            mapped,
            Mapped::Connection("database connection error".to_owned())
        );
    }

    #[rstest]
    fn pool_errors_keep_message() {
        let mapped: Mapped =
            map_basic_pool_error(PoolError::checkout("timed out"), Mapped::Connection);
        assert_eq!(mapped, Mapped::Connection("timed out".to_owned()));
    }
}
