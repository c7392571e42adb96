//! Database error types

use thiserror::Error;

use core_kernel::PortError;

/// Errors raised by the persistence layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    #[error("Entity not found: {0}")]
    NotFound(String),

    /// Unique constraint violation; carries the constraint name when known
    #[error("Duplicate entry: {message}")]
    DuplicateEntry {
        message: String,
        constraint: Option<String>,
    },

    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// A version-checked update matched no row
    #[error("Concurrent modification: {0}")]
    StaleVersion(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// A stored JSON column or enum text did not map to a domain value
    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Connection pool exhausted")]
    PoolExhausted,

    #[error("SQL error: {0}")]
    SqlError(sqlx::Error),
}

impl DatabaseError {
    pub fn not_found(entity: &str, id: impl std::fmt::Display) -> Self {
        DatabaseError::NotFound(format!("{entity} with id '{id}' not found"))
    }

    pub fn stale(entity: &str, id: impl std::fmt::Display, expected_version: u32) -> Self {
        DatabaseError::StaleVersion(format!(
            "{entity} {id} was modified concurrently (expected version {expected_version})"
        ))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, DatabaseError::NotFound(_))
    }

    /// True when the duplicate hit the named unique constraint
    pub fn is_duplicate_of(&self, name: &str) -> bool {
        matches!(self, DatabaseError::DuplicateEntry { constraint: Some(c), .. } if c == name)
    }

    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            DatabaseError::DuplicateEntry { .. }
                | DatabaseError::ForeignKeyViolation(_)
                | DatabaseError::ConstraintViolation(_)
        )
    }

    pub fn is_connection_error(&self) -> bool {
        matches!(self, DatabaseError::ConnectionFailed(_) | DatabaseError::PoolExhausted)
    }
}

/// Maps SQLx errors to specific variants by PostgreSQL error code
impl From<sqlx::Error> for DatabaseError {
    fn from(error: sqlx::Error) -> Self {
        let mapped = match &error {
            sqlx::Error::RowNotFound => Some(DatabaseError::NotFound("Record not found".to_string())),
            sqlx::Error::PoolTimedOut => Some(DatabaseError::PoolExhausted),
            sqlx::Error::Io(e) => Some(DatabaseError::ConnectionFailed(e.to_string())),
            sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
                Some(DatabaseError::SerializationError(error.to_string()))
            }
            // https://www.postgresql.org/docs/current/errcodes-appendix.html
            sqlx::Error::Database(db_err) => {
                let code = db_err.code().map(|c| c.into_owned());
                let message = db_err.message().to_string();
                match code.as_deref() {
                    Some("23505") => Some(DatabaseError::DuplicateEntry {
                        message,
                        constraint: db_err.constraint().map(str::to_string),
                    }),
                    Some("23503") => Some(DatabaseError::ForeignKeyViolation(message)),
                    Some("23514") => Some(DatabaseError::ConstraintViolation(message)),
                    _ => None,
                }
            }
            _ => None,
        };
        mapped.unwrap_or_else(|| DatabaseError::SqlError(error))
    }
}

impl From<serde_json::Error> for DatabaseError {
    fn from(error: serde_json::Error) -> Self {
        DatabaseError::SerializationError(error.to_string())
    }
}

impl From<DatabaseError> for PortError {
    fn from(error: DatabaseError) -> Self {
        match error {
            DatabaseError::NotFound(message) => PortError::NotFound {
                entity_type: "Record".to_string(),
                id: message,
            },
            DatabaseError::StaleVersion(message) => PortError::conflict(message),
            DatabaseError::DuplicateEntry { message, .. } => PortError::conflict(message),
            DatabaseError::ForeignKeyViolation(message) | DatabaseError::ConstraintViolation(message) => {
                PortError::validation(message)
            }
            DatabaseError::SerializationError(message) => PortError::corrupt(message),
            DatabaseError::ConnectionFailed(message) => PortError::connection(message),
            DatabaseError::PoolExhausted => PortError::connection("Connection pool exhausted"),
            other => PortError::internal(other.to_string()),
        }
    }
}
