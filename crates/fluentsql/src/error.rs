//! Error types for fluentsql

use crate::query::StatementKind;
use thiserror::Error;

/// Result type alias for fluentsql operations
pub type QbResult<T> = Result<T, QbError>;

/// Errors raised while building or rendering a statement.
///
/// Builder methods never panic: the first misuse is recorded on the
/// [`Query`](crate::Query) and returned by every render of it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QbError {
    /// A verb was called on a query that already has a different kind
    #[error("Cannot turn a {current} statement into a {requested} statement")]
    KindConflict {
        current: StatementKind,
        requested: StatementKind,
    },

    /// A clause was used with a statement kind that does not support it
    #[error("{clause} is not supported on {kind} statements")]
    UnsupportedClause {
        clause: &'static str,
        kind: StatementKind,
    },

    /// INSERT/UPDATE/DELETE without a target table
    #[error("{0} requires a table name")]
    MissingTable(StatementKind),

    /// A closure returned without building anything
    #[error("Empty subquery in {0}")]
    EmptySubquery(&'static str),

    /// The same CTE name was registered twice
    #[error("Duplicate CTE name: {0}")]
    DuplicateCte(String),

    /// Positional and named values were mixed on one statement
    #[error("Cannot mix positional and named values")]
    MixedValues,

    /// Statement is incomplete or inconsistent at render time
    #[error("Validation error: {0}")]
    Validation(String),
}

impl QbError {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create an unsupported clause error
    pub fn unsupported(clause: &'static str, kind: StatementKind) -> Self {
        Self::UnsupportedClause { clause, kind }
    }

    /// Check if this error was raised by a builder call rather than at render time
    pub fn is_misuse(&self) -> bool {
        !matches!(self, Self::Validation(_))
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
