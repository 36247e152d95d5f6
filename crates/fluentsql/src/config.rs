use crate::compiler::Dialect;
use serde::{Deserialize, Serialize};

/// Configuration for the SQL compiler.
///
/// Deserializable so a host application can embed it in its own config file;
/// missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Pagination dialect.
    pub dialect: Dialect,
    /// Emit rendered SQL at DEBUG (`true`) or only at TRACE (`false`).
    pub log_sql: bool,
    /// Truncate logged SQL (in bytes, on a char boundary). `None` means no truncation.
    pub max_logged_sql_length: Option<usize>,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            dialect: Dialect::Standard,
            log_sql: true,
            max_logged_sql_length: Some(200),
        }
    }
}

impl CompilerConfig {
    /// Create a new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the dialect.
    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// Only log rendered SQL at TRACE level.
    pub fn disable_sql_logging(mut self) -> Self {
        self.log_sql = false;
        self
    }

    /// Log rendered SQL at DEBUG level.
    pub fn enable_sql_logging(mut self) -> Self {
        self.log_sql = true;
        self
    }

    /// Set maximum logged SQL length.
    pub fn with_max_logged_sql_length(mut self, len: usize) -> Self {
        self.max_logged_sql_length = Some(len);
        self
    }

    /// Disable SQL truncation in logs.
    pub fn no_truncate(mut self) -> Self {
        self.max_logged_sql_length = None;
        self
    }
}
