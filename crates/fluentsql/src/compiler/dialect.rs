//! Pagination dialects.
//!
//! Everything the compiler renders is dialect-neutral except the pagination
//! clause, which is delegated to a [`Pagination`] strategy.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Renders the pagination clause of a SELECT.
pub trait Pagination: Send + Sync + fmt::Debug {
    /// Return the clause for the given limit/offset, or `None` when nothing
    /// should be emitted.
    fn render(&self, limit: Option<u64>, offset: u64) -> Option<String>;
}

/// `LIMIT n OFFSET m`, each part emitted on its own.
#[derive(Debug, Clone, Copy, Default)]
pub struct LimitOffset;

impl Pagination for LimitOffset {
    fn render(&self, limit: Option<u64>, offset: u64) -> Option<String> {
        let mut parts = Vec::with_capacity(2);
        if let Some(limit) = limit {
            parts.push(format!("LIMIT {}", limit));
        }
        if offset > 0 {
            parts.push(format!("OFFSET {}", offset));
        }
        (!parts.is_empty()).then(|| parts.join(" "))
    }
}

/// `OFFSET m ROWS FETCH NEXT n ROWS ONLY` (SQL Server, SQL:2008).
///
/// The OFFSET part is mandatory once a limit is set, so it defaults to 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct OffsetFetch;

impl Pagination for OffsetFetch {
    fn render(&self, limit: Option<u64>, offset: u64) -> Option<String> {
        if limit.is_none() && offset == 0 {
            return None;
        }
        let mut sql = format!("OFFSET {} ROWS", offset);
        if let Some(limit) = limit {
            sql.push_str(&format!(" FETCH NEXT {} ROWS ONLY", limit));
        }
        Some(sql)
    }
}

/// Named dialects selectable from configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dialect {
    /// PostgreSQL, SQLite, MySQL: `LIMIT`/`OFFSET`.
    #[default]
    #[serde(alias = "postgres", alias = "sqlite", alias = "mysql")]
    Standard,
    /// Microsoft SQL Server: `OFFSET ... ROWS FETCH NEXT ... ROWS ONLY`.
    #[serde(alias = "mssql")]
    SqlServer,
}

impl Dialect {
    /// The pagination strategy of this dialect.
    pub fn pagination(self) -> Box<dyn Pagination> {
        match self {
            Dialect::Standard => Box::new(LimitOffset),
            Dialect::SqlServer => Box::new(OffsetFetch),
        }
    }
}
