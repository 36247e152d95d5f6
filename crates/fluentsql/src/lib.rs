//! # fluentsql
//!
//! A fluent SQL statement builder.
//!
//! ## Features
//!
//! - **One model for every verb**: SELECT, INSERT, UPDATE and DELETE share a single [`Query`] type
//! - **Closure-composed subqueries**: derived tables, scalar subqueries, EXISTS, UNION and CTEs
//! - **Opaque fragments**: table, column and condition strings are emitted exactly as given
//! - **No panics on misuse**: the first misuse is recorded and returned at render time
//! - **Dialect-aware pagination**: `LIMIT/OFFSET` or `OFFSET ... FETCH NEXT`
//! - **Logging**: rendered SQL is emitted as `tracing` events (target `fluentsql.sql`)
//!
//! Bind values are not tracked; callers embed `?` placeholders themselves.
//!
//! ## Example
//!
//! ```
//! use fluentsql::{Compiler, Dialect, Order, Query};
//!
//! let mut q = Query::new();
//! q.select(["a.Name", "COUNT(*) AS Albums"])
//!     .from_as("artists", "a")
//!     .join("albums al", "al.ArtistId = a.ArtistId")
//!     .where_exists(|q| {
//!         q.select(["1"]).from("tracks t").where_("t.AlbumId = al.AlbumId");
//!     })
//!     .group_by(["a.Name"])
//!     .order_by("Albums", Order::Desc)
//!     .limit(10);
//!
//! assert_eq!(
//!     q.to_sql().unwrap(),
//!     "SELECT a.Name,COUNT(*) AS Albums FROM artists a \
//!      INNER JOIN albums al ON al.ArtistId = a.ArtistId \
//!      WHERE EXISTS (SELECT 1 FROM tracks t WHERE t.AlbumId = al.AlbumId) \
//!      GROUP BY a.Name ORDER BY Albums DESC LIMIT 10"
//! );
//!
//! let mssql = Compiler::new(Dialect::SqlServer);
//! assert!(q.to_sql_with(&mssql).unwrap().ends_with("OFFSET 0 ROWS FETCH NEXT 10 ROWS ONLY"));
//! ```

pub mod compiler;
pub mod config;
pub mod error;
pub mod query;

pub use compiler::{Compiler, Dialect, LimitOffset, OffsetFetch, Pagination};
pub use config::CompilerConfig;
pub use error::{QbError, QbResult};
pub use query::{
    Condition, ConditionGroup, Connector, Fragment, IntoAlias, JoinType, Order, Prefix, Query,
    StatementKind, delete, insert, select, subquery, update,
};
