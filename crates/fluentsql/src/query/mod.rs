//! Statement model.
//!
//! A [`Query`] accumulates the clauses of one SQL statement through fluent
//! `&mut self` methods. Arguments that accept a nested statement take
//! `impl Into<Fragment>`; closures become nested statements through
//! [`subquery`] (or directly, for methods that require a closure such as
//! [`Query::where_exists`], [`Query::union`] and [`Query::with`]). A closure
//! has always returned before its statement is stored in the parent.
//!
//! # Usage
//!
//! ```
//! use fluentsql::{Order, Query};
//!
//! let mut q = Query::new();
//! q.select(["albums.Title", "artists.Name"])
//!     .from("albums")
//!     .left_join("artists", "albums.ArtistId = artists.ArtistId")
//!     .where_("artists.ArtistId = ?")
//!     .order_by("albums.Title", Order::Asc);
//!
//! assert_eq!(
//!     q.to_sql().unwrap(),
//!     "SELECT albums.Title,artists.Name FROM albums \
//!      LEFT JOIN artists ON albums.ArtistId = artists.ArtistId \
//!      WHERE artists.ArtistId = ? ORDER BY albums.Title ASC"
//! );
//! ```

mod condition;
mod cte;
mod delete;
mod filter;
mod fragment;
mod insert;
mod select;
mod update;

pub use condition::{Condition, ConditionGroup, Connector, Prefix};
pub use fragment::{Fragment, IntoAlias, subquery};

use crate::compiler::Compiler;
use crate::error::{QbError, QbResult};
use std::fmt;

/// The verb of a statement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StatementKind {
    Select,
    Insert,
    Update,
    Delete,
}

impl StatementKind {
    pub fn as_str(self) -> &'static str {
        match self {
            StatementKind::Select => "SELECT",
            StatementKind::Insert => "INSERT",
            StatementKind::Update => "UPDATE",
            StatementKind::Delete => "DELETE",
        }
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort direction for ORDER BY.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Order {
    #[default]
    Asc,
    Desc,
}

impl Order {
    pub fn as_str(self) -> &'static str {
        match self {
            Order::Asc => "ASC",
            Order::Desc => "DESC",
        }
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Join flavour.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JoinType {
    Inner,
    Left,
    Right,
    Full,
    Cross,
}

impl JoinType {
    pub fn as_str(self) -> &'static str {
        match self {
            JoinType::Inner => "INNER JOIN",
            JoinType::Left => "LEFT JOIN",
            JoinType::Right => "RIGHT JOIN",
            JoinType::Full => "FULL OUTER JOIN",
            JoinType::Cross => "CROSS JOIN",
        }
    }
}

/// One JOIN clause.
#[derive(Clone, Debug, PartialEq)]
pub struct Join {
    pub join_type: JoinType,
    pub target: Fragment,
    pub on: Option<Fragment>,
}

/// INSERT/UPDATE payload.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Values {
    #[default]
    Empty,
    /// Values paired with an explicit column list.
    Positional(Vec<Fragment>),
    /// Column/value pairs in insertion order.
    Named(Vec<(String, Fragment)>),
    /// INSERT ... SELECT
    Select(Box<Query>),
}

impl Values {
    pub fn is_empty(&self) -> bool {
        match self {
            Values::Empty => true,
            Values::Positional(v) => v.is_empty(),
            Values::Named(v) => v.is_empty(),
            Values::Select(_) => false,
        }
    }
}

/// A UNION member.
#[derive(Clone, Debug, PartialEq)]
pub struct Union {
    pub query: Query,
    pub all: bool,
}

/// A named common table expression.
#[derive(Clone, Debug, PartialEq)]
pub struct Cte {
    pub name: String,
    pub columns: Option<Vec<String>>,
    pub query: Query,
}

const SELECT_ONLY: &[StatementKind] = &[StatementKind::Select];
const FILTERABLE: &[StatementKind] = &[
    StatementKind::Select,
    StatementKind::Update,
    StatementKind::Delete,
];
const WRITABLE: &[StatementKind] = &[StatementKind::Insert, StatementKind::Update];
const INSERT_ONLY: &[StatementKind] = &[StatementKind::Insert];

/// One SQL statement under construction.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Query {
    pub(crate) kind: Option<StatementKind>,
    pub(crate) is_subquery: bool,
    pub(crate) alias: Option<String>,
    pub(crate) distinct: bool,
    pub(crate) select_list: Vec<Fragment>,
    /// FROM target for SELECT, target table for INSERT/UPDATE/DELETE
    pub(crate) source: Option<Fragment>,
    pub(crate) source_alias: Option<String>,
    pub(crate) joins: Vec<Join>,
    pub(crate) where_group: ConditionGroup,
    pub(crate) group_by: Vec<String>,
    pub(crate) having_group: ConditionGroup,
    pub(crate) order_by: Vec<(String, Order)>,
    pub(crate) limit: Option<u64>,
    pub(crate) offset: u64,
    pub(crate) columns: Option<Vec<String>>,
    pub(crate) values: Values,
    pub(crate) unions: Vec<Union>,
    pub(crate) ctes: Vec<Cte>,
    pub(crate) recursive: bool,
    pub(crate) build_error: Option<QbError>,
}

impl Query {
    /// Create an empty statement.
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `build` against a fresh statement and keep its return value as alias.
    pub(crate) fn built_by<F, R>(build: F) -> Self
    where
        F: FnOnce(&mut Query) -> R,
        R: IntoAlias,
    {
        let mut q = Query::new();
        let alias = build(&mut q).into_alias();
        if alias.is_some() {
            q.alias = alias;
        }
        q
    }

    // ==================== Accessors ====================

    /// The statement kind, if a verb was called.
    pub fn kind(&self) -> Option<StatementKind> {
        self.kind
    }

    /// Alias used when this statement is embedded as a derived table.
    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// Whether this statement sits in a value position of its parent.
    pub fn is_subquery(&self) -> bool {
        self.is_subquery
    }

    /// Names of the registered CTEs, in registration order.
    pub fn cte_names(&self) -> impl Iterator<Item = &str> {
        self.ctes.iter().map(|cte| cte.name.as_str())
    }

    /// The first misuse recorded while building, if any.
    pub fn build_error(&self) -> Option<&QbError> {
        self.build_error.as_ref()
    }

    /// A statement with no verb and no clauses renders to nothing.
    pub fn is_empty(&self) -> bool {
        self.kind.is_none() && self.where_group.is_empty() && self.stray_clause().is_none()
    }

    /// Set the alias used when this statement is embedded.
    pub fn alias_as(&mut self, alias: impl Into<String>) -> &mut Self {
        self.alias = Some(alias.into());
        self
    }

    // ==================== Rendering ====================

    /// Render with the default dialect.
    pub fn to_sql(&self) -> QbResult<String> {
        Compiler::default().compile(self)
    }

    /// Render with the given compiler (and therefore its dialect).
    pub fn to_sql_with(&self, compiler: &Compiler) -> QbResult<String> {
        compiler.compile(self)
    }

    /// Return the recorded misuse error, if any.
    pub fn validate(&self) -> QbResult<()> {
        match &self.build_error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    // ==================== Internal helpers ====================

    /// Record a misuse. The first error wins.
    pub(crate) fn fail(&mut self, err: QbError) {
        if self.build_error.is_none() {
            self.build_error = Some(err);
        }
    }

    /// Check that `clause` may be used with the current kind.
    ///
    /// An untyped statement accepts everything; the check is repeated when a
    /// verb is set later on.
    pub(crate) fn allow(&mut self, clause: &'static str, allowed: &[StatementKind]) -> bool {
        match self.kind {
            Some(kind) if !allowed.contains(&kind) => {
                self.fail(QbError::unsupported(clause, kind));
                false
            }
            _ => true,
        }
    }

    pub(crate) fn allow_select_clause(&mut self, clause: &'static str) -> bool {
        self.allow(clause, SELECT_ONLY)
    }

    pub(crate) fn allow_where(&mut self) -> bool {
        self.allow("WHERE", FILTERABLE)
    }

    pub(crate) fn allow_values(&mut self) -> bool {
        self.allow("VALUES", WRITABLE)
    }

    pub(crate) fn allow_columns(&mut self) -> bool {
        self.allow("column list", INSERT_ONLY)
    }

    /// Set the statement kind, rejecting conflicts with the existing state.
    pub(crate) fn set_kind(&mut self, kind: StatementKind) -> bool {
        match self.kind {
            Some(current) if current == kind => return true,
            Some(current) => {
                self.fail(QbError::KindConflict {
                    current,
                    requested: kind,
                });
                return false;
            }
            None => {}
        }

        if let Some(clause) = self.populated_clauses().into_iter().find_map(
            |(clause, populated, allowed)| (populated && !allowed.contains(&kind)).then_some(clause),
        ) {
            self.fail(QbError::unsupported(clause, kind));
            return false;
        }

        self.kind = Some(kind);
        true
    }

    /// Clauses that are already filled in, with the kinds that accept them.
    fn populated_clauses(&self) -> [(&'static str, bool, &'static [StatementKind]); 12] {
        [
            ("SELECT list", !self.select_list.is_empty(), SELECT_ONLY),
            ("DISTINCT", self.distinct, SELECT_ONLY),
            ("FROM", self.source.is_some(), SELECT_ONLY),
            ("JOIN", !self.joins.is_empty(), SELECT_ONLY),
            ("GROUP BY", !self.group_by.is_empty(), SELECT_ONLY),
            ("HAVING", !self.having_group.is_empty(), SELECT_ONLY),
            ("ORDER BY", !self.order_by.is_empty(), SELECT_ONLY),
            ("LIMIT/OFFSET", self.limit.is_some() || self.offset > 0, SELECT_ONLY),
            ("UNION", !self.unions.is_empty(), SELECT_ONLY),
            ("WHERE", !self.where_group.is_empty(), FILTERABLE),
            ("VALUES", !self.values.is_empty(), WRITABLE),
            ("column list", self.columns.is_some(), INSERT_ONLY),
        ]
    }

    /// First clause that only a verb can render, on a statement without one.
    pub(crate) fn stray_clause(&self) -> Option<&'static str> {
        if self.kind.is_some() {
            return None;
        }
        if !self.ctes.is_empty() {
            return Some("WITH");
        }
        self.populated_clauses()
            .into_iter()
            .find_map(|(clause, populated, _)| (populated && clause != "WHERE").then_some(clause))
    }

    /// Reject a nested statement without a verb where a full statement is required.
    pub(crate) fn require_statement(&mut self, fragment: &Fragment, context: &'static str) -> bool {
        if fragment.as_query().is_some_and(|q| q.kind.is_none()) {
            self.fail(QbError::EmptySubquery(context));
            return false;
        }
        true
    }

    /// Set the target table of a DML verb.
    pub(crate) fn set_table(&mut self, kind: StatementKind, table: &str) -> &mut Self {
        if !self.set_kind(kind) {
            return self;
        }
        if table.trim().is_empty() {
            self.fail(QbError::MissingTable(kind));
            return self;
        }
        self.source = Some(Fragment::raw(table));
        self
    }

    /// Keep a child's build error visible on the parent.
    pub(crate) fn adopt_error(&mut self, fragment: &Fragment) {
        if let Some(err) = fragment.as_query().and_then(Query::build_error) {
            self.fail(err.clone());
        }
    }
}

/// Create a SELECT statement with the given select list.
///
/// # Example
/// ```
/// let mut q = fluentsql::select(["id", "name"]);
/// q.from("users");
/// assert_eq!(q.to_sql().unwrap(), "SELECT id,name FROM users");
/// ```
pub fn select<I>(columns: I) -> Query
where
    I: IntoIterator,
    I::Item: Into<Fragment>,
{
    let mut q = Query::new();
    q.select(columns);
    q
}

/// Create an INSERT statement for the given table.
pub fn insert(table: &str) -> Query {
    let mut q = Query::new();
    q.insert(table);
    q
}

/// Create an UPDATE statement for the given table.
pub fn update(table: &str) -> Query {
    let mut q = Query::new();
    q.update(table);
    q
}

/// Create a DELETE statement for the given table.
pub fn delete(table: &str) -> Query {
    let mut q = Query::new();
    q.delete(table);
    q
}
