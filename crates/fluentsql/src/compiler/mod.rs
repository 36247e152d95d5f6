//! SQL rendering.
//!
//! [`Compiler`] walks a [`Query`] tree and produces SQL text. Rendering is a
//! pure `&self` traversal: the same query renders to the same string every
//! time, and a compiler can be shared across threads.
//!
//! Formatting rules:
//! - keywords and clauses are separated by one space
//! - lists are comma-joined without spaces
//! - empty clauses contribute nothing

mod dialect;

pub use dialect::{Dialect, LimitOffset, OffsetFetch, Pagination};

use crate::config::CompilerConfig;
use crate::error::{QbError, QbResult};
use crate::query::{ConditionGroup, Cte, Fragment, Join, Query, StatementKind, Values};

/// Renders statements to SQL text.
#[derive(Debug)]
pub struct Compiler {
    pagination: Box<dyn Pagination>,
    config: CompilerConfig,
}

impl Default for Compiler {
    fn default() -> Self {
        Self::from_config(&CompilerConfig::default())
    }
}

impl Compiler {
    /// Create a compiler for the given dialect, with default logging settings.
    pub fn new(dialect: Dialect) -> Self {
        Self::from_config(&CompilerConfig::new().with_dialect(dialect))
    }

    /// Create a compiler from configuration.
    pub fn from_config(config: &CompilerConfig) -> Self {
        Self {
            pagination: config.dialect.pagination(),
            config: config.clone(),
        }
    }

    /// Replace the pagination strategy (overrides the configured dialect).
    pub fn with_pagination(mut self, pagination: impl Pagination + 'static) -> Self {
        self.pagination = Box::new(pagination);
        self
    }

    /// The configuration this compiler was built from.
    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Render a statement.
    ///
    /// Returns the first misuse recorded while building, or a validation
    /// error for statements that cannot be rendered.
    pub fn compile(&self, query: &Query) -> QbResult<String> {
        let sql = self.render(query)?;
        #[cfg(feature = "tracing")]
        self.trace(query.kind(), &sql);
        Ok(sql)
    }

    fn render(&self, query: &Query) -> QbResult<String> {
        query.validate()?;

        let sql = match query.kind {
            Some(StatementKind::Select) => self.render_select(query)?,
            Some(StatementKind::Insert) => self.render_insert(query)?,
            Some(StatementKind::Update) => self.render_update(query)?,
            Some(StatementKind::Delete) => self.render_delete(query)?,
            None => {
                if let Some(clause) = query.stray_clause() {
                    return Err(QbError::validation(format!(
                        "{} requires a SELECT, INSERT, UPDATE or DELETE verb",
                        clause
                    )));
                }
                self.render_conditions(&query.where_group)?
            }
        };

        if !query.is_subquery {
            return Ok(sql);
        }
        Ok(match &query.alias {
            Some(alias) => format!("({}) AS {}", sql, alias),
            None => format!("({})", sql),
        })
    }

    // ==================== Statements ====================

    fn render_select(&self, query: &Query) -> QbResult<String> {
        let mut parts = Vec::new();
        parts.push(self.render_with(query)?);

        let list = self.render_list(&query.select_list)?;
        let list = if list.is_empty() { "*".to_string() } else { list };
        if query.distinct {
            parts.push(format!("SELECT DISTINCT {}", list));
        } else {
            parts.push(format!("SELECT {}", list));
        }

        if let Some(source) = &query.source {
            let mut from = format!("FROM {}", self.render_operand(source)?);
            if let Some(alias) = &query.source_alias {
                from.push(' ');
                from.push_str(alias);
            }
            parts.push(from);
        }

        for join in &query.joins {
            parts.push(self.render_join(join)?);
        }

        parts.push(self.render_clause("WHERE", &query.where_group)?);

        if !query.group_by.is_empty() {
            parts.push(format!("GROUP BY {}", query.group_by.join(",")));
            parts.push(self.render_clause("HAVING", &query.having_group)?);
        }

        for union in &query.unions {
            let keyword = if union.all { "UNION ALL" } else { "UNION" };
            let member = self.render(&union.query)?;
            // Keep the member's own ordering/pagination out of the compound.
            let member = if has_own_ordering(&union.query) {
                format!("({})", member)
            } else {
                member
            };
            parts.push(format!("{} {}", keyword, member));
        }

        if !query.order_by.is_empty() {
            let order: Vec<String> = query
                .order_by
                .iter()
                .map(|(col, dir)| format!("{} {}", col, dir))
                .collect();
            parts.push(format!("ORDER BY {}", order.join(",")));
        }

        if let Some(pagination) = self.pagination.render(query.limit, query.offset) {
            parts.push(pagination);
        }

        Ok(join_parts(parts))
    }

    fn render_insert(&self, query: &Query) -> QbResult<String> {
        let with = self.render_with(query)?;
        let head = format!("INSERT INTO {}", self.render_table(query, StatementKind::Insert)?);

        let body = match &query.values {
            Values::Empty => {
                if query.columns.is_some() {
                    return Err(QbError::validation("INSERT: column list without values"));
                }
                "DEFAULT VALUES".to_string()
            }
            Values::Select(select) => {
                let select = self.render(select)?;
                match &query.columns {
                    Some(columns) => format!("({}) {}", columns.join(","), select),
                    None => select,
                }
            }
            Values::Named(pairs) => {
                let columns: Vec<&str> = match &query.columns {
                    Some(columns) => {
                        check_counts(columns.len(), pairs.len())?;
                        columns.iter().map(String::as_str).collect()
                    }
                    None => pairs.iter().map(|(column, _)| column.as_str()).collect(),
                };
                let values = pairs
                    .iter()
                    .map(|(_, value)| self.render_value(value))
                    .collect::<QbResult<Vec<_>>>()?;
                format!("({}) VALUES ({})", columns.join(","), values.join(","))
            }
            Values::Positional(values) => {
                let columns = query.columns.as_ref().ok_or_else(|| {
                    QbError::validation("INSERT: positional values require a column list")
                })?;
                check_counts(columns.len(), values.len())?;
                let values = values
                    .iter()
                    .map(|value| self.render_value(value))
                    .collect::<QbResult<Vec<_>>>()?;
                format!("({}) VALUES ({})", columns.join(","), values.join(","))
            }
        };

        Ok(join_parts([with, head, body]))
    }

    fn render_update(&self, query: &Query) -> QbResult<String> {
        let pairs = match &query.values {
            Values::Named(pairs) if !pairs.is_empty() => pairs,
            Values::Empty | Values::Named(_) => {
                return Err(QbError::validation("UPDATE: SET clause cannot be empty"));
            }
            Values::Positional(_) | Values::Select(_) => {
                return Err(QbError::validation("UPDATE: SET requires column=value pairs"));
            }
        };

        let with = self.render_with(query)?;
        let head = format!("UPDATE {}", self.render_table(query, StatementKind::Update)?);
        let set = pairs
            .iter()
            .map(|(column, value)| -> QbResult<String> {
                Ok(format!("{}={}", column, self.render_value(value)?))
            })
            .collect::<QbResult<Vec<_>>>()?;
        let set = format!("SET {}", set.join(","));
        let filter = self.render_clause("WHERE", &query.where_group)?;

        Ok(join_parts([with, head, set, filter]))
    }

    fn render_delete(&self, query: &Query) -> QbResult<String> {
        let with = self.render_with(query)?;
        let head = format!("DELETE FROM {}", self.render_table(query, StatementKind::Delete)?);
        let filter = self.render_clause("WHERE", &query.where_group)?;
        Ok(join_parts([with, head, filter]))
    }

    // ==================== Clauses ====================

    fn render_with(&self, query: &Query) -> QbResult<String> {
        if query.ctes.is_empty() {
            return Ok(String::new());
        }
        let ctes = query
            .ctes
            .iter()
            .map(|cte| self.render_cte(cte))
            .collect::<QbResult<Vec<_>>>()?;
        let keyword = if query.recursive { "WITH RECURSIVE" } else { "WITH" };
        Ok(format!("{} {}", keyword, ctes.join(", ")))
    }

    fn render_cte(&self, cte: &Cte) -> QbResult<String> {
        let body = self.render(&cte.query)?;
        Ok(match &cte.columns {
            Some(columns) => format!("{} ({}) AS ({})", cte.name, columns.join(","), body),
            None => format!("{} AS ({})", cte.name, body),
        })
    }

    fn render_join(&self, join: &Join) -> QbResult<String> {
        let target = self.render_operand(&join.target)?;
        match &join.on {
            Some(on) if !on.is_empty() => Ok(format!(
                "{} {} ON {}",
                join.join_type.as_str(),
                target,
                self.render_value(on)?
            )),
            _ => Ok(format!("{} {}", join.join_type.as_str(), target)),
        }
    }

    /// `KEYWORD conditions`, or nothing for an empty group.
    fn render_clause(&self, keyword: &str, group: &ConditionGroup) -> QbResult<String> {
        if group.is_empty() {
            return Ok(String::new());
        }
        Ok(format!("{} {}", keyword, self.render_conditions(group)?))
    }

    fn render_conditions(&self, group: &ConditionGroup) -> QbResult<String> {
        let mut parts = Vec::with_capacity(group.len());
        for condition in group.conditions() {
            let mut piece = String::new();
            if let Some(connector) = condition.connector {
                piece.push_str(connector.as_str());
                piece.push(' ');
            }
            if let Some(prefix) = condition.prefix {
                piece.push_str(prefix.as_str());
                piece.push(' ');
            }
            piece.push_str(&self.render_value(&condition.body)?);
            parts.push(piece);
        }
        Ok(parts.join(" "))
    }

    fn render_table(&self, query: &Query, kind: StatementKind) -> QbResult<String> {
        match &query.source {
            Some(table) => self.render_operand(table),
            None => Err(QbError::MissingTable(kind)),
        }
    }

    fn render_list(&self, items: &[Fragment]) -> QbResult<String> {
        let mut rendered = Vec::with_capacity(items.len());
        for item in items {
            let item = self.render_operand(item)?;
            if !item.is_empty() {
                rendered.push(item);
            }
        }
        Ok(rendered.join(","))
    }

    // ==================== Operands ====================

    /// Value-position operand: nested statements wrap themselves (with alias).
    fn render_operand(&self, fragment: &Fragment) -> QbResult<String> {
        match fragment {
            Fragment::Raw(sql) => Ok(sql.clone()),
            Fragment::Query(query) => self.render(query),
        }
    }

    /// Expression-position operand: nested statements render `(sql)`, never aliased.
    fn render_value(&self, fragment: &Fragment) -> QbResult<String> {
        match fragment {
            Fragment::Raw(sql) => Ok(sql.clone()),
            Fragment::Query(query) => Ok(format!("({})", self.render(query)?)),
        }
    }

    // ==================== Logging ====================

    #[cfg(feature = "tracing")]
    fn trace(&self, kind: Option<StatementKind>, sql: &str) {
        let kind = kind.map_or("CONDITION", StatementKind::as_str);
        let sql = truncate_sql(sql, self.config.max_logged_sql_length);
        if self.config.log_sql {
            tracing::debug!(target: "fluentsql.sql", kind, sql = %sql, "rendered statement");
        } else {
            tracing::trace!(target: "fluentsql.sql", kind, sql = %sql, "rendered statement");
        }
    }
}

fn join_parts<I>(parts: I) -> String
where
    I: IntoIterator<Item = String>,
{
    parts
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn has_own_ordering(query: &Query) -> bool {
    !query.order_by.is_empty() || query.limit.is_some() || query.offset > 0
}

fn check_counts(columns: usize, values: usize) -> QbResult<()> {
    if columns != values {
        return Err(QbError::validation(format!(
            "INSERT: {} columns but {} values",
            columns, values
        )));
    }
    Ok(())
}

/// Truncate on a char boundary, marking the cut with `...`.
#[cfg(feature = "tracing")]
fn truncate_sql(sql: &str, max_bytes: Option<usize>) -> std::borrow::Cow<'_, str> {
    use std::borrow::Cow;

    match max_bytes {
        Some(max) if sql.len() > max => {
            let mut end = max;
            while end > 0 && !sql.is_char_boundary(end) {
                end -= 1;
            }
            Cow::Owned(format!("{}...", &sql[..end]))
        }
        _ => Cow::Borrowed(sql),
    }
}
