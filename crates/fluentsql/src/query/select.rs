//! SELECT clauses: select list, FROM, joins, grouping, ordering, pagination, unions.

use super::{Fragment, IntoAlias, Join, JoinType, Order, Query, StatementKind, Union};
use crate::error::QbError;

impl Query {
    // ==================== SELECT list ====================

    /// Make this a SELECT and replace the select list.
    ///
    /// Nested statements in the list render as `(subselect) AS alias`.
    pub fn select<I>(&mut self, columns: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<Fragment>,
    {
        if !self.set_kind(StatementKind::Select) {
            return self;
        }
        self.select_list.clear();
        self.push_select(columns)
    }

    /// Append to the select list.
    pub fn add_select<I>(&mut self, columns: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<Fragment>,
    {
        if !self.set_kind(StatementKind::Select) {
            return self;
        }
        self.push_select(columns)
    }

    fn push_select<I>(&mut self, columns: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<Fragment>,
    {
        for col in columns {
            let col = col.into().into_embedded();
            self.adopt_error(&col);
            if self.require_statement(&col, "SELECT list") {
                self.select_list.push(col);
            }
        }
        self
    }

    /// Set SELECT DISTINCT.
    pub fn distinct(&mut self, distinct: bool) -> &mut Self {
        if !distinct || self.allow_select_clause("DISTINCT") {
            self.distinct = distinct;
        }
        self
    }

    // ==================== FROM ====================

    /// Set the FROM source: a table name or a derived table.
    pub fn from(&mut self, source: impl Into<Fragment>) -> &mut Self {
        if !self.allow_select_clause("FROM") {
            return self;
        }
        let source = source.into().into_embedded();
        self.adopt_error(&source);
        if !self.require_statement(&source, "FROM") {
            return self;
        }
        self.source = Some(source);
        self.source_alias = None;
        self
    }

    /// Set the FROM source with an alias.
    ///
    /// A table renders as `table alias`; a derived table takes the alias as
    /// its own (`(subselect) AS alias`).
    pub fn from_as(&mut self, source: impl Into<Fragment>, alias: &str) -> &mut Self {
        if !self.allow_select_clause("FROM") {
            return self;
        }
        let source = match source.into().into_embedded() {
            Fragment::Query(mut q) => {
                q.alias = Some(alias.to_string());
                self.source_alias = None;
                Fragment::Query(q)
            }
            raw => {
                self.source_alias = Some(alias.to_string());
                raw
            }
        };
        self.adopt_error(&source);
        if !self.require_statement(&source, "FROM") {
            return self;
        }
        self.source = Some(source);
        self
    }

    // ==================== JOIN ====================

    /// Add a join of any type.
    pub fn add_join(
        &mut self,
        join_type: JoinType,
        target: impl Into<Fragment>,
        on: Option<Fragment>,
    ) -> &mut Self {
        if !self.allow_select_clause("JOIN") {
            return self;
        }
        let target = target.into().into_embedded();
        self.adopt_error(&target);
        if !self.require_statement(&target, "JOIN") {
            return self;
        }
        if let Some(on) = &on {
            self.adopt_error(on);
            // A verb-less statement is a grouped condition; it still needs one.
            if on.as_query().is_some_and(Query::is_empty) {
                self.fail(QbError::EmptySubquery("JOIN"));
                return self;
            }
        }
        self.joins.push(Join {
            join_type,
            target,
            on,
        });
        self
    }

    /// Add INNER JOIN.
    pub fn join(&mut self, target: impl Into<Fragment>, on: impl Into<Fragment>) -> &mut Self {
        self.inner_join(target, on)
    }

    /// Add INNER JOIN.
    pub fn inner_join(&mut self, target: impl Into<Fragment>, on: impl Into<Fragment>) -> &mut Self {
        self.add_join(JoinType::Inner, target, Some(on.into()))
    }

    /// Add LEFT JOIN.
    pub fn left_join(&mut self, target: impl Into<Fragment>, on: impl Into<Fragment>) -> &mut Self {
        self.add_join(JoinType::Left, target, Some(on.into()))
    }

    /// Add RIGHT JOIN.
    pub fn right_join(&mut self, target: impl Into<Fragment>, on: impl Into<Fragment>) -> &mut Self {
        self.add_join(JoinType::Right, target, Some(on.into()))
    }

    /// Add FULL OUTER JOIN.
    pub fn full_join(&mut self, target: impl Into<Fragment>, on: impl Into<Fragment>) -> &mut Self {
        self.add_join(JoinType::Full, target, Some(on.into()))
    }

    /// Add CROSS JOIN (no ON condition).
    pub fn cross_join(&mut self, target: impl Into<Fragment>) -> &mut Self {
        self.add_join(JoinType::Cross, target, None)
    }

    // ==================== Grouping & Ordering ====================

    /// Replace the GROUP BY columns.
    pub fn group_by<I>(&mut self, columns: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        if self.allow_select_clause("GROUP BY") {
            self.group_by = columns.into_iter().map(Into::into).collect();
        }
        self
    }

    /// Append GROUP BY columns.
    pub fn add_group_by<I>(&mut self, columns: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        if self.allow_select_clause("GROUP BY") {
            self.group_by.extend(columns.into_iter().map(Into::into));
        }
        self
    }

    /// Replace ORDER BY with a single column.
    pub fn order_by(&mut self, column: &str, order: Order) -> &mut Self {
        if self.allow_select_clause("ORDER BY") {
            self.order_by.clear();
            self.order_by.push((column.to_string(), order));
        }
        self
    }

    /// Append an ORDER BY column.
    pub fn add_order_by(&mut self, column: &str, order: Order) -> &mut Self {
        if self.allow_select_clause("ORDER BY") {
            self.order_by.push((column.to_string(), order));
        }
        self
    }

    /// Replace ORDER BY with several columns, in iteration order.
    pub fn order_by_all<I, C>(&mut self, columns: I) -> &mut Self
    where
        I: IntoIterator<Item = (C, Order)>,
        C: Into<String>,
    {
        if self.allow_select_clause("ORDER BY") {
            self.order_by.clear();
            self.order_by
                .extend(columns.into_iter().map(|(col, order)| (col.into(), order)));
        }
        self
    }

    /// Append several ORDER BY columns, in iteration order.
    pub fn add_order_by_all<I, C>(&mut self, columns: I) -> &mut Self
    where
        I: IntoIterator<Item = (C, Order)>,
        C: Into<String>,
    {
        if self.allow_select_clause("ORDER BY") {
            self.order_by
                .extend(columns.into_iter().map(|(col, order)| (col.into(), order)));
        }
        self
    }

    // ==================== Pagination ====================

    /// Set LIMIT.
    pub fn limit(&mut self, n: u64) -> &mut Self {
        if self.allow_select_clause("LIMIT/OFFSET") {
            self.limit = Some(n);
        }
        self
    }

    /// Set OFFSET.
    pub fn offset(&mut self, n: u64) -> &mut Self {
        if self.allow_select_clause("LIMIT/OFFSET") {
            self.offset = n;
        }
        self
    }

    /// Pagination helper.
    ///
    /// `page` is 1-based (clamped to >= 1).
    /// `per_page` is clamped to >= 1.
    pub fn paginate(&mut self, page: u64, per_page: u64) -> &mut Self {
        if self.allow_select_clause("LIMIT/OFFSET") {
            let p = page.max(1);
            let size = per_page.max(1);
            self.limit = Some(size);
            self.offset = (p - 1).saturating_mul(size);
        }
        self
    }

    // ==================== UNION ====================

    /// Append `UNION <select>` built by the closure.
    pub fn union<F, R>(&mut self, build: F) -> &mut Self
    where
        F: FnOnce(&mut Query) -> R,
        R: IntoAlias,
    {
        self.push_union(Query::built_by(build), false)
    }

    /// Append `UNION ALL <select>` built by the closure.
    pub fn union_all<F, R>(&mut self, build: F) -> &mut Self
    where
        F: FnOnce(&mut Query) -> R,
        R: IntoAlias,
    {
        self.push_union(Query::built_by(build), true)
    }

    fn push_union(&mut self, query: Query, all: bool) -> &mut Self {
        if !self.allow_select_clause("UNION") {
            return self;
        }
        match query.kind {
            None => {
                self.fail(QbError::EmptySubquery("UNION"));
                return self;
            }
            Some(StatementKind::Select) => {}
            Some(kind) => {
                self.fail(QbError::unsupported("UNION member", kind));
                return self;
            }
        }
        if let Some(err) = query.build_error() {
            self.fail(err.clone());
        }
        self.unions.push(Union { query, all });
        self
    }
}

#[cfg(test)]
mod tests {
    use crate::{Order, Query, QbError, StatementKind, subquery};

    #[test]
    fn test_select_without_from() {
        let mut q = Query::new();
        q.select(["somefunction()"]);
        assert_eq!(q.to_sql().unwrap(), "SELECT somefunction()");
    }

    #[test]
    fn test_from_with_alias() {
        let mut q = Query::new();
        q.select(["column1", "column2", "column3"])
            .from_as("table1", "t1");
        assert_eq!(
            q.to_sql().unwrap(),
            "SELECT column1,column2,column3 FROM table1 t1"
        );
    }

    #[test]
    fn test_replace_select() {
        let mut q = Query::new();
        q.select(["column1", "column2", "column3"])
            .from_as("table1", "t1");
        q.select(["column_a", "column_b", "column_c"]);
        assert_eq!(
            q.to_sql().unwrap(),
            "SELECT column_a,column_b,column_c FROM table1 t1"
        );
    }

    #[test]
    fn test_add_select() {
        let mut q = Query::new();
        q.select(["id"]).add_select(["name", "email"]).from("users");
        assert_eq!(q.to_sql().unwrap(), "SELECT id,name,email FROM users");
    }

    #[test]
    fn test_distinct() {
        let mut q = Query::new();
        q.select(["country"]).distinct(true).from("customers");
        assert_eq!(q.to_sql().unwrap(), "SELECT DISTINCT country FROM customers");
    }

    #[test]
    fn test_distinct_false_is_a_no_op_elsewhere() {
        let mut q = Query::new();
        q.delete("albums").distinct(false).where_("id = ?");
        assert_eq!(q.to_sql().unwrap(), "DELETE FROM albums WHERE id = ?");

        let mut q = Query::new();
        q.delete("albums").distinct(true);
        assert_eq!(
            q.to_sql(),
            Err(QbError::unsupported("DISTINCT", StatementKind::Delete))
        );
    }

    #[test]
    fn test_derived_table_alias() {
        let mut q = Query::new();
        q.select(["t.id"]).from_as(
            subquery(|q| {
                q.select(["id"]).from("users");
            }),
            "t",
        );
        assert_eq!(
            q.to_sql().unwrap(),
            "SELECT t.id FROM (SELECT id FROM users) AS t"
        );
    }

    #[test]
    fn test_select_list_subquery() {
        let mut q = Query::new();
        q.select([
            "a.Title".into(),
            subquery(|q| {
                q.select(["COUNT(*)"])
                    .from("tracks AS t")
                    .where_("t.AlbumId = a.AlbumId");
                "TrackCount"
            }),
        ])
        .from("albums AS a");
        assert_eq!(
            q.to_sql().unwrap(),
            "SELECT a.Title,(SELECT COUNT(*) FROM tracks AS t WHERE t.AlbumId = a.AlbumId) AS TrackCount FROM albums AS a"
        );
    }

    #[test]
    fn test_join_types() {
        let mut q = Query::new();
        q.select(["*"])
            .from("a")
            .join("b", "a.id = b.id")
            .left_join("c", "a.id = c.id")
            .right_join("d", "a.id = d.id")
            .full_join("e", "a.id = e.id")
            .cross_join("f");
        assert_eq!(
            q.to_sql().unwrap(),
            "SELECT * FROM a INNER JOIN b ON a.id = b.id LEFT JOIN c ON a.id = c.id \
             RIGHT JOIN d ON a.id = d.id FULL OUTER JOIN e ON a.id = e.id CROSS JOIN f"
        );
    }

    #[test]
    fn test_join_subquery_target_and_condition() {
        let mut q = Query::new();
        q.select(["u.name", "o.total"])
            .from("users u")
            .inner_join(
                subquery(|q| {
                    q.select(["user_id", "SUM(amount) AS total"])
                        .from("orders")
                        .group_by(["user_id"]);
                    "o"
                }),
                subquery(|q| {
                    q.where_("o.user_id = u.id").and_where("o.total > ?");
                }),
            );
        assert_eq!(
            q.to_sql().unwrap(),
            "SELECT u.name,o.total FROM users u INNER JOIN \
             (SELECT user_id,SUM(amount) AS total FROM orders GROUP BY user_id) AS o \
             ON (o.user_id = u.id AND o.total > ?)"
        );
    }

    #[test]
    fn test_group_by_replace_and_add() {
        let mut q = Query::new();
        q.select(["a", "b", "c"])
            .from("t")
            .group_by(["x"])
            .group_by(["a"])
            .add_group_by(["b", "c"]);
        assert_eq!(q.to_sql().unwrap(), "SELECT a,b,c FROM t GROUP BY a,b,c");
    }

    #[test]
    fn test_order_by_all_keeps_iteration_order() {
        let mut q = Query::new();
        q.select(["*"])
            .from("t")
            .order_by("ignored", Order::Asc)
            .order_by_all([("z", Order::Desc), ("a", Order::Asc)])
            .add_order_by_all([("m", Order::Desc)]);
        assert_eq!(
            q.to_sql().unwrap(),
            "SELECT * FROM t ORDER BY z DESC,a ASC,m DESC"
        );
    }

    #[test]
    fn test_paginate() {
        let mut q = Query::new();
        q.select(["*"]).from("users").paginate(3, 20);
        assert_eq!(q.to_sql().unwrap(), "SELECT * FROM users LIMIT 20 OFFSET 40");

        let mut q = Query::new();
        q.select(["*"]).from("users").paginate(0, 0);
        assert_eq!(q.to_sql().unwrap(), "SELECT * FROM users LIMIT 1");
    }

    #[test]
    fn test_union_and_union_all() {
        let mut q = Query::new();
        q.select(["name"])
            .from("customers")
            .union(|q| {
                q.select(["name"]).from("suppliers");
            })
            .union_all(|q| {
                q.select(["name"]).from("employees");
            })
            .order_by("name", Order::Asc);
        assert_eq!(
            q.to_sql().unwrap(),
            "SELECT name FROM customers UNION SELECT name FROM suppliers \
             UNION ALL SELECT name FROM employees ORDER BY name ASC"
        );
    }

    #[test]
    fn test_union_member_must_be_select() {
        let mut q = Query::new();
        q.select(["id"]).from("a").union(|q| {
            q.delete("b");
        });
        assert_eq!(
            q.to_sql(),
            Err(QbError::unsupported("UNION member", StatementKind::Delete))
        );

        let mut q = Query::new();
        q.select(["id"]).from("a").union(|_| {});
        assert_eq!(q.to_sql(), Err(QbError::EmptySubquery("UNION")));
    }

    #[test]
    fn test_select_clause_on_delete_is_rejected() {
        let mut q = Query::new();
        q.delete("albums").order_by("id", Order::Asc);
        assert_eq!(
            q.to_sql(),
            Err(QbError::unsupported("ORDER BY", StatementKind::Delete))
        );

        let mut q = Query::new();
        q.delete("albums").from("artists");
        assert_eq!(
            q.to_sql(),
            Err(QbError::unsupported("FROM", StatementKind::Delete))
        );
    }
}
