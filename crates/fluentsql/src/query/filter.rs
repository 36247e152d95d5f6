//! WHERE/HAVING method families.
//!
//! `where_`/`having` start a fresh group; the `and_*`/`or_*` variants append
//! with the matching connector. Raw conditions are never parsed.

use super::condition::{ConditionGroup, Connector, Prefix};
use super::{Fragment, IntoAlias, Query};
use crate::error::QbError;

#[derive(Clone, Copy)]
enum Clause {
    Where,
    Having,
}

impl Query {
    // ==================== WHERE ====================

    /// Replace the WHERE clause with one condition.
    pub fn where_(&mut self, condition: impl Into<Fragment>) -> &mut Self {
        self.push_condition(Clause::Where, true, Connector::And, None, condition.into())
    }

    /// Replace the WHERE clause with several conditions joined by AND.
    pub fn where_all<I>(&mut self, conditions: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<Fragment>,
    {
        self.push_all(Clause::Where, conditions)
    }

    /// Replace the WHERE clause with `NOT condition`.
    pub fn where_not(&mut self, condition: impl Into<Fragment>) -> &mut Self {
        self.push_condition(Clause::Where, true, Connector::And, Some(Prefix::Not), condition.into())
    }

    /// Append `AND condition`.
    pub fn and_where(&mut self, condition: impl Into<Fragment>) -> &mut Self {
        self.push_condition(Clause::Where, false, Connector::And, None, condition.into())
    }

    /// Append `AND NOT condition`.
    pub fn and_where_not(&mut self, condition: impl Into<Fragment>) -> &mut Self {
        self.push_condition(Clause::Where, false, Connector::And, Some(Prefix::Not), condition.into())
    }

    /// Append `OR condition`.
    pub fn or_where(&mut self, condition: impl Into<Fragment>) -> &mut Self {
        self.push_condition(Clause::Where, false, Connector::Or, None, condition.into())
    }

    /// Append `OR NOT condition`.
    pub fn or_where_not(&mut self, condition: impl Into<Fragment>) -> &mut Self {
        self.push_condition(Clause::Where, false, Connector::Or, Some(Prefix::Not), condition.into())
    }

    /// Replace the WHERE clause with `EXISTS (subquery)`.
    pub fn where_exists<F, R>(&mut self, build: F) -> &mut Self
    where
        F: FnOnce(&mut Query) -> R,
        R: IntoAlias,
    {
        self.push_exists(true, Connector::And, Prefix::Exists, build)
    }

    /// Replace the WHERE clause with `NOT EXISTS (subquery)`.
    pub fn where_not_exists<F, R>(&mut self, build: F) -> &mut Self
    where
        F: FnOnce(&mut Query) -> R,
        R: IntoAlias,
    {
        self.push_exists(true, Connector::And, Prefix::NotExists, build)
    }

    /// Append `AND EXISTS (subquery)`.
    pub fn and_where_exists<F, R>(&mut self, build: F) -> &mut Self
    where
        F: FnOnce(&mut Query) -> R,
        R: IntoAlias,
    {
        self.push_exists(false, Connector::And, Prefix::Exists, build)
    }

    /// Append `AND NOT EXISTS (subquery)`.
    pub fn and_where_not_exists<F, R>(&mut self, build: F) -> &mut Self
    where
        F: FnOnce(&mut Query) -> R,
        R: IntoAlias,
    {
        self.push_exists(false, Connector::And, Prefix::NotExists, build)
    }

    /// Append `OR EXISTS (subquery)`.
    pub fn or_where_exists<F, R>(&mut self, build: F) -> &mut Self
    where
        F: FnOnce(&mut Query) -> R,
        R: IntoAlias,
    {
        self.push_exists(false, Connector::Or, Prefix::Exists, build)
    }

    /// Append `OR NOT EXISTS (subquery)`.
    pub fn or_where_not_exists<F, R>(&mut self, build: F) -> &mut Self
    where
        F: FnOnce(&mut Query) -> R,
        R: IntoAlias,
    {
        self.push_exists(false, Connector::Or, Prefix::NotExists, build)
    }

    // ==================== HAVING ====================

    /// Replace the HAVING clause with one condition.
    pub fn having(&mut self, condition: impl Into<Fragment>) -> &mut Self {
        self.push_condition(Clause::Having, true, Connector::And, None, condition.into())
    }

    /// Replace the HAVING clause with several conditions joined by AND.
    pub fn having_all<I>(&mut self, conditions: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<Fragment>,
    {
        self.push_all(Clause::Having, conditions)
    }

    /// Replace the HAVING clause with `NOT condition`.
    pub fn having_not(&mut self, condition: impl Into<Fragment>) -> &mut Self {
        self.push_condition(Clause::Having, true, Connector::And, Some(Prefix::Not), condition.into())
    }

    /// Append `AND condition` to HAVING.
    pub fn and_having(&mut self, condition: impl Into<Fragment>) -> &mut Self {
        self.push_condition(Clause::Having, false, Connector::And, None, condition.into())
    }

    /// Append `AND NOT condition` to HAVING.
    pub fn and_having_not(&mut self, condition: impl Into<Fragment>) -> &mut Self {
        self.push_condition(Clause::Having, false, Connector::And, Some(Prefix::Not), condition.into())
    }

    /// Append `OR condition` to HAVING.
    pub fn or_having(&mut self, condition: impl Into<Fragment>) -> &mut Self {
        self.push_condition(Clause::Having, false, Connector::Or, None, condition.into())
    }

    /// Append `OR NOT condition` to HAVING.
    pub fn or_having_not(&mut self, condition: impl Into<Fragment>) -> &mut Self {
        self.push_condition(Clause::Having, false, Connector::Or, Some(Prefix::Not), condition.into())
    }

    // ==================== Helpers ====================

    fn allow_clause(&mut self, clause: Clause) -> bool {
        match clause {
            Clause::Where => self.allow_where(),
            Clause::Having => self.allow_select_clause("HAVING"),
        }
    }

    fn group_mut(&mut self, clause: Clause) -> &mut ConditionGroup {
        match clause {
            Clause::Where => &mut self.where_group,
            Clause::Having => &mut self.having_group,
        }
    }

    fn push_condition(
        &mut self,
        clause: Clause,
        reset: bool,
        connector: Connector,
        prefix: Option<Prefix>,
        body: Fragment,
    ) -> &mut Self {
        if !self.allow_clause(clause) {
            return self;
        }
        if reset {
            self.group_mut(clause).clear();
        }
        match &body {
            // Nothing to render; keep the clause valid.
            Fragment::Raw(s) if s.is_empty() => return self,
            Fragment::Query(q) if q.is_empty() => {
                let context = match clause {
                    Clause::Where => "WHERE",
                    Clause::Having => "HAVING",
                };
                self.fail(QbError::EmptySubquery(context));
                return self;
            }
            _ => {}
        }
        self.adopt_error(&body);
        self.group_mut(clause).push(connector, prefix, body);
        self
    }

    fn push_all<I>(&mut self, clause: Clause, conditions: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<Fragment>,
    {
        if !self.allow_clause(clause) {
            return self;
        }
        self.group_mut(clause).clear();
        for condition in conditions {
            self.push_condition(clause, false, Connector::And, None, condition.into());
        }
        self
    }

    fn push_exists<F, R>(&mut self, reset: bool, connector: Connector, prefix: Prefix, build: F) -> &mut Self
    where
        F: FnOnce(&mut Query) -> R,
        R: IntoAlias,
    {
        let child = Query::built_by(build);
        if child.is_empty() {
            if self.allow_where() {
                self.fail(QbError::EmptySubquery("EXISTS"));
            }
            return self;
        }
        self.push_condition(Clause::Where, reset, connector, Some(prefix), child.into())
    }
}
