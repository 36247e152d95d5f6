//! INSERT verb and the value-carrying clauses shared with UPDATE.

use super::{Fragment, INSERT_ONLY, IntoAlias, Query, StatementKind, Values};
use crate::error::QbError;

impl Query {
    /// Make this an INSERT into `table`.
    pub fn insert(&mut self, table: &str) -> &mut Self {
        self.set_table(StatementKind::Insert, table)
    }

    /// Set the explicit INSERT column list.
    ///
    /// Without it, columns are taken from the keys passed to [`Query::values`].
    pub fn columns<I>(&mut self, columns: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        if self.allow_columns() {
            self.columns = Some(columns.into_iter().map(Into::into).collect());
        }
        self
    }

    /// Add column/value pairs, keeping insertion order.
    ///
    /// A column that is already present keeps its position and takes the new
    /// value. Nested statements render as `(subselect)`.
    pub fn values<I, C, V>(&mut self, pairs: I) -> &mut Self
    where
        I: IntoIterator<Item = (C, V)>,
        C: Into<String>,
        V: Into<Fragment>,
    {
        if !self.allow_values() {
            return self;
        }
        for (column, value) in pairs {
            self.put_value(column.into(), value.into());
        }
        self
    }

    /// Add positional values, paired with [`Query::columns`] at render time.
    pub fn values_list<I>(&mut self, values: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<Fragment>,
    {
        if !self.allow_values() {
            return self;
        }
        let mut list = match std::mem::take(&mut self.values) {
            Values::Empty => Vec::new(),
            Values::Positional(list) => list,
            other => {
                self.values = other;
                self.fail(QbError::MixedValues);
                return self;
            }
        };
        for value in values {
            let value = value.into();
            self.adopt_error(&value);
            if self.require_statement(&value, "VALUES") {
                list.push(value);
            }
        }
        self.values = Values::Positional(list);
        self
    }

    /// Use the SELECT built by the closure as the row source (INSERT ... SELECT).
    pub fn values_from<F, R>(&mut self, build: F) -> &mut Self
    where
        F: FnOnce(&mut Query) -> R,
        R: IntoAlias,
    {
        if !self.allow("INSERT ... SELECT", INSERT_ONLY) {
            return self;
        }
        let child = Query::built_by(build);
        match child.kind {
            None => {
                self.fail(QbError::EmptySubquery("INSERT ... SELECT"));
                return self;
            }
            Some(StatementKind::Select) => {}
            Some(kind) => {
                self.fail(QbError::unsupported("INSERT source", kind));
                return self;
            }
        }
        if !self.values.is_empty() {
            self.fail(QbError::MixedValues);
            return self;
        }
        if let Some(err) = child.build_error() {
            self.fail(err.clone());
        }
        self.values = Values::Select(Box::new(child));
        self
    }

    pub(crate) fn put_value(&mut self, column: String, value: Fragment) {
        self.adopt_error(&value);
        if !self.require_statement(&value, "VALUES") {
            return;
        }
        let mut pairs = match std::mem::take(&mut self.values) {
            Values::Empty => Vec::new(),
            Values::Named(pairs) => pairs,
            other => {
                self.values = other;
                self.fail(QbError::MixedValues);
                return;
            }
        };
        match pairs.iter_mut().find(|(c, _)| *c == column) {
            Some(slot) => slot.1 = value,
            None => pairs.push((column, value)),
        }
        self.values = Values::Named(pairs);
    }
}
