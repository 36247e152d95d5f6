//! UPDATE verb and SET helpers.

use super::{Fragment, Query, StatementKind};

impl Query {
    /// Make this an UPDATE of `table`.
    pub fn update(&mut self, table: &str) -> &mut Self {
        self.set_table(StatementKind::Update, table)
    }

    /// Add `column=value` pairs to SET, keeping insertion order.
    ///
    /// Same storage as [`Query::values`]; a nested statement renders as
    /// `(subselect)` without alias.
    pub fn set<I, C, V>(&mut self, pairs: I) -> &mut Self
    where
        I: IntoIterator<Item = (C, V)>,
        C: Into<String>,
        V: Into<Fragment>,
    {
        self.values(pairs)
    }

    /// Add a single `column=value` pair.
    pub fn set_column(&mut self, column: &str, value: impl Into<Fragment>) -> &mut Self {
        if self.allow_values() {
            self.put_value(column.to_string(), value.into());
        }
        self
    }
}
