//! Ordered condition groups for WHERE/HAVING.
//!
//! A group is a flat sequence of fragments, each tagged with the boolean
//! connector that joins it to the previous one. The first entry never has a
//! connector. Fragments are opaque: no precedence is inferred, so
//! `a OR b AND c` renders exactly as written.

use super::fragment::Fragment;
use std::fmt;

/// Boolean keyword joining two conditions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Connector {
    And,
    Or,
}

impl Connector {
    pub fn as_str(self) -> &'static str {
        match self {
            Connector::And => "AND",
            Connector::Or => "OR",
        }
    }
}

impl fmt::Display for Connector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Keyword placed between the connector and the condition body.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Prefix {
    Not,
    Exists,
    NotExists,
}

impl Prefix {
    pub fn as_str(self) -> &'static str {
        match self {
            Prefix::Not => "NOT",
            Prefix::Exists => "EXISTS",
            Prefix::NotExists => "NOT EXISTS",
        }
    }
}

/// One entry of a [`ConditionGroup`].
#[derive(Clone, Debug, PartialEq)]
pub struct Condition {
    pub connector: Option<Connector>,
    pub prefix: Option<Prefix>,
    pub body: Fragment,
}

/// A WHERE or HAVING clause under construction.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConditionGroup {
    conditions: Vec<Condition>,
}

impl ConditionGroup {
    /// Create an empty group.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if the group is empty.
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Number of conditions.
    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    /// Drop all conditions.
    pub fn clear(&mut self) {
        self.conditions.clear();
    }

    /// Append a condition.
    ///
    /// The connector is discarded when the group is empty, so the leading
    /// condition never renders as `AND x`.
    pub fn push(&mut self, connector: Connector, prefix: Option<Prefix>, body: Fragment) {
        let connector = if self.conditions.is_empty() {
            None
        } else {
            Some(connector)
        };
        self.conditions.push(Condition {
            connector,
            prefix,
            body,
        });
    }

    /// Conditions in insertion order.
    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_condition_has_no_connector() {
        let mut group = ConditionGroup::new();
        group.push(Connector::Or, None, "a = 1".into());
        group.push(Connector::And, Some(Prefix::Not), "b = 2".into());
        group.push(Connector::Or, None, "c = 3".into());

        let connectors: Vec<_> = group.conditions().iter().map(|c| c.connector).collect();
        assert_eq!(connectors, vec![None, Some(Connector::And), Some(Connector::Or)]);
        assert_eq!(group.conditions()[1].prefix, Some(Prefix::Not));
        assert_eq!(group.len(), 3);
    }

    #[test]
    fn clear_resets_connector_rule() {
        let mut group = ConditionGroup::new();
        group.push(Connector::And, None, "a".into());
        group.push(Connector::And, None, "b".into());
        group.clear();
        assert!(group.is_empty());

        group.push(Connector::Or, None, "c".into());
        assert_eq!(group.conditions()[0].connector, None);
    }

    #[test]
    fn keywords() {
        assert_eq!(Connector::And.to_string(), "AND");
        assert_eq!(Connector::Or.as_str(), "OR");
        assert_eq!(Prefix::NotExists.as_str(), "NOT EXISTS");
    }
}
