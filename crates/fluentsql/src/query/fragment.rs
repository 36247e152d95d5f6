//! Clause operands: raw SQL text or a nested statement.

use super::Query;

/// One operand of a clause: a column, a table, a condition or a value.
///
/// Raw text is passed through to the rendered SQL byte for byte. Nested
/// statements are usually produced by [`subquery`].
#[derive(Clone, Debug, PartialEq)]
pub enum Fragment {
    /// Opaque SQL text.
    Raw(String),
    /// A fully built child statement.
    Query(Box<Query>),
}

impl Fragment {
    /// Create a raw fragment.
    pub fn raw(sql: impl Into<String>) -> Self {
        Fragment::Raw(sql.into())
    }

    /// Whether this fragment carries nothing to render.
    pub fn is_empty(&self) -> bool {
        match self {
            Fragment::Raw(s) => s.is_empty(),
            Fragment::Query(q) => q.is_empty(),
        }
    }

    pub(crate) fn as_query(&self) -> Option<&Query> {
        match self {
            Fragment::Query(q) => Some(q),
            Fragment::Raw(_) => None,
        }
    }

    /// Mark a nested statement as a derived table/expression (value position).
    pub(crate) fn into_embedded(self) -> Self {
        match self {
            Fragment::Query(mut q) => {
                q.is_subquery = true;
                Fragment::Query(q)
            }
            raw => raw,
        }
    }
}

impl From<&str> for Fragment {
    fn from(s: &str) -> Self {
        Fragment::Raw(s.to_string())
    }
}

impl From<&String> for Fragment {
    fn from(s: &String) -> Self {
        Fragment::Raw(s.clone())
    }
}

impl From<String> for Fragment {
    fn from(s: String) -> Self {
        Fragment::Raw(s)
    }
}

impl From<Query> for Fragment {
    fn from(q: Query) -> Self {
        Fragment::Query(Box::new(q))
    }
}

/// Return values of subquery closures that can name the built statement.
///
/// `()` leaves the statement unaliased; strings become its alias.
pub trait IntoAlias {
    fn into_alias(self) -> Option<String>;
}

impl IntoAlias for () {
    fn into_alias(self) -> Option<String> {
        None
    }
}

impl IntoAlias for &str {
    fn into_alias(self) -> Option<String> {
        Some(self.to_string())
    }
}

impl IntoAlias for String {
    fn into_alias(self) -> Option<String> {
        Some(self)
    }
}

impl<T: IntoAlias> IntoAlias for Option<T> {
    fn into_alias(self) -> Option<String> {
        self.and_then(IntoAlias::into_alias)
    }
}

/// Build a child statement from a closure.
///
/// The closure receives a fresh [`Query`]; whatever it returns becomes the
/// child's alias. The child is complete once this function returns.
///
/// # Example
/// ```
/// use fluentsql::{Query, subquery};
///
/// let mut q = Query::new();
/// q.select(["*"]).from(subquery(|q| {
///     q.select(["*"]).from("users");
/// }));
/// assert_eq!(q.to_sql().unwrap(), "SELECT * FROM (SELECT * FROM users)");
/// ```
pub fn subquery<F, R>(build: F) -> Fragment
where
    F: FnOnce(&mut Query) -> R,
    R: IntoAlias,
{
    Fragment::Query(Box::new(Query::built_by(build)))
}
