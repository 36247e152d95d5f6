//! CTE (WITH clause) support.
//!
//! A CTE's name is registered before its body closure runs, so the body may
//! refer to it (recursive CTEs, usually combined with [`Query::union`]).
//!
//! # Example
//! ```
//! use fluentsql::Query;
//!
//! let mut q = Query::new();
//! q.with_recursive("tree", |q| {
//!     q.select(["id", "parent_id"])
//!         .from("nodes")
//!         .where_("parent_id IS NULL")
//!         .union_all(|q| {
//!             q.select(["n.id", "n.parent_id"])
//!                 .from("nodes n")
//!                 .join("tree t", "n.parent_id = t.id");
//!         });
//! })
//! .select(["*"])
//! .from("tree");
//!
//! assert_eq!(
//!     q.to_sql().unwrap(),
//!     "WITH RECURSIVE tree AS (SELECT id,parent_id FROM nodes WHERE parent_id IS NULL \
//!      UNION ALL SELECT n.id,n.parent_id FROM nodes n INNER JOIN tree t ON n.parent_id = t.id) \
//!      SELECT * FROM tree"
//! );
//! ```

use super::{Cte, IntoAlias, Query};
use crate::error::QbError;

impl Query {
    /// Register a CTE built by the closure.
    pub fn with<F, R>(&mut self, name: &str, build: F) -> &mut Self
    where
        F: FnOnce(&mut Query) -> R,
        R: IntoAlias,
    {
        self.push_cte(name, None, false, build)
    }

    /// Register a CTE with an explicit column list: `name (a,b) AS (...)`.
    pub fn with_columns<I, F, R>(&mut self, name: &str, columns: I, build: F) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
        F: FnOnce(&mut Query) -> R,
        R: IntoAlias,
    {
        let columns = columns.into_iter().map(Into::into).collect();
        self.push_cte(name, Some(columns), false, build)
    }

    /// Register a CTE and render the prefix as `WITH RECURSIVE`.
    pub fn with_recursive<F, R>(&mut self, name: &str, build: F) -> &mut Self
    where
        F: FnOnce(&mut Query) -> R,
        R: IntoAlias,
    {
        self.push_cte(name, None, true, build)
    }

    /// Recursive CTE with an explicit column list.
    pub fn with_recursive_columns<I, F, R>(&mut self, name: &str, columns: I, build: F) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
        F: FnOnce(&mut Query) -> R,
        R: IntoAlias,
    {
        let columns = columns.into_iter().map(Into::into).collect();
        self.push_cte(name, Some(columns), true, build)
    }

    fn push_cte<F, R>(
        &mut self,
        name: &str,
        columns: Option<Vec<String>>,
        recursive: bool,
        build: F,
    ) -> &mut Self
    where
        F: FnOnce(&mut Query) -> R,
        R: IntoAlias,
    {
        if name.trim().is_empty() {
            self.fail(QbError::validation("CTE name cannot be empty"));
            return self;
        }
        if self.ctes.iter().any(|cte| cte.name == name) {
            self.fail(QbError::DuplicateCte(name.to_string()));
            return self;
        }

        // Register the name first; the body fills the slot once built.
        let index = self.ctes.len();
        self.ctes.push(Cte {
            name: name.to_string(),
            columns,
            query: Query::new(),
        });

        let body = Query::built_by(build);
        if body.kind.is_none() {
            self.ctes.remove(index);
            self.fail(QbError::EmptySubquery("WITH"));
            return self;
        }
        if let Some(err) = body.build_error() {
            self.fail(err.clone());
        }
        self.ctes[index].query = body;
        self.recursive |= recursive;
        self
    }
}
