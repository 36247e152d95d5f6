//! DELETE verb.

use super::{Query, StatementKind};

impl Query {
    /// Make this a DELETE from `table`.
    ///
    /// Without conditions every row is targeted; no implicit guard is added.
    pub fn delete(&mut self, table: &str) -> &mut Self {
        self.set_table(StatementKind::Delete, table)
    }
}

#[cfg(test)]
mod tests {
    use crate::{Query, QbError, StatementKind};

    #[test]
    fn test_delete_basic() {
        let mut q = Query::new();
        q.delete("albums").where_("ArtistId = ?");
        assert_eq!(q.to_sql().unwrap(), "DELETE FROM albums WHERE ArtistId = ?");
    }

    #[test]
    fn test_delete_without_where() {
        let q = crate::delete("albums");
        assert_eq!(q.to_sql().unwrap(), "DELETE FROM albums");
    }

    #[test]
    fn test_delete_needs_table() {
        let mut q = Query::new();
        q.delete("  ");
        assert_eq!(q.to_sql(), Err(QbError::MissingTable(StatementKind::Delete)));
    }

    #[test]
    fn test_conditions_before_verb() {
        let mut q = Query::new();
        q.where_("id = ?").delete("albums");
        assert_eq!(q.to_sql().unwrap(), "DELETE FROM albums WHERE id = ?");
    }

    #[test]
    fn test_select_clauses_before_delete_are_rejected() {
        let mut q = Query::new();
        q.limit(10).delete("albums");
        assert_eq!(
            q.to_sql(),
            Err(QbError::unsupported("LIMIT/OFFSET", StatementKind::Delete))
        );
    }
}
