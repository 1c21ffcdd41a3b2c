//! Equality filter and `$set` patch builders shared by entity repositories.

use rusqlite::types::Value;

/// How many rows a statement targets once the filter matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Scope {
    /// First match in insertion order.
    One,
    All,
}

/// `WHERE` clause built from optional equality predicates.
#[derive(Debug, Default)]
pub(crate) struct Predicates {
    clauses: Vec<&'static str>,
    values: Vec<Value>,
}

impl Predicates {
    pub(crate) fn equals(mut self, column: &'static str, value: Option<String>) -> Self {
        if let Some(value) = value {
            self.clauses.push(column);
            self.values.push(Value::Text(value));
        }
        self
    }

    fn where_sql(&self) -> String {
        let mut sql = String::from(" WHERE 1 = 1");
        for column in &self.clauses {
            sql.push_str(" AND ");
            sql.push_str(column);
            sql.push_str(" = ?");
        }
        sql
    }

    /// Appends the filter and insertion ordering to `select`.
    pub(crate) fn select_sql(&self, select: &str, scope: Scope) -> String {
        let mut sql = format!("{select}{} ORDER BY rowid ASC", self.where_sql());
        if scope == Scope::One {
            sql.push_str(" LIMIT 1");
        }
        sql
    }

    pub(crate) fn count_sql(&self, table: &str) -> String {
        format!("SELECT COUNT(*) FROM {table}{}", self.where_sql())
    }

    /// Row selector used by `UPDATE`/`DELETE`, honouring `scope`.
    fn target_sql(&self, table: &str, scope: Scope) -> String {
        match scope {
            Scope::All => self.where_sql(),
            Scope::One => format!(
                " WHERE rowid = (SELECT rowid FROM {table}{} ORDER BY rowid ASC LIMIT 1)",
                self.where_sql()
            ),
        }
    }

    pub(crate) fn delete_sql(&self, table: &str, scope: Scope) -> String {
        format!("DELETE FROM {table}{}", self.target_sql(table, scope))
    }

    pub(crate) fn into_values(self) -> Vec<Value> {
        self.values
    }
}

/// `SET` assignments built from optional patch fields.
#[derive(Debug, Default)]
pub(crate) struct Assignments {
    columns: Vec<&'static str>,
    values: Vec<Value>,
}

impl Assignments {
    pub(crate) fn set(mut self, column: &'static str, value: Option<String>) -> Self {
        if let Some(value) = value {
            self.columns.push(column);
            self.values.push(Value::Text(value));
        }
        self
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Full `UPDATE` statement and its bind values in placeholder order.
    pub(crate) fn update_statement(
        self,
        table: &str,
        predicates: Predicates,
        scope: Scope,
    ) -> (String, Vec<Value>) {
        let mut sql = format!("UPDATE {table} SET ");
        for column in &self.columns {
            sql.push_str(column);
            sql.push_str(" = ?, ");
        }
        sql.push_str("updated_at = (strftime('%s', 'now') * 1000)");
        sql.push_str(&predicates.target_sql(table, scope));

        let mut values = self.values;
        values.extend(predicates.into_values());
        (sql, values)
    }
}
