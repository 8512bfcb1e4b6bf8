//! Parameterized SQL statement builders.
//!
//! One tagged builder per statement kind. Each builder is consumed by
//! `build()`, which returns the finished statement text plus the ordered
//! bind-parameter list; the pair is handed to sqlx together via
//! [`bind_params`] / [`bind_params_as`].
//!
//! Values are always bound, never interpolated. Table names, column lists
//! and ORDER BY text are interpolated as-is and must come from trusted
//! code, not request input.

use sqlx::query::{Query, QueryAs};
use sqlx::sqlite::SqliteArguments;
use sqlx::Sqlite;

/// A single bind parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Integer(i64),
    Real(f64),
    Text(String),
    Null,
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::Integer(value)
    }
}

impl From<i32> for SqlValue {
    fn from(value: i32) -> Self {
        SqlValue::Integer(value.into())
    }
}

impl From<f64> for SqlValue {
    fn from(value: f64) -> Self {
        SqlValue::Real(value)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(value)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(SqlValue::Null, Into::into)
    }
}

/// Bind an ordered parameter list to a query.
pub fn bind_params<'q>(
    mut query: Query<'q, Sqlite, SqliteArguments<'q>>,
    params: &[SqlValue],
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    for value in params {
        query = match value {
            SqlValue::Integer(v) => query.bind(*v),
            SqlValue::Real(v) => query.bind(*v),
            SqlValue::Text(v) => query.bind(v.clone()),
            SqlValue::Null => query.bind(Option::<String>::None),
        };
    }
    query
}

/// Bind an ordered parameter list to a typed row query.
pub fn bind_params_as<'q, T>(
    mut query: QueryAs<'q, Sqlite, T, SqliteArguments<'q>>,
    params: &[SqlValue],
) -> QueryAs<'q, Sqlite, T, SqliteArguments<'q>> {
    for value in params {
        query = match value {
            SqlValue::Integer(v) => query.bind(*v),
            SqlValue::Real(v) => query.bind(*v),
            SqlValue::Text(v) => query.bind(v.clone()),
            SqlValue::Null => query.bind(Option::<String>::None),
        };
    }
    query
}

/// `INSERT INTO table (c1,c2,...) VALUES (?,?,...)`.
///
/// Caller contract: `value` must be called once per column, in column
/// order. No arity check is performed here; a mismatch is rejected by the
/// driver when the statement runs.
#[derive(Debug)]
pub struct Insert {
    table: String,
    columns: Vec<String>,
    params: Vec<SqlValue>,
}

impl Insert {
    pub fn new(table: &str, columns: &[&str]) -> Self {
        Self {
            table: table.to_string(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            params: Vec::with_capacity(columns.len()),
        }
    }

    /// Append the bind value for the next column.
    pub fn value(mut self, value: impl Into<SqlValue>) -> Self {
        self.params.push(value.into());
        self
    }

    pub fn build(self) -> (String, Vec<SqlValue>) {
        let columns = self.columns.join(",");
        let placeholders = vec!["?"; self.columns.len()].join(",");
        (
            format!(
                "INSERT INTO {} ({}) VALUES ({})",
                self.table, columns, placeholders
            ),
            self.params,
        )
    }
}

/// `SELECT columns FROM table [WHERE ...] [ORDER BY ...]`.
#[derive(Debug)]
pub struct Select {
    table: String,
    columns: String,
    predicate: Option<Predicate>,
    order_by: Option<String>,
}

impl Select {
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            columns: "*".to_string(),
            predicate: None,
            order_by: None,
        }
    }

    /// Raw column list text; trusted input only.
    pub fn columns(mut self, columns: &str) -> Self {
        self.columns = columns.to_string();
        self
    }

    /// Single-parameter WHERE clause, e.g. `filter("id=?", drone_id)`.
    pub fn filter(mut self, condition: &str, param: impl Into<SqlValue>) -> Self {
        self.predicate = Some(Predicate::new(condition, param));
        self
    }

    /// Raw ORDER BY text; trusted input only.
    pub fn order_by(mut self, order_by: &str) -> Self {
        self.order_by = Some(order_by.to_string());
        self
    }

    pub fn build(self) -> (String, Vec<SqlValue>) {
        let mut sql = format!("SELECT {} FROM {}", self.columns, self.table);
        let mut params = Vec::new();
        if let Some(predicate) = self.predicate {
            sql.push_str(&format!(" WHERE {}", predicate.condition));
            params.push(predicate.param);
        }
        if let Some(order_by) = self.order_by {
            sql.push_str(&format!(" ORDER BY {}", order_by));
        }
        (sql, params)
    }
}

/// `UPDATE table SET c1=?, c2=? [WHERE ...]`.
#[derive(Debug)]
pub struct Update {
    table: String,
    fields: Vec<(String, SqlValue)>,
    predicate: Option<Predicate>,
}

impl Update {
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            fields: Vec::new(),
            predicate: None,
        }
    }

    pub fn set(mut self, column: &str, value: impl Into<SqlValue>) -> Self {
        self.fields.push((column.to_string(), value.into()));
        self
    }

    /// Single-parameter WHERE clause.
    pub fn filter(mut self, condition: &str, param: impl Into<SqlValue>) -> Self {
        self.predicate = Some(Predicate::new(condition, param));
        self
    }

    pub fn build(self) -> (String, Vec<SqlValue>) {
        let assignments = self
            .fields
            .iter()
            .map(|(column, _)| format!("{}=?", column))
            .collect::<Vec<_>>()
            .join(", ");
        let mut sql = format!("UPDATE {} SET {}", self.table, assignments);
        let mut params: Vec<SqlValue> =
            self.fields.into_iter().map(|(_, value)| value).collect();
        if let Some(predicate) = self.predicate {
            sql.push_str(&format!(" WHERE {}", predicate.condition));
            params.push(predicate.param);
        }
        (sql, params)
    }
}

/// `DELETE FROM table [WHERE ...]`.
#[derive(Debug)]
pub struct Delete {
    table: String,
    predicate: Option<Predicate>,
}

impl Delete {
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            predicate: None,
        }
    }

    /// Single-parameter WHERE clause.
    pub fn filter(mut self, condition: &str, param: impl Into<SqlValue>) -> Self {
        self.predicate = Some(Predicate::new(condition, param));
        self
    }

    pub fn build(self) -> (String, Vec<SqlValue>) {
        let mut sql = format!("DELETE FROM {}", self.table);
        let mut params = Vec::new();
        if let Some(predicate) = self.predicate {
            sql.push_str(&format!(" WHERE {}", predicate.condition));
            params.push(predicate.param);
        }
        (sql, params)
    }
}

#[derive(Debug)]
struct Predicate {
    condition: String,
    param: SqlValue,
}

impl Predicate {
    fn new(condition: &str, param: impl Into<SqlValue>) -> Self {
        Self {
            condition: condition.to_string(),
            param: param.into(),
        }
    }
}
