//! Database connection and query execution.

use crate::{DbError, QueryResult, Row, Value};
use serde::de::DeserializeOwned;

/// SQLite database connection.
///
/// Backed by Spin's SQLite host on `wasm32` and by a bundled SQLite
/// (`rusqlite`) everywhere else, so the same queries run in the edge
/// component, the CLI, and the tests.
pub struct Db {
    #[cfg(target_arch = "wasm32")]
    conn: spin_sdk::sqlite::Connection,
    #[cfg(not(target_arch = "wasm32"))]
    conn: rusqlite::Connection,
}

impl std::fmt::Debug for Db {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Db").finish_non_exhaustive()
    }
}

impl Db {
    /// Open the default SQLite database.
    ///
    /// Outside of Spin this is a private in-memory database.
    #[cfg(target_arch = "wasm32")]
    pub fn open_default() -> Result<Self, DbError> {
        let conn = spin_sdk::sqlite::Connection::open_default()
            .map_err(|e| DbError::OpenError(e.to_string()))?;
        Ok(Self { conn })
    }

    /// Open a named SQLite database.
    #[cfg(target_arch = "wasm32")]
    pub fn open(name: &str) -> Result<Self, DbError> {
        let conn = spin_sdk::sqlite::Connection::open(name)
            .map_err(|e| DbError::OpenError(e.to_string()))?;
        Ok(Self { conn })
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn open_default() -> Result<Self, DbError> {
        Self::open_in_memory()
    }

    /// Open (or create) a SQLite database file.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn open(path: &str) -> Result<Self, DbError> {
        let conn =
            rusqlite::Connection::open(path).map_err(|e| DbError::OpenError(e.to_string()))?;
        conn.pragma_update(None, "foreign_keys", "ON")
            .map_err(|e| DbError::OpenError(e.to_string()))?;
        Ok(Self { conn })
    }

    /// Open a fresh in-memory database.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = rusqlite::Connection::open_in_memory()
            .map_err(|e| DbError::OpenError(e.to_string()))?;
        conn.pragma_update(None, "foreign_keys", "ON")
            .map_err(|e| DbError::OpenError(e.to_string()))?;
        Ok(Self { conn })
    }

    /// Execute a SQL statement that doesn't return rows.
    ///
    /// Use this for INSERT, UPDATE, DELETE, CREATE TABLE, etc. Statements
    /// with a `RETURNING` clause go through [`Db::query`].
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// db.execute(
    ///     "UPDATE product_ad_boosts SET clicks = clicks + 1 WHERE id = ?",
    ///     params![boost_id.as_str()]
    /// )?;
    /// ```
    #[cfg(target_arch = "wasm32")]
    pub fn execute(&self, sql: &str, params: &[Value]) -> Result<(), DbError> {
        self.conn
            .execute(sql, to_spin_params(params).as_slice())
            .map_err(|e| DbError::QueryError(e.to_string()))?;
        Ok(())
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn execute(&self, sql: &str, params: &[Value]) -> Result<(), DbError> {
        self.conn
            .execute(sql, rusqlite::params_from_iter(to_sqlite_params(params)))?;
        Ok(())
    }

    /// Execute several `;`-separated statements, e.g. a schema.
    #[cfg(target_arch = "wasm32")]
    pub fn execute_batch(&self, sql: &str) -> Result<(), DbError> {
        for statement in sql.split(';').map(str::trim).filter(|s| !s.is_empty()) {
            self.execute(statement, &[])?;
        }
        Ok(())
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn execute_batch(&self, sql: &str) -> Result<(), DbError> {
        self.conn.execute_batch(sql)?;
        Ok(())
    }

    /// Execute a SQL query and return raw results.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let updated = db.query(
    ///     "UPDATE product_ad_boosts SET clicks = clicks + 1 WHERE id = ? RETURNING id",
    ///     params!["boost-1"],
    /// )?;
    /// let found = !updated.is_empty();
    /// ```
    #[cfg(target_arch = "wasm32")]
    pub fn query(&self, sql: &str, params: &[Value]) -> Result<QueryResult, DbError> {
        let result = self
            .conn
            .execute(sql, to_spin_params(params).as_slice())
            .map_err(|e| DbError::QueryError(e.to_string()))?;

        let columns: Vec<String> = result.columns.iter().map(|c| c.to_string()).collect();

        let rows: Vec<Row> = result
            .rows
            .iter()
            .map(|row| {
                let values: Vec<Value> = row
                    .values
                    .iter()
                    .map(|v| match v {
                        spin_sdk::sqlite::Value::Null => Value::Null,
                        spin_sdk::sqlite::Value::Integer(i) => Value::Integer(*i),
                        spin_sdk::sqlite::Value::Real(f) => Value::Real(*f),
                        spin_sdk::sqlite::Value::Text(s) => Value::Text(s.clone()),
                        spin_sdk::sqlite::Value::Blob(b) => Value::Blob(b.clone()),
                    })
                    .collect();
                Row::new(columns.clone(), values)
            })
            .collect();

        Ok(QueryResult::new(columns, rows))
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn query(&self, sql: &str, params: &[Value]) -> Result<QueryResult, DbError> {
        use rusqlite::types::ValueRef;

        let mut stmt = self.conn.prepare(sql)?;
        let columns: Vec<String> = stmt
            .column_names()
            .into_iter()
            .map(String::from)
            .collect();

        let mut rows = stmt.query(rusqlite::params_from_iter(to_sqlite_params(params)))?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let mut values = Vec::with_capacity(columns.len());
            for i in 0..columns.len() {
                let value = match row.get_ref(i)? {
                    ValueRef::Null => Value::Null,
                    ValueRef::Integer(n) => Value::Integer(n),
                    ValueRef::Real(f) => Value::Real(f),
                    ValueRef::Text(bytes) => Value::Text(
                        String::from_utf8(bytes.to_vec())
                            .map_err(|e| DbError::TypeError(e.to_string()))?,
                    ),
                    ValueRef::Blob(bytes) => Value::Blob(bytes.to_vec()),
                };
                values.push(value);
            }
            out.push(Row::new(columns.clone(), values));
        }

        Ok(QueryResult::new(columns, out))
    }

    /// Execute a SQL query and deserialize results into a vector.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// #[derive(Deserialize)]
    /// struct ActiveCount {
    ///     boost_type: String,
    ///     active: i64,
    /// }
    ///
    /// let counts: Vec<ActiveCount> = db.query_as(
    ///     "SELECT boost_type, COUNT(*) AS active FROM product_ad_boosts GROUP BY boost_type",
    ///     params![]
    /// )?;
    /// ```
    pub fn query_as<T: DeserializeOwned>(
        &self,
        sql: &str,
        params: &[Value],
    ) -> Result<Vec<T>, DbError> {
        let result = self.query(sql, params)?;
        result.deserialize_all()
    }

    /// Execute a SQL query and return a single row.
    ///
    /// Returns [`DbError::NotFound`] if no rows are returned.
    pub fn query_one<T: DeserializeOwned>(
        &self,
        sql: &str,
        params: &[Value],
    ) -> Result<T, DbError> {
        let result = self.query(sql, params)?;
        result.first().ok_or(DbError::NotFound)?.deserialize()
    }

    /// Execute a SQL query and return an optional single row.
    pub fn query_optional<T: DeserializeOwned>(
        &self,
        sql: &str,
        params: &[Value],
    ) -> Result<Option<T>, DbError> {
        let result = self.query(sql, params)?;
        match result.first() {
            Some(row) => Ok(Some(row.deserialize()?)),
            None => Ok(None),
        }
    }

    /// Run `f` inside a transaction.
    ///
    /// Commits when `f` returns `Ok`, rolls back when it returns `Err`. The
    /// closure's error is returned unchanged; a failed rollback is logged.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// db.transaction(|tx| {
    ///     tx.execute("INSERT INTO product_ad_boosts (...) VALUES (...)", params![...])?;
    ///     tx.execute("INSERT INTO featured_products (...) VALUES (...)", params![...])?;
    ///     Ok::<_, DbError>(())
    /// })?;
    /// ```
    pub fn transaction<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&Db) -> Result<T, E>,
        E: From<DbError>,
    {
        self.execute("BEGIN", &[])
            .map_err(|e| DbError::TransactionError(e.to_string()))?;

        match f(self) {
            Ok(value) => {
                if let Err(e) = self.execute("COMMIT", &[]) {
                    let _ = self.execute("ROLLBACK", &[]);
                    return Err(DbError::TransactionError(e.to_string()).into());
                }
                Ok(value)
            }
            Err(err) => {
                if let Err(e) = self.execute("ROLLBACK", &[]) {
                    tracing::warn!(error = %e, "rollback failed");
                }
                Err(err)
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn to_spin_params(params: &[Value]) -> Vec<spin_sdk::sqlite::Value> {
    params
        .iter()
        .map(|v| match v {
            Value::Null => spin_sdk::sqlite::Value::Null,
            Value::Integer(i) => spin_sdk::sqlite::Value::Integer(*i),
            Value::Real(f) => spin_sdk::sqlite::Value::Real(*f),
            Value::Text(s) => spin_sdk::sqlite::Value::Text(s.clone()),
            Value::Blob(b) => spin_sdk::sqlite::Value::Blob(b.clone()),
        })
        .collect()
}

#[cfg(not(target_arch = "wasm32"))]
fn to_sqlite_params(params: &[Value]) -> Vec<rusqlite::types::Value> {
    params
        .iter()
        .map(|v| match v {
            Value::Null => rusqlite::types::Value::Null,
            Value::Integer(i) => rusqlite::types::Value::Integer(*i),
            Value::Real(f) => rusqlite::types::Value::Real(*f),
            Value::Text(s) => rusqlite::types::Value::Text(s.clone()),
            Value::Blob(b) => rusqlite::types::Value::Blob(b.clone()),
        })
        .collect()
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use crate::params;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Counter {
        id: String,
        hits: i64,
    }

    fn counters_db() -> Db {
        let db = Db::open_in_memory().unwrap();
        db.execute_batch(
            "CREATE TABLE counters (id TEXT PRIMARY KEY, hits INTEGER NOT NULL DEFAULT 0);
             INSERT INTO counters (id) VALUES ('a');",
        )
        .unwrap();
        db
    }

    #[test]
    fn test_execute_and_query_as() {
        let db = counters_db();
        db.execute("UPDATE counters SET hits = hits + 1 WHERE id = ?", params!["a"])
            .unwrap();

        let rows: Vec<Counter> = db.query_as("SELECT id, hits FROM counters", params![]).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, "a");
        assert_eq!(rows[0].hits, 1);
    }

    #[test]
    fn test_query_returning() {
        let db = counters_db();
        let updated: Option<Counter> = db
            .query_optional(
                "UPDATE counters SET hits = hits + 5 WHERE id = ? RETURNING id, hits",
                params!["a"],
            )
            .unwrap();
        assert_eq!(updated.map(|c| c.hits), Some(5));

        let missing: Option<Counter> = db
            .query_optional(
                "UPDATE counters SET hits = hits + 5 WHERE id = ? RETURNING id, hits",
                params!["zzz"],
            )
            .unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn test_query_one_not_found() {
        let db = counters_db();
        let result: Result<Counter, DbError> =
            db.query_one("SELECT id, hits FROM counters WHERE id = ?", params!["nope"]);
        assert!(matches!(result, Err(DbError::NotFound)));
    }

    #[test]
    fn test_transaction_commits() {
        let db = counters_db();
        db.transaction(|tx| {
            tx.execute("INSERT INTO counters (id) VALUES (?)", params!["b"])?;
            tx.execute("INSERT INTO counters (id) VALUES (?)", params!["c"])?;
            Ok::<_, DbError>(())
        })
        .unwrap();

        let rows: Vec<Counter> = db.query_as("SELECT id, hits FROM counters", params![]).unwrap();
        assert_eq!(rows.len(), 3);
    }

    #[test]
    fn test_transaction_rolls_back_on_error() {
        let db = counters_db();
        let result = db.transaction(|tx| {
            tx.execute("INSERT INTO counters (id) VALUES (?)", params!["b"])?;
            // duplicate primary key
            tx.execute("INSERT INTO counters (id) VALUES (?)", params!["a"])?;
            Ok::<_, DbError>(())
        });
        assert!(result.is_err());

        let rows: Vec<Counter> = db.query_as("SELECT id, hits FROM counters", params![]).unwrap();
        assert_eq!(rows.len(), 1);
    }
}
