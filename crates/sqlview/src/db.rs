//! Shared SQLite handle.
//!
//! `Database` is the single connection every component talks to. It is cheap
//! to clone; all clones feed the same `tokio-rusqlite` connection thread, so
//! statements are executed strictly one at a time.

use tokio_rusqlite::rusqlite::{self, params_from_iter, types::ValueRef};

use crate::error::{DbError, StatementError};
use crate::schema::ColumnInfo;

/// A fetched row, one display string per column.
pub type RowRecord = Vec<String>;

#[derive(Clone)]
pub struct Database {
    conn: tokio_rusqlite::Connection,
    location: String,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("location", &self.location)
            .finish()
    }
}

impl Database {
    /// Open (or create) the SQLite file at `path`.
    pub async fn open(path: &str) -> Result<Self, DbError> {
        tracing::info!(path = %path, "opening SQLite database");
        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(|e| DbError::Open {
                path: path.to_string(),
                message: e.to_string(),
            })?;
        tracing::info!(path = %path, "SQLite database connection established");
        Ok(Self {
            conn,
            location: path.to_string(),
        })
    }

    pub async fn open_in_memory() -> Result<Self, DbError> {
        let conn = tokio_rusqlite::Connection::open_in_memory()
            .await
            .map_err(|e| DbError::Open {
                path: ":memory:".to_string(),
                message: e.to_string(),
            })?;
        Ok(Self {
            conn,
            location: ":memory:".to_string(),
        })
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    /// Run `f` on the connection thread and flatten both error layers.
    async fn run<R, F>(&self, f: F) -> Result<R, DbError>
    where
        F: FnOnce(&mut rusqlite::Connection) -> rusqlite::Result<R> + Send + 'static,
        R: Send + 'static,
    {
        let result = self
            .conn
            .call(move |conn| Ok::<_, tokio_rusqlite::Error>(f(conn)))
            .await
            .map_err(|e| DbError::Closed(e.to_string()))?;

        result.map_err(|e| DbError::Statement(StatementError::new(e.to_string())))
    }

    #[tracing::instrument(skip(self))]
    pub async fn list_tables(&self) -> Result<Vec<String>, DbError> {
        tracing::debug!("listing tables from sqlite_master");
        let tables = self
            .run(|conn| {
                let mut stmt = conn.prepare(
                    "SELECT name FROM sqlite_master \
                     WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
                )?;
                let names = stmt
                    .query_map([], |row| row.get::<_, String>(0))?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(names)
            })
            .await?;
        tracing::debug!(table_count = tables.len(), "tables listed");
        Ok(tables)
    }

    /// Column metadata in declaration order. Empty if the table does not exist.
    #[tracing::instrument(skip(self))]
    pub async fn table_columns(&self, table: &str) -> Result<Vec<ColumnInfo>, DbError> {
        let table = table.to_string();
        self.run(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT name, type, pk FROM pragma_table_info(?1) ORDER BY cid",
            )?;
            let columns = stmt
                .query_map([&table], |row| {
                    Ok(ColumnInfo {
                        name: row.get(0)?,
                        decl_type: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                        is_primary_key: row.get::<_, i64>(2)? == 1,
                    })
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(columns)
        })
        .await
    }

    #[tracing::instrument(skip(self))]
    pub async fn row_count(&self, table: &str) -> Result<usize, DbError> {
        let sql = format!("SELECT COUNT(*) FROM {}", quote_identifier(table));
        let count: i64 = self
            .run(move |conn| conn.query_row(&sql, [], |row| row.get(0)))
            .await?;
        Ok(count.max(0) as usize)
    }

    /// `SELECT *` over the table, every cell rendered as text.
    #[tracing::instrument(skip(self))]
    pub async fn fetch_rows(&self, table: &str) -> Result<Vec<RowRecord>, DbError> {
        let sql = format!("SELECT * FROM {}", quote_identifier(table));
        let rows = self
            .run(move |conn| {
                let mut stmt = conn.prepare(&sql)?;
                let width = stmt.column_count();
                let rows = stmt
                    .query_map([], |row| {
                        (0..width)
                            .map(|i| row.get_ref(i).map(cell_text))
                            .collect::<rusqlite::Result<RowRecord>>()
                    })?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(rows)
            })
            .await?;
        tracing::debug!(row_count = rows.len(), "rows fetched");
        Ok(rows)
    }

    /// Execute one parameterized statement in auto-commit mode.
    #[tracing::instrument(skip(self, sql, params), fields(sql_preview = %sql.chars().take(100).collect::<String>()))]
    pub async fn execute(&self, sql: &str, params: Vec<String>) -> Result<usize, DbError> {
        let sql = sql.to_string();
        let affected = self
            .run(move |conn| conn.execute(&sql, params_from_iter(params.iter())))
            .await?;
        tracing::debug!(affected_rows = affected, "statement executed");
        Ok(affected)
    }

    pub async fn execute_batch(&self, sql: &str) -> Result<(), DbError> {
        tracing::debug!("executing SQL batch");
        let sql = sql.to_string();
        self.run(move |conn| conn.execute_batch(&sql)).await
    }

    pub async fn close(self) {
        tracing::info!(path = %self.location, "closing SQLite connection");
        if let Err(e) = self.conn.close().await {
            tracing::warn!(error = %e, "failed to close SQLite connection cleanly");
        }
    }
}

/// Quote an identifier for SQLite: wrap in double quotes, double any embedded quote.
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn cell_text(value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Null => String::new(),
        ValueRef::Integer(i) => i.to_string(),
        ValueRef::Real(f) => f.to_string(),
        ValueRef::Text(t) => String::from_utf8_lossy(t).into_owned(),
        ValueRef::Blob(b) => format!("<{} bytes>", b.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_identifier_plain() {
        assert_eq!(quote_identifier("users"), "\"users\"");
    }

    #[test]
    fn test_quote_identifier_escapes_quotes() {
        assert_eq!(quote_identifier("we\"ird"), "\"we\"\"ird\"");
    }

    #[test]
    fn test_cell_text_variants() {
        assert_eq!(cell_text(ValueRef::Null), "");
        assert_eq!(cell_text(ValueRef::Integer(42)), "42");
        assert_eq!(cell_text(ValueRef::Real(1.5)), "1.5");
        assert_eq!(cell_text(ValueRef::Text(b"hello")), "hello");
        assert_eq!(cell_text(ValueRef::Blob(&[1, 2, 3])), "<3 bytes>");
    }

    #[tokio::test]
    async fn test_fetch_rows_renders_text() {
        let db = Database::open_in_memory().await.unwrap();
        db.execute_batch(
            "CREATE TABLE t (id INTEGER PRIMARY KEY, name TEXT, score REAL);
             INSERT INTO t VALUES (1, 'a', 2.5), (2, NULL, NULL);",
        )
        .await
        .unwrap();

        let rows = db.fetch_rows("t").await.unwrap();
        assert_eq!(
            rows,
            vec![
                vec!["1".to_string(), "a".to_string(), "2.5".to_string()],
                vec!["2".to_string(), String::new(), String::new()],
            ]
        );
        assert_eq!(db.row_count("t").await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_table_columns_reports_primary_key() {
        let db = Database::open_in_memory().await.unwrap();
        db.execute_batch("CREATE TABLE t (name TEXT, code TEXT PRIMARY KEY)")
            .await
            .unwrap();

        let cols = db.table_columns("t").await.unwrap();
        assert_eq!(cols.len(), 2);
        assert_eq!(cols[0].name, "name");
        assert!(!cols[0].is_primary_key);
        assert_eq!(cols[1].decl_type, "TEXT");
        assert!(cols[1].is_primary_key);
    }

    #[tokio::test]
    async fn test_missing_table_has_no_columns() {
        let db = Database::open_in_memory().await.unwrap();
        assert!(db.table_columns("nope").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_bad_statement_is_statement_error() {
        let db = Database::open_in_memory().await.unwrap();
        let err = db.execute("INSERT INTO nope VALUES (?1)", vec!["x".into()]).await;
        assert!(matches!(err, Err(DbError::Statement(_))));
    }

    #[tokio::test]
    async fn test_list_tables_skips_internal_tables() {
        let db = Database::open_in_memory().await.unwrap();
        db.execute_batch(
            "CREATE TABLE b (x INTEGER PRIMARY KEY AUTOINCREMENT);
             CREATE TABLE a (y TEXT);",
        )
        .await
        .unwrap();

        // AUTOINCREMENT creates sqlite_sequence.
        assert_eq!(db.list_tables().await.unwrap(), vec!["a", "b"]);
    }
}
