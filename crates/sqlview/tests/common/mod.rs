//! Shared fixtures for integration tests.

use std::path::PathBuf;

use sqlview::db::Database;
use tempfile::TempDir;

pub const USERS: &str = "CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT NOT NULL, email TEXT);
     INSERT INTO users VALUES (1, 'Alice', 'alice@example.com');
     INSERT INTO users VALUES (2, 'Bob', NULL);
     INSERT INTO users VALUES (3, 'Carol', 'carol@example.com');
     CREATE TABLE tags (label TEXT, weight REAL);
     INSERT INTO tags VALUES ('red', 1.5), ('blue', 2.0);";

/// A SQLite file in a temporary directory, removed on drop.
pub struct TestDatabase {
    _dir: TempDir,
    pub path: PathBuf,
}

impl TestDatabase {
    pub async fn new(sql: &str) -> anyhow::Result<Self> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("test.db");
        let db = Database::open(&path.to_string_lossy()).await?;
        db.execute_batch(sql).await?;
        db.close().await;
        Ok(Self { _dir: dir, path })
    }

    pub async fn connect(&self) -> anyhow::Result<Database> {
        Ok(Database::open(&self.path.to_string_lossy()).await?)
    }
}
