//! Durable store connection management

use crate::error::Result;
use libsql::{Builder, Connection, Database as LibSqlDatabase};
use std::path::Path;

use super::migrations;

/// Database wrapper for libSQL connections
pub struct Store {
    // Keeps the database alive for the lifetime of the connection.
    _db: LibSqlDatabase,
    conn: Connection,
}

impl Store {
    /// Open the store at the given path, creating the database if it doesn't exist
    ///
    /// Runs migrations automatically.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path_str = path.as_ref().to_string_lossy().to_string();
        let db = Builder::new_local(&path_str).build().await?;
        let conn = db.connect()?;

        let store = Self { _db: db, conn };
        store.configure().await?;
        store.migrate().await?;
        Ok(store)
    }

    /// Open an in-memory store (useful for testing)
    pub async fn open_in_memory() -> Result<Self> {
        let db = Builder::new_local(":memory:").build().await?;
        let conn = db.connect()?;

        let store = Self { _db: db, conn };
        store.configure().await?;
        store.migrate().await?;
        Ok(store)
    }

    /// Configure `SQLite` for durability and performance
    async fn configure(&self) -> Result<()> {
        // WAL and synchronous tuning are best-effort (not supported on every
        // backing store, e.g. in-memory databases).
        self.conn
            .execute("PRAGMA journal_mode = WAL;", ())
            .await
            .ok();
        self.conn
            .execute("PRAGMA synchronous = NORMAL;", ())
            .await
            .ok();
        self.conn.execute("PRAGMA foreign_keys = ON;", ()).await?;
        Ok(())
    }

    /// Run database migrations
    async fn migrate(&self) -> Result<()> {
        migrations::run(&self.conn).await
    }

    /// Get a reference to the underlying connection
    pub const fn connection(&self) -> &Connection {
        &self.conn
    }
}
