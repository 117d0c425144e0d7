//! Database connection management.

use std::path::Path;

use diesel::{sql_query, Connection, RunQueryDsl, SqliteConnection};
use tracing::debug;

use crate::{
    error::{DbError, Result},
    migration::apply_migrations,
};

/// Database connection wrapper with migration support.
pub struct DbConnection {
    conn: SqliteConnection,
}

impl DbConnection {
    /// Opens the annotation store and runs migrations.
    ///
    /// The file is created when it does not exist yet. The parent directory
    /// must exist.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::ConnectionError`] if the file cannot be opened and
    /// [`DbError::MigrationError`] if it is not a usable SQLite database.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "opening annotation store");

        let path_str = path.to_string_lossy();
        let mut conn = SqliteConnection::establish(&path_str)?;

        sql_query("PRAGMA journal_mode = WAL;")
            .execute(&mut conn)
            .map_err(|e| DbError::ConnectionError(e.to_string()))?;

        apply_migrations(&mut conn).map_err(|e| DbError::MigrationError(e.to_string()))?;

        Ok(Self { conn })
    }

    /// Opens a private in-memory store with the current schema.
    pub fn open_in_memory() -> Result<Self> {
        let mut conn = SqliteConnection::establish(":memory:")?;
        apply_migrations(&mut conn).map_err(|e| DbError::MigrationError(e.to_string()))?;
        Ok(Self { conn })
    }

    /// Gets a mutable reference to the underlying connection.
    pub fn conn(&mut self) -> &mut SqliteConnection {
        &mut self.conn
    }
}

impl std::ops::Deref for DbConnection {
    type Target = SqliteConnection;

    fn deref(&self) -> &Self::Target {
        &self.conn
    }
}

impl std::ops::DerefMut for DbConnection {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.conn
    }
}
