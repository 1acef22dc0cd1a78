// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Session management for the `SQLite` backend.

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use rowmut_engine::{DriverError, DriverSession, DriverStatement, StatementKind};
use rusqlite::{Connection, OpenFlags};
use tracing::{debug, info};

use crate::driver_error;
use crate::statement::SqliteStatement;

/// Counter for unique in-memory database names.
///
/// Each in-memory session receives its own database instance, ensuring
/// deterministic test isolation without time-based collisions.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// A driver session backed by one `rusqlite` connection.
pub struct SqliteSession {
    conn: Connection,
}

impl SqliteSession {
    /// Creates a session against a unique shared in-memory database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or foreign key
    /// enforcement cannot be activated.
    pub fn new_in_memory() -> Result<Self, DriverError> {
        let db_id = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let db_name = format!("memdb_rowmut_{db_id}");
        let shared_memory_url = format!("file:{db_name}?mode=memory&cache=shared");

        let conn = Connection::open_with_flags(
            &shared_memory_url,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_URI,
        )
        .map_err(|error| driver_error(&error))?;

        let session = Self { conn };
        session.enable_foreign_keys()?;
        info!(db_name, "Opened in-memory SQLite session");
        Ok(session)
    }

    /// Creates a session against a file-based database, in WAL mode for
    /// better read concurrency.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened, WAL mode cannot be
    /// enabled, or foreign key enforcement cannot be activated.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, DriverError> {
        let conn = Connection::open(path.as_ref()).map_err(|error| driver_error(&error))?;

        conn.pragma_update(None, "journal_mode", "WAL")
            .map_err(|error| driver_error(&error))?;

        let session = Self { conn };
        session.enable_foreign_keys()?;
        info!(path = %path.as_ref().display(), "Opened file-based SQLite session");
        Ok(session)
    }

    /// The underlying connection, for schema management and verification
    /// queries outside the mutation path.
    #[must_use]
    pub const fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Runs a multi-statement SQL script, typically schema setup.
    ///
    /// # Errors
    ///
    /// Returns an error if any statement in the script fails.
    pub fn run_script(&self, script: &str) -> Result<(), DriverError> {
        self.conn
            .execute_batch(script)
            .map_err(|error| driver_error(&error))
    }

    /// Switches foreign key enforcement on and verifies the pragma stuck.
    fn enable_foreign_keys(&self) -> Result<(), DriverError> {
        self.conn
            .execute("PRAGMA foreign_keys = ON", [])
            .map_err(|error| driver_error(&error))?;

        let enabled: i64 = self
            .conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .map_err(|error| driver_error(&error))?;
        if enabled != 1 {
            return Err(DriverError::new(
                "foreign key enforcement could not be enabled",
            ));
        }
        Ok(())
    }
}

impl DriverSession for SqliteSession {
    fn prepare(
        &self,
        sql: &str,
        kind: StatementKind,
    ) -> Result<Box<dyn DriverStatement + '_>, DriverError> {
        debug!(sql, ?kind, "Preparing SQLite statement");
        let statement = self.conn.prepare(sql).map_err(|error| driver_error(&error))?;
        Ok(Box::new(SqliteStatement::new(&self.conn, statement, kind)))
    }
}

impl std::fmt::Debug for SqliteSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteSession").finish_non_exhaustive()
    }
}
