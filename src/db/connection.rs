use rusqlite::Connection;
use std::cell::RefCell;

use crate::errors::SyncError;

const SCHEMA_SQL: &str = include_str!("../../sql/schema.sql");

// Thread-local connection slot.
thread_local! {
    static DB_CONN: RefCell<Option<Connection>> = const { RefCell::new(None) };
}

#[derive(Clone)]
pub struct Database {
    path: String,
}

impl Database {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    /// Open or fetch the per-thread SQLite connection and run `f(conn)`.
    ///
    /// Operations that need atomicity open their own
    /// `conn.transaction()` inside the closure; nothing here holds a
    /// process-wide session open between calls.
    pub fn with_conn<F, T>(&self, f: F) -> Result<T, SyncError>
    where
        F: FnOnce(&mut Connection) -> Result<T, SyncError>,
    {
        let inner_result = DB_CONN
            .try_with(|cell| {
                let mut slot = cell.borrow_mut();
                if slot.is_none() {
                    let conn = Connection::open(&self.path)
                        .map_err(|e| SyncError::DbError(format!("Open DB failed: {e}")))?;
                    *slot = Some(conn);
                }
                let conn = slot.as_mut().unwrap();
                f(conn)
            })
            .map_err(|e| SyncError::DbError(format!("Connection slot unavailable: {e}")))?;
        inner_result
    }
}

/// Apply the embedded schema; safe to run on every startup.
pub fn init_db(db: &Database) -> Result<(), SyncError> {
    db.with_conn(|conn| {
        conn.execute_batch(SCHEMA_SQL)
            .map_err(|e| SyncError::DbError(format!("Failed to apply schema: {e}")))?;
        Ok(())
    })
}
