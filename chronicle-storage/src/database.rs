//! Named SQLite handles. One mutex-guarded connection per backend.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::Connection;

use chronicle_core::config::ConnectionTarget;
use chronicle_core::errors::ChronicleResult;

use crate::to_storage_err;

/// A single SQLite connection guarded by a mutex.
///
/// The core is synchronous; the mutex only keeps rusqlite's
/// single-connection model safe when a driver instance is shared across
/// threads by a collaborator.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open a file-backed database.
    pub fn open(path: &Path) -> ChronicleResult<Self> {
        let conn = Connection::open(path).map_err(|e| to_storage_err(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory database (tests, ephemeral runs).
    pub fn open_in_memory() -> ChronicleResult<Self> {
        let conn = Connection::open_in_memory().map_err(|e| to_storage_err(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open whichever target the config names.
    pub fn open_target(target: &ConnectionTarget) -> ChronicleResult<Self> {
        match target {
            ConnectionTarget::File(path) => Self::open(path),
            ConnectionTarget::Memory => Self::open_in_memory(),
        }
    }

    /// Run a closure against the connection.
    pub fn with_conn<F, T>(&self, f: F) -> ChronicleResult<T>
    where
        F: FnOnce(&Connection) -> ChronicleResult<T>,
    {
        let guard = self
            .conn
            .lock()
            .map_err(|_| to_storage_err("connection mutex poisoned"))?;
        f(&guard)
    }
}
