//! SQLite connection bootstrap.
//!
//! # Invariants
//! - Returned connections have the key-value schema fully migrated.
//! - Every open attempt emits one `store_open` start event and one outcome
//!   event carrying the elapsed time.

use super::migrations::apply_migrations;
use super::{StoreError, StoreResult};
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

/// Opens (or creates) a store file and applies pending migrations.
pub fn open_store(path: impl AsRef<Path>) -> StoreResult<Connection> {
    open_with("file", || Connection::open(path))
}

/// Opens a throwaway in-memory store with the schema applied.
pub fn open_store_in_memory() -> StoreResult<Connection> {
    open_with("memory", Connection::open_in_memory)
}

fn open_with(
    mode: &str,
    connect: impl FnOnce() -> rusqlite::Result<Connection>,
) -> StoreResult<Connection> {
    let started_at = Instant::now();
    info!("event=store_open module=store status=start mode={mode}");

    let result = connect()
        .map_err(StoreError::from)
        .and_then(|mut conn| bootstrap(&mut conn).map(|()| conn));

    match &result {
        Ok(_) => info!(
            "event=store_open module=store status=ok mode={} duration_ms={}",
            mode,
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=store_open module=store status=error mode={} duration_ms={} error={}",
            mode,
            started_at.elapsed().as_millis(),
            err
        ),
    }
    result
}

fn bootstrap(conn: &mut Connection) -> StoreResult<()> {
    conn.busy_timeout(Duration::from_secs(5))?;
    apply_migrations(conn)
}
