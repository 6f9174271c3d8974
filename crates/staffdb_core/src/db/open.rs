//! Connection bootstrap utilities for SQLite.
//!
//! # Responsibility
//! - Open file or in-memory SQLite connections for the employee store.
//! - Configure connection pragmas and the busy timeout.
//! - Trigger schema migrations before returning a usable connection.
//!
//! # Invariants
//! - Returned connections have migrations fully applied.
//! - Every open attempt emits one `db_open` start event and one outcome event.

use super::migrations::apply_migrations;
use super::{DbError, DbResult};
use crate::config::{StoreConfig, DEFAULT_BUSY_TIMEOUT_MS, MAX_BUSY_TIMEOUT_MS};
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

/// Opens a SQLite database file and applies all pending migrations.
///
/// # Side effects
/// - Creates the file when it does not exist.
/// - Emits `db_open` logging events with duration and status.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    let path = path.as_ref();
    open_with("file", default_busy_timeout(), || Connection::open(path))
}

/// Opens a fresh in-memory database and applies all pending migrations.
///
/// Each call returns an isolated store that disappears when dropped.
pub fn open_db_in_memory() -> DbResult<Connection> {
    open_with("memory", default_busy_timeout(), Connection::open_in_memory)
}

/// Opens the store described by `config`.
///
/// `db_path = None` selects an in-memory store.
///
/// # Errors
/// - `InvalidBusyTimeout` when `busy_timeout_ms` exceeds `MAX_BUSY_TIMEOUT_MS`;
///   checked before any connection is opened.
pub fn open_store(config: &StoreConfig) -> DbResult<Connection> {
    if config.busy_timeout_ms > MAX_BUSY_TIMEOUT_MS {
        return Err(DbError::InvalidBusyTimeout {
            requested_ms: config.busy_timeout_ms,
            max_ms: MAX_BUSY_TIMEOUT_MS,
        });
    }
    let busy_timeout = Duration::from_millis(config.busy_timeout_ms);
    match config.db_path.as_deref() {
        Some(path) => open_with("file", busy_timeout, || Connection::open(path)),
        None => open_with("memory", busy_timeout, Connection::open_in_memory),
    }
}

fn open_with<F>(mode: &'static str, busy_timeout: Duration, opener: F) -> DbResult<Connection>
where
    F: FnOnce() -> rusqlite::Result<Connection>,
{
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode={mode}");

    let mut conn = match opener() {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={mode} duration_ms={} error_code=db_open_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err.into());
        }
    };

    match bootstrap_connection(&mut conn, busy_timeout) {
        Ok(()) => {
            info!(
                "event=db_open module=db status=ok mode={mode} duration_ms={}",
                started_at.elapsed().as_millis()
            );
            Ok(conn)
        }
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={mode} duration_ms={} error_code=db_bootstrap_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

fn bootstrap_connection(conn: &mut Connection, busy_timeout: Duration) -> DbResult<()> {
    conn.busy_timeout(busy_timeout)?;
    apply_migrations(conn)?;
    Ok(())
}

fn default_busy_timeout() -> Duration {
    Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS)
}
