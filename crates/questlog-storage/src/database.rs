// SPDX-FileCopyrightText: 2026 Questlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Connection management: PRAGMA setup, migrations, and close.
//!
//! All reads and writes go through one `tokio_rusqlite::Connection`, whose
//! background thread serializes them. Do not open a second connection for writes.

use std::path::Path;

use questlog_core::QuestlogError;
use tracing::{debug, info};

use crate::migrations;

/// Handle to the Questlog SQLite database.
#[derive(Clone)]
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Open (creating if needed) the database at `path`, apply migrations, and
    /// configure the long-lived async connection.
    pub async fn open(path: &str, wal_mode: bool) -> Result<Self, QuestlogError> {
        if let Some(parent) = Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(QuestlogError::storage)?;
        }

        let migrate_path = path.to_string();
        let applied = tokio::task::spawn_blocking(move || -> Result<usize, QuestlogError> {
            let mut conn =
                rusqlite::Connection::open(&migrate_path).map_err(QuestlogError::storage)?;
            apply_pragmas(&conn, wal_mode).map_err(QuestlogError::storage)?;
            migrations::run_migrations(&mut conn)
        })
        .await
        .map_err(|e| QuestlogError::Internal(format!("migration task failed: {e}")))??;
        if applied > 0 {
            info!(path, applied, "applied database migrations");
        }

        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(map_tr_err)?;
        conn.call(move |conn| -> Result<(), rusqlite::Error> { apply_pragmas(conn, wal_mode) })
            .await
            .map_err(map_tr_err)?;

        debug!(path, wal_mode, "database opened");
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Cheap liveness probe.
    pub async fn ping(&self) -> Result<(), QuestlogError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> { conn.execute_batch("SELECT 1;") })
            .await
            .map_err(map_tr_err)
    }

    /// Checkpoint the WAL so the main file is self-contained, then close.
    pub async fn close(self) -> Result<(), QuestlogError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")
            })
            .await
            .map_err(map_tr_err)?;
        self.conn.close().await.map_err(map_tr_err)?;
        debug!("database closed");
        Ok(())
    }
}

fn apply_pragmas(conn: &rusqlite::Connection, wal_mode: bool) -> Result<(), rusqlite::Error> {
    if wal_mode {
        conn.execute_batch("PRAGMA journal_mode = WAL;")?;
    }
    conn.execute_batch(
        "PRAGMA foreign_keys = ON;
         PRAGMA busy_timeout = 5000;
         PRAGMA synchronous = NORMAL;",
    )
}

/// Collapse a tokio-rusqlite failure (closed connection or SQLite error)
/// into [`QuestlogError::Storage`].
pub(crate) fn map_tr_err<E: std::fmt::Display>(err: E) -> QuestlogError {
    QuestlogError::storage(err.to_string())
}
