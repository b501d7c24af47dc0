// SPDX-FileCopyrightText: 2026 Questlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Real SQLite store in a throwaway directory.

use questlog_config::StorageConfig;
use questlog_core::QuestlogError;
use questlog_storage::SqliteStore;

/// Owns the temp directory so the database lives as long as the harness.
pub struct TestHarness {
    pub store: SqliteStore,
    pub database_path: String,
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    pub async fn new() -> Result<Self, QuestlogError> {
        let temp_dir = tempfile::TempDir::new().map_err(QuestlogError::storage)?;
        let database_path = temp_dir
            .path()
            .join("questlog-test.db")
            .to_string_lossy()
            .into_owned();
        let store = SqliteStore::open(&StorageConfig {
            database_path: database_path.clone(),
            wal_mode: true,
        })
        .await?;
        Ok(Self {
            store,
            database_path,
            _temp_dir: temp_dir,
        })
    }
}
