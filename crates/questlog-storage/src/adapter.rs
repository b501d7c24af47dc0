// SPDX-FileCopyrightText: 2026 Questlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the Questlog store traits.

use async_trait::async_trait;
use tracing::debug;

use questlog_config::StorageConfig;
use questlog_core::{
    Character, CharacterStore, JournalEntry, JournalStore, ProgressionStore, Quest, QuestStore,
    QuestlogError,
};

use crate::database::Database;
use crate::queries;

/// SQLite-backed store for characters, quests, and journal entries.
///
/// Cloning is cheap: clones share the single background connection.
#[derive(Clone)]
pub struct SqliteStore {
    db: Database,
}

impl SqliteStore {
    /// Open the database described by `config` and apply migrations.
    pub async fn open(config: &StorageConfig) -> Result<Self, QuestlogError> {
        let db = Database::open(&config.database_path, config.wal_mode).await?;
        debug!(path = %config.database_path, "SQLite store initialized");
        Ok(Self { db })
    }

    pub fn from_database(db: Database) -> Self {
        Self { db }
    }

    pub async fn health_check(&self) -> Result<(), QuestlogError> {
        self.db.ping().await
    }

    /// Checkpoint and close. Other clones become unusable.
    pub async fn close(self) -> Result<(), QuestlogError> {
        self.db.close().await
    }
}

#[async_trait]
impl CharacterStore for SqliteStore {
    async fn create_character(&self, character: &Character) -> Result<(), QuestlogError> {
        queries::characters::create_character(&self.db, character).await
    }

    async fn get_character(&self, id: &str) -> Result<Option<Character>, QuestlogError> {
        queries::characters::get_character(&self.db, id).await
    }

    async fn get_character_by_user(
        &self,
        user_id: &str,
    ) -> Result<Option<Character>, QuestlogError> {
        queries::characters::get_character_by_user(&self.db, user_id).await
    }

    async fn update_character(&self, character: &Character) -> Result<Character, QuestlogError> {
        queries::characters::update_character(&self.db, character).await
    }
}

#[async_trait]
impl QuestStore for SqliteStore {
    async fn create_quest(&self, quest: &Quest) -> Result<(), QuestlogError> {
        queries::quests::create_quest(&self.db, quest).await
    }

    async fn get_quest(&self, id: &str) -> Result<Option<Quest>, QuestlogError> {
        queries::quests::get_quest(&self.db, id).await
    }

    async fn list_quests_for_user(&self, user_id: &str) -> Result<Vec<Quest>, QuestlogError> {
        queries::quests::list_quests_for_user(&self.db, user_id).await
    }

    async fn update_quest(&self, quest: &Quest) -> Result<Quest, QuestlogError> {
        queries::quests::update_quest(&self.db, quest).await
    }
}

#[async_trait]
impl ProgressionStore for SqliteStore {
    async fn commit_quest_completion(
        &self,
        quest: &Quest,
        character: &Character,
    ) -> Result<(Quest, Character), QuestlogError> {
        queries::quests::commit_quest_completion(&self.db, quest, character).await
    }
}

#[async_trait]
impl JournalStore for SqliteStore {
    async fn get_entry(&self, id: &str) -> Result<Option<JournalEntry>, QuestlogError> {
        queries::entries::get_entry(&self.db, id).await
    }

    async fn save_entry(&self, entry: &JournalEntry) -> Result<(), QuestlogError> {
        queries::entries::save_entry(&self.db, entry).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tempfile::tempdir;

    fn config(path: &std::path::Path) -> StorageConfig {
        StorageConfig {
            database_path: path.to_string_lossy().into_owned(),
            wal_mode: true,
        }
    }

    #[tokio::test]
    async fn open_creates_database_and_reports_healthy() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.db");
        let store = SqliteStore::open(&config(&path)).await.unwrap();
        assert!(path.exists());
        store.health_check().await.unwrap();
        store.close().await.unwrap();
    }

    #[tokio::test]
    async fn usable_through_trait_objects() {
        let dir = tempdir().unwrap();
        let store = SqliteStore::open(&config(&dir.path().join("dyn.db")))
            .await
            .unwrap();
        let progression: Arc<dyn ProgressionStore> = Arc::new(store.clone());
        let journal: Arc<dyn JournalStore> = Arc::new(store);

        assert!(progression.get_character("missing").await.unwrap().is_none());
        assert!(progression.list_quests_for_user("u").await.unwrap().is_empty());
        assert!(journal.get_entry("missing").await.unwrap().is_none());
    }
}
