// SPDX-FileCopyrightText: 2026 Questlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Store traits for characters, quests, and journal entries.
//!
//! Every update is a compare-and-swap on `version`: the record passed in
//! carries the version that was loaded, the store persists it only if the
//! stored version still matches, and returns the record with the bumped
//! version. A mismatch yields [`QuestlogError::Conflict`].

use async_trait::async_trait;

use crate::error::QuestlogError;
use crate::types::{Character, JournalEntry, Quest};

#[async_trait]
pub trait CharacterStore: Send + Sync {
    /// Inserts a new character. Fails if the user already owns one.
    async fn create_character(&self, character: &Character) -> Result<(), QuestlogError>;

    async fn get_character(&self, id: &str) -> Result<Option<Character>, QuestlogError>;

    async fn get_character_by_user(
        &self,
        user_id: &str,
    ) -> Result<Option<Character>, QuestlogError>;

    /// Saves progression and attribute fields, guarded by `character.version`.
    async fn update_character(&self, character: &Character) -> Result<Character, QuestlogError>;
}

#[async_trait]
pub trait QuestStore: Send + Sync {
    async fn create_quest(&self, quest: &Quest) -> Result<(), QuestlogError>;

    async fn get_quest(&self, id: &str) -> Result<Option<Quest>, QuestlogError>;

    /// All quests owned by `user_id`, any status.
    async fn list_quests_for_user(&self, user_id: &str) -> Result<Vec<Quest>, QuestlogError>;

    /// Saves title, description, and status, guarded by `quest.version`.
    async fn update_quest(&self, quest: &Quest) -> Result<Quest, QuestlogError>;
}

/// Stores that can commit a quest completion and its XP reward as one unit.
#[async_trait]
pub trait ProgressionStore: CharacterStore + QuestStore {
    /// Persists the completed `quest` and the rewarded `character` atomically.
    /// Both versions are checked; on any failure neither record changes.
    async fn commit_quest_completion(
        &self,
        quest: &Quest,
        character: &Character,
    ) -> Result<(Quest, Character), QuestlogError>;
}

#[async_trait]
pub trait JournalStore: Send + Sync {
    async fn get_entry(&self, id: &str) -> Result<Option<JournalEntry>, QuestlogError>;

    /// Inserts or replaces the entry with the same id.
    async fn save_entry(&self, entry: &JournalEntry) -> Result<(), QuestlogError>;
}
