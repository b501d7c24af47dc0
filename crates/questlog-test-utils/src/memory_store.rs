// SPDX-FileCopyrightText: 2026 Questlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory store with the same version-guard semantics as SQLite.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::Mutex;

use questlog_core::types::now_timestamp;
use questlog_core::{
    Character, CharacterStore, JournalEntry, JournalStore, ProgressionStore, Quest, QuestStore,
    QuestlogError,
};

/// Operations that can be told to fail with a storage error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailPoint {
    CreateCharacter,
    UpdateCharacter,
    CreateQuest,
    UpdateQuest,
    CommitCompletion,
    SaveEntry,
    Reads,
}

#[derive(Default)]
struct State {
    characters: HashMap<String, Character>,
    quests: Vec<Quest>,
    entries: HashMap<String, JournalEntry>,
    failing: HashSet<FailPoint>,
}

impl State {
    fn check(&self, point: FailPoint) -> Result<(), QuestlogError> {
        if self.failing.contains(&point) {
            Err(QuestlogError::storage(format!("injected failure: {point:?}")))
        } else {
            Ok(())
        }
    }

    fn guard_character(&self, c: &Character) -> Result<(), QuestlogError> {
        match self.characters.get(&c.id) {
            None => Err(QuestlogError::not_found("character", &c.id)),
            Some(stored) if stored.version != c.version => {
                Err(QuestlogError::conflict("character", &c.id))
            }
            Some(_) => Ok(()),
        }
    }

    fn guard_quest(&self, q: &Quest) -> Result<usize, QuestlogError> {
        match self.quests.iter().position(|s| s.id == q.id) {
            None => Err(QuestlogError::not_found("quest", &q.id)),
            Some(i) if self.quests[i].version != q.version => {
                Err(QuestlogError::conflict("quest", &q.id))
            }
            Some(i) => Ok(i),
        }
    }
}

/// Thread-safe in-memory store implementing every store trait.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `point` fail until [`MemoryStore::heal`] is called.
    pub async fn fail(&self, point: FailPoint) {
        self.state.lock().await.failing.insert(point);
    }

    pub async fn heal(&self, point: FailPoint) {
        self.state.lock().await.failing.remove(&point);
    }

    /// Insert a record directly, bypassing failure points and uniqueness.
    pub async fn seed_character(&self, character: Character) {
        self.state
            .lock()
            .await
            .characters
            .insert(character.id.clone(), character);
    }

    pub async fn seed_quest(&self, quest: Quest) {
        self.state.lock().await.quests.push(quest);
    }

    pub async fn entry_count(&self) -> usize {
        self.state.lock().await.entries.len()
    }
}

fn bump_character(c: &Character, now: &str) -> Character {
    Character {
        version: c.version + 1,
        updated_at: now.to_string(),
        ..c.clone()
    }
}

fn bump_quest(q: &Quest, now: &str) -> Quest {
    Quest {
        version: q.version + 1,
        updated_at: now.to_string(),
        ..q.clone()
    }
}

#[async_trait]
impl CharacterStore for MemoryStore {
    async fn create_character(&self, character: &Character) -> Result<(), QuestlogError> {
        let mut state = self.state.lock().await;
        state.check(FailPoint::CreateCharacter)?;
        if state
            .characters
            .values()
            .any(|c| c.user_id == character.user_id || c.id == character.id)
        {
            return Err(QuestlogError::validation(
                "user_id",
                "user already has a character",
            ));
        }
        state
            .characters
            .insert(character.id.clone(), character.clone());
        Ok(())
    }

    async fn get_character(&self, id: &str) -> Result<Option<Character>, QuestlogError> {
        let state = self.state.lock().await;
        state.check(FailPoint::Reads)?;
        Ok(state.characters.get(id).cloned())
    }

    async fn get_character_by_user(
        &self,
        user_id: &str,
    ) -> Result<Option<Character>, QuestlogError> {
        let state = self.state.lock().await;
        state.check(FailPoint::Reads)?;
        Ok(state
            .characters
            .values()
            .find(|c| c.user_id == user_id)
            .cloned())
    }

    async fn update_character(&self, character: &Character) -> Result<Character, QuestlogError> {
        let mut state = self.state.lock().await;
        state.check(FailPoint::UpdateCharacter)?;
        state.guard_character(character)?;
        let saved = bump_character(character, &now_timestamp());
        state.characters.insert(saved.id.clone(), saved.clone());
        Ok(saved)
    }
}

#[async_trait]
impl QuestStore for MemoryStore {
    async fn create_quest(&self, quest: &Quest) -> Result<(), QuestlogError> {
        let mut state = self.state.lock().await;
        state.check(FailPoint::CreateQuest)?;
        state.quests.push(quest.clone());
        Ok(())
    }

    async fn get_quest(&self, id: &str) -> Result<Option<Quest>, QuestlogError> {
        let state = self.state.lock().await;
        state.check(FailPoint::Reads)?;
        Ok(state.quests.iter().find(|q| q.id == id).cloned())
    }

    /// Newest first, matching the SQLite store.
    async fn list_quests_for_user(&self, user_id: &str) -> Result<Vec<Quest>, QuestlogError> {
        let state = self.state.lock().await;
        state.check(FailPoint::Reads)?;
        Ok(state
            .quests
            .iter()
            .rev()
            .filter(|q| q.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn update_quest(&self, quest: &Quest) -> Result<Quest, QuestlogError> {
        let mut state = self.state.lock().await;
        state.check(FailPoint::UpdateQuest)?;
        let index = state.guard_quest(quest)?;
        let saved = bump_quest(quest, &now_timestamp());
        state.quests[index] = saved.clone();
        Ok(saved)
    }
}

#[async_trait]
impl ProgressionStore for MemoryStore {
    async fn commit_quest_completion(
        &self,
        quest: &Quest,
        character: &Character,
    ) -> Result<(Quest, Character), QuestlogError> {
        let mut state = self.state.lock().await;
        state.check(FailPoint::CommitCompletion)?;
        // Validate both before touching either.
        let index = state.guard_quest(quest)?;
        state.guard_character(character)?;

        let now = now_timestamp();
        let saved_quest = bump_quest(quest, &now);
        let saved_character = bump_character(character, &now);
        state.quests[index] = saved_quest.clone();
        state
            .characters
            .insert(saved_character.id.clone(), saved_character.clone());
        Ok((saved_quest, saved_character))
    }
}

#[async_trait]
impl JournalStore for MemoryStore {
    async fn get_entry(&self, id: &str) -> Result<Option<JournalEntry>, QuestlogError> {
        let state = self.state.lock().await;
        state.check(FailPoint::Reads)?;
        Ok(state.entries.get(id).cloned())
    }

    async fn save_entry(&self, entry: &JournalEntry) -> Result<(), QuestlogError> {
        let mut state = self.state.lock().await;
        state.check(FailPoint::SaveEntry)?;
        let mut saved = entry.clone();
        if let Some(existing) = state.entries.get(&entry.id) {
            saved.created_at = existing.created_at.clone();
        }
        state.entries.insert(saved.id.clone(), saved);
        Ok(())
    }
}
