// SPDX-FileCopyrightText: 2026 Questlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Quest Engine: creation, partial updates, and completion with XP reward.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, info, warn};

use questlog_core::types::{new_id, now_timestamp};
use questlog_core::{ProgressionStore, Quest, QuestStatus, QuestlogError};

use crate::leveling::LevelingRules;

/// Partial update. `None` leaves the field as is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct QuestUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Drives the `in_progress -> completed` lifecycle.
#[derive(Clone)]
pub struct QuestEngine {
    store: Arc<dyn ProgressionStore>,
    rules: LevelingRules,
}

impl QuestEngine {
    /// `rules` must be the same value the progression engine uses so that
    /// quest rewards level characters identically to direct grants.
    pub fn new(store: Arc<dyn ProgressionStore>, rules: LevelingRules) -> Self {
        Self { store, rules }
    }

    pub async fn create_quest(
        &self,
        user_id: &str,
        title: &str,
        description: &str,
        xp_reward: i64,
    ) -> Result<Quest, QuestlogError> {
        let user_id = user_id.trim();
        if user_id.is_empty() {
            return Err(QuestlogError::validation("user_id", "must not be empty"));
        }
        let title = title.trim();
        if title.is_empty() {
            return Err(QuestlogError::validation("title", "must not be empty"));
        }
        if xp_reward < 0 {
            return Err(QuestlogError::validation(
                "xp_reward",
                format!("must be non-negative, got {xp_reward}"),
            ));
        }

        let now = now_timestamp();
        let quest = Quest {
            id: new_id(),
            user_id: user_id.to_string(),
            title: title.to_string(),
            description: description.trim().to_string(),
            xp_reward,
            status: QuestStatus::InProgress,
            version: 1,
            created_at: now.clone(),
            updated_at: now,
        };
        self.store.create_quest(&quest).await?;
        info!(quest_id = %quest.id, user_id = %quest.user_id, xp_reward, "quest created");
        Ok(quest)
    }

    pub async fn get_quest(&self, id: &str) -> Result<Quest, QuestlogError> {
        self.store
            .get_quest(id)
            .await?
            .ok_or_else(|| QuestlogError::not_found("quest", id))
    }

    /// Every quest owned by `user_id`, newest first.
    pub async fn get_user_quests(&self, user_id: &str) -> Result<Vec<Quest>, QuestlogError> {
        self.store.list_quests_for_user(user_id).await
    }

    pub async fn update_quest(
        &self,
        id: &str,
        update: QuestUpdate,
    ) -> Result<Quest, QuestlogError> {
        let mut quest = self.get_quest(id).await?;

        if let Some(title) = update.title {
            let title = title.trim();
            if title.is_empty() {
                return Err(QuestlogError::validation("title", "must not be empty"));
            }
            quest.title = title.to_string();
        }
        if let Some(description) = update.description {
            quest.description = description.trim().to_string();
        }

        let saved = self.store.update_quest(&quest).await?;
        debug!(quest_id = %saved.id, "quest updated");
        Ok(saved)
    }

    /// Complete a quest and grant its reward to the owner's character.
    ///
    /// Completing an already-completed quest returns it unchanged. The status
    /// change and the XP grant are committed together or not at all.
    pub async fn complete_quest(&self, id: &str) -> Result<Quest, QuestlogError> {
        let mut quest = self.get_quest(id).await?;
        if quest.is_completed() {
            debug!(quest_id = %quest.id, "quest already completed");
            return Ok(quest);
        }

        let mut character = self
            .store
            .get_character_by_user(&quest.user_id)
            .await?
            .ok_or_else(|| QuestlogError::not_found("character for user", &quest.user_id))?;
        let from_level = character.level;
        let levels_gained = self.rules.apply_xp(&mut character, quest.xp_reward);
        quest.status = QuestStatus::Completed;

        let (saved_quest, saved_character) =
            match self.store.commit_quest_completion(&quest, &character).await {
                Ok(saved) => saved,
                Err(QuestlogError::Conflict { entity, id: conflict_id }) => {
                    // A concurrent completion of the same quest won the race.
                    let current = self.get_quest(id).await?;
                    if current.is_completed() {
                        debug!(quest_id = %current.id, "quest completed concurrently");
                        return Ok(current);
                    }
                    warn!(quest_id = %quest.id, entity, "quest completion lost a version race");
                    return Err(QuestlogError::Conflict {
                        entity,
                        id: conflict_id,
                    });
                }
                Err(e) => {
                    warn!(quest_id = %quest.id, error = %e, "quest completion not committed");
                    return Err(e);
                }
            };

        info!(
            quest_id = %saved_quest.id,
            character_id = %saved_character.id,
            xp_reward = saved_quest.xp_reward,
            "quest completed"
        );
        if levels_gained > 0 {
            info!(
                character_id = %saved_character.id,
                from_level,
                to_level = saved_character.level,
                "character leveled up"
            );
        }
        Ok(saved_quest)
    }
}
