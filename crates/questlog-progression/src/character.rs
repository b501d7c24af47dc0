// SPDX-FileCopyrightText: 2026 Questlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Character Progression Engine.
//!
//! Stateless: every operation loads from the store, mutates a copy, and saves
//! it back through a version-guarded update.

use std::str::FromStr;
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use questlog_core::types::{new_id, now_timestamp};
use questlog_core::{AttributeSpend, Character, CharacterClass, CharacterStore, QuestlogError};

use crate::leveling::LevelingRules;

/// Outcome of a successful XP grant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct XpGrant {
    pub character: Character,
    pub leveled_up: bool,
    pub levels_gained: u32,
}

/// Failure modes of [`ProgressionEngine::grant_xp`].
#[derive(Debug, Error)]
pub enum GrantXpError {
    /// Failed before anything was mutated (missing character, read error).
    #[error(transparent)]
    Rejected(#[from] QuestlogError),

    /// The grant was computed but the save failed. `character` is the unsaved
    /// result, kept for diagnostics.
    #[error("xp grant for character {} was not persisted: {source}", .character.id)]
    NotPersisted {
        character: Box<Character>,
        leveled_up: bool,
        source: QuestlogError,
    },
}

impl From<GrantXpError> for QuestlogError {
    fn from(err: GrantXpError) -> Self {
        match err {
            GrantXpError::Rejected(e) => e,
            GrantXpError::NotPersisted { source, .. } => source,
        }
    }
}

/// Owns leveling, XP grants, and attribute spending.
#[derive(Clone)]
pub struct ProgressionEngine {
    store: Arc<dyn CharacterStore>,
    rules: LevelingRules,
}

impl ProgressionEngine {
    pub fn new(store: Arc<dyn CharacterStore>, rules: LevelingRules) -> Self {
        Self { store, rules }
    }

    pub fn rules(&self) -> &LevelingRules {
        &self.rules
    }

    /// Create the single character a user may own.
    pub async fn create_character(
        &self,
        user_id: &str,
        name: &str,
        class: &str,
        avatar_url: Option<&str>,
    ) -> Result<Character, QuestlogError> {
        let user_id = user_id.trim();
        if user_id.is_empty() {
            return Err(QuestlogError::validation("user_id", "must not be empty"));
        }
        let name = name.trim();
        if name.is_empty() {
            return Err(QuestlogError::validation("name", "must not be empty"));
        }
        let class = CharacterClass::from_str(class.trim()).map_err(|_| {
            QuestlogError::validation("class", format!("unknown class `{class}`"))
        })?;
        if self.store.get_character_by_user(user_id).await?.is_some() {
            return Err(QuestlogError::validation(
                "user_id",
                "user already has a character",
            ));
        }

        let now = now_timestamp();
        let character = Character {
            id: new_id(),
            user_id: user_id.to_string(),
            name: name.to_string(),
            class,
            avatar_url: avatar_url
                .map(str::trim)
                .filter(|url| !url.is_empty())
                .map(str::to_string),
            level: 1,
            xp: 0,
            attribute_points: self.rules.starting_points,
            attributes: self.rules.starting_attributes(),
            version: 1,
            created_at: now.clone(),
            updated_at: now,
        };
        self.store.create_character(&character).await?;
        info!(
            character_id = %character.id,
            user_id = %character.user_id,
            class = %character.class,
            "character created"
        );
        Ok(character)
    }

    pub async fn get_character(&self, id: &str) -> Result<Character, QuestlogError> {
        self.store
            .get_character(id)
            .await?
            .ok_or_else(|| QuestlogError::not_found("character", id))
    }

    pub async fn get_character_by_user(&self, user_id: &str) -> Result<Character, QuestlogError> {
        self.store
            .get_character_by_user(user_id)
            .await?
            .ok_or_else(|| QuestlogError::not_found("character for user", user_id))
    }

    /// Grant `amount` XP. A non-positive amount is a no-op that still
    /// requires the character to exist.
    pub async fn grant_xp(&self, character_id: &str, amount: i64) -> Result<XpGrant, GrantXpError> {
        let character = self.get_character(character_id).await?;
        self.grant_loaded(character, amount).await
    }

    /// Resolve the user's character, then grant XP to it.
    pub async fn grant_xp_to_user(
        &self,
        user_id: &str,
        amount: i64,
    ) -> Result<XpGrant, GrantXpError> {
        let character = self.get_character_by_user(user_id).await?;
        self.grant_loaded(character, amount).await
    }

    async fn grant_loaded(
        &self,
        mut character: Character,
        amount: i64,
    ) -> Result<XpGrant, GrantXpError> {
        if amount <= 0 {
            debug!(character_id = %character.id, amount, "ignoring non-positive xp grant");
            return Ok(XpGrant {
                character,
                leveled_up: false,
                levels_gained: 0,
            });
        }

        let from_level = character.level;
        let levels_gained = self.rules.apply_xp(&mut character, amount);
        let leveled_up = levels_gained > 0;

        let saved = match self.store.update_character(&character).await {
            Ok(saved) => saved,
            Err(source) => {
                warn!(
                    character_id = %character.id,
                    amount,
                    error = %source,
                    "xp grant not persisted"
                );
                return Err(GrantXpError::NotPersisted {
                    character: Box::new(character),
                    leveled_up,
                    source,
                });
            }
        };

        if leveled_up {
            info!(
                character_id = %saved.id,
                from_level,
                to_level = saved.level,
                "character leveled up"
            );
        }
        debug!(character_id = %saved.id, amount, xp = saved.xp, "xp granted");
        Ok(XpGrant {
            character: saved,
            leveled_up,
            levels_gained,
        })
    }

    /// Distribute unspent attribute points. All deltas must be non-negative
    /// and their sum must not exceed the unspent balance.
    pub async fn spend_attribute_points(
        &self,
        character_id: &str,
        spend: AttributeSpend,
    ) -> Result<Character, QuestlogError> {
        for (field, delta) in spend.fields() {
            if delta < 0 {
                return Err(QuestlogError::validation(
                    field,
                    format!("cannot spend a negative amount ({delta})"),
                ));
            }
        }

        let mut character = self.get_character(character_id).await?;
        let total = spend.total();
        if total == 0 {
            return Ok(character);
        }
        if total > character.attribute_points {
            return Err(QuestlogError::validation(
                "attribute_points",
                format!(
                    "insufficient points: requested {total}, available {}",
                    character.attribute_points
                ),
            ));
        }

        let attrs = &mut character.attributes;
        attrs.strength += spend.strength;
        attrs.defense += spend.defense;
        attrs.vitality += spend.vitality;
        attrs.mana += spend.mana;
        character.attribute_points -= total;

        let saved = self.store.update_character(&character).await?;
        info!(
            character_id = %saved.id,
            spent = total,
            remaining = saved.attribute_points,
            "attribute points spent"
        );
        Ok(saved)
    }
}
