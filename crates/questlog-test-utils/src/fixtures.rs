// SPDX-FileCopyrightText: 2026 Questlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Record builders with sensible defaults.

use questlog_core::types::{new_id, now_timestamp};
use questlog_core::{Attributes, Character, CharacterClass, Quest, QuestStatus};

/// A fresh level-1 character: 0 XP, 5 points, every attribute at 10.
pub fn character(user_id: &str) -> Character {
    let now = now_timestamp();
    Character {
        id: new_id(),
        user_id: user_id.to_string(),
        name: "Tester".to_string(),
        class: CharacterClass::Warrior,
        avatar_url: None,
        level: 1,
        xp: 0,
        attribute_points: 5,
        attributes: Attributes::uniform(10),
        version: 1,
        created_at: now.clone(),
        updated_at: now,
    }
}

/// An in-progress quest.
pub fn quest(user_id: &str, xp_reward: i64) -> Quest {
    let now = now_timestamp();
    Quest {
        id: new_id(),
        user_id: user_id.to_string(),
        title: "Write three entries".to_string(),
        description: "Keep the streak going".to_string(),
        xp_reward,
        status: QuestStatus::InProgress,
        version: 1,
        created_at: now.clone(),
        updated_at: now,
    }
}
