// SPDX-FileCopyrightText: 2026 Questlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain records persisted by the stores and passed across crate boundaries.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Generate a fresh record identifier.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Current time as an RFC 3339 string with millisecond precision.
pub fn now_timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

/// Character class. Closed set, validated when a character is created.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(ascii_case_insensitive)]
pub enum CharacterClass {
    Warrior,
    Mage,
    Rogue,
}

/// The four base stats of a character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attributes {
    pub strength: i64,
    pub defense: i64,
    pub vitality: i64,
    pub mana: i64,
}

impl Attributes {
    /// All four stats set to the same value.
    pub fn uniform(value: i64) -> Self {
        Self {
            strength: value,
            defense: value,
            vitality: value,
            mana: value,
        }
    }

    pub fn total(&self) -> i64 {
        self.strength + self.defense + self.vitality + self.mana
    }
}

/// Requested attribute-point distribution. Missing fields mean zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeSpend {
    #[serde(default)]
    pub strength: i64,
    #[serde(default)]
    pub defense: i64,
    #[serde(default)]
    pub vitality: i64,
    #[serde(default)]
    pub mana: i64,
}

impl AttributeSpend {
    /// Sum of all four deltas. Saturates instead of overflowing.
    pub fn total(&self) -> i64 {
        self.strength
            .saturating_add(self.defense)
            .saturating_add(self.vitality)
            .saturating_add(self.mana)
    }

    /// Name and value of each delta, in declaration order.
    pub fn fields(&self) -> [(&'static str, i64); 4] {
        [
            ("strength", self.strength),
            ("defense", self.defense),
            ("vitality", self.vitality),
            ("mana", self.mana),
        ]
    }
}

/// A user's persistent progression record.
///
/// `xp` is relative to the current level. `version` is bumped by the store on
/// every successful save and checked on the next one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub class: CharacterClass,
    pub avatar_url: Option<String>,
    pub level: u32,
    pub xp: i64,
    pub attribute_points: i64,
    pub attributes: Attributes,
    pub version: i64,
    pub created_at: String,
    pub updated_at: String,
}

/// Quest lifecycle state. `InProgress -> Completed` is the only transition.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum QuestStatus {
    InProgress,
    Completed,
}

/// A reward-bearing task owned by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quest {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub description: String,
    pub xp_reward: i64,
    pub status: QuestStatus,
    pub version: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl Quest {
    pub fn is_completed(&self) -> bool {
        self.status == QuestStatus::Completed
    }
}

/// A journal entry, as far as the progression pipeline needs to know it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub content: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Which gateway analysis a background job requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AnalysisKind {
    /// Decide an XP award for the entry text.
    Xp,
    /// Suggest, update, or complete quests from the entry text.
    Quests,
}

/// Payload sent to the text-analysis gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub entry_text: String,
    pub user_id: String,
}

/// Acknowledgement returned by the gateway. The substantive outcome arrives
/// later as a callback into the progression or quest routes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisAck {
    pub kind: AnalysisKind,
    pub status: u16,
    pub body: Option<serde_json::Value>,
}
