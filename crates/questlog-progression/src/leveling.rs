// SPDX-FileCopyrightText: 2026 Questlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Leveling math: XP thresholds, level-ups, and attribute-point grants.

use questlog_config::ProgressionConfig;
use questlog_core::{Attributes, Character};
use serde::Serialize;

/// Constants driving character progression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LevelingRules {
    /// Starting value of each of the four attributes.
    pub base_attribute: i64,
    /// Unspent points a new character starts with.
    pub starting_points: i64,
    /// Points granted per level gained.
    pub points_per_level: i64,
    /// Threshold multiplier: leaving level L costs `xp_per_level * L`.
    pub xp_per_level: i64,
    pub max_level: u32,
}

impl Default for LevelingRules {
    fn default() -> Self {
        Self {
            base_attribute: 10,
            starting_points: 5,
            points_per_level: 5,
            xp_per_level: 100,
            max_level: 100,
        }
    }
}

impl From<&ProgressionConfig> for LevelingRules {
    fn from(config: &ProgressionConfig) -> Self {
        Self {
            base_attribute: config.base_attribute,
            starting_points: config.starting_points,
            points_per_level: config.points_per_level,
            xp_per_level: config.xp_per_level,
            max_level: config.max_level,
        }
    }
}

impl LevelingRules {
    /// XP needed to advance from `level` to `level + 1`.
    pub fn threshold(&self, level: u32) -> i64 {
        self.xp_per_level.saturating_mul(i64::from(level))
    }

    pub fn starting_attributes(&self) -> Attributes {
        Attributes::uniform(self.base_attribute)
    }

    /// Add `amount` XP to `character` and normalize.
    ///
    /// Non-positive amounts leave the character untouched. At `max_level`
    /// the loop stops and any surplus XP stays on the character.
    /// Returns the number of levels gained.
    pub fn apply_xp(&self, character: &mut Character, amount: i64) -> u32 {
        if amount <= 0 {
            return 0;
        }
        character.xp = character.xp.saturating_add(amount);

        let mut gained = 0;
        while character.level < self.max_level {
            let needed = self.threshold(character.level);
            if character.xp < needed {
                break;
            }
            character.xp -= needed;
            character.level += 1;
            character.attribute_points =
                character.attribute_points.saturating_add(self.points_per_level);
            gained += 1;
        }
        gained
    }
}
