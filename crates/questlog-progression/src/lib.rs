// SPDX-FileCopyrightText: 2026 Questlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Character progression and quest lifecycle.
//!
//! [`LevelingRules`] holds the pure leveling math. [`ProgressionEngine`] and
//! [`QuestEngine`] apply it through the stores, which stay the single source
//! of truth; neither engine caches state.

pub mod character;
pub mod leveling;
pub mod quest;

pub use character::{GrantXpError, ProgressionEngine, XpGrant};
pub use leveling::LevelingRules;
pub use quest::{QuestEngine, QuestUpdate};
