// SPDX-FileCopyrightText: 2026 Questlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for Questlog.
//!
//! Holds the domain records (characters, quests, journal entries), the shared
//! error type, and the traits the engines use to reach their stores and the
//! text-analysis gateway. Every other crate in the workspace depends on this one.

pub mod error;
pub mod traits;
pub mod types;

pub use error::{ErrorKind, QuestlogError};
pub use traits::{AnalysisGateway, CharacterStore, JournalStore, ProgressionStore, QuestStore};
pub use types::{
    AnalysisAck, AnalysisKind, AnalysisRequest, AttributeSpend, Attributes, Character,
    CharacterClass, JournalEntry, Quest, QuestStatus,
};
