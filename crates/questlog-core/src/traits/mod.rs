// SPDX-FileCopyrightText: 2026 Questlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Seams between the engines and their external collaborators.
//!
//! All traits use `#[async_trait]` so they can be held as trait objects.

pub mod analysis;
pub mod store;

pub use analysis::AnalysisGateway;
pub use store::{CharacterStore, JournalStore, ProgressionStore, QuestStore};
