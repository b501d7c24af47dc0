// SPDX-FileCopyrightText: 2026 Questlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Journal entries and the content-to-progression pipeline.
//!
//! [`JournalService`] saves an edit, then hands it to [`JournalTrigger`],
//! which queues XP and quest analysis on the [`Dispatcher`]. The edit never
//! waits on the gateway.

pub mod dispatch;
pub mod service;
pub mod trigger;

pub use dispatch::{AnalysisJob, DispatchStats, Dispatcher};
pub use service::JournalService;
pub use trigger::{JournalTrigger, TriggerOutcome};
