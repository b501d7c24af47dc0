// SPDX-FileCopyrightText: 2026 Questlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Journal Update Trigger: turns a saved entry edit into two independent
//! gateway jobs.

use std::sync::Arc;

use tracing::debug;

use questlog_core::{AnalysisKind, AnalysisRequest};

use crate::dispatch::{AnalysisJob, Dispatcher};

/// What happened to the two jobs of one edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TriggerOutcome {
    pub xp_queued: bool,
    pub quests_queued: bool,
}

#[derive(Clone)]
pub struct JournalTrigger {
    dispatcher: Arc<Dispatcher>,
}

impl JournalTrigger {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }

    /// Schedule XP and quest analysis for a durably saved entry.
    ///
    /// Returns immediately. The two jobs are queued separately, so losing one
    /// (queue full) does not affect the other. Blank content schedules nothing.
    pub fn on_entry_updated(&self, entry_id: &str, content: &str, user_id: &str) -> TriggerOutcome {
        if content.trim().is_empty() {
            debug!(entry_id, "blank entry content, skipping analysis");
            return TriggerOutcome::default();
        }

        let request = AnalysisRequest {
            entry_text: content.to_string(),
            user_id: user_id.to_string(),
        };
        let queue = |kind| {
            self.dispatcher.enqueue(AnalysisJob {
                kind,
                entry_id: entry_id.to_string(),
                request: request.clone(),
            })
        };
        TriggerOutcome {
            xp_queued: queue(AnalysisKind::Xp),
            quests_queued: queue(AnalysisKind::Quests),
        }
    }
}
