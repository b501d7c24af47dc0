// SPDX-FileCopyrightText: 2026 Questlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Journal entry edits. Saves first, then fires the trigger.

use std::sync::Arc;

use tracing::debug;

use questlog_core::types::now_timestamp;
use questlog_core::{JournalEntry, JournalStore, QuestlogError};

use crate::trigger::JournalTrigger;

#[derive(Clone)]
pub struct JournalService {
    store: Arc<dyn JournalStore>,
    trigger: JournalTrigger,
}

impl JournalService {
    pub fn new(store: Arc<dyn JournalStore>, trigger: JournalTrigger) -> Self {
        Self { store, trigger }
    }

    pub async fn get_entry(&self, id: &str) -> Result<JournalEntry, QuestlogError> {
        self.store
            .get_entry(id)
            .await?
            .ok_or_else(|| QuestlogError::not_found("entry", id))
    }

    /// Create or partially update an entry owned by `user_id`.
    ///
    /// An entry owned by someone else is reported as not found. Analysis is
    /// scheduled only after the save succeeds, and only when `content` was
    /// provided.
    pub async fn update_entry(
        &self,
        entry_id: &str,
        user_id: &str,
        title: Option<String>,
        content: Option<String>,
    ) -> Result<JournalEntry, QuestlogError> {
        if entry_id.trim().is_empty() {
            return Err(QuestlogError::validation("entry_id", "must not be empty"));
        }
        let user_id = user_id.trim();
        if user_id.is_empty() {
            return Err(QuestlogError::validation("user_id", "must not be empty"));
        }

        let now = now_timestamp();
        let mut entry = match self.store.get_entry(entry_id).await? {
            Some(existing) if existing.user_id != user_id => {
                return Err(QuestlogError::not_found("entry", entry_id));
            }
            Some(existing) => existing,
            None => JournalEntry {
                id: entry_id.to_string(),
                user_id: user_id.to_string(),
                title: String::new(),
                content: String::new(),
                created_at: now.clone(),
                updated_at: now.clone(),
            },
        };

        if let Some(title) = title {
            entry.title = title;
        }
        let content_changed = content.is_some();
        if let Some(content) = content {
            entry.content = content;
        }
        entry.updated_at = now;

        self.store.save_entry(&entry).await?;
        debug!(entry_id = %entry.id, user_id = %entry.user_id, "entry saved");

        if content_changed {
            self.trigger
                .on_entry_updated(&entry.id, &entry.content, &entry.user_id);
        }
        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use questlog_config::DispatchConfig;
    use questlog_core::AnalysisKind;
    use questlog_test_utils::{FailPoint, MemoryStore, MockGateway};

    use crate::dispatch::Dispatcher;

    struct Fixture {
        store: Arc<MemoryStore>,
        gateway: Arc<MockGateway>,
        dispatcher: Arc<Dispatcher>,
        service: JournalService,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let gateway = Arc::new(MockGateway::new());
        let dispatcher = Arc::new(Dispatcher::start(
            gateway.clone(),
            &DispatchConfig::default(),
            Duration::from_secs(1),
        ));
        let service = JournalService::new(store.clone(), JournalTrigger::new(dispatcher.clone()));
        Fixture {
            store,
            gateway,
            dispatcher,
            service,
        }
    }

    #[tokio::test]
    async fn first_update_creates_entry_and_dispatches() {
        let f = fixture();
        let entry = f
            .service
            .update_entry("e1", "user-1", Some("Day 1".into()), Some("Slept well".into()))
            .await
            .unwrap();
        assert_eq!(entry.title, "Day 1");
        assert_eq!(f.service.get_entry("e1").await.unwrap(), entry);

        assert!(f.gateway.wait_for_calls(2, Duration::from_secs(2)).await);
        assert_eq!(f.gateway.calls_of(AnalysisKind::Xp).await, 1);
        assert_eq!(f.gateway.calls_of(AnalysisKind::Quests).await, 1);
    }

    #[tokio::test]
    async fn title_only_update_does_not_dispatch() {
        let f = fixture();
        f.service
            .update_entry("e1", "user-1", Some("Untitled".into()), None)
            .await
            .unwrap();
        let updated = f
            .service
            .update_entry("e1", "user-1", Some("Renamed".into()), None)
            .await
            .unwrap();
        assert_eq!(updated.title, "Renamed");
        assert_eq!(f.dispatcher.stats().submitted, 0);
    }

    #[tokio::test]
    async fn partial_update_keeps_other_fields() {
        let f = fixture();
        f.service
            .update_entry("e1", "user-1", Some("Title".into()), Some("one".into()))
            .await
            .unwrap();
        let updated = f
            .service
            .update_entry("e1", "user-1", None, Some("two".into()))
            .await
            .unwrap();
        assert_eq!(updated.title, "Title");
        assert_eq!(updated.content, "two");
    }

    #[tokio::test]
    async fn store_failure_means_no_dispatch() {
        let f = fixture();
        f.store.fail(FailPoint::SaveEntry).await;
        let err = f
            .service
            .update_entry("e1", "user-1", None, Some("lost".into()))
            .await
            .unwrap_err();
        assert!(matches!(err, QuestlogError::Storage { .. }));
        assert_eq!(f.dispatcher.stats().submitted, 0);
        assert_eq!(f.store.entry_count().await, 0);
    }

    #[tokio::test]
    async fn other_users_entry_is_not_found() {
        let f = fixture();
        f.service
            .update_entry("e1", "owner", None, Some("mine".into()))
            .await
            .unwrap();
        let err = f
            .service
            .update_entry("e1", "intruder", None, Some("yours".into()))
            .await
            .unwrap_err();
        assert!(matches!(err, QuestlogError::NotFound { .. }));
        assert_eq!(f.service.get_entry("e1").await.unwrap().content, "mine");
    }

    #[tokio::test]
    async fn missing_entry_is_not_found() {
        let f = fixture();
        assert!(matches!(
            f.service.get_entry("nope").await,
            Err(QuestlogError::NotFound { .. })
        ));
    }
}
