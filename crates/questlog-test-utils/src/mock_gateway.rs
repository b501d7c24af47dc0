// SPDX-FileCopyrightText: 2026 Questlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock text-analysis gateway for dispatcher and trigger tests.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{Mutex, Notify};

use questlog_core::{AnalysisAck, AnalysisGateway, AnalysisKind, AnalysisRequest, QuestlogError};

/// Records every submission. Kinds marked with [`MockGateway::fail_kind`]
/// return a gateway error; an optional delay simulates slow inference.
#[derive(Default)]
pub struct MockGateway {
    calls: Mutex<Vec<(AnalysisKind, AnalysisRequest)>>,
    failing: Mutex<HashSet<AnalysisKind>>,
    delay: Mutex<Option<Duration>>,
    notify: Notify,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn fail_kind(&self, kind: AnalysisKind) {
        self.failing.lock().await.insert(kind);
    }

    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.lock().await = Some(delay);
    }

    pub async fn calls(&self) -> Vec<(AnalysisKind, AnalysisRequest)> {
        self.calls.lock().await.clone()
    }

    pub async fn calls_of(&self, kind: AnalysisKind) -> usize {
        self.calls
            .lock()
            .await
            .iter()
            .filter(|(k, _)| *k == kind)
            .count()
    }

    /// Wait until at least `count` submissions were recorded. Returns `false`
    /// if `timeout` elapses first.
    pub async fn wait_for_calls(&self, count: usize, timeout: Duration) -> bool {
        tokio::time::timeout(timeout, async {
            loop {
                let notified = self.notify.notified();
                if self.calls.lock().await.len() >= count {
                    return;
                }
                notified.await;
            }
        })
        .await
        .is_ok()
    }
}

#[async_trait]
impl AnalysisGateway for MockGateway {
    async fn submit(
        &self,
        kind: AnalysisKind,
        request: &AnalysisRequest,
    ) -> Result<AnalysisAck, QuestlogError> {
        let delay = *self.delay.lock().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        self.calls.lock().await.push((kind, request.clone()));
        self.notify.notify_waiters();

        if self.failing.lock().await.contains(&kind) {
            return Err(QuestlogError::Gateway {
                message: format!("mock {kind} analysis failed"),
                source: None,
            });
        }
        Ok(AnalysisAck {
            kind,
            status: 200,
            body: None,
        })
    }
}
