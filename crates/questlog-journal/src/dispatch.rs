// SPDX-FileCopyrightText: 2026 Questlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bounded background queue for gateway submissions.
//!
//! A fixed pool of workers drains an mpsc queue. Enqueueing never waits: when
//! the queue is full the job is dropped and counted. Each job gets its own
//! timeout, failures are logged and counted, and nothing is retried.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::Serialize;
use tokio::sync::{Mutex, mpsc};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{Instrument, debug, info, warn};

use questlog_config::DispatchConfig;
use questlog_core::{AnalysisGateway, AnalysisKind, AnalysisRequest};

/// One gateway submission.
#[derive(Debug, Clone)]
pub struct AnalysisJob {
    pub kind: AnalysisKind,
    pub entry_id: String,
    pub request: AnalysisRequest,
}

/// Snapshot of the dispatcher counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DispatchStats {
    /// Accepted into the queue.
    pub submitted: u64,
    pub succeeded: u64,
    /// Gateway error or timeout.
    pub failed: u64,
    /// Rejected because the queue was full or closed.
    pub dropped: u64,
}

impl DispatchStats {
    /// Jobs that reached a terminal outcome.
    pub fn finished(&self) -> u64 {
        self.succeeded + self.failed
    }
}

#[derive(Default)]
struct Counters {
    submitted: AtomicU64,
    succeeded: AtomicU64,
    failed: AtomicU64,
    dropped: AtomicU64,
}

impl Counters {
    fn snapshot(&self) -> DispatchStats {
        DispatchStats {
            submitted: self.submitted.load(Ordering::Relaxed),
            succeeded: self.succeeded.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
        }
    }
}

/// Handle to the worker pool. Cheap to share behind an `Arc`.
pub struct Dispatcher {
    tx: mpsc::Sender<AnalysisJob>,
    counters: Arc<Counters>,
    cancel: CancellationToken,
    tracker: TaskTracker,
    grace: Duration,
}

impl Dispatcher {
    /// Spawn `config.workers` workers. Must be called inside a tokio runtime.
    /// Workers inherit the caller's span.
    pub fn start(
        gateway: Arc<dyn AnalysisGateway>,
        config: &DispatchConfig,
        call_timeout: Duration,
    ) -> Self {
        let (tx, rx) = mpsc::channel(config.queue_capacity.max(1));
        let rx = Arc::new(Mutex::new(rx));
        let counters = Arc::new(Counters::default());
        let cancel = CancellationToken::new();
        let tracker = TaskTracker::new();

        let workers = config.workers.max(1);
        for worker in 0..workers {
            tracker.spawn(worker_loop(
                worker,
                rx.clone(),
                gateway.clone(),
                counters.clone(),
                cancel.clone(),
                call_timeout,
            )
            .in_current_span());
        }
        info!(
            workers,
            queue_capacity = config.queue_capacity,
            "analysis dispatcher started"
        );

        Self {
            tx,
            counters,
            cancel,
            tracker,
            grace: Duration::from_secs(config.shutdown_grace_secs),
        }
    }

    /// Queue a job without waiting. Returns `false` if it was dropped.
    pub fn enqueue(&self, job: AnalysisJob) -> bool {
        match self.tx.try_send(job) {
            Ok(()) => {
                self.counters.submitted.fetch_add(1, Ordering::Relaxed);
                true
            }
            Err(mpsc::error::TrySendError::Full(job)) => {
                self.counters.dropped.fetch_add(1, Ordering::Relaxed);
                warn!(
                    kind = %job.kind,
                    entry_id = %job.entry_id,
                    "analysis queue full, dropping job"
                );
                false
            }
            Err(mpsc::error::TrySendError::Closed(job)) => {
                self.counters.dropped.fetch_add(1, Ordering::Relaxed);
                warn!(
                    kind = %job.kind,
                    entry_id = %job.entry_id,
                    "analysis dispatcher stopped, dropping job"
                );
                false
            }
        }
    }

    pub fn stats(&self) -> DispatchStats {
        self.counters.snapshot()
    }

    /// Stop the workers and wait up to the grace period for in-flight jobs.
    /// Jobs still queued are abandoned.
    pub async fn shutdown(&self) {
        self.cancel.cancel();
        self.tracker.close();
        if tokio::time::timeout(self.grace, self.tracker.wait())
            .await
            .is_err()
        {
            warn!(grace = ?self.grace, "analysis jobs still running after grace period");
        } else {
            info!(stats = ?self.stats(), "analysis dispatcher stopped");
        }
    }
}

async fn worker_loop(
    worker: usize,
    rx: Arc<Mutex<mpsc::Receiver<AnalysisJob>>>,
    gateway: Arc<dyn AnalysisGateway>,
    counters: Arc<Counters>,
    cancel: CancellationToken,
    call_timeout: Duration,
) {
    loop {
        let job = tokio::select! {
            _ = cancel.cancelled() => break,
            job = async { rx.lock().await.recv().await } => job,
        };
        let Some(job) = job else { break };
        run_job(worker, job, gateway.as_ref(), &counters, call_timeout).await;
    }
    debug!(worker, "analysis worker exiting");
}

async fn run_job(
    worker: usize,
    job: AnalysisJob,
    gateway: &dyn AnalysisGateway,
    counters: &Counters,
    call_timeout: Duration,
) {
    match tokio::time::timeout(call_timeout, gateway.submit(job.kind, &job.request)).await {
        Ok(Ok(ack)) => {
            counters.succeeded.fetch_add(1, Ordering::Relaxed);
            debug!(
                worker,
                kind = %job.kind,
                entry_id = %job.entry_id,
                status = ack.status,
                "analysis submitted"
            );
        }
        Ok(Err(e)) => {
            counters.failed.fetch_add(1, Ordering::Relaxed);
            warn!(
                worker,
                kind = %job.kind,
                entry_id = %job.entry_id,
                error = %e,
                "analysis submission failed"
            );
        }
        Err(_) => {
            counters.failed.fetch_add(1, Ordering::Relaxed);
            warn!(
                worker,
                kind = %job.kind,
                entry_id = %job.entry_id,
                timeout = ?call_timeout,
                "analysis submission timed out"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use questlog_test_utils::MockGateway;

    fn job(kind: AnalysisKind) -> AnalysisJob {
        AnalysisJob {
            kind,
            entry_id: "entry-1".into(),
            request: AnalysisRequest {
                entry_text: "hello".into(),
                user_id: "user-1".into(),
            },
        }
    }

    fn config(workers: usize, queue_capacity: usize) -> DispatchConfig {
        DispatchConfig {
            workers,
            queue_capacity,
            shutdown_grace_secs: 1,
        }
    }

    async fn settle(dispatcher: &Dispatcher, finished: u64) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while dispatcher.stats().finished() < finished {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("jobs did not finish");
    }

    #[tokio::test]
    async fn runs_queued_jobs() {
        let gateway = Arc::new(MockGateway::new());
        let dispatcher = Dispatcher::start(gateway.clone(), &config(2, 8), Duration::from_secs(1));

        assert!(dispatcher.enqueue(job(AnalysisKind::Xp)));
        assert!(dispatcher.enqueue(job(AnalysisKind::Quests)));
        settle(&dispatcher, 2).await;

        let stats = dispatcher.stats();
        assert_eq!(stats.submitted, 2);
        assert_eq!(stats.succeeded, 2);
        assert_eq!(gateway.calls_of(AnalysisKind::Xp).await, 1);
        assert_eq!(gateway.calls_of(AnalysisKind::Quests).await, 1);
        dispatcher.shutdown().await;
    }

    #[tokio::test]
    async fn full_queue_drops_without_blocking() {
        let gateway = Arc::new(MockGateway::new());
        let dispatcher = Dispatcher::start(gateway, &config(1, 1), Duration::from_secs(1));

        // Workers cannot run until this task yields, so only one slot exists.
        let accepted = (0..5)
            .filter(|_| dispatcher.enqueue(job(AnalysisKind::Xp)))
            .count();
        assert_eq!(accepted, 1);
        assert_eq!(dispatcher.stats().dropped, 4);

        settle(&dispatcher, 1).await;
        dispatcher.shutdown().await;
    }

    #[tokio::test]
    #[tracing_test::traced_test]
    async fn failures_are_counted_and_logged() {
        let gateway = Arc::new(MockGateway::new());
        gateway.fail_kind(AnalysisKind::Xp).await;
        let dispatcher = Dispatcher::start(gateway.clone(), &config(1, 4), Duration::from_secs(1));

        dispatcher.enqueue(job(AnalysisKind::Xp));
        dispatcher.enqueue(job(AnalysisKind::Quests));
        settle(&dispatcher, 2).await;

        let stats = dispatcher.stats();
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.succeeded, 1);
        assert!(logs_contain("analysis submission failed"));
        dispatcher.shutdown().await;
    }

    #[tokio::test]
    async fn slow_gateway_hits_job_timeout() {
        let gateway = Arc::new(MockGateway::new());
        gateway.set_delay(Duration::from_millis(500)).await;
        let dispatcher =
            Dispatcher::start(gateway, &config(1, 4), Duration::from_millis(20));

        dispatcher.enqueue(job(AnalysisKind::Quests));
        settle(&dispatcher, 1).await;
        assert_eq!(dispatcher.stats().failed, 1);
        dispatcher.shutdown().await;
    }

    #[tokio::test]
    async fn enqueue_after_shutdown_is_dropped() {
        let gateway = Arc::new(MockGateway::new());
        let dispatcher = Dispatcher::start(gateway, &config(2, 4), Duration::from_secs(1));
        dispatcher.shutdown().await;

        assert!(!dispatcher.enqueue(job(AnalysisKind::Xp)));
        assert_eq!(dispatcher.stats().dropped, 1);
    }
}
