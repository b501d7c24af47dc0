// SPDX-FileCopyrightText: 2026 Questlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `questlog serve` and `questlog migrate`.

use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};

use questlog_analysis::AnalysisClient;
use questlog_api::AppState;
use questlog_config::QuestlogConfig;
use questlog_core::QuestlogError;
use questlog_journal::{Dispatcher, JournalService, JournalTrigger};
use questlog_progression::{LevelingRules, ProgressionEngine, QuestEngine};
use questlog_storage::SqliteStore;

use crate::shutdown;

/// Wire storage, engines, dispatcher, and the HTTP API, then run until a
/// shutdown signal arrives.
pub async fn run_serve(config: QuestlogConfig) -> Result<(), QuestlogError> {
    if config.api.bearer_token.is_none() {
        return Err(QuestlogError::Config(
            "api.bearer_token must be set to serve the API".to_string(),
        ));
    }

    let store = SqliteStore::open(&config.storage).await?;
    let shared = Arc::new(store.clone());
    let rules = LevelingRules::from(&config.progression);

    let gateway = Arc::new(AnalysisClient::new(&config.analysis)?);
    let dispatcher = Arc::new(Dispatcher::start(
        gateway,
        &config.dispatch,
        config.analysis.timeout(),
    ));

    let state = AppState {
        characters: ProgressionEngine::new(shared.clone(), rules),
        quests: QuestEngine::new(shared.clone(), rules),
        journal: JournalService::new(shared, JournalTrigger::new(dispatcher.clone())),
        dispatcher: dispatcher.clone(),
        start_time: Instant::now(),
    };

    let cancel = shutdown::install_signal_handler();
    info!(
        name = %config.service.name,
        analysis = %config.analysis.base_url,
        "questlog starting"
    );
    let served = questlog_api::start_server(&config.api, state, cancel.clone()).await;
    // A server error must still stop the workers.
    cancel.cancel();

    dispatcher.shutdown().await;
    let stats = dispatcher.stats();
    info!(
        submitted = stats.submitted,
        succeeded = stats.succeeded,
        failed = stats.failed,
        dropped = stats.dropped,
        "analysis dispatcher drained"
    );

    if let Err(e) = store.close().await {
        warn!(error = %e, "failed to close database cleanly");
    }

    served?;
    info!("questlog serve shutdown complete");
    Ok(())
}

/// Open the database, which applies any pending migrations, and close it.
pub async fn run_migrate(config: &QuestlogConfig) -> Result<(), QuestlogError> {
    let store = SqliteStore::open(&config.storage).await?;
    store.health_check().await?;
    store.close().await?;
    println!(
        "questlog: database at {} is up to date",
        config.storage.database_path
    );
    Ok(())
}
