// SPDX-FileCopyrightText: 2026 Questlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so a misspelled key is
//! reported at startup instead of being silently ignored.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Top-level Questlog configuration.
///
/// Every section is optional and falls back to its defaults.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct QuestlogConfig {
    /// Service identity and logging.
    #[serde(default)]
    pub service: ServiceConfig,

    /// SQLite storage settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// HTTP API listener and authentication.
    #[serde(default)]
    pub api: ApiConfig,

    /// Text-analysis gateway endpoint.
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// Background dispatch queue for gateway jobs.
    #[serde(default)]
    pub dispatch: DispatchConfig,

    /// Leveling constants.
    #[serde(default)]
    pub progression: ProgressionConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    #[serde(default = "default_service_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: default_service_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_service_name() -> String {
    "questlog".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("questlog").join("questlog.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("questlog.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

/// HTTP API configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Shared secret required on every `/v1` route. `None` keeps the API closed.
    #[serde(default)]
    pub bearer_token: Option<String>,
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field(
                "bearer_token",
                &self.bearer_token.as_ref().map(|_| "[redacted]"),
            )
            .finish()
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            bearer_token: None,
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Text-analysis gateway configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Base URL of the gateway, without a trailing slash.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path receiving entries for XP analysis.
    #[serde(default = "default_xp_path")]
    pub xp_path: String,

    /// Path receiving entries for quest analysis.
    #[serde(default = "default_quest_path")]
    pub quest_path: String,

    /// Optional bearer key sent to the gateway.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Per-call timeout. Sized for model inference latency.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl AnalysisConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl std::fmt::Debug for AnalysisConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisConfig")
            .field("base_url", &self.base_url)
            .field("xp_path", &self.xp_path)
            .field("quest_path", &self.quest_path)
            .field("api_key", &self.api_key.as_ref().map(|_| "[redacted]"))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            xp_path: default_xp_path(),
            quest_path: default_quest_path(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8001".to_string()
}

fn default_xp_path() -> String {
    "/agent/update_character".to_string()
}

fn default_quest_path() -> String {
    "/agent/update_quests".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// Background dispatch configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DispatchConfig {
    /// Number of worker tasks draining the queue.
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Maximum queued jobs. Jobs beyond this are dropped.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,

    /// How long shutdown waits for in-flight jobs.
    #[serde(default = "default_shutdown_grace_secs")]
    pub shutdown_grace_secs: u64,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            queue_capacity: default_queue_capacity(),
            shutdown_grace_secs: default_shutdown_grace_secs(),
        }
    }
}

fn default_workers() -> usize {
    4
}

fn default_queue_capacity() -> usize {
    256
}

fn default_shutdown_grace_secs() -> u64 {
    10
}

/// Leveling constants.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ProgressionConfig {
    #[serde(default = "default_max_level")]
    pub max_level: u32,

    /// Reaching level L+1 from level L costs `xp_per_level * L`.
    #[serde(default = "default_xp_per_level")]
    pub xp_per_level: i64,

    #[serde(default = "default_points_per_level")]
    pub points_per_level: i64,

    #[serde(default = "default_starting_points")]
    pub starting_points: i64,

    #[serde(default = "default_base_attribute")]
    pub base_attribute: i64,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            max_level: default_max_level(),
            xp_per_level: default_xp_per_level(),
            points_per_level: default_points_per_level(),
            starting_points: default_starting_points(),
            base_attribute: default_base_attribute(),
        }
    }
}

fn default_max_level() -> u32 {
    100
}

fn default_xp_per_level() -> i64 {
    100
}

fn default_points_per_level() -> i64 {
    5
}

fn default_starting_points() -> i64 {
    5
}

fn default_base_attribute() -> i64 {
    10
}
