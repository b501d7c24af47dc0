// SPDX-FileCopyrightText: 2026 Questlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration for the Questlog service.
//!
//! Strict TOML parsing (`deny_unknown_fields`), XDG file lookup,
//! `QUESTLOG_` environment overrides, and miette diagnostics with typo
//! suggestions.
//!
//! ```no_run
//! let config = questlog_config::load_and_validate().expect("config errors");
//! println!("listening on {}:{}", config.api.host, config.api.port);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

use std::path::Path;

pub use diagnostic::{ConfigError, render_errors};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::{
    AnalysisConfig, ApiConfig, DispatchConfig, ProgressionConfig, QuestlogConfig, ServiceConfig,
    StorageConfig,
};

/// Load from the XDG hierarchy plus env, then validate.
pub fn load_and_validate() -> Result<QuestlogConfig, Vec<ConfigError>> {
    finish(loader::load_config(), collect_sources)
}

/// Load from an explicit file plus env, then validate.
pub fn load_and_validate_path(path: &Path) -> Result<QuestlogConfig, Vec<ConfigError>> {
    finish(loader::load_config_from_path(path), || {
        read_sources([path.to_path_buf()])
    })
}

/// Load from an inline TOML string, then validate.
pub fn load_and_validate_str(toml_content: &str) -> Result<QuestlogConfig, Vec<ConfigError>> {
    finish(loader::load_config_from_str(toml_content), || {
        vec![("<inline>".to_string(), toml_content.to_string())]
    })
}

fn finish(
    loaded: Result<QuestlogConfig, figment::Error>,
    sources: impl FnOnce() -> Vec<(String, String)>,
) -> Result<QuestlogConfig, Vec<ConfigError>> {
    match loaded {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(diagnostic::figment_to_config_errors(err, &sources())),
    }
}

fn collect_sources() -> Vec<(String, String)> {
    read_sources(loader::config_search_paths())
}

/// Read whichever config files exist, keyed by the path string Figment reports.
fn read_sources(paths: impl IntoIterator<Item = std::path::PathBuf>) -> Vec<(String, String)> {
    paths
        .into_iter()
        .filter_map(|path| {
            let content = std::fs::read_to_string(&path).ok()?;
            let absolute = if path.is_absolute() {
                path
            } else {
                std::env::current_dir().map(|d| d.join(&path)).unwrap_or(path)
            };
            Some((absolute.display().to_string(), content))
        })
        .collect()
}
