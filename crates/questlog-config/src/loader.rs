// SPDX-FileCopyrightText: 2026 Questlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered configuration loading with Figment.
//!
//! Lookup order: `./questlog.toml` > `~/.config/questlog/questlog.toml` >
//! `/etc/questlog/questlog.toml`, with `QUESTLOG_` environment overrides on top.

#![allow(clippy::result_large_err)] // figment::Error is external

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::QuestlogConfig;

/// Top-level sections an environment variable may address.
const SECTIONS: &[&str] = &[
    "service",
    "storage",
    "api",
    "analysis",
    "dispatch",
    "progression",
];

const SYSTEM_CONFIG: &str = "/etc/questlog/questlog.toml";
const LOCAL_CONFIG: &str = "questlog.toml";

/// The XDG user config path, if a config directory exists.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("questlog").join("questlog.toml"))
}

/// Config files consulted by [`load_config`], lowest precedence first.
pub fn config_search_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(SYSTEM_CONFIG)];
    if let Some(user) = user_config_path() {
        paths.push(user);
    }
    paths.push(PathBuf::from(LOCAL_CONFIG));
    paths
}

/// Load configuration from the standard hierarchy with env var overrides.
pub fn load_config() -> Result<QuestlogConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from an inline TOML string. No files, no env.
pub fn load_config_from_str(toml_content: &str) -> Result<QuestlogConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(QuestlogConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from an explicit file, still honouring env overrides.
pub fn load_config_from_path(path: &Path) -> Result<QuestlogConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(QuestlogConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// The un-extracted Figment used by [`load_config`].
pub fn build_figment() -> Figment {
    config_search_paths()
        .into_iter()
        .fold(
            Figment::new().merge(Serialized::defaults(QuestlogConfig::default())),
            |figment, path| figment.merge(Toml::file(path)),
        )
        .merge(env_provider())
}

/// `QUESTLOG_<SECTION>_<KEY>` maps to `<section>.<key>`.
///
/// Only the leading section name is split off, so keys that contain
/// underscores survive: `QUESTLOG_ANALYSIS_API_KEY` becomes `analysis.api_key`.
fn env_provider() -> Env {
    Env::prefixed("QUESTLOG_").map(|key| map_env_key(key.as_str()).into())
}

pub(crate) fn map_env_key(key: &str) -> String {
    for section in SECTIONS {
        if let Some(rest) = key
            .strip_prefix(section)
            .and_then(|r| r.strip_prefix('_'))
        {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}
