// SPDX-FileCopyrightText: 2026 Questlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Semantic checks that serde attributes cannot express.

use crate::diagnostic::ConfigError;
use crate::model::QuestlogConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration. Collects every failure instead of
/// stopping at the first.
pub fn validate_config(config: &QuestlogConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let level = config.service.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigError::invalid(format!(
            "service.log_level `{}` must be one of {}",
            config.service.log_level,
            LOG_LEVELS.join(", ")
        )));
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::invalid("storage.database_path must not be empty"));
    }

    let host = config.api.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::invalid("api.host must not be empty"));
    } else if host.parse::<std::net::IpAddr>().is_err()
        && !host
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
    {
        errors.push(ConfigError::invalid(format!(
            "api.host `{host}` is not a valid IP address or hostname"
        )));
    }

    if let Some(token) = &config.api.bearer_token
        && token.trim().is_empty()
    {
        errors.push(ConfigError::invalid(
            "api.bearer_token must not be blank when set",
        ));
    }

    let base = config.analysis.base_url.trim();
    if !(base.starts_with("http://") || base.starts_with("https://")) {
        errors.push(ConfigError::invalid(format!(
            "analysis.base_url `{base}` must start with http:// or https://"
        )));
    }
    for (name, path) in [
        ("analysis.xp_path", &config.analysis.xp_path),
        ("analysis.quest_path", &config.analysis.quest_path),
    ] {
        if !path.starts_with('/') {
            errors.push(ConfigError::invalid(format!(
                "{name} `{path}` must start with `/`"
            )));
        }
    }
    if config.analysis.timeout_secs == 0 {
        errors.push(ConfigError::invalid("analysis.timeout_secs must be at least 1"));
    }

    if config.dispatch.workers == 0 {
        errors.push(ConfigError::invalid("dispatch.workers must be at least 1"));
    }
    if config.dispatch.queue_capacity == 0 {
        errors.push(ConfigError::invalid(
            "dispatch.queue_capacity must be at least 1",
        ));
    }

    let p = &config.progression;
    if p.max_level < 1 {
        errors.push(ConfigError::invalid("progression.max_level must be at least 1"));
    }
    if p.xp_per_level <= 0 {
        errors.push(ConfigError::invalid(format!(
            "progression.xp_per_level must be positive, got {}",
            p.xp_per_level
        )));
    }
    if p.points_per_level < 1 {
        errors.push(ConfigError::invalid(format!(
            "progression.points_per_level must be at least 1, got {}",
            p.points_per_level
        )));
    }
    for (name, value) in [
        ("progression.starting_points", p.starting_points),
        ("progression.base_attribute", p.base_attribute),
    ] {
        if value < 0 {
            errors.push(ConfigError::invalid(format!(
                "{name} must be non-negative, got {value}"
            )));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
