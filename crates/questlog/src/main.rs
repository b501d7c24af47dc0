// SPDX-FileCopyrightText: 2026 Questlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Questlog - character progression and quests for a journaling app.
//!
//! This is the binary entry point.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod serve;
mod shutdown;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use questlog_config::{ConfigError, QuestlogConfig};

/// Questlog - character progression and quests for a journaling app.
#[derive(Parser, Debug)]
#[command(name = "questlog", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Commands {
    /// Start the HTTP API and analysis dispatcher (default).
    Serve,
    /// Open the database and apply pending migrations.
    Migrate,
    /// Load and validate configuration, then print a summary.
    CheckConfig,
}

fn load_config(path: Option<&PathBuf>) -> Result<QuestlogConfig, Vec<ConfigError>> {
    match path {
        Some(path) => questlog_config::load_and_validate_path(path),
        None => questlog_config::load_and_validate(),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_ref()) {
        Ok(config) => config,
        Err(errors) => {
            questlog_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.service.log_level);

    let result = match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve::run_serve(config).await,
        Commands::Migrate => serve::run_migrate(&config).await,
        Commands::CheckConfig => {
            print_summary(&config);
            Ok(())
        }
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "questlog exited with an error");
        eprintln!("questlog: {e}");
        std::process::exit(1);
    }
}

fn print_summary(config: &QuestlogConfig) {
    println!("questlog: configuration ok");
    println!("  service.name        = {}", config.service.name);
    println!("  storage.database    = {}", config.storage.database_path);
    println!("  api.listen          = {}:{}", config.api.host, config.api.port);
    println!(
        "  api.bearer_token    = {}",
        if config.api.bearer_token.is_some() {
            "set"
        } else {
            "MISSING (serve will refuse to start)"
        }
    );
    println!("  analysis.base_url   = {}", config.analysis.base_url);
    println!(
        "  dispatch            = {} workers, queue {}",
        config.dispatch.workers, config.dispatch.queue_capacity
    );
    println!(
        "  progression         = cap {}, {} xp/level",
        config.progression.max_level, config.progression.xp_per_level
    );
}

/// Initializes the tracing subscriber. `RUST_LOG` overrides the configured level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("questlog={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(not(target_env = "msvc"))]
    fn jemalloc_is_active() {
        use tikv_jemalloc_ctl::{epoch, stats};
        epoch::advance().unwrap();
        let allocated = stats::allocated::read().unwrap();
        assert!(allocated > 0);
    }

    #[test]
    fn no_subcommand_means_serve() {
        let cli = Cli::try_parse_from(["questlog"]).unwrap();
        assert_eq!(cli.command.unwrap_or(Commands::Serve), Commands::Serve);
    }

    #[test]
    fn parses_subcommands_and_config_flag() {
        let cli = Cli::try_parse_from(["questlog", "check-config", "--config", "q.toml"]).unwrap();
        assert_eq!(cli.command, Some(Commands::CheckConfig));
        assert_eq!(cli.config, Some(PathBuf::from("q.toml")));

        let cli = Cli::try_parse_from(["questlog", "migrate"]).unwrap();
        assert_eq!(cli.command, Some(Commands::Migrate));
    }

    #[test]
    fn unknown_subcommand_is_rejected() {
        assert!(Cli::try_parse_from(["questlog", "shell"]).is_err());
    }
}
