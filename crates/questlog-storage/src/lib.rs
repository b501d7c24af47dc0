// SPDX-FileCopyrightText: 2026 Questlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence for Questlog.
//!
//! WAL-mode SQLite with embedded refinery migrations and a single-writer
//! connection via `tokio-rusqlite`. [`SqliteStore`] implements every store
//! trait from `questlog-core`, with version-guarded updates and an atomic
//! quest-completion commit.

pub mod adapter;
pub mod database;
pub mod migrations;
pub mod queries;

pub use adapter::SqliteStore;
pub use database::Database;
