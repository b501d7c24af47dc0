// SPDX-FileCopyrightText: 2026 Questlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedded schema migrations (refinery).
//!
//! SQL files under `migrations/` are compiled into the binary.

use questlog_core::QuestlogError;

mod embedded {
    use refinery::embed_migrations;
    embed_migrations!("migrations");
}

/// Apply every pending migration. Refinery records progress in
/// `refinery_schema_history`, so this is safe to call on every open.
pub fn run_migrations(conn: &mut rusqlite::Connection) -> Result<usize, QuestlogError> {
    let report = embedded::migrations::runner()
        .run(conn)
        .map_err(QuestlogError::storage)?;
    Ok(report.applied_migrations().len())
}
