// SPDX-FileCopyrightText: 2026 Questlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed queries, one module per table.

pub mod characters;
pub mod entries;
pub mod quests;

/// Result of a version-guarded UPDATE.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Guarded {
    Saved,
    Stale,
    Missing,
}

/// Classify an UPDATE that matched zero rows: either the id is gone or the
/// version moved on.
pub(crate) fn classify(
    conn: &rusqlite::Connection,
    table: &str,
    id: &str,
    changed: usize,
) -> Result<Guarded, rusqlite::Error> {
    if changed > 0 {
        return Ok(Guarded::Saved);
    }
    let exists: bool = conn.query_row(
        &format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE id = ?1)"),
        [id],
        |row| row.get(0),
    )?;
    Ok(if exists {
        Guarded::Stale
    } else {
        Guarded::Missing
    })
}
