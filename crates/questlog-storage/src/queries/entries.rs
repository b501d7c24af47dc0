// SPDX-FileCopyrightText: 2026 Questlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Journal entry queries.

use questlog_core::{JournalEntry, QuestlogError};
use rusqlite::{OptionalExtension, params};

use crate::database::{Database, map_tr_err};

pub async fn get_entry(db: &Database, id: &str) -> Result<Option<JournalEntry>, QuestlogError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| -> Result<Option<JournalEntry>, rusqlite::Error> {
            conn.query_row(
                "SELECT id, user_id, title, content, created_at, updated_at
                 FROM journal_entries WHERE id = ?1",
                params![id],
                |row| {
                    Ok(JournalEntry {
                        id: row.get(0)?,
                        user_id: row.get(1)?,
                        title: row.get(2)?,
                        content: row.get(3)?,
                        created_at: row.get(4)?,
                        updated_at: row.get(5)?,
                    })
                },
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}

/// Upsert by id. `created_at` is kept from the first insert.
pub async fn save_entry(db: &Database, entry: &JournalEntry) -> Result<(), QuestlogError> {
    let e = entry.clone();
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                "INSERT INTO journal_entries (id, user_id, title, content, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 ON CONFLICT(id) DO UPDATE SET
                     title = excluded.title,
                     content = excluded.content,
                     updated_at = excluded.updated_at",
                params![e.id, e.user_id, e.title, e.content, e.created_at, e.updated_at],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}
