// SPDX-FileCopyrightText: 2026 Questlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Quest queries, including the atomic completion commit.

use std::str::FromStr;

use questlog_core::types::now_timestamp;
use questlog_core::{Character, Quest, QuestStatus, QuestlogError};
use rusqlite::types::Type;
use rusqlite::{OptionalExtension, Row, params};

use super::{Guarded, characters, classify};
use crate::database::{Database, map_tr_err};

const COLUMNS: &str =
    "id, user_id, title, description, xp_reward, status, version, created_at, updated_at";

fn from_row(row: &Row<'_>) -> Result<Quest, rusqlite::Error> {
    let status: String = row.get(5)?;
    let status = QuestStatus::from_str(&status)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(e)))?;
    Ok(Quest {
        id: row.get(0)?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        xp_reward: row.get(4)?,
        status,
        version: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

pub async fn create_quest(db: &Database, quest: &Quest) -> Result<(), QuestlogError> {
    let q = quest.clone();
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                "INSERT INTO quests (id, user_id, title, description, xp_reward, status,
                     version, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    q.id,
                    q.user_id,
                    q.title,
                    q.description,
                    q.xp_reward,
                    q.status.to_string(),
                    q.version,
                    q.created_at,
                    q.updated_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

pub async fn get_quest(db: &Database, id: &str) -> Result<Option<Quest>, QuestlogError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| -> Result<Option<Quest>, rusqlite::Error> {
            conn.query_row(
                &format!("SELECT {COLUMNS} FROM quests WHERE id = ?1"),
                params![id],
                from_row,
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}

/// Quests owned by `user_id`, newest first.
pub async fn list_quests_for_user(
    db: &Database,
    user_id: &str,
) -> Result<Vec<Quest>, QuestlogError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| -> Result<Vec<Quest>, rusqlite::Error> {
            let mut stmt = conn.prepare(&format!(
                "SELECT {COLUMNS} FROM quests WHERE user_id = ?1
                 ORDER BY created_at DESC, rowid DESC"
            ))?;
            let rows = stmt.query_map(params![user_id], from_row)?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}

fn write_guarded(
    conn: &rusqlite::Connection,
    q: &Quest,
    updated_at: &str,
) -> Result<Guarded, rusqlite::Error> {
    let changed = conn.execute(
        "UPDATE quests
         SET title = ?1, description = ?2, status = ?3,
             version = version + 1, updated_at = ?4
         WHERE id = ?5 AND version = ?6",
        params![
            q.title,
            q.description,
            q.status.to_string(),
            updated_at,
            q.id,
            q.version,
        ],
    )?;
    classify(conn, "quests", &q.id, changed)
}

fn bumped(q: &Quest, updated_at: &str) -> Quest {
    Quest {
        version: q.version + 1,
        updated_at: updated_at.to_string(),
        ..q.clone()
    }
}

pub async fn update_quest(db: &Database, quest: &Quest) -> Result<Quest, QuestlogError> {
    let q = quest.clone();
    let now = now_timestamp();
    let stamp = now.clone();
    let outcome = db
        .connection()
        .call(move |conn| -> Result<Guarded, rusqlite::Error> { write_guarded(conn, &q, &stamp) })
        .await
        .map_err(map_tr_err)?;

    match outcome {
        Guarded::Saved => Ok(bumped(quest, &now)),
        Guarded::Stale => Err(QuestlogError::conflict("quest", &quest.id)),
        Guarded::Missing => Err(QuestlogError::not_found("quest", &quest.id)),
    }
}

/// Which record blocked a completion commit.
enum Commit {
    Done,
    Quest(Guarded),
    Character(Guarded),
}

/// Persist a completed quest and its rewarded character in one transaction.
/// If either guarded write misses, the transaction is rolled back.
pub async fn commit_quest_completion(
    db: &Database,
    quest: &Quest,
    character: &Character,
) -> Result<(Quest, Character), QuestlogError> {
    let (q, c) = (quest.clone(), character.clone());
    let now = now_timestamp();
    let stamp = now.clone();
    let outcome = db
        .connection()
        .call(move |conn| -> Result<Commit, rusqlite::Error> {
            let tx = conn.transaction()?;
            let quest_write = write_guarded(&tx, &q, &stamp)?;
            if quest_write != Guarded::Saved {
                return Ok(Commit::Quest(quest_write));
            }
            let character_write = characters::write_guarded(&tx, &c, &stamp)?;
            if character_write != Guarded::Saved {
                return Ok(Commit::Character(character_write));
            }
            tx.commit()?;
            Ok(Commit::Done)
        })
        .await
        .map_err(map_tr_err)?;

    match outcome {
        Commit::Done => Ok((bumped(quest, &now), characters::bumped(character, &now))),
        Commit::Quest(Guarded::Missing) => Err(QuestlogError::not_found("quest", &quest.id)),
        Commit::Quest(_) => Err(QuestlogError::conflict("quest", &quest.id)),
        Commit::Character(Guarded::Missing) => {
            Err(QuestlogError::not_found("character", &character.id))
        }
        Commit::Character(_) => Err(QuestlogError::conflict("character", &character.id)),
    }
}
