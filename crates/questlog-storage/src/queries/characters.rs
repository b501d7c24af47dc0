// SPDX-FileCopyrightText: 2026 Questlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Character queries.

use std::str::FromStr;

use questlog_core::types::now_timestamp;
use questlog_core::{Attributes, Character, CharacterClass, QuestlogError};
use rusqlite::types::Type;
use rusqlite::{ErrorCode, OptionalExtension, Row, params};

use super::{Guarded, classify};
use crate::database::{Database, map_tr_err};

const COLUMNS: &str = "id, user_id, name, class, avatar_url, level, xp, attribute_points,
     strength, defense, vitality, mana, version, created_at, updated_at";

pub(crate) fn from_row(row: &Row<'_>) -> Result<Character, rusqlite::Error> {
    let class: String = row.get(3)?;
    let class = CharacterClass::from_str(&class)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e)))?;
    Ok(Character {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        class,
        avatar_url: row.get(4)?,
        level: row.get(5)?,
        xp: row.get(6)?,
        attribute_points: row.get(7)?,
        attributes: Attributes {
            strength: row.get(8)?,
            defense: row.get(9)?,
            vitality: row.get(10)?,
            mana: row.get(11)?,
        },
        version: row.get(12)?,
        created_at: row.get(13)?,
        updated_at: row.get(14)?,
    })
}

/// Insert a character. Violating the one-per-user index is a validation error.
pub async fn create_character(db: &Database, character: &Character) -> Result<(), QuestlogError> {
    let c = character.clone();
    let inserted = db
        .connection()
        .call(move |conn| -> Result<bool, rusqlite::Error> {
            let result = conn.execute(
                "INSERT INTO characters (id, user_id, name, class, avatar_url, level, xp,
                     attribute_points, strength, defense, vitality, mana, version,
                     created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
                params![
                    c.id,
                    c.user_id,
                    c.name,
                    c.class.to_string(),
                    c.avatar_url,
                    c.level,
                    c.xp,
                    c.attribute_points,
                    c.attributes.strength,
                    c.attributes.defense,
                    c.attributes.vitality,
                    c.attributes.mana,
                    c.version,
                    c.created_at,
                    c.updated_at,
                ],
            );
            match result {
                Ok(_) => Ok(true),
                Err(rusqlite::Error::SqliteFailure(e, _))
                    if e.code == ErrorCode::ConstraintViolation =>
                {
                    Ok(false)
                }
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(map_tr_err)?;

    if inserted {
        Ok(())
    } else {
        Err(QuestlogError::validation(
            "user_id",
            "user already has a character",
        ))
    }
}

pub async fn get_character(db: &Database, id: &str) -> Result<Option<Character>, QuestlogError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| -> Result<Option<Character>, rusqlite::Error> {
            conn.query_row(
                &format!("SELECT {COLUMNS} FROM characters WHERE id = ?1"),
                params![id],
                from_row,
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}

pub async fn get_character_by_user(
    db: &Database,
    user_id: &str,
) -> Result<Option<Character>, QuestlogError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| -> Result<Option<Character>, rusqlite::Error> {
            conn.query_row(
                &format!("SELECT {COLUMNS} FROM characters WHERE user_id = ?1"),
                params![user_id],
                from_row,
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}

/// Version-guarded write of the mutable columns. Runs inside a caller's
/// transaction when used from a multi-record commit.
pub(crate) fn write_guarded(
    conn: &rusqlite::Connection,
    c: &Character,
    updated_at: &str,
) -> Result<Guarded, rusqlite::Error> {
    let changed = conn.execute(
        "UPDATE characters
         SET name = ?1, avatar_url = ?2, level = ?3, xp = ?4, attribute_points = ?5,
             strength = ?6, defense = ?7, vitality = ?8, mana = ?9,
             version = version + 1, updated_at = ?10
         WHERE id = ?11 AND version = ?12",
        params![
            c.name,
            c.avatar_url,
            c.level,
            c.xp,
            c.attribute_points,
            c.attributes.strength,
            c.attributes.defense,
            c.attributes.vitality,
            c.attributes.mana,
            updated_at,
            c.id,
            c.version,
        ],
    )?;
    classify(conn, "characters", &c.id, changed)
}

/// The record as it reads after a successful guarded write.
pub(crate) fn bumped(c: &Character, updated_at: &str) -> Character {
    Character {
        version: c.version + 1,
        updated_at: updated_at.to_string(),
        ..c.clone()
    }
}

pub async fn update_character(
    db: &Database,
    character: &Character,
) -> Result<Character, QuestlogError> {
    let c = character.clone();
    let now = now_timestamp();
    let stamp = now.clone();
    let outcome = db
        .connection()
        .call(move |conn| -> Result<Guarded, rusqlite::Error> { write_guarded(conn, &c, &stamp) })
        .await
        .map_err(map_tr_err)?;

    match outcome {
        Guarded::Saved => Ok(bumped(character, &now)),
        Guarded::Stale => Err(QuestlogError::conflict("character", &character.id)),
        Guarded::Missing => Err(QuestlogError::not_found("character", &character.id)),
    }
}
