// SPDX-FileCopyrightText: 2026 Questlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request handlers and their request/response bodies.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use questlog_core::{AttributeSpend, Character, JournalEntry, Quest, QuestlogError};
use questlog_journal::DispatchStats;
use questlog_progression::{QuestUpdate, XpGrant};

use crate::error::{ApiError, ApiJson};
use crate::server::AppState;

type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Deserialize)]
pub struct CreateCharacterRequest {
    pub user_id: String,
    pub name: String,
    pub class: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GrantXpRequest {
    pub amount: i64,
}

#[derive(Debug, Serialize)]
pub struct GrantXpResponse {
    pub character: Character,
    pub leveled_up: bool,
}

impl From<XpGrant> for GrantXpResponse {
    fn from(grant: XpGrant) -> Self {
        Self {
            character: grant.character,
            leveled_up: grant.leveled_up,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateQuestRequest {
    pub user_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub xp_reward: i64,
}

#[derive(Debug, Deserialize)]
pub struct UpdateEntryRequest {
    pub user_id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

/// Unauthenticated liveness response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    pub dispatch: DispatchStats,
}

/// GET /health
pub async fn get_health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        dispatch: state.dispatcher.stats(),
    })
}

/// Explicit grant requests must carry a positive amount. The engine itself
/// treats non-positive amounts as a no-op.
fn positive_amount(amount: i64) -> Result<i64, ApiError> {
    if amount <= 0 {
        return Err(QuestlogError::validation(
            "amount",
            format!("must be positive, got {amount}"),
        )
        .into());
    }
    Ok(amount)
}

/// POST /v1/characters
pub async fn create_character(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateCharacterRequest>,
) -> ApiResult<(StatusCode, Json<Character>)> {
    let character = state
        .characters
        .create_character(&req.user_id, &req.name, &req.class, req.avatar_url.as_deref())
        .await?;
    Ok((StatusCode::CREATED, Json(character)))
}

/// GET /v1/characters/{id}
pub async fn get_character(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Character>> {
    Ok(Json(state.characters.get_character(&id).await?))
}

/// GET /v1/characters/user/{user_id}
pub async fn get_character_by_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<Character>> {
    Ok(Json(state.characters.get_character_by_user(&user_id).await?))
}

/// POST /v1/characters/{id}/xp
pub async fn grant_xp(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<GrantXpRequest>,
) -> ApiResult<Json<GrantXpResponse>> {
    let amount = positive_amount(req.amount)?;
    let grant = state.characters.grant_xp(&id, amount).await?;
    Ok(Json(grant.into()))
}

/// POST /v1/characters/user/{user_id}/xp
///
/// Called back by the analysis gateway once it has scored an entry.
pub async fn grant_xp_to_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    ApiJson(req): ApiJson<GrantXpRequest>,
) -> ApiResult<Json<GrantXpResponse>> {
    let amount = positive_amount(req.amount)?;
    let grant = state.characters.grant_xp_to_user(&user_id, amount).await?;
    Ok(Json(grant.into()))
}

/// POST /v1/characters/{id}/spend-points
pub async fn spend_attribute_points(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(spend): ApiJson<AttributeSpend>,
) -> ApiResult<Json<Character>> {
    Ok(Json(
        state.characters.spend_attribute_points(&id, spend).await?,
    ))
}

/// POST /v1/quests
pub async fn create_quest(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateQuestRequest>,
) -> ApiResult<(StatusCode, Json<Quest>)> {
    let quest = state
        .quests
        .create_quest(&req.user_id, &req.title, &req.description, req.xp_reward)
        .await?;
    Ok((StatusCode::CREATED, Json(quest)))
}

/// GET /v1/quests/user/{user_id}
pub async fn get_user_quests(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<Vec<Quest>>> {
    Ok(Json(state.quests.get_user_quests(&user_id).await?))
}

/// PUT /v1/quests/{id}
pub async fn update_quest(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(update): ApiJson<QuestUpdate>,
) -> ApiResult<Json<Quest>> {
    Ok(Json(state.quests.update_quest(&id, update).await?))
}

/// POST /v1/quests/{id}/complete
pub async fn complete_quest(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Quest>> {
    Ok(Json(state.quests.complete_quest(&id).await?))
}

/// GET /v1/entries/{id}
pub async fn get_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<JournalEntry>> {
    Ok(Json(state.journal.get_entry(&id).await?))
}

/// PUT /v1/entries/{id}
pub async fn update_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<UpdateEntryRequest>,
) -> ApiResult<Json<JournalEntry>> {
    let entry = state
        .journal
        .update_entry(&id, &req.user_id, req.title, req.content)
        .await?;
    Ok(Json(entry))
}
