// SPDX-FileCopyrightText: 2026 Questlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Maps domain errors onto HTTP responses.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;

use questlog_core::QuestlogError;
use questlog_progression::GrantXpError;

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// A [`QuestlogError`] on its way out of a handler.
#[derive(Debug)]
pub struct ApiError(pub QuestlogError);

impl From<QuestlogError> for ApiError {
    fn from(err: QuestlogError) -> Self {
        Self(err)
    }
}

impl From<GrantXpError> for ApiError {
    fn from(err: GrantXpError) -> Self {
        Self(err.into())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(QuestlogError::validation("body", rejection.body_text()))
    }
}

/// `Json` extractor whose rejections use the `{"error": ...}` body.
#[derive(Debug)]
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            QuestlogError::Validation { .. } => StatusCode::BAD_REQUEST,
            QuestlogError::NotFound { .. } => StatusCode::NOT_FOUND,
            QuestlogError::Conflict { .. } => StatusCode::CONFLICT,
            QuestlogError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            QuestlogError::Gateway { .. } => StatusCode::BAD_GATEWAY,
            QuestlogError::Storage { .. }
            | QuestlogError::Config(_)
            | QuestlogError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(kind = %self.0.kind(), error = %self.0, "request failed");
            "internal server error".to_string()
        } else {
            tracing::debug!(kind = %self.0.kind(), error = %self.0, "request rejected");
            self.0.to_string()
        };
        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
