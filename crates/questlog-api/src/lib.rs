// SPDX-FileCopyrightText: 2026 Questlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP API for Questlog.
//!
//! User-facing routes and the callback routes the analysis gateway uses to
//! award XP and create quests, all behind bearer authentication.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod server;

pub use auth::AuthConfig;
pub use error::{ApiError, ApiJson, ErrorResponse};
pub use server::{AppState, build_router, serve, start_server};
