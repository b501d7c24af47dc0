// SPDX-FileCopyrightText: 2026 Questlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Client for the external text-analysis gateway.

pub mod client;

pub use client::AnalysisClient;
