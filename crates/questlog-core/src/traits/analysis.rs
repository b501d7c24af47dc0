// SPDX-FileCopyrightText: 2026 Questlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbound contract to the text-analysis gateway.

use async_trait::async_trait;

use crate::error::QuestlogError;
use crate::types::{AnalysisAck, AnalysisKind, AnalysisRequest};

/// A remote service that analyses journal text and later calls back into the
/// progression and quest routes.
#[async_trait]
pub trait AnalysisGateway: Send + Sync {
    /// Submits `request` for the given analysis. Returns only an
    /// acknowledgement; implementations must not retry.
    async fn submit(
        &self,
        kind: AnalysisKind,
        request: &AnalysisRequest,
    ) -> Result<AnalysisAck, QuestlogError>;
}
