// SPDX-FileCopyrightText: 2026 Questlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! [`AnalysisClient`] posts journal text to the gateway's XP and quest
//! analysis paths. Calls are one-shot: a failure is reported, never retried.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use questlog_config::AnalysisConfig;
use questlog_core::{AnalysisAck, AnalysisGateway, AnalysisKind, AnalysisRequest, QuestlogError};

/// reqwest-backed [`AnalysisGateway`].
#[derive(Clone)]
pub struct AnalysisClient {
    client: reqwest::Client,
    base_url: String,
    xp_path: String,
    quest_path: String,
    api_key: Option<SecretString>,
    timeout: Duration,
}

impl std::fmt::Debug for AnalysisClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisClient")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl AnalysisClient {
    pub fn new(config: &AnalysisConfig) -> Result<Self, QuestlogError> {
        let timeout = config.timeout();
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| QuestlogError::Gateway {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            xp_path: config.xp_path.clone(),
            quest_path: config.quest_path.clone(),
            api_key: config
                .api_key
                .clone()
                .filter(|k| !k.is_empty())
                .map(SecretString::from),
            timeout,
        })
    }

    /// Full URL for the given analysis.
    pub fn endpoint(&self, kind: AnalysisKind) -> String {
        let path = match kind {
            AnalysisKind::Xp => &self.xp_path,
            AnalysisKind::Quests => &self.quest_path,
        };
        format!("{}{}", self.base_url, path)
    }

    fn transport_error(&self, kind: AnalysisKind, err: reqwest::Error) -> QuestlogError {
        if err.is_timeout() {
            QuestlogError::Timeout {
                duration: self.timeout,
            }
        } else {
            QuestlogError::Gateway {
                message: format!("{kind} analysis request failed: {err}"),
                source: Some(Box::new(err)),
            }
        }
    }
}

#[async_trait]
impl AnalysisGateway for AnalysisClient {
    async fn submit(
        &self,
        kind: AnalysisKind,
        request: &AnalysisRequest,
    ) -> Result<AnalysisAck, QuestlogError> {
        let url = self.endpoint(kind);
        let mut builder = self.client.post(&url).json(request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key.expose_secret());
        }

        let response = builder
            .send()
            .await
            .map_err(|e| self.transport_error(kind, e))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| self.transport_error(kind, e))?;
        debug!(%kind, status = %status, user_id = %request.user_id, "gateway responded");

        if !status.is_success() {
            return Err(QuestlogError::Gateway {
                message: format!("{kind} analysis returned {status}: {text}"),
                source: None,
            });
        }

        let body = if text.trim().is_empty() {
            None
        } else {
            Some(serde_json::from_str(&text).unwrap_or(serde_json::Value::String(text)))
        };
        Ok(AnalysisAck {
            kind,
            status: status.as_u16(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(server: &MockServer) -> AnalysisConfig {
        AnalysisConfig {
            base_url: format!("{}/", server.uri()),
            api_key: Some("gw-key".into()),
            timeout_secs: 1,
            ..AnalysisConfig::default()
        }
    }

    fn request() -> AnalysisRequest {
        AnalysisRequest {
            entry_text: "Finished my first 10k run".into(),
            user_id: "user-7".into(),
        }
    }

    #[tokio::test]
    async fn posts_payload_to_kind_specific_path() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/agent/update_character"))
            .and(header("authorization", "Bearer gw-key"))
            .and(body_json(json!({
                "entry_text": "Finished my first 10k run",
                "user_id": "user-7"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "queued"})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/agent/update_quests"))
            .respond_with(ResponseTemplate::new(202))
            .expect(1)
            .mount(&server)
            .await;

        let client = AnalysisClient::new(&config(&server)).unwrap();
        let xp = client.submit(AnalysisKind::Xp, &request()).await.unwrap();
        assert_eq!(xp.status, 200);
        assert_eq!(xp.body, Some(json!({"status": "queued"})));

        let quests = client.submit(AnalysisKind::Quests, &request()).await.unwrap();
        assert_eq!(quests.status, 202);
        assert!(quests.body.is_none());
    }

    #[tokio::test]
    async fn non_json_body_is_kept_as_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .mount(&server)
            .await;

        let client = AnalysisClient::new(&config(&server)).unwrap();
        let ack = client.submit(AnalysisKind::Xp, &request()).await.unwrap();
        assert_eq!(ack.body, Some(json!("ok")));
    }

    #[tokio::test]
    async fn server_error_is_gateway_error_without_retry() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("model offline"))
            .expect(1)
            .mount(&server)
            .await;

        let client = AnalysisClient::new(&config(&server)).unwrap();
        let err = client
            .submit(AnalysisKind::Quests, &request())
            .await
            .unwrap_err();
        assert!(matches!(err, QuestlogError::Gateway { .. }));
        assert!(err.to_string().contains("model offline"));
    }

    #[tokio::test]
    async fn slow_gateway_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
            .mount(&server)
            .await;

        let client = AnalysisClient::new(&config(&server)).unwrap();
        let err = client.submit(AnalysisKind::Xp, &request()).await.unwrap_err();
        assert!(matches!(err, QuestlogError::Timeout { .. }), "got {err}");
    }

    #[tokio::test]
    async fn unreachable_gateway_is_gateway_error() {
        let client = AnalysisClient::new(&AnalysisConfig {
            base_url: "http://127.0.0.1:9".into(),
            timeout_secs: 1,
            ..AnalysisConfig::default()
        })
        .unwrap();
        let err = client.submit(AnalysisKind::Xp, &request()).await.unwrap_err();
        assert!(matches!(
            err,
            QuestlogError::Gateway { .. } | QuestlogError::Timeout { .. }
        ));
    }

    #[test]
    fn endpoint_joins_without_double_slash() {
        let client = AnalysisClient::new(&AnalysisConfig {
            base_url: "http://gw:8001/".into(),
            ..AnalysisConfig::default()
        })
        .unwrap();
        assert_eq!(
            client.endpoint(AnalysisKind::Quests),
            "http://gw:8001/agent/update_quests"
        );
    }
}
