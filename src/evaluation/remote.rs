//! OpenAI 兼容的远程评分服务

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;

use crate::config::EvaluationConfig;

const SYSTEM_PROMPT: &str = "You are a university assignment grader. Give brief, constructive feedback. Rate content relevance (0-100), grammar (0-100), and originality (0-100). End with one short paragraph of overall feedback and a single overall score 0-100.";
const USER_PROMPT_PREFIX: &str = "Evaluate this assignment submission:\n\n";

/// 远程评分失败的原因；评分器据此降级到本地规则
#[derive(Debug, Error)]
pub enum ServiceError {
    /// 请求没有发出或连接中断
    #[error("network error: {0}")]
    Network(String),

    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// 服务返回了非 2xx 状态
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("failed to decode response: {0}")]
    Decode(String),
}

/// 远程评分服务
#[async_trait]
pub trait RemoteScorer: Send + Sync {
    /// 返回原样的评语文本
    async fn review(&self, excerpt: &str) -> Result<String, ServiceError>;
}

/// 基于 chat completions 接口的评分实现
pub struct OpenAiScorer {
    api_key: String,
    base_url: String,
    model: String,
    max_tokens: u32,
    timeout: u64,
    client: reqwest::Client,
}

impl OpenAiScorer {
    pub fn new(api_key: &str, config: &EvaluationConfig) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()
            .map_err(|e| ServiceError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            api_key: api_key.to_string(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            timeout: config.timeout,
            client,
        })
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<ChatMessage>,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[async_trait]
impl RemoteScorer for OpenAiScorer {
    #[instrument(skip(self, excerpt), fields(model = %self.model))]
    async fn review(&self, excerpt: &str) -> Result<String, ServiceError> {
        let body = ChatRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: format!("{USER_PROMPT_PREFIX}{excerpt}"),
                },
            ],
        };

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ServiceError::Timeout(self.timeout)
                } else {
                    ServiceError::Network(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        if status >= 400 {
            let message = response.text().await.unwrap_or_default();
            return Err(ServiceError::Api { status, message });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| ServiceError::Decode(e.to_string()))?;

        Ok(parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer) -> EvaluationConfig {
        EvaluationConfig {
            base_url: server.uri(),
            ..EvaluationConfig::default()
        }
    }

    #[tokio::test]
    async fn test_review_returns_first_choice() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("Authorization", "Bearer test-key"))
            .and(body_partial_json(serde_json::json!({
                "model": "gpt-3.5-turbo",
                "max_tokens": 500
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"role": "assistant", "content": "Clear essay. Score: 82/100"}}]
            })))
            .mount(&server)
            .await;

        let scorer = OpenAiScorer::new("test-key", &config_for(&server)).unwrap();
        let content = scorer.review("An essay about systems.").await.unwrap();
        assert_eq!(content, "Clear essay. Score: 82/100");
    }

    #[tokio::test]
    async fn test_missing_content_is_empty() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "choices": [] })),
            )
            .mount(&server)
            .await;

        let scorer = OpenAiScorer::new("key", &config_for(&server)).unwrap();
        assert_eq!(scorer.review("text").await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_error_status() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
            .mount(&server)
            .await;

        let scorer = OpenAiScorer::new("key", &config_for(&server)).unwrap();
        let err = scorer.review("text").await.unwrap_err();
        assert!(matches!(err, ServiceError::Api { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_garbage_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let scorer = OpenAiScorer::new("key", &config_for(&server)).unwrap();
        let err = scorer.review("text").await.unwrap_err();
        assert!(matches!(err, ServiceError::Decode(_)));
    }
}
