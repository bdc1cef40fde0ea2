//! 提交评分
//!
//! 配置了远程凭证且文本足够长时调用远程评分服务，否则（或远程失败时）
//! 使用本地规则评分。评分不访问存储。

pub mod extract;
pub mod fallback;
pub mod remote;
pub mod score;

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::EvaluationConfig;

pub use extract::extract_text;
pub use remote::{OpenAiScorer, RemoteScorer, ServiceError};
pub use score::{REMOTE_DEFAULT_SCORE, parse_score};

/// 短于此字符数的文本不发往远程服务
const REMOTE_MIN_CHARS: usize = 20;
/// 发往远程服务的最大字符数
const REMOTE_EXCERPT_CHARS: usize = 6000;

/// 评分来源
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationSource {
    Remote,
    Fallback,
}

impl std::fmt::Display for EvaluationSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EvaluationSource::Remote => write!(f, "remote"),
            EvaluationSource::Fallback => write!(f, "fallback"),
        }
    }
}

/// 评分结果
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Evaluation {
    pub feedback: String,
    pub score: u8,
    pub source: EvaluationSource,
}

/// 评分器
pub struct Evaluator {
    remote: Option<Arc<dyn RemoteScorer>>,
    timeout: Duration,
}

impl Evaluator {
    /// 有凭证时构造远程评分客户端；客户端构造失败只记日志并退回本地规则
    pub fn from_config(config: &EvaluationConfig) -> Self {
        let timeout = Duration::from_secs(config.timeout);

        let remote = config.credential().and_then(|key| {
            match OpenAiScorer::new(key, config) {
                Ok(scorer) => Some(Arc::new(scorer) as Arc<dyn RemoteScorer>),
                Err(e) => {
                    warn!("Remote evaluation disabled: {}", e);
                    None
                }
            }
        });

        if remote.is_some() {
            info!("Remote evaluation enabled ({})", config.model);
        } else {
            info!("No evaluation credential configured, using rule-based scoring");
        }

        Self { remote, timeout }
    }

    /// 只用本地规则
    pub fn fallback_only() -> Self {
        Self {
            remote: None,
            timeout: Duration::from_secs(EvaluationConfig::default().timeout),
        }
    }

    pub fn with_remote(remote: Arc<dyn RemoteScorer>, timeout: Duration) -> Self {
        Self {
            remote: Some(remote),
            timeout,
        }
    }

    /// 是否配置了远程评分
    pub fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    /// 评分；从不失败
    pub async fn evaluate(&self, text: &str) -> Evaluation {
        if let Some(remote) = &self.remote
            && text.chars().count() > REMOTE_MIN_CHARS
        {
            match self.review_remote(remote.as_ref(), text).await {
                Ok(feedback) => {
                    let score = parse_score(&feedback).unwrap_or(REMOTE_DEFAULT_SCORE);
                    debug!("Remote evaluation scored {}", score);
                    return Evaluation {
                        feedback,
                        score,
                        source: EvaluationSource::Remote,
                    };
                }
                Err(e) => {
                    warn!("Evaluation degraded to rule-based scoring: {}", e);
                }
            }
        }

        let (feedback, score) = fallback::evaluate(text);
        Evaluation {
            feedback,
            score,
            source: EvaluationSource::Fallback,
        }
    }

    async fn review_remote(
        &self,
        remote: &dyn RemoteScorer,
        text: &str,
    ) -> Result<String, ServiceError> {
        let excerpt: String = text.chars().take(REMOTE_EXCERPT_CHARS).collect();

        tokio::time::timeout(self.timeout, remote.review(&excerpt))
            .await
            .map_err(|_| ServiceError::Timeout(self.timeout.as_secs()))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const LONG_TEXT: &str = "This essay explains how durable storage keeps campus records safe.";

    /// 记录收到的摘录并返回固定结果
    struct ScriptedScorer {
        reply: Result<String, u16>,
        seen: Mutex<Vec<String>>,
    }

    impl ScriptedScorer {
        fn new(reply: Result<&str, u16>) -> Arc<Self> {
            Arc::new(Self {
                reply: reply.map(str::to_string),
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl RemoteScorer for ScriptedScorer {
        async fn review(&self, excerpt: &str) -> Result<String, ServiceError> {
            self.seen.lock().unwrap().push(excerpt.to_string());
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(status) => Err(ServiceError::Api {
                    status: *status,
                    message: "scripted".to_string(),
                }),
            }
        }
    }

    #[tokio::test]
    async fn test_remote_feedback_kept_verbatim() {
        let scorer = ScriptedScorer::new(Ok("Solid work overall. Score: 88/100"));
        let evaluator = Evaluator::with_remote(scorer.clone(), Duration::from_secs(5));

        let result = evaluator.evaluate(LONG_TEXT).await;
        assert_eq!(result.source, EvaluationSource::Remote);
        assert_eq!(result.score, 88);
        assert_eq!(result.feedback, "Solid work overall. Score: 88/100");
    }

    #[tokio::test]
    async fn test_unparseable_remote_score_defaults() {
        let scorer = ScriptedScorer::new(Ok("Nice structure, weak sources."));
        let evaluator = Evaluator::with_remote(scorer, Duration::from_secs(5));

        let result = evaluator.evaluate(LONG_TEXT).await;
        assert_eq!(result.source, EvaluationSource::Remote);
        assert_eq!(result.score, REMOTE_DEFAULT_SCORE);
    }

    #[tokio::test]
    async fn test_short_text_never_calls_remote() {
        let scorer = ScriptedScorer::new(Ok("Score: 99/100"));
        let evaluator = Evaluator::with_remote(scorer.clone(), Duration::from_secs(5));

        let result = evaluator.evaluate("too short").await;
        assert_eq!(result.source, EvaluationSource::Fallback);
        assert!(result.score <= 50);
        assert!(scorer.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_remote_failure_degrades() {
        let scorer = ScriptedScorer::new(Err(503));
        let evaluator = Evaluator::with_remote(scorer, Duration::from_secs(5));

        let result = evaluator.evaluate(LONG_TEXT).await;
        assert_eq!(result.source, EvaluationSource::Fallback);
        assert!(result.feedback.starts_with("**Evaluation (automated):**"));
    }

    #[tokio::test]
    async fn test_excerpt_is_capped() {
        let scorer = ScriptedScorer::new(Ok("Score: 70/100"));
        let evaluator = Evaluator::with_remote(scorer.clone(), Duration::from_secs(5));

        let text = "é".repeat(REMOTE_EXCERPT_CHARS + 100);
        evaluator.evaluate(&text).await;

        let seen = scorer.seen.lock().unwrap();
        assert_eq!(seen[0].chars().count(), REMOTE_EXCERPT_CHARS);
    }

    #[tokio::test]
    async fn test_http_scorer_end_to_end() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"role": "assistant", "content": "Relevance is strong. 91%"}}]
            })))
            .mount(&server)
            .await;

        let config = EvaluationConfig {
            api_key: Some("sk-test".to_string()),
            base_url: server.uri(),
            ..EvaluationConfig::default()
        };
        let evaluator = Evaluator::from_config(&config);
        assert!(evaluator.has_remote());

        let result = evaluator.evaluate(LONG_TEXT).await;
        assert_eq!(result.source, EvaluationSource::Remote);
        assert_eq!(result.score, 91);
    }

    #[tokio::test]
    async fn test_http_error_falls_back() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let config = EvaluationConfig {
            api_key: Some("sk-test".to_string()),
            base_url: server.uri(),
            ..EvaluationConfig::default()
        };
        let result = Evaluator::from_config(&config).evaluate(LONG_TEXT).await;
        assert_eq!(result.source, EvaluationSource::Fallback);
        assert_eq!(result.score, 50);
    }

    #[test]
    fn test_no_credential_means_fallback_only() {
        assert!(!Evaluator::from_config(&EvaluationConfig::default()).has_remote());
        assert!(!Evaluator::fallback_only().has_remote());
    }
}
