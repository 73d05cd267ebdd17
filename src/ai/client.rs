//! OpenAI 兼容的 chat/completions 客户端
//!
//! 默认指向 OpenRouter；在 408/429/5xx 和网络错误时按指数退避重试。

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::sleep;
use tracing::{debug, error, warn};

use crate::config::LlmConfig;
use crate::errors::{Result, TutorError};

const BASE_BACKOFF_MS: u64 = 200;
const MAX_BACKOFF_MS: u64 = 5_000;

/// 消息内容：纯文本，或文本与图片混合
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Clone, Serialize)]
pub struct ImageUrl {
    pub url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: MessageContent,
}

impl ChatMessage {
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: "system",
            content: MessageContent::Text(text.into()),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: "user",
            content: MessageContent::Text(text.into()),
        }
    }

    /// 带一张图片的用户消息
    pub fn user_with_image(text: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self {
            role: "user",
            content: MessageContent::Parts(vec![
                ContentPart::ImageUrl {
                    image_url: ImageUrl {
                        url: image_url.into(),
                    },
                },
                ContentPart::Text { text: text.into() },
            ]),
        }
    }
}

/// 一次补全请求
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatResponse {
    model: Option<String>,
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatChoice {
    message: ChatReplyMessage,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatReplyMessage {
    content: Option<String>,
}

/// 补全结果
#[derive(Debug, Clone)]
pub struct ChatCompletion {
    pub model: String,
    pub content: String,
}

#[derive(Clone)]
pub struct LlmClient {
    config: LlmConfig,
    endpoint: String,
    client: reqwest::Client,
}

impl LlmClient {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| TutorError::llm_config(format!("无法创建 HTTP 客户端: {e}")))?;

        Ok(Self {
            endpoint: normalize_endpoint(&config.base_url),
            config: config.clone(),
            client,
        })
    }

    pub fn is_available(&self) -> bool {
        !self.config.api_key.trim().is_empty() && !self.endpoint.is_empty()
    }

    pub fn text_model(&self) -> &str {
        &self.config.text_model
    }

    pub fn vision_model(&self) -> &str {
        &self.config.vision_model
    }

    /// 发送补全请求，返回第一条回复
    pub async fn complete(&self, request: &ChatRequest) -> Result<ChatCompletion> {
        if !self.is_available() {
            return Err(TutorError::llm_config("LLM API key is not configured"));
        }

        let url = format!("{}/chat/completions", self.endpoint);
        let response = self.post_with_retry(&url, request).await?;

        let model = response
            .model
            .unwrap_or_else(|| request.model.clone());
        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| TutorError::llm_response("Model returned an empty reply"))?;

        Ok(ChatCompletion { model, content })
    }

    async fn post_with_retry(&self, url: &str, payload: &ChatRequest) -> Result<ChatResponse> {
        let max_retries = self.config.max_retries;
        let mut attempt: u32 = 0;

        loop {
            let mut builder = self
                .client
                .post(url)
                .bearer_auth(self.config.api_key.trim())
                .json(payload);
            if !self.config.site_url.is_empty() {
                builder = builder.header("HTTP-Referer", &self.config.site_url);
            }

            let err = match builder.send().await {
                Ok(resp) => {
                    let status = resp.status();
                    if status.is_success() {
                        let bytes = resp.bytes().await?;
                        return serde_json::from_slice(&bytes).map_err(|e| {
                            error!(
                                "Failed to parse LLM response JSON: {}. Body: {}",
                                e,
                                String::from_utf8_lossy(&bytes)
                            );
                            TutorError::llm_response(format!("无法解析模型响应: {e}"))
                        });
                    }

                    let body = resp.text().await.unwrap_or_default();
                    if !is_retryable(status) {
                        return Err(TutorError::llm_request(format!("HTTP {status}: {body}")));
                    }
                    TutorError::llm_request(format!("HTTP {status}: {body}"))
                }
                Err(e) => TutorError::from(e),
            };

            if attempt >= max_retries {
                return Err(err);
            }

            let backoff = backoff_delay(attempt);
            warn!(attempt, ?backoff, "LLM request failed, retrying: {}", err);
            sleep(backoff).await;
            attempt += 1;
            debug!(attempt, "Retrying LLM request");
        }
    }
}

/// 统一成以 `/v1` 结尾、不带尾部斜杠的地址
pub(crate) fn normalize_endpoint(endpoint: &str) -> String {
    let trimmed = endpoint.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return String::new();
    }
    if trimmed.ends_with("/v1") || trimmed.contains("/v1/") {
        trimmed.to_string()
    } else {
        format!("{trimmed}/v1")
    }
}

pub(crate) fn is_retryable(status: reqwest::StatusCode) -> bool {
    status == reqwest::StatusCode::TOO_MANY_REQUESTS
        || status == reqwest::StatusCode::REQUEST_TIMEOUT
        || status.is_server_error()
}

pub(crate) fn backoff_delay(attempt: u32) -> Duration {
    let factor = 1u64.checked_shl(attempt).unwrap_or(u64::MAX);
    Duration::from_millis(BASE_BACKOFF_MS.saturating_mul(factor).min(MAX_BACKOFF_MS))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(api_key: &str) -> LlmConfig {
        LlmConfig {
            api_key: api_key.to_string(),
            base_url: "https://openrouter.ai/api/v1/".to_string(),
            text_model: "openai/gpt-4o-mini".to_string(),
            vision_model: "openai/gpt-4o".to_string(),
            timeout_ms: 1_000,
            max_retries: 0,
            site_url: String::new(),
        }
    }

    #[test]
    fn test_normalize_endpoint() {
        assert_eq!(
            normalize_endpoint("https://openrouter.ai/api/v1/"),
            "https://openrouter.ai/api/v1"
        );
        assert_eq!(
            normalize_endpoint("https://api.openai.com"),
            "https://api.openai.com/v1"
        );
        assert_eq!(normalize_endpoint("  "), "");
    }

    #[test]
    fn test_retryable_statuses() {
        assert!(is_retryable(reqwest::StatusCode::TOO_MANY_REQUESTS));
        assert!(is_retryable(reqwest::StatusCode::REQUEST_TIMEOUT));
        assert!(is_retryable(reqwest::StatusCode::BAD_GATEWAY));
        assert!(!is_retryable(reqwest::StatusCode::UNAUTHORIZED));
        assert!(!is_retryable(reqwest::StatusCode::BAD_REQUEST));
    }

    #[test]
    fn test_backoff_is_capped() {
        assert_eq!(backoff_delay(0), Duration::from_millis(200));
        assert_eq!(backoff_delay(2), Duration::from_millis(800));
        assert_eq!(backoff_delay(40), Duration::from_millis(MAX_BACKOFF_MS));
        assert_eq!(backoff_delay(200), Duration::from_millis(MAX_BACKOFF_MS));
    }

    #[test]
    fn test_image_message_shape() {
        let msg = ChatMessage::user_with_image("Extract", "https://img.example/q.png");
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["role"], "user");
        assert_eq!(value["content"][0]["type"], "image_url");
        assert_eq!(value["content"][0]["image_url"]["url"], "https://img.example/q.png");
        assert_eq!(value["content"][1]["type"], "text");

        let plain = serde_json::to_value(ChatMessage::system("hi")).unwrap();
        assert_eq!(plain["content"], "hi");
    }

    #[tokio::test]
    async fn test_complete_without_key_is_config_error() {
        let client = LlmClient::new(&config("")).unwrap();
        assert!(!client.is_available());
        let request = ChatRequest {
            model: client.text_model().to_string(),
            messages: vec![ChatMessage::user("hello")],
            temperature: 0.2,
            max_tokens: 10,
        };
        let err = client.complete(&request).await.unwrap_err();
        assert!(matches!(err, TutorError::LlmConfig(_)));
    }
}
