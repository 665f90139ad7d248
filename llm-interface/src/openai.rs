use crate::LlmProvider;
use reqwest::{Client, StatusCode};
use research_core::{CoreError, LlmError};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

pub const OPENAI_MODEL: &str = "gpt-4o-mini";
const OPENAI_API_BASE: &str = "https://api.openai.com/v1";
const PROVIDER: &str = "openai";
const DEFAULT_RETRY_AFTER_SECS: u64 = 20;

pub struct OpenAiProvider {
    api_key: String,
    http_client: Client,
    base_url: String,
}

impl OpenAiProvider {
    pub fn new(api_key: String) -> Result<Self, CoreError> {
        Self::with_base_url(api_key, OPENAI_API_BASE)
    }

    /// For OpenAI-compatible endpoints and tests.
    pub fn with_base_url(api_key: String, base_url: &str) -> Result<Self, CoreError> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()?;

        Ok(Self {
            api_key,
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    content: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    error: ApiErrorDetail,
}

#[derive(Debug, Default, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    message: String,
    #[serde(default)]
    code: Option<String>,
}

impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn complete(&self, prompt: &str) -> Result<String, CoreError> {
        let url = format!("{}/chat/completions", self.base_url);
        let request = ChatCompletionRequest {
            model: OPENAI_MODEL,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
        };
        let start_time = Instant::now();

        info!("Requesting completion from {} ({})", PROVIDER, OPENAI_MODEL);
        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!("Network error calling {}: {}", PROVIDER, e);
                if e.is_timeout() {
                    CoreError::Llm(LlmError::RequestTimeout {
                        provider: PROVIDER.to_string(),
                    })
                } else {
                    CoreError::Network(e)
                }
            })?;

        let status = response.status();
        debug!("{} answered {} in {:?}", PROVIDER, status, start_time.elapsed());

        if !status.is_success() {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.trim().parse::<u64>().ok());
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ApiErrorBody>(&body)
                .unwrap_or_default()
                .error;
            error!("{} request failed with {}: {}", PROVIDER, status, detail.message);
            return Err(CoreError::Llm(status_error(status, detail, retry_after)));
        }

        let completion: ChatCompletionResponse = response.json().await.map_err(|e| {
            error!("Failed to parse {} completion: {}", PROVIDER, e);
            CoreError::Llm(LlmError::InvalidResponseFormat {
                provider: PROVIDER.to_string(),
            })
        })?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                warn!("{} returned no completion text", PROVIDER);
                CoreError::Llm(LlmError::InvalidResponseFormat {
                    provider: PROVIDER.to_string(),
                })
            })
    }
}

fn status_error(status: StatusCode, detail: ApiErrorDetail, retry_after: Option<u64>) -> LlmError {
    let provider = PROVIDER.to_string();
    match (status, detail.code.as_deref()) {
        (StatusCode::UNAUTHORIZED, _) => LlmError::InvalidApiKey { provider },
        (StatusCode::TOO_MANY_REQUESTS, Some("insufficient_quota")) => {
            LlmError::InsufficientCredits { provider }
        }
        (StatusCode::TOO_MANY_REQUESTS, _) => LlmError::RateLimitExceeded {
            provider,
            retry_after: retry_after.unwrap_or(DEFAULT_RETRY_AFTER_SECS),
        },
        (_, Some("model_not_found")) => LlmError::ModelNotAvailable {
            model: OPENAI_MODEL.to_string(),
        },
        (status, _) if status.is_server_error() => LlmError::ServiceUnavailable { provider },
        (status, _) => LlmError::RequestRejected {
            provider,
            status_code: status.as_u16(),
            message: detail.message,
        },
    }
}
