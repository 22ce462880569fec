use super::{
    join_url, status_error, transport_error, TranslationProvider, PING_MESSAGE, TRANSLATOR_ROLE,
};
use crate::error::{Result, TranslatorError};
use crate::retry::{retry_transient, RetryConfig};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

const SERVICE: &str = "YandexGPT";
const DEFAULT_BASE_URL: &str = "https://llm.api.cloud.yandex.net";
const COMPLETION_PATH: &str = "/foundationModels/v1/completion";
pub const DEFAULT_MODEL: &str = "yandexgpt-lite";
const TEMPERATURE: f32 = 0.5;
const MAX_TOKENS: &str = "8000";

/// IAM tokens carry this prefix; anything else is treated as an API key.
const IAM_TOKEN_PREFIX: &str = "t1.";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CompletionRequest {
    model_uri: String,
    completion_options: CompletionOptions,
    messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CompletionOptions {
    stream: bool,
    temperature: f32,
    /// The API takes an int64 encoded as a string.
    max_tokens: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct Message {
    role: String,
    text: String,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    result: Option<CompletionResult>,
}

#[derive(Debug, Deserialize)]
struct CompletionResult {
    #[serde(default)]
    alternatives: Vec<Alternative>,
}

#[derive(Debug, Deserialize)]
struct Alternative {
    message: Message,
}

/// Yandex Cloud foundation-models completion backend.
pub struct YandexProvider {
    client: reqwest::Client,
    api_key: String,
    folder_id: String,
    model: String,
    url: String,
    retry: RetryConfig,
}

impl YandexProvider {
    /// Every request is scoped to `folder_id`.
    pub fn new(
        client: reqwest::Client,
        api_key: &str,
        folder_id: &str,
        model: Option<&str>,
        base_url: Option<&str>,
        retry: RetryConfig,
    ) -> Self {
        Self {
            client,
            api_key: api_key.to_string(),
            folder_id: folder_id.to_string(),
            model: model.unwrap_or(DEFAULT_MODEL).to_string(),
            url: join_url(base_url.unwrap_or(DEFAULT_BASE_URL), COMPLETION_PATH),
            retry,
        }
    }

    fn model_uri(&self) -> String {
        format!("gpt://{}/{}", self.folder_id, self.model)
    }

    fn authorization(&self) -> String {
        if self.api_key.starts_with(IAM_TOKEN_PREFIX) {
            format!("Bearer {}", self.api_key)
        } else {
            format!("Api-Key {}", self.api_key)
        }
    }

    fn request(&self, text: String) -> CompletionRequest {
        CompletionRequest {
            model_uri: self.model_uri(),
            completion_options: CompletionOptions {
                stream: false,
                temperature: TEMPERATURE,
                max_tokens: MAX_TOKENS.to_string(),
            },
            messages: vec![Message {
                role: "user".to_string(),
                text,
            }],
        }
    }

    async fn complete(&self, request: &CompletionRequest, operation: &str) -> Result<Vec<Alternative>> {
        let response = retry_transient(
            &self.retry,
            operation,
            || async {
                let response = self
                    .client
                    .post(&self.url)
                    .header("Authorization", self.authorization())
                    .header("x-folder-id", &self.folder_id)
                    .json(request)
                    .send()
                    .await
                    .map_err(|e| transport_error(SERVICE, e))?;

                let status = response.status();
                if !status.is_success() {
                    let body = response
                        .text()
                        .await
                        .unwrap_or_else(|e| format!("<failed to read body: {}>", e));
                    return Err(status_error(SERVICE, status, &body));
                }

                response.json::<CompletionResponse>().await.map_err(|e| {
                    TranslatorError::transient(format!(
                        "Failed to parse {} response: {}",
                        SERVICE, e
                    ))
                })
            },
        )
        .await?;

        Ok(response
            .result
            .map(|result| result.alternatives)
            .unwrap_or_default())
    }
}

impl fmt::Debug for YandexProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("YandexProvider")
            .field("folder_id", &self.folder_id)
            .field("model", &self.model)
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}

impl TranslationProvider for YandexProvider {
    async fn validate_credentials(&self) -> Result<()> {
        debug!("Validating YandexGPT credentials for {}", self.model_uri());

        let request = self.request(PING_MESSAGE.to_string());
        let alternatives = self.complete(&request, "YandexGPT credential check").await?;
        if alternatives.is_empty() {
            return Err(TranslatorError::Authentication(
                "Unauthorized: YandexGPT returned no response to ping. Invalid API key or access denied."
                    .to_string(),
            ));
        }

        debug!("YandexGPT client initialized successfully");
        Ok(())
    }

    async fn translate(&self, prompt: &str) -> Result<String> {
        debug!("Translating via YandexGPT ({} prompt bytes)", prompt.len());

        // The completion endpoint is used single-turn, so the role goes in front.
        let request = self.request(format!("{}\n{}", TRANSLATOR_ROLE, prompt));
        let alternatives = self.complete(&request, "YandexGPT translation").await?;

        alternatives
            .into_iter()
            .next()
            .map(|alternative| alternative.message.text)
            .ok_or_else(|| TranslatorError::provider("No translation response received."))
    }
}
