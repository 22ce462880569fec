use super::{
    join_url, status_error, transport_error, TranslationProvider, PING_MESSAGE, TRANSLATOR_ROLE,
};
use crate::error::{Result, TranslatorError};
use crate::retry::{retry_transient, RetryConfig};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

const SERVICE: &str = "OpenAI";
const DEFAULT_BASE_URL: &str = "https://api.openai.com";
const CHAT_COMPLETIONS_PATH: &str = "/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "gpt-4.1-mini";
const TEMPERATURE: f32 = 0.7;

/// OpenAI Chat Completion request
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    temperature: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// REST chat-completion backend (OpenAI or any compatible endpoint).
pub struct OpenAiProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
    url: String,
    retry: RetryConfig,
}

impl OpenAiProvider {
    pub fn new(
        client: reqwest::Client,
        api_key: &str,
        model: Option<&str>,
        base_url: Option<&str>,
        retry: RetryConfig,
    ) -> Self {
        Self {
            client,
            api_key: api_key.to_string(),
            model: model.unwrap_or(DEFAULT_MODEL).to_string(),
            url: join_url(base_url.unwrap_or(DEFAULT_BASE_URL), CHAT_COMPLETIONS_PATH),
            retry,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn request(&self, messages: Vec<Message>) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages,
            temperature: TEMPERATURE,
        }
    }

    /// Send one chat request (with retries) and return the choices.
    async fn complete(&self, request: &ChatRequest, operation: &str) -> Result<Vec<Choice>> {
        let response = retry_transient(
            &self.retry,
            operation,
            || async {
                let response = self
                    .client
                    .post(&self.url)
                    .bearer_auth(&self.api_key)
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

                response.json::<ChatResponse>().await.map_err(|e| {
                    TranslatorError::transient(format!(
                        "Failed to parse {} response: {}",
                        SERVICE, e
                    ))
                })
            },
        )
        .await?;

        Ok(response.choices)
    }
}

impl fmt::Debug for OpenAiProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("model", &self.model)
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}

impl TranslationProvider for OpenAiProvider {
    async fn validate_credentials(&self) -> Result<()> {
        debug!("Validating OpenAI credentials with model {}", self.model);

        let request = self.request(vec![Message {
            role: "user".to_string(),
            content: PING_MESSAGE.to_string(),
        }]);

        let choices = self.complete(&request, "OpenAI credential check").await?;
        if choices.is_empty() {
            return Err(TranslatorError::Authentication(
                "Unauthorized: OpenAI returned no response to ping. Invalid API key or access denied."
                    .to_string(),
            ));
        }

        debug!("OpenAI client initialized successfully");
        Ok(())
    }

    async fn translate(&self, prompt: &str) -> Result<String> {
        debug!("Translating via OpenAI ({} prompt bytes)", prompt.len());

        let request = self.request(vec![
            Message {
                role: "system".to_string(),
                content: TRANSLATOR_ROLE.to_string(),
            },
            Message {
                role: "user".to_string(),
                content: prompt.to_string(),
            },
        ]);

        let choices = self.complete(&request, "OpenAI translation").await?;
        choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| TranslatorError::provider("No translation response received."))
    }
}
