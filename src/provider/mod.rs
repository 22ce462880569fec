//! AI provider gateway.
//!
//! Every backend exposes the same two capabilities: a cheap "ping" that
//! proves the credentials work, and a single-shot completion that turns a
//! prompt into raw text. [`Provider`] is the closed set of backends, built
//! from the configured identifier by [`Provider::from_config`].

mod openai;
mod yandex;

pub use openai::OpenAiProvider;
pub use yandex::YandexProvider;

use crate::config::GlobalConfiguration;
use crate::error::{Result, TranslatorError};
use crate::retry::RetryConfig;
use reqwest::StatusCode;
use std::fmt;
use std::future::Future;
use std::str::FromStr;
use std::time::Duration;

/// Instruction given to every backend ahead of the prompt.
pub(crate) const TRANSLATOR_ROLE: &str =
    "You are a professional translator specialized in UI/UX localization.";

/// Message sent when checking credentials.
pub(crate) const PING_MESSAGE: &str = "Ping";

/// Uniform capability over AI backends.
pub trait TranslationProvider {
    /// Issue a lightweight request proving the credentials are accepted.
    fn validate_credentials(&self) -> impl Future<Output = Result<()>> + Send;

    /// Send `prompt` and return the model's raw text answer.
    fn translate(&self, prompt: &str) -> impl Future<Output = Result<String>> + Send;
}

/// Supported provider identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    OpenAi,
    Yandex,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Yandex => "yandex",
        }
    }

    /// Whether the provider needs the secondary credential (`aiFolder`).
    pub fn requires_folder(&self) -> bool {
        matches!(self, Self::Yandex)
    }
}

impl FromStr for ProviderKind {
    type Err = TranslatorError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "yandex" => Ok(Self::Yandex),
            other => Err(TranslatorError::Configuration(format!(
                "Unsupported AI provider: '{}' (expected 'openai' or 'yandex')",
                other
            ))),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The configured backend.
#[derive(Debug)]
pub enum Provider {
    OpenAi(OpenAiProvider),
    Yandex(YandexProvider),
}

impl Provider {
    /// Build the backend selected by `aiProvider`.
    ///
    /// Fails before any network traffic when the provider needs a credential
    /// the configuration does not supply.
    pub fn from_config(config: &GlobalConfiguration) -> Result<Self> {
        let folder = config.ai_folder.as_deref();
        if config.ai_provider.requires_folder() && folder.is_none() {
            return Err(TranslatorError::Configuration(format!(
                "Folder ID (aiFolder) is required for provider '{}'",
                config.ai_provider
            )));
        }

        let client = build_client(config.ai_timeout)?;
        let retry = RetryConfig::provider_call();

        let provider = match config.ai_provider {
            ProviderKind::OpenAi => Self::OpenAi(OpenAiProvider::new(
                client,
                &config.ai_key,
                config.ai_model.as_deref(),
                config.ai_endpoint.as_deref(),
                retry,
            )),
            ProviderKind::Yandex => Self::Yandex(YandexProvider::new(
                client,
                &config.ai_key,
                folder.unwrap_or_default(),
                config.ai_model.as_deref(),
                config.ai_endpoint.as_deref(),
                retry,
            )),
        };

        Ok(provider)
    }

    pub fn kind(&self) -> ProviderKind {
        match self {
            Self::OpenAi(_) => ProviderKind::OpenAi,
            Self::Yandex(_) => ProviderKind::Yandex,
        }
    }
}

impl TranslationProvider for Provider {
    async fn validate_credentials(&self) -> Result<()> {
        match self {
            Self::OpenAi(provider) => provider.validate_credentials().await,
            Self::Yandex(provider) => provider.validate_credentials().await,
        }
    }

    async fn translate(&self, prompt: &str) -> Result<String> {
        match self {
            Self::OpenAi(provider) => provider.translate(prompt).await,
            Self::Yandex(provider) => provider.translate(prompt).await,
        }
    }
}

fn build_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| TranslatorError::Configuration(format!("Failed to build HTTP client: {}", e)))
}

/// Join a base URL and an API path, tolerating a trailing slash on the base.
pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}

/// Map a non-success HTTP status to the error taxonomy.
///
/// 401/403 are credential problems; 429 and 5xx are transient; any other
/// status is a permanent request failure.
pub(crate) fn status_error(service: &str, status: StatusCode, body: &str) -> TranslatorError {
    let message = format!("{} API error ({}): {}", service, status, body);
    match status.as_u16() {
        401 | 403 => TranslatorError::Authentication(format!(
            "Invalid API key or access denied. {}",
            message
        )),
        429 | 500..=599 => TranslatorError::transient(message),
        _ => TranslatorError::provider(message),
    }
}

/// Map a transport failure (connect, timeout, body read) to a retryable error.
pub(crate) fn transport_error(service: &str, error: reqwest::Error) -> TranslatorError {
    TranslatorError::transient(format!("Failed to send request to {} API: {}", service, error))
}
