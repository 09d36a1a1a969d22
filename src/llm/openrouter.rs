//! OpenRouter chat-completions client
//!
//! Implements the CompletionProvider trait for any OpenAI-compatible
//! `/chat/completions` endpoint; OpenRouter is the default.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::client::{CompletionProvider, ProviderError};
use super::types::{ChatCompletionBody, CompletionRequest, CompletionResponse};

/// OpenRouter chat-completions URL
pub const OPENROUTER_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Environment variable holding the API key
pub const DEFAULT_API_KEY_ENV: &str = "OPENROUTER_API_KEY";

/// Configuration for the OpenRouter client
#[derive(Debug, Clone)]
pub struct OpenRouterConfig {
    pub base_url: String,
    /// Sent as `X-Title` for attribution on the provider dashboard
    pub app_title: String,
    /// Sent as `HTTP-Referer` when present
    pub referer: Option<String>,
    /// No timeout when None
    pub timeout: Option<Duration>,
}

impl Default for OpenRouterConfig {
    fn default() -> Self {
        Self {
            base_url: OPENROUTER_API_URL.to_string(),
            app_title: "Ciência Pedagogia".to_string(),
            referer: None,
            timeout: None,
        }
    }
}

/// Chat-completions client
pub struct OpenRouterClient {
    client: Client,
    api_key: String,
    config: OpenRouterConfig,
}

impl OpenRouterClient {
    /// Create a client reading the API key from `api_key_env`
    pub fn from_env(api_key_env: &str, config: OpenRouterConfig) -> Result<Self, ProviderError> {
        let api_key = std::env::var(api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ProviderError::MissingApiKey {
                env_var: api_key_env.to_string(),
            })?;

        Self::with_api_key(api_key, config)
    }

    /// Create a client with an explicit API key
    pub fn with_api_key(api_key: String, config: OpenRouterConfig) -> Result<Self, ProviderError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            api_key,
            config,
        })
    }

    pub fn config(&self) -> &OpenRouterConfig {
        &self.config
    }
}

#[async_trait]
impl CompletionProvider for OpenRouterClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, ProviderError> {
        log::info!(
            "Requesting completion from {} (model {}, {} messages)",
            self.config.base_url,
            request.model,
            request.messages.len()
        );

        let mut builder = self
            .client
            .post(&self.config.base_url)
            .bearer_auth(&self.api_key)
            .header("X-Title", &self.config.app_title)
            .json(&request);
        if let Some(referer) = &self.config.referer {
            builder = builder.header("HTTP-Referer", referer);
        }

        let response = builder.send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: ChatCompletionBody = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        let completion = body.into_response()?;
        log::debug!(
            "Completion received: {} chars, {} tokens",
            completion.content.len(),
            completion.usage.total()
        );
        Ok(completion)
    }
}

impl std::fmt::Debug for OpenRouterClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenRouterClient")
            .field("base_url", &self.config.base_url)
            .field("app_title", &self.config.app_title)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = OpenRouterConfig::default();
        assert_eq!(config.base_url, OPENROUTER_API_URL);
        assert!(config.timeout.is_none());
        assert!(config.referer.is_none());
    }

    #[test]
    fn test_client_without_api_key() {
        let result = OpenRouterClient::from_env("REDATOR_TEST_KEY_THAT_IS_NEVER_SET", OpenRouterConfig::default());
        assert!(matches!(result, Err(ProviderError::MissingApiKey { .. })));
    }

    #[test]
    fn test_client_with_api_key() {
        let config = OpenRouterConfig {
            timeout: Some(Duration::from_secs(5)),
            ..Default::default()
        };
        let client = OpenRouterClient::with_api_key("test-key".to_string(), config).unwrap();
        assert_eq!(client.config().timeout, Some(Duration::from_secs(5)));
    }
}
