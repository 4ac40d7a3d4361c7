/*!
 * Core assistant service implementation.
 *
 * This module contains the AssistantService struct, which wraps the
 * configured LLM provider behind summarize and translate operations. The
 * service is constructed explicitly and carries its initialization outcome:
 * a missing API key surfaces as a typed configuration error at construction
 * time instead of failing ambiently on first use.
 */

use std::time::Duration;
use log::{debug, warn};

use crate::app_config::{AssistantCommonConfig, AssistantConfig, AssistantProvider as ConfigAssistantProvider};
use crate::errors::ProviderError;
use crate::providers::Provider;
use crate::providers::gemini::{Gemini, GeminiRequest};
use crate::providers::mock::{MockProvider, MockRequest};
use crate::providers::ollama::{Ollama, GenerationRequest};
use super::prompts;

/// Assistant provider implementation variants
enum AssistantProviderImpl {
    /// Google Gemini API service
    Gemini {
        /// Client instance
        client: Gemini,
    },

    /// Ollama local LLM service
    Ollama {
        /// Client instance
        client: Ollama,
    },

    /// Scripted mock provider for tests
    Mock {
        /// Client instance
        client: MockProvider,
    },
}

/// Summarization and translation service backed by an LLM provider
pub struct AssistantService {
    /// Provider implementation
    provider: AssistantProviderImpl,

    /// Common settings (retries, backoff, temperature)
    common: AssistantCommonConfig,
}

impl AssistantService {
    /// Create a new assistant service with the given configuration.
    ///
    /// Fails with a typed configuration error when the selected provider
    /// cannot be constructed (e.g. Gemini without an API key).
    pub fn new(config: AssistantConfig) -> Result<Self, ProviderError> {
        let provider = match config.provider {
            ConfigAssistantProvider::Gemini => {
                let api_key = config.get_api_key();
                if api_key.is_empty() {
                    return Err(ProviderError::AuthenticationError(
                        "Gemini API key is not set; summarization and translation are unavailable".to_string(),
                    ));
                }
                AssistantProviderImpl::Gemini {
                    client: Gemini::new(
                        api_key,
                        config.get_endpoint(),
                        config.get_model(),
                        config.get_timeout_secs(),
                    ),
                }
            },
            ConfigAssistantProvider::Ollama => {
                AssistantProviderImpl::Ollama {
                    client: Ollama::new(
                        config.get_endpoint(),
                        config.get_model(),
                        config.get_timeout_secs(),
                    ),
                }
            },
        };

        Ok(Self {
            provider,
            common: config.common,
        })
    }

    /// Create a service backed by a scripted mock provider, for tests.
    ///
    /// Retries are disabled so failure scenarios stay fast.
    pub fn with_mock(client: MockProvider) -> Self {
        Self {
            provider: AssistantProviderImpl::Mock { client },
            common: AssistantCommonConfig {
                retry_count: 0,
                retry_backoff_ms: 10,
                ..AssistantCommonConfig::default()
            },
        }
    }

    /// Summarize a page body. Returns the raw model output (uncleaned).
    pub async fn summarize(&self, text: &str) -> Result<String, ProviderError> {
        debug!("Summarizing {} characters of content", text.chars().count());
        self.generate(prompts::summary_prompt(text)).await
    }

    /// Translate a text into the named target language. Returns the raw
    /// model output (uncleaned).
    pub async fn translate(
        &self,
        text: &str,
        target_language_name: &str,
    ) -> Result<String, ProviderError> {
        debug!("Translating {} characters into {}", text.chars().count(), target_language_name);
        self.generate(prompts::translation_prompt(text, target_language_name)).await
    }

    /// Test the connection to the configured provider
    pub async fn test_connection(&self) -> Result<(), ProviderError> {
        match &self.provider {
            AssistantProviderImpl::Gemini { client } => client.test_connection().await,
            AssistantProviderImpl::Ollama { client } => client.test_connection().await,
            AssistantProviderImpl::Mock { client } => client.test_connection().await,
        }
    }

    /// Run a single prompt through the provider, retrying transient failures
    /// with exponential backoff. Configuration errors are never retried: they
    /// are persistent until the service is reconstructed.
    async fn generate(&self, prompt: String) -> Result<String, ProviderError> {
        let max_attempts = self.common.retry_count + 1;
        let mut last_error = None;

        for attempt in 0..max_attempts {
            if attempt > 0 {
                let backoff = self.common.retry_backoff_ms * (1 << (attempt - 1));
                warn!("Provider request failed, retrying in {} ms (attempt {}/{})",
                    backoff, attempt + 1, max_attempts);
                tokio::time::sleep(Duration::from_millis(backoff)).await;
            }

            match self.complete_once(&prompt).await {
                Ok(text) if text.trim().is_empty() => {
                    last_error = Some(ProviderError::ParseError(
                        "Provider returned an empty response".to_string(),
                    ));
                }
                Ok(text) => return Ok(text),
                Err(error) => {
                    if error.is_configuration_error() {
                        return Err(error);
                    }
                    last_error = Some(error);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            ProviderError::RequestFailed("Provider request failed".to_string())
        }))
    }

    async fn complete_once(&self, prompt: &str) -> Result<String, ProviderError> {
        match &self.provider {
            AssistantProviderImpl::Gemini { client } => {
                let request = GeminiRequest::from_prompt(prompt)
                    .temperature(self.common.temperature);
                let response = client.complete(request).await?;
                Ok(Gemini::extract_text(&response))
            },
            AssistantProviderImpl::Ollama { client } => {
                let request = GenerationRequest::new(client.model(), prompt)
                    .temperature(self.common.temperature);
                let response = client.complete(request).await?;
                Ok(Ollama::extract_text(&response))
            },
            AssistantProviderImpl::Mock { client } => {
                let request = MockRequest { prompt: prompt.to_string() };
                let response = client.complete(request).await?;
                Ok(MockProvider::extract_text(&response))
            },
        }
    }
}
