use std::time::Duration;
use async_trait::async_trait;
use serde::{Serialize, Deserialize};
use reqwest::Client;
use log::error;

use crate::errors::ProviderError;
use crate::providers::Provider;

/// Gemini client for interacting with the Google Gemini API
#[derive(Debug)]
pub struct Gemini {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// API endpoint URL (optional, defaults to the public API)
    endpoint: String,
    /// Model name used for generation
    model: String,
}

/// Gemini content-generation request
#[derive(Debug, Serialize)]
pub struct GeminiRequest {
    /// The conversation contents
    contents: Vec<GeminiContent>,

    /// Generation parameters
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GeminiGenerationConfig>,
}

/// A single content block in a Gemini request or response
#[derive(Debug, Serialize, Deserialize)]
pub struct GeminiContent {
    /// The parts of the content
    pub parts: Vec<GeminiPart>,

    /// Role of the content author (user, model)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// A text part of a content block
#[derive(Debug, Serialize, Deserialize)]
pub struct GeminiPart {
    /// The text payload
    pub text: String,
}

/// Generation parameters for the Gemini API
#[derive(Debug, Serialize)]
pub struct GeminiGenerationConfig {
    /// Temperature for generation
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,

    /// Maximum number of tokens to generate
    #[serde(rename = "maxOutputTokens", skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

/// Gemini response
#[derive(Debug, Deserialize)]
pub struct GeminiResponse {
    /// Generated candidates, highest ranked first
    #[serde(default)]
    pub candidates: Vec<GeminiCandidate>,
}

/// A single generated candidate
#[derive(Debug, Deserialize)]
pub struct GeminiCandidate {
    /// The generated content
    pub content: Option<GeminiContent>,
}

/// Error payload returned by the Gemini API
#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    error: Option<GeminiErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorDetail {
    #[serde(default)]
    message: String,
}

impl GeminiRequest {
    /// Create a request from a single user prompt
    pub fn from_prompt(prompt: impl Into<String>) -> Self {
        Self {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart { text: prompt.into() }],
                role: Some("user".to_string()),
            }],
            generation_config: None,
        }
    }

    /// Set the temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        let config = self.generation_config.get_or_insert(GeminiGenerationConfig {
            temperature: None,
            max_output_tokens: None,
        });
        config.temperature = Some(temperature);
        self
    }

    /// Set the maximum output token count
    pub fn max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        let config = self.generation_config.get_or_insert(GeminiGenerationConfig {
            temperature: None,
            max_output_tokens: None,
        });
        config.max_output_tokens = Some(max_output_tokens);
        self
    }
}

impl Gemini {
    /// Create a new Gemini client
    pub fn new(
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
        model: impl Into<String>,
        timeout_secs: u64,
    ) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            endpoint: endpoint.into(),
            model: model.into(),
        }
    }

    fn api_url(&self) -> String {
        let base = if self.endpoint.is_empty() {
            "https://generativelanguage.googleapis.com"
        } else {
            self.endpoint.trim_end_matches('/')
        };
        format!("{}/v1beta/models/{}:generateContent", base, self.model)
    }

    /// Extract text from a Gemini response
    pub fn extract_text_from_response(response: &GeminiResponse) -> String {
        response
            .candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .map(|part| part.text.as_str())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default()
    }
}

#[async_trait]
impl Provider for Gemini {
    type Request = GeminiRequest;
    type Response = GeminiResponse;

    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError> {
        if self.api_key.is_empty() {
            return Err(ProviderError::AuthenticationError(
                "Gemini API key is not set".to_string(),
            ));
        }

        let response = self.client.post(self.api_url())
            .header("Content-Type", "application/json")
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() || e.is_connect() {
                    ProviderError::ConnectionError(e.to_string())
                } else {
                    ProviderError::RequestFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            let message = serde_json::from_str::<GeminiErrorBody>(&body)
                .ok()
                .and_then(|parsed| parsed.error)
                .map(|detail| detail.message)
                .filter(|m| !m.is_empty())
                .unwrap_or(body);
            error!("Gemini API error ({}): {}", status, message);

            if status.as_u16() == 401 || status.as_u16() == 403 {
                return Err(ProviderError::AuthenticationError(message));
            }
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message,
            });
        }

        response.json::<GeminiResponse>().await
            .map_err(|e| ProviderError::ParseError(e.to_string()))
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        let request = GeminiRequest::from_prompt("Hello").max_output_tokens(10);
        self.complete(request).await?;
        Ok(())
    }

    fn extract_text(response: &Self::Response) -> String {
        Self::extract_text_from_response(response)
    }
}
