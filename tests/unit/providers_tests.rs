/*!
 * Tests for provider request shapes and assistant behavior
 */

use pagevoice::assistant::AssistantService;
use pagevoice::errors::ProviderError;
use pagevoice::providers::Provider;
use pagevoice::providers::gemini::{Gemini, GeminiRequest, GeminiResponse};
use pagevoice::providers::mock::MockProvider;
use pagevoice::providers::ollama::{GenerationRequest, GenerationResponse, Ollama};

#[test]
fn test_geminiRequest_shouldSerializeToApiShape() {
    // 0.5 is exactly representable, so the f32 -> json comparison is stable
    let request = GeminiRequest::from_prompt("Summarize this")
        .temperature(0.5)
        .max_output_tokens(256);

    let value = serde_json::to_value(&request).unwrap();
    assert_eq!(value["contents"][0]["role"], "user");
    assert_eq!(value["contents"][0]["parts"][0]["text"], "Summarize this");
    assert_eq!(value["generationConfig"]["temperature"], 0.5);
    assert_eq!(value["generationConfig"]["maxOutputTokens"], 256);
}

#[test]
fn test_geminiRequest_withoutGenerationConfig_shouldOmitTheField() {
    let request = GeminiRequest::from_prompt("Hello");
    let value = serde_json::to_value(&request).unwrap();
    assert!(value.get("generationConfig").is_none());
}

#[test]
fn test_geminiResponse_shouldDeserializeAndJoinParts() {
    let json = r#"{
        "candidates": [
            {"content": {"parts": [{"text": "Part one. "}, {"text": "Part two."}], "role": "model"}}
        ]
    }"#;

    let response: GeminiResponse = serde_json::from_str(json).unwrap();
    assert_eq!(Gemini::extract_text(&response), "Part one. Part two.");
}

#[test]
fn test_geminiResponse_withNoCandidates_shouldExtractEmptyText() {
    let response: GeminiResponse = serde_json::from_str("{}").unwrap();
    assert_eq!(Gemini::extract_text(&response), "");
}

#[test]
fn test_ollamaRequest_shouldSerializeToApiShape() {
    let request = GenerationRequest::new("llama3.2:3b", "Summarize this")
        .temperature(0.5)
        .num_predict(256);

    let value = serde_json::to_value(&request).unwrap();
    assert_eq!(value["model"], "llama3.2:3b");
    assert_eq!(value["prompt"], "Summarize this");
    assert_eq!(value["stream"], false);
    assert_eq!(value["options"]["temperature"], 0.5);
    assert_eq!(value["options"]["num_predict"], 256);
}

#[test]
fn test_ollamaResponse_shouldExtractGeneratedText() {
    let json = r#"{"model": "llama3.2:3b", "response": "A summary.", "done": true}"#;
    let response: GenerationResponse = serde_json::from_str(json).unwrap();
    assert_eq!(Ollama::extract_text(&response), "A summary.");
}

#[tokio::test]
async fn test_assistantService_summarize_shouldSendSummaryPrompt() {
    let provider = MockProvider::working();
    let service = AssistantService::with_mock(provider.clone());

    let result = service.summarize("Some page text").await.unwrap();
    assert!(result.contains("Some page text"));

    let prompts = provider.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].starts_with("Summarize the following"));
    assert!(prompts[0].contains("Some page text"));
}

#[tokio::test]
async fn test_assistantService_translate_shouldNameTargetLanguage() {
    let provider = MockProvider::working();
    let service = AssistantService::with_mock(provider.clone());

    service.translate("A summary", "Japanese").await.unwrap();

    let prompts = provider.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("into Japanese"));
    assert!(prompts[0].contains("A summary"));
}

#[tokio::test]
async fn test_assistantService_withEmptyResponse_shouldFailWithParseError() {
    let service = AssistantService::with_mock(MockProvider::empty());

    let error = service.summarize("text").await.unwrap_err();
    assert!(matches!(error, ProviderError::ParseError(_)));
}

#[tokio::test]
async fn test_assistantService_withAuthFailure_shouldReturnConfigurationError() {
    let service = AssistantService::with_mock(MockProvider::auth_failing());

    let error = service.summarize("text").await.unwrap_err();
    assert!(error.is_configuration_error());
}

#[tokio::test]
async fn test_assistantService_withTransientFailure_shouldNotBeConfigurationError() {
    let service = AssistantService::with_mock(MockProvider::failing());

    let error = service.summarize("text").await.unwrap_err();
    assert!(!error.is_configuration_error());
}

#[tokio::test]
async fn test_assistantService_testConnection_shouldFollowProviderHealth() {
    assert!(AssistantService::with_mock(MockProvider::working()).test_connection().await.is_ok());
    assert!(AssistantService::with_mock(MockProvider::failing()).test_connection().await.is_err());
}

#[test]
fn test_providerErrorClassification_shouldTreatAuthStatusesAsConfiguration() {
    let unauthorized = ProviderError::ApiError { status_code: 401, message: "nope".to_string() };
    let forbidden = ProviderError::ApiError { status_code: 403, message: "nope".to_string() };
    let server_error = ProviderError::ApiError { status_code: 500, message: "boom".to_string() };

    assert!(unauthorized.is_configuration_error());
    assert!(forbidden.is_configuration_error());
    assert!(!server_error.is_configuration_error());
}

#[test]
fn test_providerErrorClassification_shouldFallBackToMessageScan() {
    let keyed = ProviderError::RequestFailed("missing API key in request".to_string());
    let transient = ProviderError::RequestFailed("connection reset".to_string());

    assert!(keyed.is_configuration_error());
    assert!(!transient.is_configuration_error());
}
