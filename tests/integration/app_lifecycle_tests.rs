/*!
 * Lifecycle tests: misconfiguration stickiness, degraded startup, and the
 * single-operation gate
 */

use std::sync::Arc;
use std::time::Duration;

use pagevoice::app_config::{AssistantProvider, Config};
use pagevoice::app_controller::{AppController, StaticPageLoader};
use pagevoice::errors::AppError;
use pagevoice::providers::mock::{MockBehavior, MockProvider};
use pagevoice::speech::mock::MockSpeechPlatform;

use crate::common::{build_controller, ARTICLE_HTML};

#[tokio::test]
async fn test_authFailure_shouldBecomeStickyMisconfiguration() {
    let provider = MockProvider::auth_failing();
    let platform = MockSpeechPlatform::new(MockSpeechPlatform::default_catalog());
    let controller = build_controller(provider.clone(), platform);
    controller.load_page(Arc::new(StaticPageLoader::new(ARTICLE_HTML))).await.unwrap();

    let error = controller.summarize_and_read().await.unwrap_err();
    assert!(matches!(error, AppError::ServiceMisconfigured(_)));
    assert_eq!(provider.request_count(), 1);
    assert!(controller.misconfiguration().is_some());

    // Later calls fail fast without touching the provider again
    let error = controller.summarize_and_read().await.unwrap_err();
    assert!(matches!(error, AppError::ServiceMisconfigured(_)));
    let error = controller.translate_and_read("ja").await.unwrap_err();
    assert!(matches!(error, AppError::ServiceMisconfigured(_)));
    assert_eq!(provider.request_count(), 1);
}

#[tokio::test]
async fn test_transientFailure_shouldNotBecomeSticky() {
    let provider = MockProvider::failing();
    let platform = MockSpeechPlatform::new(MockSpeechPlatform::default_catalog());
    let controller = build_controller(provider.clone(), platform);
    controller.load_page(Arc::new(StaticPageLoader::new(ARTICLE_HTML))).await.unwrap();

    let error = controller.summarize_and_read().await.unwrap_err();
    assert!(matches!(error, AppError::Provider(_)));
    assert!(controller.misconfiguration().is_none());

    // The provider is consulted again on the next attempt
    let _ = controller.summarize_and_read().await.unwrap_err();
    assert_eq!(provider.request_count(), 2);
}

#[tokio::test]
async fn test_controller_withMissingApiKey_shouldStartDegraded() {
    // Default config selects Gemini with no API key
    let platform = Arc::new(MockSpeechPlatform::new(MockSpeechPlatform::default_catalog()));
    let controller = AppController::new(Config::default(), platform);

    // Extraction and read-aloud still work
    assert!(controller.misconfiguration().is_some());
    let content = controller.load_page(Arc::new(StaticPageLoader::new(ARTICLE_HTML))).await.unwrap();
    assert!(!content.is_empty());
    controller.read_aloud().await.unwrap();

    // Summarize surfaces the construction failure
    let error = controller.summarize_and_read().await.unwrap_err();
    assert!(matches!(error, AppError::ServiceMisconfigured(_)));
}

#[tokio::test]
async fn test_controller_withOllama_shouldStartConfigured() {
    let mut config = Config::default();
    config.assistant.provider = AssistantProvider::Ollama;

    let platform = Arc::new(MockSpeechPlatform::new(MockSpeechPlatform::default_catalog()));
    let controller = AppController::new(config, platform);
    assert!(controller.misconfiguration().is_none());
}

#[tokio::test]
async fn test_operations_whileAnotherRuns_shouldBeRejected() {
    let provider = MockProvider::new(MockBehavior::Slow { delay_ms: 300 });
    let platform = MockSpeechPlatform::new(MockSpeechPlatform::default_catalog());
    let controller = Arc::new(build_controller(provider, platform));
    controller.load_page(Arc::new(StaticPageLoader::new(ARTICLE_HTML))).await.unwrap();

    let background = {
        let controller = Arc::clone(&controller);
        tokio::spawn(async move { controller.summarize_and_read().await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;

    let error = controller.translate_and_read("ja").await.unwrap_err();
    assert!(matches!(error, AppError::OperationInProgress));
    let error = controller.load_page(Arc::new(StaticPageLoader::new(ARTICLE_HTML))).await.unwrap_err();
    assert!(matches!(error, AppError::OperationInProgress));

    // The in-flight operation itself completes normally
    background.await.unwrap().unwrap();
    assert!(controller.state().summary.is_some());
}

#[tokio::test]
async fn test_speechFailure_shouldNotFailSummarize() {
    use pagevoice::errors::SpeechError;
    use pagevoice::speech::mock::MockSpeechBehavior;

    let provider = MockProvider::working();
    let platform = MockSpeechPlatform::with_behavior(
        MockSpeechPlatform::default_catalog(),
        MockSpeechBehavior::FailingWith(SpeechError::Network),
    );
    let controller = build_controller(provider, platform);
    controller.load_page(Arc::new(StaticPageLoader::new(ARTICLE_HTML))).await.unwrap();

    // The summary is produced and stored even though speech fails
    let summary = controller.summarize_and_read().await.unwrap();
    assert!(!summary.is_empty());
    assert!(controller.state().summary.is_some());
}

#[tokio::test]
async fn test_speechFailure_withEmptyVoiceCatalog_shouldNotFailSummarize() {
    let mut config = Config::default();
    config.speech.voice_wait_timeout_ms = 50;
    config.speech.voice_wait_retries = 0;

    let provider = MockProvider::working();
    let platform = MockSpeechPlatform::new(Vec::new());
    let controller = AppController::with_assistant(
        config,
        Arc::new(platform),
        pagevoice::assistant::AssistantService::with_mock(provider),
    );
    controller.load_page(Arc::new(StaticPageLoader::new(ARTICLE_HTML))).await.unwrap();

    assert!(controller.summarize_and_read().await.is_ok());
}
