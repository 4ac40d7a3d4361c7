/*!
 * End-to-end tests for the page-to-speech pipeline
 */

use std::sync::Arc;

use pagevoice::app_controller::{ReadAction, StaticPageLoader};
use pagevoice::errors::{AppError, ExtractionError};
use pagevoice::providers::mock::MockProvider;
use pagevoice::speech::mock::{MockSpeechBehavior, MockSpeechPlatform};

use crate::common::{
    build_controller, scripted_assistant_response, working_controller, ARTICLE_HTML, EMPTY_HTML,
};

#[tokio::test]
async fn test_loadPage_withArticle_shouldStoreExtractedContent() {
    let (controller, _provider, _platform) = working_controller();

    let content = controller.load_page(Arc::new(StaticPageLoader::new(ARTICLE_HTML))).await.unwrap();
    assert_eq!(content.title, "Rust in Production");
    assert!(content.body.contains("everyday infrastructure"));

    let state = controller.state();
    assert!(state.content.is_some());
    assert!(state.summary.is_none());
    assert!(state.translation.is_none());
}

#[tokio::test]
async fn test_loadPage_withNoReadableText_shouldFailWithEmptyContent() {
    let (controller, _provider, _platform) = working_controller();

    let error = controller.load_page(Arc::new(StaticPageLoader::new(EMPTY_HTML))).await.unwrap_err();
    assert!(matches!(error, AppError::Extraction(ExtractionError::EmptyContent)));
    assert!(controller.state().content.is_none());
}

#[tokio::test]
async fn test_summarizeAndRead_shouldCleanStoreAndSpeakTheSummary() {
    let (controller, provider, platform) = working_controller();
    controller.load_page(Arc::new(StaticPageLoader::new(ARTICLE_HTML))).await.unwrap();

    let summary = controller.summarize_and_read().await.unwrap();

    // The announcement sentence is stripped before storage and speech
    assert_eq!(summary, "- Rust is used in production\n- Teams report fewer bugs");
    assert_eq!(controller.state().summary.as_deref(), Some(summary.as_str()));
    assert_eq!(provider.request_count(), 1);

    let spoken = platform.spoken();
    assert_eq!(spoken.len(), 1);
    assert_eq!(spoken[0].0, summary);
    assert_eq!(spoken[0].1, "en-US");
}

#[tokio::test]
async fn test_summarize_withUnloadedPage_shouldFetchContentFirst() {
    let (controller, provider, _platform) = working_controller();
    controller.set_page_source(Arc::new(StaticPageLoader::new(ARTICLE_HTML)));

    // No load_page call: summarize pulls the page in on its own
    let summary = controller.summarize_and_read().await.unwrap();
    assert_eq!(summary, "- Rust is used in production\n- Teams report fewer bugs");
    assert!(controller.state().content.is_some());
    assert_eq!(provider.request_count(), 1);
}

#[tokio::test]
async fn test_summarize_withoutPageSource_shouldFail() {
    let (controller, provider, _platform) = working_controller();

    let error = controller.summarize_and_read().await.unwrap_err();
    assert!(matches!(
        error,
        AppError::Extraction(ExtractionError::PageUnavailable(_))
    ));
    assert_eq!(provider.request_count(), 0);
}

#[tokio::test]
async fn test_summarize_withEmptyAutoFetchedPage_shouldFail() {
    let (controller, provider, _platform) = working_controller();
    controller.set_page_source(Arc::new(StaticPageLoader::new(EMPTY_HTML)));

    let error = controller.summarize_and_read().await.unwrap_err();
    assert!(matches!(error, AppError::Extraction(ExtractionError::EmptyContent)));
    assert_eq!(provider.request_count(), 0);
}

#[tokio::test]
async fn test_translate_withUnloadedPage_shouldFetchThenSummarizeThenTranslate() {
    let (controller, provider, _platform) = working_controller();
    controller.set_page_source(Arc::new(StaticPageLoader::new(ARTICLE_HTML)));

    let translation = controller.translate_and_read("ja").await.unwrap();
    assert_eq!(translation.text, "- Rustは本番環境で使われている");
    assert!(controller.state().content.is_some());

    let prompts = provider.prompts();
    assert_eq!(prompts.len(), 2);
    assert!(prompts[0].starts_with("Summarize the following"));
    assert!(prompts[1].starts_with("Translate the following"));
}

#[tokio::test]
async fn test_translate_onFreshPage_shouldSummarizeExactlyOnceFirst() {
    let (controller, provider, platform) = working_controller();
    controller.load_page(Arc::new(StaticPageLoader::new(ARTICLE_HTML))).await.unwrap();

    let translation = controller.translate_and_read("ja").await.unwrap();
    assert_eq!(translation.language_code, "ja");
    assert_eq!(translation.text, "- Rustは本番環境で使われている");

    // Exactly one summarize call, then one translate call
    let prompts = provider.prompts();
    assert_eq!(prompts.len(), 2);
    assert!(prompts[0].starts_with("Summarize the following"));
    assert!(prompts[1].starts_with("Translate the following"));
    assert!(prompts[1].contains("into Japanese"));

    // The translation derives from the cleaned summary, not the page body
    assert!(prompts[1].contains("- Rust is used in production"));
    assert!(!prompts[1].contains("everyday infrastructure"));

    // The translation is spoken in the target language
    let spoken = platform.spoken();
    assert_eq!(spoken.last().unwrap().1, "ja-JP");
}

#[tokio::test]
async fn test_translate_withExistingSummary_shouldNotSummarizeAgain() {
    let (controller, provider, _platform) = working_controller();
    controller.load_page(Arc::new(StaticPageLoader::new(ARTICLE_HTML))).await.unwrap();

    controller.summarize_and_read().await.unwrap();
    controller.translate_and_read("fr").await.unwrap();

    let prompts = provider.prompts();
    assert_eq!(prompts.len(), 2);
    assert!(prompts[1].contains("into French"));
}

#[tokio::test]
async fn test_translate_withUncataloguedLanguage_shouldRejectSelection() {
    let (controller, provider, _platform) = working_controller();
    controller.load_page(Arc::new(StaticPageLoader::new(ARTICLE_HTML))).await.unwrap();

    let error = controller.translate_and_read("xx").await.unwrap_err();
    assert!(matches!(error, AppError::InvalidSelection(_)));
    assert_eq!(provider.request_count(), 0);
}

#[tokio::test]
async fn test_loadPage_afterSummarize_shouldInvalidateDerivedState() {
    let (controller, _provider, _platform) = working_controller();
    controller.load_page(Arc::new(StaticPageLoader::new(ARTICLE_HTML))).await.unwrap();
    controller.summarize_and_read().await.unwrap();
    controller.translate_and_read("ja").await.unwrap();

    controller.load_page(Arc::new(StaticPageLoader::new(ARTICLE_HTML))).await.unwrap();

    let state = controller.state();
    assert!(state.content.is_some());
    assert!(state.summary.is_none());
    assert!(state.translation.is_none());
}

#[tokio::test]
async fn test_summarize_afterTranslation_shouldDropTheTranslation() {
    let (controller, _provider, _platform) = working_controller();
    controller.load_page(Arc::new(StaticPageLoader::new(ARTICLE_HTML))).await.unwrap();
    controller.translate_and_read("ja").await.unwrap();
    assert!(controller.state().translation.is_some());

    controller.summarize_and_read().await.unwrap();
    assert!(controller.state().translation.is_none());
}

#[tokio::test]
async fn test_readAloud_withOnlyContent_shouldReadThePageBody() {
    let (controller, _provider, platform) = working_controller();
    controller.load_page(Arc::new(StaticPageLoader::new(ARTICLE_HTML))).await.unwrap();

    let action = controller.read_aloud().await.unwrap();
    assert_eq!(action, ReadAction::Started);

    let spoken = platform.spoken();
    assert!(spoken[0].0.contains("everyday infrastructure"));
}

#[tokio::test]
async fn test_readAloud_shouldPreferTranslationOverSummary() {
    let (controller, _provider, platform) = working_controller();
    controller.load_page(Arc::new(StaticPageLoader::new(ARTICLE_HTML))).await.unwrap();
    controller.translate_and_read("ja").await.unwrap();

    // Let the automatic read-aloud of the translation finish first
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    assert!(!controller.is_speaking());

    controller.read_aloud().await.unwrap();

    let spoken = platform.spoken();
    let last = spoken.last().unwrap();
    assert_eq!(last.0, "- Rustは本番環境で使われている");
    assert_eq!(last.1, "ja-JP");
}

#[tokio::test]
async fn test_readAloud_withNothingLoaded_shouldFail() {
    let (controller, _provider, _platform) = working_controller();

    let error = controller.read_aloud().await.unwrap_err();
    assert!(matches!(error, AppError::NothingToRead));
}

#[tokio::test]
async fn test_readAloud_whileSpeaking_shouldStopInstead() {
    let provider = MockProvider::working().with_custom_response(scripted_assistant_response);
    let platform = MockSpeechPlatform::with_behavior(
        MockSpeechPlatform::default_catalog(),
        MockSpeechBehavior::NeverEnding,
    );
    let controller = build_controller(provider, platform.clone());
    controller.load_page(Arc::new(StaticPageLoader::new(ARTICLE_HTML))).await.unwrap();

    assert_eq!(controller.read_aloud().await.unwrap(), ReadAction::Started);
    assert!(controller.is_speaking());

    assert_eq!(controller.read_aloud().await.unwrap(), ReadAction::Stopped);
    assert!(!controller.is_speaking());
    assert_eq!(platform.cancelled().len(), 1);
}
