/*!
 * Application controller.
 *
 * Orchestrates the page-to-speech pipeline: load a page, extract its
 * readable text, summarize, optionally translate the summary, and read the
 * result aloud. The controller owns the pipeline state and enforces two
 * rules: at most one summarize/translate/load operation runs at a time, and
 * a misconfigured assistant stays disabled until it is reconfigured.
 */

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use async_trait::async_trait;
use log::{debug, error, info, warn};
use parking_lot::RwLock;

use crate::app_config::{Config, UiTheme};
use crate::assistant::{clean_summary, clean_translation, AssistantService};
use crate::content_extractor::{ContentExtractor, ExtractedContent};
use crate::errors::{AppError, ExtractionError, ProviderError};
use crate::language_utils;
use crate::speech::{SpeechController, SpeechEvent, SpeechPlatform};

/// Source of raw page HTML
#[async_trait]
pub trait PageLoader: Send + Sync {
    /// Load the page source
    async fn load(&self) -> Result<String, ExtractionError>;
}

/// Loads a page over HTTP with a bounded timeout
pub struct HttpPageLoader {
    client: reqwest::Client,
    url: String,
}

impl HttpPageLoader {
    /// Create a loader for the given URL
    pub fn new(url: impl Into<String>, timeout_secs: u64) -> Result<Self, ExtractionError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ExtractionError::PageUnavailable(e.to_string()))?;
        Ok(Self { client, url: url.into() })
    }
}

#[async_trait]
impl PageLoader for HttpPageLoader {
    async fn load(&self) -> Result<String, ExtractionError> {
        debug!("Fetching page: {}", self.url);
        let response = self.client.get(&self.url)
            .send()
            .await
            .map_err(|e| ExtractionError::PageUnavailable(e.to_string()))?;
        let response = response.error_for_status()
            .map_err(|e| ExtractionError::PageUnavailable(e.to_string()))?;
        response.text()
            .await
            .map_err(|e| ExtractionError::PageUnavailable(e.to_string()))
    }
}

/// Loads a page from a local HTML file
pub struct FilePageLoader {
    path: PathBuf,
}

impl FilePageLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl PageLoader for FilePageLoader {
    async fn load(&self) -> Result<String, ExtractionError> {
        debug!("Reading page file: {:?}", self.path);
        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| ExtractionError::PageUnavailable(
                format!("{:?}: {}", self.path, e),
            ))
    }
}

/// Serves a fixed HTML string, for tests and embedding
pub struct StaticPageLoader {
    html: String,
}

impl StaticPageLoader {
    pub fn new(html: impl Into<String>) -> Self {
        Self { html: html.into() }
    }
}

#[async_trait]
impl PageLoader for StaticPageLoader {
    async fn load(&self) -> Result<String, ExtractionError> {
        Ok(self.html.clone())
    }
}

/// A translated summary, tagged with its target language
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    /// Cleaned translated text
    pub text: String,
    /// ISO 639-1 code of the target language
    pub language_code: String,
}

/// Pipeline state with downstream invalidation.
///
/// Each stage derives from the one before it, so setting a stage clears
/// everything downstream: new content drops the summary and translation, and
/// a new summary drops the translation.
#[derive(Debug, Clone, Default)]
pub struct PipelineState {
    /// Extracted page content
    pub content: Option<ExtractedContent>,
    /// Cleaned summary of the content
    pub summary: Option<String>,
    /// Cleaned translation of the summary
    pub translation: Option<Translation>,
}

impl PipelineState {
    fn set_content(&mut self, content: ExtractedContent) {
        self.content = Some(content);
        self.summary = None;
        self.translation = None;
    }

    fn set_summary(&mut self, summary: String) {
        self.summary = Some(summary);
        self.translation = None;
    }

    fn set_translation(&mut self, translation: Translation) {
        self.translation = Some(translation);
    }
}

/// Outcome of a read-aloud toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadAction {
    /// Speech was started
    Started,
    /// Active speech was stopped
    Stopped,
}

/// Main application controller for the page-to-speech pipeline
pub struct AppController {
    /// Application configuration
    config: Config,

    /// HTML readable-text extractor
    extractor: ContentExtractor,

    /// Source of the page being operated on; summarize auto-fetches from it
    /// when no content has been extracted yet
    page_source: RwLock<Option<Arc<dyn PageLoader>>>,

    /// Assistant service, absent when construction failed
    assistant: Option<AssistantService>,

    /// Sticky misconfiguration message; set once, cleared only by
    /// reconstructing the controller with a fixed configuration
    misconfigured: RwLock<Option<String>>,

    /// Speech synthesis controller
    speech: SpeechController,

    /// Current pipeline state
    state: RwLock<PipelineState>,

    /// Gate serializing load/summarize/translate operations
    busy: tokio::sync::Mutex<()>,
}

impl AppController {
    /// Create a controller from configuration and a speech platform.
    ///
    /// A failed assistant construction (e.g. missing API key) does not fail
    /// the controller: extraction and read-aloud keep working, and the
    /// failure is surfaced as a sticky misconfiguration on first summarize
    /// or translate.
    pub fn new(config: Config, platform: Arc<dyn SpeechPlatform>) -> Self {
        let extractor = ContentExtractor::new(config.extraction.max_content_chars);
        let speech = SpeechController::new(platform, &config.speech);

        let (assistant, misconfigured) = match AssistantService::new(config.assistant.clone()) {
            Ok(service) => (Some(service), None),
            Err(e) => {
                warn!("Assistant unavailable: {}", e);
                (None, Some(e.to_string()))
            }
        };

        Self {
            config,
            extractor,
            page_source: RwLock::new(None),
            assistant,
            misconfigured: RwLock::new(misconfigured),
            speech,
            state: RwLock::new(PipelineState::default()),
            busy: tokio::sync::Mutex::new(()),
        }
    }

    /// Create a controller with an explicit assistant service, for tests
    pub fn with_assistant(
        config: Config,
        platform: Arc<dyn SpeechPlatform>,
        assistant: AssistantService,
    ) -> Self {
        let extractor = ContentExtractor::new(config.extraction.max_content_chars);
        let speech = SpeechController::new(platform, &config.speech);

        Self {
            config,
            extractor,
            page_source: RwLock::new(None),
            assistant: Some(assistant),
            misconfigured: RwLock::new(None),
            speech,
            state: RwLock::new(PipelineState::default()),
            busy: tokio::sync::Mutex::new(()),
        }
    }

    /// Snapshot of the current pipeline state
    pub fn state(&self) -> PipelineState {
        self.state.read().clone()
    }

    /// Current UI theme preference
    pub fn theme(&self) -> UiTheme {
        self.config.theme
    }

    /// Whether an utterance is currently playing
    pub fn is_speaking(&self) -> bool {
        self.speech.is_speaking()
    }

    /// Subscribe to speech lifecycle events
    pub fn speech_events(&self) -> tokio::sync::broadcast::Receiver<SpeechEvent> {
        self.speech.subscribe()
    }

    /// The sticky misconfiguration message, if the assistant is disabled
    pub fn misconfiguration(&self) -> Option<String> {
        self.misconfigured.read().clone()
    }

    /// Attach the page to operate on without loading it yet. Any state
    /// derived from a previous page is dropped.
    pub fn set_page_source(&self, loader: Arc<dyn PageLoader>) {
        *self.page_source.write() = Some(loader);
        *self.state.write() = PipelineState::default();
    }

    /// Load the attached page and extract its readable text.
    ///
    /// Replaces the current content and invalidates any summary and
    /// translation derived from the previous page.
    pub async fn load_page(&self, loader: Arc<dyn PageLoader>) -> Result<ExtractedContent, AppError> {
        let _guard = self.busy.try_lock().map_err(|_| AppError::OperationInProgress)?;

        *self.page_source.write() = Some(loader);
        self.load_content().await
    }

    /// Summarize the page and read the summary aloud. When no content has
    /// been extracted yet, the attached page is loaded and extracted first.
    ///
    /// Speech failures are logged but do not fail the operation; the summary
    /// is already stored and displayed by the time speech starts.
    pub async fn summarize_and_read(&self) -> Result<String, AppError> {
        let _guard = self.busy.try_lock().map_err(|_| AppError::OperationInProgress)?;

        let summary = self.summarize_inner().await?;
        self.speak_logged(&summary, &self.config.speech_language).await;
        Ok(summary)
    }

    /// Translate the summary into the given language and read it aloud.
    ///
    /// The translation always derives from the summary, never from the raw
    /// page content. When no summary exists yet, the full summarize step runs
    /// first, so a translation request on a fresh page performs exactly one
    /// summarize call followed by one translate call.
    pub async fn translate_and_read(&self, language_code: &str) -> Result<Translation, AppError> {
        let _guard = self.busy.try_lock().map_err(|_| AppError::OperationInProgress)?;

        let language = language_utils::find_language(language_code)
            .ok_or_else(|| AppError::InvalidSelection(language_code.to_string()))?;

        // Bind the clone first: matching on `self.state.read().summary.clone()`
        // directly keeps the read guard alive across the match arms, and the
        // summarize arm takes the write lock on the same thread.
        let existing_summary = self.state.read().summary.clone();
        let summary = match existing_summary {
            Some(summary) => summary,
            None => self.summarize_inner().await?,
        };

        let assistant = self.assistant_ready()?;
        let raw = assistant.translate(&summary, language.display_name).await
            .map_err(|e| self.classify_provider_error(e))?;
        let translation = Translation {
            text: clean_translation(&raw),
            language_code: language.code.to_string(),
        };

        self.state.write().set_translation(translation.clone());
        self.speak_logged(&translation.text, &translation.language_code).await;
        Ok(translation)
    }

    /// Toggle read-aloud: stop active speech, or start reading the most
    /// derived text available (translation, then summary, then page content).
    pub async fn read_aloud(&self) -> Result<ReadAction, AppError> {
        if self.speech.is_speaking() {
            self.speech.cancel();
            return Ok(ReadAction::Stopped);
        }

        let (text, language) = {
            let state = self.state.read();
            if let Some(translation) = &state.translation {
                (translation.text.clone(), translation.language_code.clone())
            } else if let Some(summary) = &state.summary {
                (summary.clone(), self.config.speech_language.clone())
            } else if let Some(content) = &state.content {
                (content.body.clone(), self.config.speech_language.clone())
            } else {
                return Err(AppError::NothingToRead);
            }
        };

        self.speech.speak(&text, &language).await?;
        Ok(ReadAction::Started)
    }

    /// Stop any active speech
    pub fn stop_speaking(&self) {
        self.speech.cancel();
    }

    /// Fetch and extract the attached page. Assumes the busy gate is held.
    async fn load_content(&self) -> Result<ExtractedContent, AppError> {
        let loader = self.page_source.read().clone().ok_or_else(|| {
            AppError::Extraction(ExtractionError::PageUnavailable(
                "no page source is attached".to_string(),
            ))
        })?;

        let html = loader.load().await?;
        let content = self.extractor.extract(&html);
        if content.is_empty() {
            return Err(ExtractionError::EmptyContent.into());
        }

        info!("Extracted {} characters from \"{}\"{}",
            content.body.chars().count(),
            content.title,
            if content.truncated { " (truncated)" } else { "" });

        self.state.write().set_content(content.clone());
        Ok(content)
    }

    /// Summarize the page content, auto-fetching it when absent. Assumes
    /// the busy gate is held.
    async fn summarize_inner(&self) -> Result<String, AppError> {
        let existing = self.state.read().content.clone();
        let content = match existing {
            Some(content) => content,
            None => self.load_content().await?,
        };

        let assistant = self.assistant_ready()?;
        let raw = assistant.summarize(&content.body).await
            .map_err(|e| self.classify_provider_error(e))?;
        let summary = clean_summary(&raw);

        self.state.write().set_summary(summary.clone());
        Ok(summary)
    }

    /// Return the assistant, or the sticky misconfiguration error
    fn assistant_ready(&self) -> Result<&AssistantService, AppError> {
        if let Some(message) = self.misconfigured.read().as_ref() {
            return Err(AppError::ServiceMisconfigured(message.clone()));
        }
        self.assistant.as_ref().ok_or_else(|| {
            AppError::ServiceMisconfigured("assistant service is not initialized".to_string())
        })
    }

    /// Convert a provider error to an application error, recording
    /// configuration errors as sticky so later calls fail fast.
    fn classify_provider_error(&self, error: ProviderError) -> AppError {
        if error.is_configuration_error() {
            let message = error.to_string();
            warn!("Assistant misconfigured, disabling until reconfigured: {}", message);
            *self.misconfigured.write() = Some(message.clone());
            AppError::ServiceMisconfigured(message)
        } else {
            AppError::Provider(error)
        }
    }

    /// Speak without propagating failure
    async fn speak_logged(&self, text: &str, language_code: &str) {
        if let Err(e) = self.speech.speak(text, language_code).await {
            error!("Could not read the text aloud: {}", e);
        }
    }
}
