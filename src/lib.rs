/*!
 * # PageVoice - Read any web page aloud, in your language
 *
 * A Rust library that turns a web page into speech: it extracts the
 * readable text from HTML, summarizes it with an AI assistant, optionally
 * translates the summary, and reads the result aloud.
 *
 * ## Features
 *
 * - Extract readable text from HTML, skipping navigation and boilerplate
 * - Summarize page content using AI providers:
 *   - Google Gemini API
 *   - Ollama (local LLM)
 * - Translate summaries into a fixed catalog of target languages
 * - Clean conversational wrappers from model output
 * - Read summaries and translations aloud with voice selection per language
 * - Configurable extraction, assistant, and speech parameters
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `content_extractor`: HTML readable-text extraction
 * - `assistant`: AI-powered summarization and translation:
 *   - `assistant::core`: The assistant service and retry handling
 *   - `assistant::prompts`: Prompt construction
 *   - `assistant::cleaner`: Response cleaning
 * - `speech`: Speech synthesis control:
 *   - `speech::platform`: The host speech platform seam
 *   - `speech::voices`: Voice selection per language
 *   - `speech::controller`: Utterance orchestration
 * - `app_controller`: Main application controller
 * - `language_utils`: ISO language code utilities and the supported catalog
 * - `providers`: Client implementations for LLM providers:
 *   - `providers::gemini`: Gemini API client
 *   - `providers::ollama`: Ollama API client
 *   - `providers::mock`: Scripted provider for tests
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod assistant;
pub mod content_extractor;
pub mod errors;
pub mod language_utils;
pub mod providers;
pub mod speech;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{AppController, PageLoader, PipelineState, Translation};
pub use assistant::AssistantService;
pub use content_extractor::{ContentExtractor, ExtractedContent};
pub use language_utils::{LanguageOption, SUPPORTED_LANGUAGES};
pub use errors::{AppError, ExtractionError, ProviderError, SpeechError};
