/*!
 * Summarization and translation service built on LLM providers.
 *
 * This module contains the assistant pipeline stages between extraction and
 * speech. It is split into several submodules:
 *
 * - `core`: Service definition, provider wiring, and retry handling
 * - `cleaner`: Stripping conversational scaffolding from model output
 * - `prompts`: Prompt templates for summarization and translation
 */

// Re-export main types for easier usage
pub use self::cleaner::{clean_summary, clean_translation};
pub use self::core::AssistantService;

// Submodules
pub mod cleaner;
pub mod core;
pub mod prompts;
