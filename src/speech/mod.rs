/*!
 * Speech synthesis control.
 *
 * This module wraps the host speech platform behind a small trait and drives
 * it through a controller that enforces the single-active-utterance rule.
 * Submodules:
 *
 * - `platform`: The host platform seam (voice catalog + utterance lifecycle)
 * - `voices`: Language-variant expansion and voice selection
 * - `controller`: Start/stop/cancel orchestration and lifecycle events
 * - `mock`: Scripted platform for tests
 */

// Re-export main types for easier usage
pub use self::controller::{SpeechController, SpeechEvent};
pub use self::platform::{SpeechPlatform, UtteranceEvent, UtteranceHandle, Voice};
pub use self::voices::{expand_language_variants, select_voice};

// Submodules
pub mod controller;
pub mod mock;
pub mod platform;
pub mod voices;
