/*!
 * Host speech platform seam.
 *
 * The platform owns the voice catalog and the actual synthesis. Its catalog
 * populates asynchronously, so `voices()` is a snapshot that may be empty
 * shortly after startup; callers poll with a bounded timeout. Utterance
 * lifecycle callbacks are modeled as channel-delivered events: dropping or
 * aborting the receiving side detaches them, so a cancelled utterance can
 * never fire a stale completion into the controller.
 */

use std::fmt::Debug;
use tokio::sync::mpsc;

use crate::errors::SpeechError;

/// A synthesis voice offered by the platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Voice {
    /// Platform-assigned identifier
    pub id: String,
    /// Human-readable voice name
    pub name: String,
    /// BCP 47 language tag (e.g. "en-GB", "ja-JP")
    pub language: String,
}

impl Voice {
    /// Convenience constructor for catalogs built in code
    pub fn new(id: impl Into<String>, name: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            language: language.into(),
        }
    }
}

/// Lifecycle event of a single utterance
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UtteranceEvent {
    /// Synthesis has started playing
    Started,
    /// Synthesis completed naturally
    Ended,
    /// Synthesis failed
    Failed(SpeechError),
}

/// Handle to an in-flight utterance
pub struct UtteranceHandle {
    /// Platform-assigned utterance id, used for cancellation
    pub id: u64,
    /// Lifecycle events for this utterance only
    pub events: mpsc::UnboundedReceiver<UtteranceEvent>,
}

/// The host speech synthesis API
pub trait SpeechPlatform: Send + Sync + Debug {
    /// Snapshot of the voice catalog; may be empty while still loading
    fn voices(&self) -> Vec<Voice>;

    /// Begin synthesizing `text` with the given voice
    fn speak(&self, text: &str, voice: &Voice) -> Result<UtteranceHandle, SpeechError>;

    /// Cancel an in-flight utterance. Cancelling an unknown or finished id
    /// is a no-op.
    fn cancel(&self, utterance_id: u64);
}
