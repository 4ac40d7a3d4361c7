/*!
 * Scripted speech platform for tests.
 *
 * Emits utterance lifecycle events on a configurable schedule and records
 * every speak and cancel call so tests can assert on them. The voice catalog
 * can be delayed to exercise the controller's bounded catalog wait.
 */

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use parking_lot::Mutex;
use tokio::sync::mpsc;

use crate::errors::SpeechError;
use super::platform::{SpeechPlatform, UtteranceEvent, UtteranceHandle, Voice};

/// How a scripted utterance behaves after starting
#[derive(Debug, Clone)]
pub enum MockSpeechBehavior {
    /// Start, then end naturally after the given delay
    Completing {
        /// Delay between the started and ended events
        delay_ms: u64,
    },

    /// Start, then fail with the given error after a short delay
    FailingWith(SpeechError),

    /// Start and never terminate until cancelled
    NeverEnding,

    /// Deliver started and ended synchronously inside `speak`, before the
    /// handle is returned to the caller
    Instant,
}

/// Scripted platform recording all interactions
#[derive(Debug, Clone)]
pub struct MockSpeechPlatform {
    behavior: MockSpeechBehavior,
    voices: Arc<Mutex<Vec<Voice>>>,
    catalog_ready_at: Arc<Mutex<Option<Instant>>>,
    next_id: Arc<AtomicU64>,
    /// (text, voice language) pairs, in call order
    spoken: Arc<Mutex<Vec<(String, String)>>>,
    cancelled: Arc<Mutex<Vec<u64>>>,
    senders: Arc<Mutex<HashMap<u64, mpsc::UnboundedSender<UtteranceEvent>>>>,
}

impl MockSpeechPlatform {
    /// Create a platform with the given catalog, completing utterances quickly
    pub fn new(voices: Vec<Voice>) -> Self {
        Self::with_behavior(voices, MockSpeechBehavior::Completing { delay_ms: 10 })
    }

    /// Create a platform with the given catalog and utterance behavior
    pub fn with_behavior(voices: Vec<Voice>, behavior: MockSpeechBehavior) -> Self {
        Self {
            behavior,
            voices: Arc::new(Mutex::new(voices)),
            catalog_ready_at: Arc::new(Mutex::new(None)),
            next_id: Arc::new(AtomicU64::new(1)),
            spoken: Arc::new(Mutex::new(Vec::new())),
            cancelled: Arc::new(Mutex::new(Vec::new())),
            senders: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// A default English/Japanese catalog used by most tests
    pub fn default_catalog() -> Vec<Voice> {
        vec![
            Voice::new("mock-en", "Mock English", "en-US"),
            Voice::new("mock-ja", "Mock Japanese", "ja-JP"),
        ]
    }

    /// Delay catalog availability: `voices()` returns an empty snapshot until
    /// `delay` has elapsed from now.
    pub fn with_catalog_delay(self, delay: Duration) -> Self {
        *self.catalog_ready_at.lock() = Some(Instant::now() + delay);
        self
    }

    /// Texts spoken so far, paired with the selected voice's language tag
    pub fn spoken(&self) -> Vec<(String, String)> {
        self.spoken.lock().clone()
    }

    /// Utterance ids cancelled so far
    pub fn cancelled(&self) -> Vec<u64> {
        self.cancelled.lock().clone()
    }

    fn deliver_events(&self, id: u64, sender: mpsc::UnboundedSender<UtteranceEvent>) {
        let behavior = self.behavior.clone();
        let senders = Arc::clone(&self.senders);
        tokio::spawn(async move {
            let _ = sender.send(UtteranceEvent::Started);
            match behavior {
                MockSpeechBehavior::Completing { delay_ms } => {
                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                    let _ = sender.send(UtteranceEvent::Ended);
                }
                MockSpeechBehavior::FailingWith(error) => {
                    tokio::time::sleep(Duration::from_millis(5)).await;
                    let _ = sender.send(UtteranceEvent::Failed(error));
                }
                MockSpeechBehavior::NeverEnding => {
                    // The sender stays registered until cancel drops it
                    return;
                }
                // Instant utterances are delivered inside speak() and never
                // reach the scheduler
                MockSpeechBehavior::Instant => {}
            }
            senders.lock().remove(&id);
        });
    }
}

impl SpeechPlatform for MockSpeechPlatform {
    fn voices(&self) -> Vec<Voice> {
        if let Some(ready_at) = *self.catalog_ready_at.lock() {
            if Instant::now() < ready_at {
                return Vec::new();
            }
        }
        self.voices.lock().clone()
    }

    fn speak(&self, text: &str, voice: &Voice) -> Result<UtteranceHandle, SpeechError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.spoken.lock().push((text.to_string(), voice.language.clone()));

        let (sender, events) = mpsc::unbounded_channel();
        if matches!(self.behavior, MockSpeechBehavior::Instant) {
            let _ = sender.send(UtteranceEvent::Started);
            let _ = sender.send(UtteranceEvent::Ended);
        } else {
            self.senders.lock().insert(id, sender.clone());
            self.deliver_events(id, sender);
        }

        Ok(UtteranceHandle { id, events })
    }

    fn cancel(&self, utterance_id: u64) {
        self.cancelled.lock().push(utterance_id);
        self.senders.lock().remove(&utterance_id);
    }
}
