/*!
 * Speech controller.
 *
 * Drives the platform through an Idle -> Speaking -> Idle state machine with
 * at most one active utterance process-wide. Starting a new utterance first
 * fully cancels the current one: the lifecycle monitor task is aborted
 * before the platform cancel is issued, so a late natural-completion event
 * from the old utterance can never reach the controller.
 */

use std::sync::Arc;
use std::time::Duration;
use log::{debug, warn};
use parking_lot::Mutex;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::app_config::SpeechConfig;
use crate::errors::SpeechError;
use super::platform::{SpeechPlatform, UtteranceEvent};
use super::voices::select_voice;

/// How often the voice catalog is polled while waiting for it to populate
const VOICE_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Lifecycle signals emitted by the controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechEvent {
    /// An utterance started playing
    Started,
    /// The active utterance completed naturally
    Ended,
    /// The active utterance failed
    Error(SpeechError),
}

struct ActiveUtterance {
    id: u64,
    monitor: JoinHandle<()>,
}

/// Controller enforcing the single-active-utterance invariant
pub struct SpeechController {
    platform: Arc<dyn SpeechPlatform>,
    active: Arc<Mutex<Option<ActiveUtterance>>>,
    events: broadcast::Sender<SpeechEvent>,
    voice_wait_timeout: Duration,
    voice_wait_retries: u32,
}

impl SpeechController {
    /// Create a controller over the given platform
    pub fn new(platform: Arc<dyn SpeechPlatform>, config: &SpeechConfig) -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            platform,
            active: Arc::new(Mutex::new(None)),
            events,
            voice_wait_timeout: Duration::from_millis(config.voice_wait_timeout_ms),
            voice_wait_retries: config.voice_wait_retries,
        }
    }

    /// Subscribe to lifecycle events
    pub fn subscribe(&self) -> broadcast::Receiver<SpeechEvent> {
        self.events.subscribe()
    }

    /// Whether an utterance is currently active
    pub fn is_speaking(&self) -> bool {
        self.active.lock().is_some()
    }

    /// Synthesize `text` in the given language.
    ///
    /// Any active utterance is cancelled first. The call returns once
    /// synthesis has been handed to the platform; completion and errors are
    /// reported through the event channel.
    pub async fn speak(&self, text: &str, language_code: &str) -> Result<(), SpeechError> {
        if text.trim().is_empty() {
            return Err(SpeechError::InvalidArgument);
        }

        self.cancel();

        let voices = self.wait_for_voices().await?;
        let voice = select_voice(&voices, language_code)
            .ok_or(SpeechError::VoiceUnavailable)?
            .clone();
        debug!("Selected voice '{}' ({}) for language '{}'", voice.name, voice.language, language_code);

        let mut handle = self.platform.speak(text, &voice)?;
        let utterance_id = handle.id;

        let active = Arc::clone(&self.active);
        let events = self.events.clone();
        // Hold the active-slot lock across the spawn and the store: a
        // platform may deliver Started+Ended synchronously inside speak(),
        // and the monitor's clear_if_current must not observe an empty slot
        // before the new utterance is recorded.
        let mut slot = self.active.lock();
        let monitor = tokio::spawn(async move {
            while let Some(event) = handle.events.recv().await {
                match event {
                    UtteranceEvent::Started => {
                        let _ = events.send(SpeechEvent::Started);
                    }
                    UtteranceEvent::Ended => {
                        clear_if_current(&active, utterance_id);
                        let _ = events.send(SpeechEvent::Ended);
                        return;
                    }
                    UtteranceEvent::Failed(error) => {
                        clear_if_current(&active, utterance_id);
                        let _ = events.send(SpeechEvent::Error(error));
                        return;
                    }
                }
            }
            // Channel closed without a terminal event; treat as ended
            clear_if_current(&active, utterance_id);
        });

        *slot = Some(ActiveUtterance { id: utterance_id, monitor });
        Ok(())
    }

    /// Cancel the active utterance, if any.
    ///
    /// The monitor is detached before the platform cancel so no completion
    /// or error event for the cancelled utterance is delivered afterwards.
    pub fn cancel(&self) {
        let current = self.active.lock().take();
        if let Some(utterance) = current {
            debug!("Cancelling active utterance {}", utterance.id);
            utterance.monitor.abort();
            self.platform.cancel(utterance.id);
        }
    }

    /// Wait for the voice catalog to populate, polling with a bounded
    /// timeout and at most the configured number of retries before giving up.
    async fn wait_for_voices(&self) -> Result<Vec<super::platform::Voice>, SpeechError> {
        for attempt in 0..=self.voice_wait_retries {
            let deadline = Instant::now() + self.voice_wait_timeout;
            loop {
                let voices = self.platform.voices();
                if !voices.is_empty() {
                    return Ok(voices);
                }
                if Instant::now() >= deadline {
                    break;
                }
                tokio::time::sleep(VOICE_POLL_INTERVAL).await;
            }
            if attempt < self.voice_wait_retries {
                warn!("Voice catalog still empty after {:?}, retrying", self.voice_wait_timeout);
            }
        }

        warn!("Voice catalog never populated; giving up");
        Err(SpeechError::VoiceUnavailable)
    }
}

impl Drop for SpeechController {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn clear_if_current(active: &Mutex<Option<ActiveUtterance>>, utterance_id: u64) {
    let mut guard = active.lock();
    if guard.as_ref().is_some_and(|u| u.id == utterance_id) {
        *guard = None;
    }
}
