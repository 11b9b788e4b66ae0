/// Event-to-action dispatch table
///
/// Every source event maps to exactly one effect: a frontend action or an
/// event on the bus. The only gate is the play-count threshold on
/// `timeupdate`.

use crate::core::actions::{ActionSink, FrontendAction, MediaKey, PlayerAction};
use crate::core::events::{AppEvent, EventBus};
use crate::error::Result;
use chrono::Utc;
use serde::Deserialize;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

/// Fraction of a track that must be heard before it counts as played
pub const PLAY_COUNT_THRESHOLD: f64 = 0.75;

/// Events reported by the frontend's audio element
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum AudioEvent {
    Ended,
    Error {
        #[serde(default)]
        message: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    TimeUpdate {
        src: String,
        current_time: f64,
        duration: f64,
    },
    Play,
    Pause,
}

/// Tracks whether the current source already crossed the play threshold
#[derive(Debug, Default)]
pub struct PlayCountTracker {
    current_src: Option<String>,
    reached: bool,
}

impl PlayCountTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` exactly once per source, the first time playback
    /// reaches the threshold.
    pub fn is_threshold_reached(&mut self, src: &str, current_time: f64, duration: f64) -> bool {
        if self.current_src.as_deref() != Some(src) {
            self.current_src = Some(src.to_string());
            self.reached = false;
        }

        if self.reached || !duration.is_finite() || duration <= 0.0 {
            return false;
        }

        if current_time >= duration * PLAY_COUNT_THRESHOLD {
            self.reached = true;
            return true;
        }

        false
    }

    /// Re-arm for the next play of any source
    pub fn reset(&mut self) {
        self.current_src = None;
        self.reached = false;
    }
}

/// Routes audio events, `playerAction` messages and media keys
pub struct Dispatcher {
    sink: Arc<dyn ActionSink>,
    bus: Arc<EventBus>,
    play_count: Mutex<PlayCountTracker>,
}

impl Dispatcher {
    pub fn new(sink: Arc<dyn ActionSink>, bus: Arc<EventBus>) -> Self {
        Self {
            sink,
            bus,
            play_count: Mutex::new(PlayCountTracker::new()),
        }
    }

    /// Ask the frontend modules to load their persisted state
    pub fn load_persisted_state(&self) -> Result<()> {
        self.sink.dispatch(FrontendAction::LibraryLoad)?;
        self.sink.dispatch(FrontendAction::PlaylistsRefresh)?;
        self.sink.dispatch(FrontendAction::SettingsCheck)?;
        Ok(())
    }

    pub fn audio_event(&self, event: AudioEvent) -> Result<()> {
        match event {
            AudioEvent::Ended => {
                self.play_count
                    .lock()
                    .unwrap_or_else(|e| e.into_inner())
                    .reset();
                self.sink.dispatch(FrontendAction::PlayerNext)
            }
            AudioEvent::Error { message } => {
                let message = message.unwrap_or_else(|| "unknown audio error".to_string());
                warn!("Audio error: {}", message);
                self.sink.dispatch(FrontendAction::PlayerAudioError { message })
            }
            AudioEvent::TimeUpdate {
                src,
                current_time,
                duration,
            } => {
                let reached = self
                    .play_count
                    .lock()
                    .unwrap_or_else(|e| e.into_inner())
                    .is_threshold_reached(&src, current_time, duration);

                if reached {
                    debug!("Play threshold reached for {}", src);
                    self.sink.dispatch(FrontendAction::LibraryIncrementPlayCount {
                        src,
                        played_at: Utc::now(),
                    })
                } else {
                    Ok(())
                }
            }
            AudioEvent::Play => self.bus.publish(AppEvent::PlaybackChanged { playing: true }),
            AudioEvent::Pause => self.bus.publish(AppEvent::PlaybackChanged { playing: false }),
        }
    }

    /// Handle a `playerAction` message. Returns whether an action fired.
    pub fn player_action(&self, payload: &str) -> Result<bool> {
        match PlayerAction::parse(payload) {
            Some(action) => {
                debug!("playerAction '{}'", action.as_str());
                self.sink.dispatch(action.action())?;
                Ok(true)
            }
            None => {
                debug!("Ignoring unknown playerAction '{}'", payload);
                Ok(false)
            }
        }
    }

    pub fn media_key(&self, key: MediaKey) -> Result<()> {
        info!("Media key pressed: {}", key.name());
        self.sink.dispatch(key.action())
    }
}
