/// Event bus for native-side notifications
///
/// Components publish what happened (playback toggled, bounds saved, app
/// ready) and interested parties subscribe:
/// - the tray keeps its Play/Pause label in sync with playback
/// - the frontend forwarder relays events to the webview

use crate::core::bounds::WindowBounds;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Maximum number of events buffered per subscriber
const EVENT_BUFFER_SIZE: usize = 100;

/// Events raised on the native side of the player
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum AppEvent {
    /// Bootstrap finished and the main window is visible
    Ready,

    /// The audio element started or stopped playing
    PlaybackChanged { playing: bool },

    /// Window geometry written to the config store
    BoundsSaved { bounds: WindowBounds },

    /// A config key changed
    ConfigChanged { key: String },

    /// Main window hidden to the tray
    MinimizedToTray,
}

impl AppEvent {
    /// Whether the frontend cares about this event
    pub fn is_forwarded(&self) -> bool {
        !matches!(self, AppEvent::BoundsSaved { .. })
    }
}

/// Event bus for pub/sub communication
pub struct EventBus {
    sender: broadcast::Sender<AppEvent>,
}

impl EventBus {
    /// Create a new event bus
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(EVENT_BUFFER_SIZE);
        Self { sender }
    }

    /// Publish an event to all subscribers
    pub fn publish(&self, event: AppEvent) -> Result<()> {
        // broadcast::send returns error only if no receivers exist, which is ok
        let _ = self.sender.send(event);
        Ok(())
    }

    /// Subscribe to all future events
    pub fn subscribe(&self) -> broadcast::Receiver<AppEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscriber_receives_published_event() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();

        bus.publish(AppEvent::Ready).unwrap();
        assert_eq!(rx.recv().await.unwrap(), AppEvent::Ready);
    }

    #[tokio::test]
    async fn test_multiple_subscribers_receive_same_event() {
        let bus = EventBus::new();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        let event = AppEvent::PlaybackChanged { playing: true };
        bus.publish(event.clone()).unwrap();

        assert_eq!(rx1.recv().await.unwrap(), event);
        assert_eq!(rx2.recv().await.unwrap(), event);
    }

    #[tokio::test]
    async fn test_publish_without_subscribers() {
        let bus = EventBus::new();
        let rx = bus.subscribe();
        drop(rx);

        let result = bus.publish(AppEvent::Ready);
        assert!(result.is_ok(), "Publishing should succeed with no subscribers");
    }

    #[tokio::test]
    async fn test_late_subscriber_misses_old_events() {
        let bus = EventBus::new();
        bus.publish(AppEvent::Ready).unwrap();

        let mut rx = bus.subscribe();
        let event = AppEvent::PlaybackChanged { playing: false };
        bus.publish(event.clone()).unwrap();

        assert_eq!(rx.recv().await.unwrap(), event);
    }

    #[test]
    fn test_bounds_saved_not_forwarded() {
        let saved = AppEvent::BoundsSaved {
            bounds: WindowBounds::new(0, 0, 800, 600),
        };
        assert!(!saved.is_forwarded());
        assert!(AppEvent::Ready.is_forwarded());
        assert!(AppEvent::PlaybackChanged { playing: true }.is_forwarded());
    }

    #[test]
    fn test_json_tagging() {
        let json = serde_json::to_value(AppEvent::PlaybackChanged { playing: true }).unwrap();
        assert_eq!(json["type"], "playbackChanged");
        assert_eq!(json["playing"], true);
    }
}
