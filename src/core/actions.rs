/// Action vocabulary shared with the frontend
///
/// The library, playlists, settings and player action modules live in the
/// webview. The native side reaches them by dispatching a `FrontendAction`
/// through an `ActionSink`; in the app that sink emits an `app-action`
/// event, in tests it is a mock.

use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An action to run in one of the frontend action modules
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum FrontendAction {
    /// Load the persisted library index
    LibraryLoad,

    /// Count one more play of a track
    #[serde(rename_all = "camelCase")]
    LibraryIncrementPlayCount { src: String, played_at: DateTime<Utc> },

    /// Reload playlists
    PlaylistsRefresh,

    PlaylistsPlay,
    PlaylistsPause,
    PlaylistsPlayToggle,
    PlaylistsPrevious,
    PlaylistsNext,

    /// Validate settings and apply them to the UI
    SettingsCheck,

    /// Current track ended, advance the player
    PlayerNext,

    /// The audio element failed to load or decode
    PlayerAudioError { message: String },
}

/// Receiver of frontend actions
#[cfg_attr(test, mockall::automock)]
pub trait ActionSink: Send + Sync {
    fn dispatch(&self, action: FrontendAction) -> Result<()>;
}

/// Payload of a `playerAction` message
///
/// These come from outside the webview (tray menu, thumbar buttons) and ask
/// the playlists module to change playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerAction {
    Play,
    Pause,
    Prev,
    Next,
}

impl PlayerAction {
    pub const ALL: [PlayerAction; 4] = [Self::Play, Self::Pause, Self::Prev, Self::Next];

    /// Parse a message payload; unknown payloads yield `None`
    pub fn parse(payload: &str) -> Option<Self> {
        match payload {
            "play" => Some(Self::Play),
            "pause" => Some(Self::Pause),
            "prev" => Some(Self::Prev),
            "next" => Some(Self::Next),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Play => "play",
            Self::Pause => "pause",
            Self::Prev => "prev",
            Self::Next => "next",
        }
    }

    pub fn action(&self) -> FrontendAction {
        match self {
            Self::Play => FrontendAction::PlaylistsPlay,
            Self::Pause => FrontendAction::PlaylistsPause,
            Self::Prev => FrontendAction::PlaylistsPrevious,
            Self::Next => FrontendAction::PlaylistsNext,
        }
    }
}

/// Hardware media keys bound as global shortcuts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKey {
    PlayPause,
    PreviousTrack,
    NextTrack,
}

impl MediaKey {
    pub const ALL: [MediaKey; 3] = [Self::PlayPause, Self::PreviousTrack, Self::NextTrack];

    /// Accelerator name of the key
    pub fn name(&self) -> &'static str {
        match self {
            Self::PlayPause => "MediaPlayPause",
            Self::PreviousTrack => "MediaPreviousTrack",
            Self::NextTrack => "MediaNextTrack",
        }
    }

    pub fn action(&self) -> FrontendAction {
        match self {
            Self::PlayPause => FrontendAction::PlaylistsPlayToggle,
            Self::PreviousTrack => FrontendAction::PlaylistsPrevious,
            Self::NextTrack => FrontendAction::PlaylistsNext,
        }
    }
}
