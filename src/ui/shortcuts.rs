/// Global media-key shortcuts
///
/// The three hardware media keys are registered with the OS so they work
/// while the player is in the background. Only key presses dispatch;
/// releases are ignored, so one press fires its action once.

use crate::core::MediaKey;
use crate::error::{PlayerError, Result};
use crate::ui::state::AppState;
use tauri::plugin::TauriPlugin;
use tauri::{AppHandle, Manager, Wry};
use tauri_plugin_global_shortcut::{Code, GlobalShortcutExt, Modifiers, Shortcut, ShortcutState};
use tracing::{debug, error, info, warn};

fn key_code(key: MediaKey) -> Code {
    match key {
        MediaKey::PlayPause => Code::MediaPlayPause,
        MediaKey::PreviousTrack => Code::MediaTrackPrevious,
        MediaKey::NextTrack => Code::MediaTrackNext,
    }
}

pub fn shortcut_for(key: MediaKey) -> Shortcut {
    Shortcut::new(None, key_code(key))
}

/// Which media key a fired shortcut belongs to, if any
pub fn media_key_for(shortcut: &Shortcut) -> Option<MediaKey> {
    MediaKey::ALL
        .into_iter()
        .find(|key| shortcut.matches(Modifiers::empty(), key_code(*key)))
}

/// The media key to dispatch for a shortcut event. Releases yield `None`.
pub fn key_for_event(shortcut: &Shortcut, state: ShortcutState) -> Option<MediaKey> {
    if state != ShortcutState::Pressed {
        return None;
    }
    media_key_for(shortcut)
}

/// Global-shortcut plugin with the media-key handler installed
pub fn plugin() -> TauriPlugin<Wry> {
    tauri_plugin_global_shortcut::Builder::new()
        .with_handler(|app, shortcut, event| {
            let Some(key) = key_for_event(shortcut, event.state) else {
                debug!("Ignoring {:?} of {:?}", event.state, shortcut);
                return;
            };

            if let Err(e) = app.state::<AppState>().dispatcher.media_key(key) {
                error!("Media key {} failed: {}", key.name(), e);
            }
        })
        .build()
}

/// Register every media key not registered yet.
///
/// A key another application already owns is logged and skipped; the
/// return value counts the keys that ended up registered.
pub fn register_media_keys(app: &AppHandle) -> usize {
    let manager = app.global_shortcut();
    let mut registered = 0;

    for key in MediaKey::ALL {
        let shortcut = shortcut_for(key);

        if manager.is_registered(shortcut) {
            registered += 1;
            continue;
        }

        let result = manager
            .register(shortcut)
            .map_err(|e| PlayerError::ShortcutRegistration {
                shortcut: key.name().to_string(),
                reason: e.to_string(),
            });

        match result {
            Ok(()) => {
                debug!("Registered {}", key.name());
                registered += 1;
            }
            Err(e) => warn!("{}", e),
        }
    }

    info!("Registered {}/{} media keys", registered, MediaKey::ALL.len());
    registered
}

/// Release the media keys, used on exit
pub fn unregister_media_keys(app: &AppHandle) -> Result<()> {
    let shortcuts: Vec<Shortcut> = MediaKey::ALL.into_iter().map(shortcut_for).collect();

    app.global_shortcut()
        .unregister_multiple(shortcuts)
        .map_err(|e| PlayerError::ShortcutRegistration {
            shortcut: "media keys".to_string(),
            reason: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::actions::MockActionSink;
    use crate::core::{Dispatcher, EventBus, FrontendAction};
    use std::sync::Arc;

    #[test]
    fn test_release_does_not_dispatch() {
        let shortcut = shortcut_for(MediaKey::PlayPause);
        assert_eq!(key_for_event(&shortcut, ShortcutState::Released), None);
        assert_eq!(
            key_for_event(&shortcut, ShortcutState::Pressed),
            Some(MediaKey::PlayPause)
        );
    }

    #[test]
    fn test_press_and_release_dispatch_once() {
        let mut sink = MockActionSink::new();
        sink.expect_dispatch()
            .withf(|action| matches!(action, FrontendAction::PlaylistsNext))
            .times(1)
            .returning(|_| Ok(()));
        let dispatcher = Dispatcher::new(Arc::new(sink), Arc::new(EventBus::new()));

        let shortcut = shortcut_for(MediaKey::NextTrack);
        for state in [ShortcutState::Pressed, ShortcutState::Released] {
            if let Some(key) = key_for_event(&shortcut, state) {
                dispatcher.media_key(key).unwrap();
            }
        }
    }

    #[test]
    fn test_media_key_roundtrip_through_shortcut() {
        for key in MediaKey::ALL {
            assert_eq!(media_key_for(&shortcut_for(key)), Some(key));
        }
    }

    #[test]
    fn test_modified_media_key_is_not_bound() {
        let shortcut = Shortcut::new(Some(Modifiers::SHIFT), Code::MediaPlayPause);
        assert_eq!(media_key_for(&shortcut), None);
    }

    #[test]
    fn test_other_keys_are_not_bound() {
        let shortcut = Shortcut::new(Some(Modifiers::CONTROL), Code::KeyP);
        assert_eq!(media_key_for(&shortcut), None);
    }
}
