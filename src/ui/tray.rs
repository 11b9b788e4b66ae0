/// System tray residency
///
/// The tray appears when the main window is closed with "minimize to tray"
/// enabled. Its playback items speak the `playerAction` vocabulary and go
/// through the same dispatch as any other `playerAction` message.

use crate::core::PlayerAction;
use crate::error::{PlayerError, Result};
use crate::ui::state::AppState;
use crate::ui::window;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use tauri::menu::{Menu, MenuItem, PredefinedMenuItem};
use tauri::tray::{MouseButton, MouseButtonState, TrayIconBuilder, TrayIconEvent};
use tauri::{AppHandle, Manager, Wry};
use tracing::{debug, error, info};

const TRAY_ID: &str = "main-tray";
const TRAY_TOGGLE_ID: &str = "tray.toggle";
const TRAY_SHOW_ID: &str = "tray.show";
const TRAY_QUIT_ID: &str = "tray.quit";

/// Playback flag and the menu item whose label follows it
#[derive(Default)]
pub struct TrayState {
    playing: AtomicBool,
    toggle_item: Mutex<Option<MenuItem<Wry>>>,
}

impl TrayState {
    pub fn is_playing(&self) -> bool {
        self.playing.load(Ordering::Relaxed)
    }
}

fn toggle_label(playing: bool) -> &'static str {
    if playing {
        "Pause"
    } else {
        "Play"
    }
}

/// Map a tray menu item to the `playerAction` payload it sends
fn menu_payload(id: &str, playing: bool) -> Option<&'static str> {
    if id == TRAY_TOGGLE_ID {
        let action = if playing {
            PlayerAction::Pause
        } else {
            PlayerAction::Play
        };
        return Some(action.as_str());
    }

    PlayerAction::parse(id).map(|action| action.as_str())
}

fn tray_err(e: tauri::Error) -> PlayerError {
    PlayerError::Tray(e.to_string())
}

/// Show the tray icon. No-op when it already exists.
pub fn show_tray(app: &AppHandle) -> Result<()> {
    if app.tray_by_id(TRAY_ID).is_some() {
        return Ok(());
    }

    let tray_state = app.state::<TrayState>();

    let toggle = MenuItem::with_id(
        app,
        TRAY_TOGGLE_ID,
        toggle_label(tray_state.is_playing()),
        true,
        None::<&str>,
    )
    .map_err(tray_err)?;
    let previous = MenuItem::with_id(app, PlayerAction::Prev.as_str(), "Previous", true, None::<&str>)
        .map_err(tray_err)?;
    let next = MenuItem::with_id(app, PlayerAction::Next.as_str(), "Next", true, None::<&str>)
        .map_err(tray_err)?;
    let show = MenuItem::with_id(app, TRAY_SHOW_ID, "Show Cadenza", true, None::<&str>)
        .map_err(tray_err)?;
    let quit = MenuItem::with_id(app, TRAY_QUIT_ID, "Quit", true, None::<&str>)
        .map_err(tray_err)?;
    let track_separator = PredefinedMenuItem::separator(app).map_err(tray_err)?;
    let quit_separator = PredefinedMenuItem::separator(app).map_err(tray_err)?;

    let menu = Menu::with_items(
        app,
        &[&toggle, &previous, &next, &track_separator, &show, &quit_separator, &quit],
    )
    .map_err(tray_err)?;

    let mut builder = TrayIconBuilder::with_id(TRAY_ID)
        .tooltip("Cadenza")
        .menu(&menu)
        .show_menu_on_left_click(false);

    if let Some(icon) = app.default_window_icon() {
        builder = builder.icon(icon.clone());
    }

    builder
        .on_menu_event(|app, event| handle_menu_event(app, event.id.as_ref()))
        .on_tray_icon_event(|tray, event| {
            if let TrayIconEvent::Click {
                button: MouseButton::Left,
                button_state: MouseButtonState::Up,
                ..
            } = event
            {
                restore_from_tray(tray.app_handle());
            }
        })
        .build(app)
        .map_err(tray_err)?;

    *tray_state
        .toggle_item
        .lock()
        .unwrap_or_else(|e| e.into_inner()) = Some(toggle);

    info!("Tray shown");
    Ok(())
}

/// Show the main window again and drop the tray icon
pub fn restore_from_tray(app: &AppHandle) {
    window::show_main_window(app);
    remove_tray(app);
}

/// Drop the tray icon and forget its toggle item
pub fn remove_tray(app: &AppHandle) {
    if app.remove_tray_by_id(TRAY_ID).is_some() {
        debug!("Tray removed");
    }
    if let Some(tray_state) = app.try_state::<TrayState>() {
        tray_state
            .toggle_item
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
    }
}

/// Record playback state and relabel the toggle item
pub fn set_playing(app: &AppHandle, playing: bool) {
    let Some(tray_state) = app.try_state::<TrayState>() else {
        return;
    };

    tray_state.playing.store(playing, Ordering::Relaxed);

    let guard = tray_state
        .toggle_item
        .lock()
        .unwrap_or_else(|e| e.into_inner());
    if let Some(item) = guard.as_ref() {
        if let Err(e) = item.set_text(toggle_label(playing)) {
            error!("Failed to relabel tray item: {}", e);
        }
    }
}

fn handle_menu_event(app: &AppHandle, id: &str) {
    match id {
        TRAY_QUIT_ID => app.exit(0),
        TRAY_SHOW_ID => restore_from_tray(app),
        _ => {
            let playing = app
                .try_state::<TrayState>()
                .map(|s| s.is_playing())
                .unwrap_or(false);

            let Some(payload) = menu_payload(id, playing) else {
                debug!("Unhandled tray menu item '{}'", id);
                return;
            };

            if let Err(e) = app.state::<AppState>().dispatcher.player_action(payload) {
                error!("Tray action '{}' failed: {}", payload, e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_sends_opposite_of_state() {
        assert_eq!(menu_payload(TRAY_TOGGLE_ID, false), Some("play"));
        assert_eq!(menu_payload(TRAY_TOGGLE_ID, true), Some("pause"));
    }

    #[test]
    fn test_track_items_use_player_action_ids() {
        assert_eq!(menu_payload("prev", true), Some("prev"));
        assert_eq!(menu_payload("next", false), Some("next"));
    }

    #[test]
    fn test_other_items_send_nothing() {
        assert_eq!(menu_payload(TRAY_SHOW_ID, false), None);
        assert_eq!(menu_payload(TRAY_QUIT_ID, false), None);
        assert_eq!(menu_payload("unknown", false), None);
    }

    #[test]
    fn test_toggle_label() {
        assert_eq!(toggle_label(true), "Pause");
        assert_eq!(toggle_label(false), "Play");
    }
}
