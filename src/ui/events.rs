/// Event streaming between the native side and the frontend
///
/// Frontend actions go out as `app-action` events, native bus events as
/// `app-event`. Window events from the OS are routed here as well.

use crate::core::{ActionSink, AppEvent, FrontendAction, WindowBounds};
use crate::error::{PlayerError, Result};
use crate::ui::state::AppState;
use crate::ui::{tray, window};
use tauri::{AppHandle, Emitter, Manager, Window, WindowEvent};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, error, info, warn};

/// Event name carrying `FrontendAction` payloads
pub const ACTION_EVENT: &str = "app-action";

/// Event name carrying forwarded `AppEvent` payloads
pub const APP_EVENT: &str = "app-event";

/// Delivers frontend actions by emitting them to the webview
pub struct FrontendSink {
    app_handle: AppHandle,
}

impl FrontendSink {
    pub fn new(app_handle: AppHandle) -> Self {
        Self { app_handle }
    }
}

impl ActionSink for FrontendSink {
    fn dispatch(&self, action: FrontendAction) -> Result<()> {
        debug!("Dispatching {:?}", action);
        self.app_handle
            .emit(ACTION_EVENT, &action)
            .map_err(|e| PlayerError::EmitFailed {
                event: ACTION_EVENT.to_string(),
                reason: e.to_string(),
            })
    }
}

/// Forward bus events to the frontend and keep the tray in sync
pub fn start_event_forwarder(app_handle: AppHandle, state: AppState) {
    // Subscribe before spawning so nothing published meanwhile is missed
    let mut rx = state.event_bus.subscribe();

    tauri::async_runtime::spawn(async move {
        info!("Starting event forwarder");

        loop {
            let event = match rx.recv().await {
                Ok(event) => event,
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Event forwarder lagged, skipped {} events", skipped);
                    continue;
                }
                Err(RecvError::Closed) => break,
            };

            if let AppEvent::PlaybackChanged { playing } = event {
                tray::set_playing(&app_handle, playing);
            }

            if event.is_forwarded() {
                if let Err(e) = app_handle.emit(APP_EVENT, &event) {
                    error!("Failed to emit event to frontend: {}", e);
                }
            }
        }

        warn!("Event forwarder stopped");
    });
}

/// Handle window events for the main window.
///
/// Called from the Tauri builder's `on_window_event` hook.
pub fn handle_window_event(win: &Window, event: &WindowEvent) {
    if win.label() != window::MAIN_WINDOW_LABEL {
        return;
    }

    match event {
        WindowEvent::Moved(_) | WindowEvent::Resized(_) => {
            if let Some(bounds) = current_bounds(win) {
                win.state::<AppState>().bounds.save_bounds(bounds);
            }
        }

        // Closing goes through `close`, which may hide to the tray instead
        WindowEvent::CloseRequested { api, .. } => {
            api.prevent_close();
            if let Err(e) = window::close(win.app_handle()) {
                error!("Failed to close main window, destroying it: {}", e);
                if let Err(e) = win.destroy() {
                    error!("Failed to destroy main window: {}", e);
                }
            }
        }

        _ => {}
    }
}

fn current_bounds(win: &Window) -> Option<WindowBounds> {
    if win.is_minimized().unwrap_or(false) {
        return None;
    }

    let position = win.outer_position().ok()?;
    let size = win.inner_size().ok()?;

    Some(window::bounds_from(position, size))
}
