/// Main window lifecycle and controls

use crate::core::{AppEvent, WindowBounds};
use crate::error::{PlayerError, Result};
use crate::ui::state::AppState;
use crate::ui::tray;
use tauri::{AppHandle, Manager, PhysicalPosition, PhysicalSize, WebviewUrl, WebviewWindow, WebviewWindowBuilder};
use tracing::{debug, error, info, warn};

pub const MAIN_WINDOW_LABEL: &str = "main";

const DEFAULT_WIDTH: f64 = 1000.0;
const DEFAULT_HEIGHT: f64 = 600.0;
const MIN_WIDTH: f64 = 900.0;
const MIN_HEIGHT: f64 = 550.0;

/// Create the hidden main window, restoring persisted geometry.
///
/// The webview's drag-and-drop handler is disabled so dropped files never
/// navigate away from the player.
pub fn build_main_window(app: &AppHandle, bounds: Option<WindowBounds>) -> Result<WebviewWindow> {
    let window = WebviewWindowBuilder::new(app, MAIN_WINDOW_LABEL, WebviewUrl::default())
        .title("Cadenza")
        .inner_size(DEFAULT_WIDTH, DEFAULT_HEIGHT)
        .min_inner_size(MIN_WIDTH, MIN_HEIGHT)
        .visible(false)
        .disable_drag_drop_handler()
        .build()?;

    if let Some(bounds) = bounds.filter(WindowBounds::is_restorable) {
        debug!("Restoring window bounds {:?}", bounds);
        let (position, size) = restore_geometry(&bounds);
        window.set_position(position)?;
        window.set_size(size)?;
    } else {
        window.center()?;
    }

    Ok(window)
}

/// Bounds to persist: outer position paired with inner size, matching
/// what `set_position` and `set_size` take on restore.
pub fn bounds_from(position: PhysicalPosition<i32>, inner_size: PhysicalSize<u32>) -> WindowBounds {
    WindowBounds::new(position.x, position.y, inner_size.width, inner_size.height)
}

/// Position and inner size to apply for saved bounds
pub fn restore_geometry(bounds: &WindowBounds) -> (PhysicalPosition<i32>, PhysicalSize<u32>) {
    (
        PhysicalPosition::new(bounds.x, bounds.y),
        PhysicalSize::new(bounds.width, bounds.height),
    )
}

/// What a close request ends up doing to the main window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseAction {
    HideToTray,
    Destroy,
}

/// Decide how to close. Hiding is only allowed once the tray is up, so the
/// player always stays reachable.
pub fn close_action(minimize_to_tray: bool, show_tray: impl FnOnce() -> Result<()>) -> CloseAction {
    if !minimize_to_tray {
        return CloseAction::Destroy;
    }

    match show_tray() {
        Ok(()) => CloseAction::HideToTray,
        Err(e) => {
            error!("Tray unavailable, closing instead: {}", e);
            CloseAction::Destroy
        }
    }
}

fn main_window(app: &AppHandle) -> Result<WebviewWindow> {
    app.get_webview_window(MAIN_WINDOW_LABEL)
        .ok_or_else(|| PlayerError::WindowNotFound {
            label: MAIN_WINDOW_LABEL.to_string(),
        })
}

/// The frontend finished booting: show the main window
pub fn start(app: &AppHandle) -> Result<()> {
    let state = app.state::<AppState>();
    if state.mark_ready() {
        info!("App ready");
        state.event_bus.publish(AppEvent::Ready)?;
    }

    let window = main_window(app)?;
    window.show()?;
    window.set_focus()?;
    Ok(())
}

/// Hide to the tray when configured to, otherwise destroy the main window
pub fn close(app: &AppHandle) -> Result<()> {
    let state = app.state::<AppState>();
    let window = main_window(app)?;

    match close_action(state.config.minimize_to_tray(), || tray::show_tray(app)) {
        CloseAction::HideToTray => {
            info!("Hiding main window to tray");
            if let Err(e) = window.hide() {
                warn!("Failed to hide main window: {}", e);
                tray::remove_tray(app);
                return Err(e.into());
            }
            state.event_bus.publish(AppEvent::MinimizedToTray)?;
        }
        CloseAction::Destroy => {
            info!("Closing main window");
            window.destroy()?;
        }
    }

    Ok(())
}

pub fn minimize(app: &AppHandle) -> Result<()> {
    main_window(app)?.minimize()?;
    Ok(())
}

/// Toggle between maximized and restored
pub fn maximize(app: &AppHandle) -> Result<()> {
    let window = main_window(app)?;
    if window.is_maximized()? {
        window.unmaximize()?;
    } else {
        window.maximize()?;
    }
    Ok(())
}

/// Bring the main window back from the tray
pub fn show_main_window(app: &AppHandle) {
    let Ok(window) = main_window(app) else {
        return;
    };

    let _ = window.show();
    let _ = window.unminimize();
    let _ = window.set_focus();
}
