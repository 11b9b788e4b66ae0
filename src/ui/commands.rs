/// Tauri command functions
///
/// The IPC surface the frontend calls into: bootstrap, window controls,
/// audio events, `playerAction` messages and config access.

use crate::config::AppConfig;
use crate::core::{AppEvent, AudioEvent};
use crate::ui::state::AppState;
use crate::ui::window;
use serde::Serialize;
use tauri::{AppHandle, State};
use tauri_plugin_opener::OpenerExt;
use tracing::{debug, error, info, warn};

/// Result type for Tauri commands (serializable error strings)
type CommandResult<T> = Result<T, String>;

/// What `init` managed to set up
#[derive(Debug, Serialize)]
pub struct InitStatus {
    pub settings_fixed: bool,
    pub media_keys_registered: usize,
}

/// Bootstrap: load persisted state, check settings, bind media keys, show
/// the window.
#[tauri::command]
pub async fn init(app_handle: AppHandle, state: State<'_, AppState>) -> CommandResult<InitStatus> {
    info!("Init request");

    state
        .dispatcher
        .load_persisted_state()
        .map_err(|e| format!("Failed to load persisted state: {}", e))?;

    let settings_fixed = match state.config.check() {
        Ok(fixed) => fixed,
        Err(e) => {
            error!("Settings check failed: {}", e);
            false
        }
    };

    #[cfg(desktop)]
    let media_keys_registered = crate::ui::shortcuts::register_media_keys(&app_handle);
    #[cfg(not(desktop))]
    let media_keys_registered = 0;

    window::start(&app_handle).map_err(|e| format!("Failed to show window: {}", e))?;

    Ok(InitStatus {
        settings_fixed,
        media_keys_registered,
    })
}

/// Show the main window once the frontend is ready
#[tauri::command]
pub async fn app_ready(app_handle: AppHandle) -> CommandResult<()> {
    window::start(&app_handle).map_err(|e| format!("Failed to show window: {}", e))
}

/// Relaunch the application
#[tauri::command]
pub fn app_restart(app_handle: AppHandle) -> CommandResult<()> {
    info!("Restart request");

    // Let the IPC reply reach the frontend before the process goes away
    std::thread::spawn(move || {
        std::thread::sleep(std::time::Duration::from_millis(200));
        app_handle.request_restart();
    });

    Ok(())
}

#[tauri::command]
pub async fn window_close(app_handle: AppHandle) -> CommandResult<()> {
    window::close(&app_handle).map_err(|e| format!("Failed to close window: {}", e))
}

#[tauri::command]
pub async fn window_minimize(app_handle: AppHandle) -> CommandResult<()> {
    window::minimize(&app_handle).map_err(|e| format!("Failed to minimize window: {}", e))
}

#[tauri::command]
pub async fn window_maximize(app_handle: AppHandle) -> CommandResult<()> {
    window::maximize(&app_handle).map_err(|e| format!("Failed to maximize window: {}", e))
}

/// Report an event from the frontend's audio element
#[tauri::command]
pub async fn audio_event(event: AudioEvent, state: State<'_, AppState>) -> CommandResult<()> {
    state
        .dispatcher
        .audio_event(event)
        .map_err(|e| format!("Failed to handle audio event: {}", e))
}

/// Relay a `playerAction` message. Returns whether an action fired.
#[tauri::command]
pub async fn player_action(action: String, state: State<'_, AppState>) -> CommandResult<bool> {
    state
        .dispatcher
        .player_action(&action)
        .map_err(|e| format!("Failed to handle player action: {}", e))
}

#[tauri::command]
pub async fn config_get(state: State<'_, AppState>) -> CommandResult<AppConfig> {
    Ok(state.config.get())
}

/// Read one config key
#[tauri::command]
pub async fn config_get_value(
    key: String,
    state: State<'_, AppState>,
) -> CommandResult<serde_json::Value> {
    state.config.get_value(&key).map_err(|e| e.to_string())
}

/// Set one config key and persist the document
#[tauri::command]
pub async fn config_set_value(
    key: String,
    value: serde_json::Value,
    state: State<'_, AppState>,
) -> CommandResult<()> {
    debug!("Config set: {} = {}", key, value);

    state
        .config
        .set_value(&key, value)
        .map_err(|e| e.to_string())?;
    state.config.save_sync().map_err(|e| e.to_string())?;

    if let Err(e) = state.event_bus.publish(AppEvent::ConfigChanged { key }) {
        warn!("Failed to publish config change: {}", e);
    }

    Ok(())
}

/// Reveal the config directory in the OS file manager
#[tauri::command]
pub async fn open_config_folder(
    app_handle: AppHandle,
    state: State<'_, AppState>,
) -> CommandResult<()> {
    let dir = state
        .config
        .path()
        .parent()
        .ok_or_else(|| "Config path has no parent directory".to_string())?
        .to_path_buf();

    std::fs::create_dir_all(&dir).map_err(|e| format!("Failed to create config folder: {}", e))?;

    app_handle
        .opener()
        .open_path(dir.to_string_lossy(), None::<&str>)
        .map_err(|e| format!("Failed to open config folder: {}", e))
}
