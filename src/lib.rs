/// Cadenza - a desktop music player
///
/// Native side of the player, built with Tauri 2.x: bootstrap, window and
/// tray lifecycle, media keys and the event wiring between the OS and the
/// webview frontend.

// Module declarations
pub mod config;
pub mod core;
pub mod error;
pub mod persistence;
pub mod ui;

// Re-export commonly used types
pub use error::{PlayerError, Result};
pub use ui::state::AppState;

use anyhow::Context;
use std::sync::Arc;
use tauri::{AppHandle, Manager, RunEvent};

/// Initialize logging infrastructure
fn init_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let _ = tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .try_init();

    tracing::info!("Cadenza starting...");
}

/// Load config, build shared state, spawn background tasks, create the window
fn setup(app: &AppHandle) -> anyhow::Result<()> {
    let config_dir = app
        .path()
        .app_config_dir()
        .context("Failed to resolve app config dir")?;

    let config = config::ConfigStore::load(config_dir.join(config::CONFIG_FILE_NAME))
        .context("Failed to load config")?;
    let restored_bounds = config.bounds();

    let sink = Arc::new(ui::FrontendSink::new(app.clone()));
    let (state, bounds_driver) = AppState::new(config, sink);

    tauri::async_runtime::spawn(bounds_driver);
    app.manage(state.clone());
    ui::start_event_forwarder(app.clone(), state);

    ui::window::build_main_window(app, restored_bounds)
        .context("Failed to create main window")?;

    Ok(())
}

/// Main application entry point
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    init_logging();

    let builder = tauri::Builder::default().plugin(tauri_plugin_opener::init());

    #[cfg(desktop)]
    let builder = builder.plugin(ui::shortcuts::plugin());

    builder
        .manage(ui::TrayState::default())
        .setup(|app| setup(app.handle()).map_err(Into::into))
        .on_window_event(ui::handle_window_event)
        .invoke_handler(tauri::generate_handler![
            ui::commands::init,
            ui::commands::app_ready,
            ui::commands::app_restart,
            ui::commands::window_close,
            ui::commands::window_minimize,
            ui::commands::window_maximize,
            ui::commands::audio_event,
            ui::commands::player_action,
            ui::commands::config_get,
            ui::commands::config_get_value,
            ui::commands::config_set_value,
            ui::commands::open_config_folder,
        ])
        .build(tauri::generate_context!())
        .expect("error while building tauri application")
        .run(|_app, event| {
            if let RunEvent::Exit = event {
                #[cfg(desktop)]
                if let Err(e) = ui::shortcuts::unregister_media_keys(_app) {
                    tracing::warn!("{}", e);
                }
                tracing::info!("Cadenza exiting");
            }
        });
}
