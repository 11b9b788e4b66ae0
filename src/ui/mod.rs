/// UI bridge layer: Tauri commands, window, tray and events
///
/// This module provides the bridge between the Rust backend and the
/// JavaScript frontend via Tauri's IPC system, plus the OS-facing pieces
/// (tray, media keys) that feed into the same dispatch.

pub mod commands;
pub mod events;
#[cfg(desktop)]
pub mod shortcuts;
pub mod state;
pub mod tray;
pub mod window;

// Re-export commonly used types
pub use commands::*;
pub use events::{handle_window_event, start_event_forwarder, FrontendSink};
pub use state::AppState;
pub use tray::TrayState;
