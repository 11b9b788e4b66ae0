/// Error types for Cadenza
///
/// Typed errors for the native side of the player: configuration storage,
/// window control, shortcut registration and frontend event emission.

use thiserror::Error;

/// Main error type for Cadenza operations
#[derive(Error, Debug)]
pub enum PlayerError {
    // ========================================
    // Configuration Errors
    // ========================================

    #[error("Failed to read config file {path}: {source}")]
    ConfigRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write config file {path}: {source}")]
    ConfigWrite {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Unknown config key '{0}'")]
    UnknownConfigKey(String),

    #[error("Invalid value for config key '{key}': {reason}")]
    InvalidConfigValue {
        key: String,
        reason: String,
    },

    // ========================================
    // Window Errors
    // ========================================

    #[error("Window '{label}' not found")]
    WindowNotFound {
        label: String,
    },

    #[error("Window operation '{operation}' failed: {reason}")]
    WindowOperation {
        operation: String,
        reason: String,
    },

    // ========================================
    // Platform Errors
    // ========================================

    #[error("Failed to register shortcut '{shortcut}': {reason}")]
    ShortcutRegistration {
        shortcut: String,
        reason: String,
    },

    #[error("Failed to emit '{event}' to frontend: {reason}")]
    EmitFailed {
        event: String,
        reason: String,
    },

    #[error("Tray error: {0}")]
    Tray(String),

    // ========================================
    // IO / Serialization Errors
    // ========================================

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type alias for Cadenza operations
pub type Result<T> = std::result::Result<T, PlayerError>;

impl From<tauri::Error> for PlayerError {
    fn from(err: tauri::Error) -> Self {
        PlayerError::WindowOperation {
            operation: "tauri".to_string(),
            reason: err.to_string(),
        }
    }
}

// ========================================
// Unit Tests
// ========================================
