/// Core player-shell logic
///
/// Window geometry, the action vocabulary shared with the frontend, the
/// event dispatch table, debouncing and the native event bus. Nothing in
/// here depends on Tauri.

pub mod actions;
pub mod bounds;
pub mod debounce;
pub mod dispatch;
pub mod events;

// Re-export commonly used types
pub use actions::{ActionSink, FrontendAction, MediaKey, PlayerAction};
pub use bounds::WindowBounds;
pub use debounce::Debouncer;
pub use dispatch::{AudioEvent, Dispatcher, PlayCountTracker};
pub use events::{AppEvent, EventBus};
