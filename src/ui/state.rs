/// Application state management for Tauri
///
/// Shared handles to the config store, event bus, dispatcher and the
/// bounds writer, cloned into commands and event handlers.

use crate::config::ConfigStore;
use crate::core::{ActionSink, Dispatcher, EventBus};
use crate::persistence::BoundsPersister;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Global application state shared across Tauri commands
#[derive(Clone)]
pub struct AppState {
    /// Persisted configuration document
    pub config: Arc<ConfigStore>,

    /// Event bus for native-side events
    pub event_bus: Arc<EventBus>,

    /// Audio events, `playerAction` messages and media keys
    pub dispatcher: Arc<Dispatcher>,

    /// Debounced window-bounds writer
    pub bounds: BoundsPersister,

    ready: Arc<AtomicBool>,
}

impl AppState {
    /// Create application state.
    ///
    /// Returns the bounds writer's driver future, which must be spawned on
    /// the async runtime for bounds to be saved.
    pub fn new(
        config: ConfigStore,
        sink: Arc<dyn ActionSink>,
    ) -> (Self, impl Future<Output = ()> + Send + 'static) {
        let config = Arc::new(config);
        let event_bus = Arc::new(EventBus::new());
        let dispatcher = Arc::new(Dispatcher::new(sink, event_bus.clone()));
        let (bounds, bounds_driver) = BoundsPersister::new(config.clone(), event_bus.clone());

        let state = Self {
            config,
            event_bus,
            dispatcher,
            bounds,
            ready: Arc::new(AtomicBool::new(false)),
        };

        (state, bounds_driver)
    }

    /// Mark the app ready. Returns `true` only for the first call.
    pub fn mark_ready(&self) -> bool {
        !self.ready.swap(true, Ordering::SeqCst)
    }
}
