/// Debounced window-bounds persistence
///
/// Resize and move events arrive in bursts while the user drags the window.
/// Each event hands the current bounds to a debouncer; only the last bounds
/// of a burst reach the config store, followed by one save on the blocking
/// pool.

use crate::config::ConfigStore;
use crate::core::bounds::WindowBounds;
use crate::core::debounce::{Debouncer, BOUNDS_DEBOUNCE};
use crate::core::events::{AppEvent, EventBus};
use crate::error::Result;
use std::future::Future;
use std::sync::Arc;
use tokio::time::Duration;
use tracing::{debug, error, warn};

#[derive(Clone)]
pub struct BoundsPersister {
    debouncer: Debouncer<WindowBounds>,
}

impl BoundsPersister {
    /// Create the persister and the driver future that performs the writes
    pub fn new(
        store: Arc<ConfigStore>,
        bus: Arc<EventBus>,
    ) -> (Self, impl Future<Output = ()> + Send + 'static) {
        Self::with_delay(BOUNDS_DEBOUNCE, store, bus)
    }

    pub fn with_delay(
        delay: Duration,
        store: Arc<ConfigStore>,
        bus: Arc<EventBus>,
    ) -> (Self, impl Future<Output = ()> + Send + 'static) {
        let (debouncer, driver) = Debouncer::new(delay, move |bounds| {
            store.set_bounds(bounds);

            let store = store.clone();
            let bus = bus.clone();
            tokio::task::spawn_blocking(move || {
                if let Err(e) = persist(&store, &bus, bounds) {
                    error!("Failed to save window bounds: {}", e);
                }
            });
        });

        (Self { debouncer }, driver)
    }

    /// Schedule a write of `bounds`, replacing any write still pending
    pub fn save_bounds(&self, bounds: WindowBounds) {
        if !bounds.is_restorable() {
            debug!("Ignoring degenerate window bounds {:?}", bounds);
            return;
        }

        if !self.debouncer.trigger(bounds) {
            warn!("Bounds writer is not running, dropping {:?}", bounds);
        }
    }
}

fn persist(store: &ConfigStore, bus: &EventBus, bounds: WindowBounds) -> Result<()> {
    store.save_sync()?;
    debug!("Saved window bounds {:?}", bounds);
    bus.publish(AppEvent::BoundsSaved { bounds })
}
