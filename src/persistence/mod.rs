/// Data persistence: window geometry
///
/// Player preferences live in the config store (`crate::config`); this
/// module owns the writers that feed it from window events.

pub mod window_bounds;

// Re-export commonly used types
pub use window_bounds::BoundsPersister;
