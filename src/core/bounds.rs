/// Window geometry persisted between runs

use serde::{Deserialize, Serialize};

/// Smallest width or height worth restoring
pub const MIN_RESTORABLE_SIZE: u32 = 200;

/// Outer position and size of the main window, in physical pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowBounds {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl WindowBounds {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Bounds too small to be a real window (minimized, collapsed, corrupted)
    pub fn is_restorable(&self) -> bool {
        self.width >= MIN_RESTORABLE_SIZE && self.height >= MIN_RESTORABLE_SIZE
    }
}
