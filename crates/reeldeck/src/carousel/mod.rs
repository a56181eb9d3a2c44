mod cursor;
mod gesture;
mod interaction;
mod window;

pub use cursor::Cursor;
pub use gesture::{resolve_swipe, SwipeDirection, SwipeThresholds, TouchState};
pub use interaction::{InteractionController, Transform};
pub use window::{visible_ratio, PreloadWindow, SlotKind};
