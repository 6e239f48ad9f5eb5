pub mod deferred;
pub mod format;
pub mod overlay;
pub mod seek;

pub use overlay::{ControlsOverlay, OverlayCallbacks, OverlaySettings};
pub use seek::{SeekBounds, SeekBoundsError};
