//! Pointer subsystem
//!
//! [`buttons`] holds the fixed native-to-logical button tables,
//! [`classifier`] turns raw down/move/up occurrences into press, drag, move
//! and release events.

pub mod buttons;
pub mod classifier;

pub use buttons::{map_native_button, pressed_buttons, SUPPORTED_BUTTONS};
pub use classifier::{PointerClassifier, PointerSurface, RawPointerEvent, RawPointerKind};
