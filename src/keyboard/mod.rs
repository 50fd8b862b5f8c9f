//! Keyboard subsystem
//!
//! [`hold_state`] tracks the held-keys set and per-key accumulators;
//! [`composer`] runs one interval task per held key and merges them into the
//! event stream.

pub mod composer;
pub mod hold_state;

pub use composer::{KeyboardHandle, RawKeyEvent};
pub use hold_state::{normalize_key, KeyHoldState};
