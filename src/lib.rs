//! Input normalization for gamepads, keyboards and pointers
//!
//! Raw device state goes in, a single stream of semantic [`InputEvent`]s
//! comes out:
//!
//! ```text
//! gamepad samples ──► GamepadHandle ──┐
//! key down/up ──────► KeyboardHandle ─┼──► EventStream ──► subscribers
//! pointer down/move/up ► PointerClassifier ┘
//! ```

pub mod config;
pub mod error;
pub mod event;
pub mod gamepad;
pub mod keyboard;
pub mod pointer;
pub mod stream;

pub use config::CockpitSettings;
pub use error::CockpitError;
pub use event::{
    AxesInput, ButtonInput, ButtonStatus, DPadInput, Direction, InputEvent, KeyInput, KeyPhase,
    PointerAction, PointerButton, PointerInput, Position,
};
pub use gamepad::{GamepadCockpit, GamepadHandle, GamepadSample, GamepadSource, MappingProfile};
pub use keyboard::{KeyboardHandle, RawKeyEvent};
pub use pointer::{PointerClassifier, PointerSurface, RawPointerEvent};
pub use stream::{EventStream, Subscription};
