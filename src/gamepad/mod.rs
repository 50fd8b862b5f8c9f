//! Gamepad subsystem
//!
//! ```text
//! GamepadSource ──► GamepadCockpit ──► TrackingTables ──► EventStream
//! (raw samples)     (connect/poll)     buttons → dpad → axes
//! ```
//!
//! 1. [`source`] - virtual and gilrs sample sources
//! 2. [`button`], [`dpad`], [`axes`] - per-device-type normalizers
//! 3. [`profile`] - physical index layouts
//! 4. [`tracking`] - the table set for one connected device
//! 5. [`poller`] - discovery, the poll loop and its handle

pub mod axes;
pub mod button;
pub mod cockpit;
pub mod dpad;
#[cfg(feature = "gilrs")]
pub mod gilrs_source;
pub mod poller;
pub mod profile;
pub mod source;
pub mod tracking;

pub use axes::{normalize_axis, AxisSample, AxisTracker, DEAD_ZONE};
pub use button::{ButtonPhase, ButtonTracker};
pub use cockpit::GamepadCockpit;
pub use dpad::{resolve_direction, resolve_encoded_direction, DPadTracker, DPAD_LOOKUP};
#[cfg(feature = "gilrs")]
pub use gilrs_source::GilrsSource;
pub use poller::{GamepadHandle, GamepadPoller};
pub use profile::{MappingProfile, ProfileLayout};
pub use source::{DeviceInfo, GamepadSource, VirtualSource};
pub use tracking::{GamepadSample, TrackingTables};
