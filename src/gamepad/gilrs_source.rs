//! gilrs-backed sample source
//!
//! Re-expresses gilrs state in the W3C "standard gamepad" index layout so
//! the normalizers see the same shape as any other source: buttons 0..=16,
//! axes 0..=3 with vertical axes down-positive.

use super::source::{DeviceInfo, GamepadSource};
use super::tracking::GamepadSample;
use crate::error::CockpitError;
use gilrs::{Axis, Button, EventType, Gilrs};
use tracing::{debug, error, info, warn};

const STANDARD_BUTTONS: [Button; 17] = [
    Button::South,
    Button::East,
    Button::West,
    Button::North,
    Button::LeftTrigger,
    Button::RightTrigger,
    Button::LeftTrigger2,
    Button::RightTrigger2,
    Button::Select,
    Button::Start,
    Button::LeftThumb,
    Button::RightThumb,
    Button::DPadUp,
    Button::DPadDown,
    Button::DPadLeft,
    Button::DPadRight,
    Button::Mode,
];

/// (axis, flip) in standard index order. gilrs reports Y up-positive.
const STANDARD_AXES: [(Axis, bool); 4] = [
    (Axis::LeftStickX, false),
    (Axis::LeftStickY, true),
    (Axis::RightStickX, false),
    (Axis::RightStickY, true),
];

pub struct GilrsSource {
    gilrs: Gilrs,
}

impl GilrsSource {
    pub fn new() -> Result<Self, CockpitError> {
        info!("Initializing gilrs controller interface");
        match Gilrs::new() {
            Ok(gilrs) => {
                info!("Successfully initialized gilrs");
                Ok(Self { gilrs })
            }
            Err(e) => {
                error!("Failed to initialize gilrs: {}", e);
                Err(CockpitError::TaskError(format!(
                    "Failed to initialize gilrs: {}",
                    e
                )))
            }
        }
    }

    /// gilrs only refreshes gamepad state while its event queue is drained
    fn drain_events(&mut self) {
        while let Some(event) = self.gilrs.next_event() {
            match event.event {
                EventType::Connected => info!("Controller connected: {}", event.id),
                EventType::Disconnected => warn!("Controller disconnected: {}", event.id),
                _ => {}
            }
        }
    }
}

impl GamepadSource for GilrsSource {
    fn devices(&mut self) -> Vec<DeviceInfo> {
        self.drain_events();
        self.gilrs
            .gamepads()
            .map(|(id, gamepad)| DeviceInfo {
                id: usize::from(id),
                name: gamepad.name().to_string(),
            })
            .collect()
    }

    fn sample(&mut self, id: usize) -> Option<GamepadSample> {
        self.drain_events();
        let (_, gamepad) = self
            .gilrs
            .gamepads()
            .find(|(gamepad_id, _)| usize::from(*gamepad_id) == id)?;

        let buttons = STANDARD_BUTTONS
            .iter()
            .map(|button| gamepad.is_pressed(*button))
            .collect();
        let axes = STANDARD_AXES
            .iter()
            .map(|(axis, flip)| {
                let value = f64::from(gamepad.value(*axis));
                if *flip {
                    -value
                } else {
                    value
                }
            })
            .collect();

        debug!("Sampled gilrs gamepad {}", id);
        Some(GamepadSample { buttons, axes })
    }
}
