//! Raw sample sources
//!
//! The cockpit never talks to hardware directly. A [`GamepadSource`]
//! enumerates devices and hands out one [`GamepadSample`] per poll.

use super::tracking::GamepadSample;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    pub id: usize,
    pub name: String,
}

pub trait GamepadSource: Send + 'static {
    /// Devices currently visible, ordered by id
    fn devices(&mut self) -> Vec<DeviceInfo>;

    /// Current snapshot of `id`, or `None` if the device vanished
    fn sample(&mut self, id: usize) -> Option<GamepadSample>;
}

#[derive(Debug, Default)]
struct VirtualPad {
    name: String,
    sample: GamepadSample,
}

/// In-process gamepads driven by code instead of hardware.
///
/// Cloning shares the same pads, so one clone can be handed to the poller
/// while another keeps scripting input.
#[derive(Clone, Debug, Default)]
pub struct VirtualSource {
    pads: Arc<Mutex<BTreeMap<usize, VirtualPad>>>,
}

impl VirtualSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn plug(&self, id: usize, name: &str) {
        info!("Virtual gamepad plugged: [{}] {}", id, name);
        self.with_pads(|pads| {
            pads.insert(
                id,
                VirtualPad {
                    name: name.to_string(),
                    sample: GamepadSample::default(),
                },
            );
        });
    }

    pub fn unplug(&self, id: usize) {
        info!("Virtual gamepad unplugged: [{}]", id);
        self.with_pads(|pads| {
            pads.remove(&id);
        });
    }

    pub fn set_button(&self, id: usize, index: usize, pressed: bool) {
        self.with_pad(id, |sample| {
            if sample.buttons.len() <= index {
                sample.buttons.resize(index + 1, false);
            }
            sample.buttons[index] = pressed;
        });
    }

    pub fn set_axis(&self, id: usize, index: usize, value: f64) {
        self.with_pad(id, |sample| {
            if sample.axes.len() <= index {
                sample.axes.resize(index + 1, 0.0);
            }
            sample.axes[index] = value;
        });
    }

    pub fn set_sample(&self, id: usize, sample: GamepadSample) {
        self.with_pad(id, |current| *current = sample);
    }

    fn with_pad(&self, id: usize, f: impl FnOnce(&mut GamepadSample)) {
        self.with_pads(|pads| match pads.get_mut(&id) {
            Some(pad) => f(&mut pad.sample),
            None => warn!("No virtual gamepad with id {}", id),
        });
    }

    fn with_pads<R>(&self, f: impl FnOnce(&mut BTreeMap<usize, VirtualPad>) -> R) -> R {
        // A panic while holding the lock leaves plain data behind; keep using it
        let mut pads = self
            .pads
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut pads)
    }
}

impl GamepadSource for VirtualSource {
    fn devices(&mut self) -> Vec<DeviceInfo> {
        self.with_pads(|pads| {
            pads.iter()
                .map(|(id, pad)| DeviceInfo {
                    id: *id,
                    name: pad.name.clone(),
                })
                .collect()
        })
    }

    fn sample(&mut self, id: usize) -> Option<GamepadSample> {
        let sample = self.with_pads(|pads| pads.get(&id).map(|pad| pad.sample.clone()));
        if sample.is_none() {
            debug!("Sample requested for missing virtual gamepad {}", id);
        }
        sample
    }
}
