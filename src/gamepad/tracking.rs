//! Tracking table set
//!
//! One button, dpad and axis table per connected device, parameterized by the
//! active mapping profile. Switching profile replaces the whole set.

use super::axes::{AxisSample, AxisTracker};
use super::button::ButtonTracker;
use super::dpad::DPadTracker;
use super::profile::{MappingProfile, ProfileLayout};
use crate::event::InputEvent;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One raw snapshot of a device: pressed flags and axis floats in `[-1, 1]`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GamepadSample {
    pub buttons: Vec<bool>,
    pub axes: Vec<f64>,
}

impl GamepadSample {
    /// Missing slots read as not pressed.
    pub fn button(&self, index: usize) -> bool {
        self.buttons.get(index).copied().unwrap_or(false)
    }

    /// Missing slots read as zero.
    pub fn axis(&self, index: usize) -> f64 {
        self.axes.get(index).copied().unwrap_or(0.0)
    }
}

#[derive(Clone, Debug)]
pub struct TrackingTables {
    profile: MappingProfile,
    layout: ProfileLayout,
    buttons: ButtonTracker,
    dpad: DPadTracker,
    axes: AxisTracker,
}

impl TrackingTables {
    pub fn new(profile: MappingProfile) -> Self {
        debug!("Creating tracking tables for profile {}", profile);
        Self {
            profile,
            layout: profile.layout(),
            buttons: ButtonTracker::new(),
            dpad: DPadTracker::new(),
            axes: AxisTracker::new(),
        }
    }

    pub fn profile(&self) -> MappingProfile {
        self.profile
    }

    pub fn buttons(&self) -> &ButtonTracker {
        &self.buttons
    }

    pub fn dpad(&self) -> &DPadTracker {
        &self.dpad
    }

    pub fn axes(&self) -> &AxisTracker {
        &self.axes
    }

    /// Feeds one tick and returns the visible state in buttons, dpad, axes order.
    pub fn apply(&mut self, dt: f64, sample: &GamepadSample) -> Vec<InputEvent> {
        for (index, pressed) in sample.buttons.iter().enumerate() {
            if self.layout.is_reserved_button(index) {
                continue;
            }
            self.buttons.update(index, dt, *pressed);
        }
        let missing: Vec<usize> = self
            .buttons
            .ids()
            .filter(|id| *id >= sample.buttons.len())
            .collect();
        for id in missing {
            self.buttons.update(id, dt, false);
        }

        if let Some(dpad) = self.layout.dpad_buttons {
            self.dpad.update(
                0,
                dt,
                sample.button(dpad.up),
                sample.button(dpad.down),
                sample.button(dpad.left),
                sample.button(dpad.right),
            );
        }
        if let Some(axis) = self.layout.encoded_dpad_axis {
            match sample.axes.get(axis) {
                Some(value) => self.dpad.update_encoded(0, dt, *value),
                // A tracked dpad whose axis went missing reads as centered
                None if self.dpad.get(0).is_some() => self.dpad.update_neutral(0, dt),
                None => {}
            }
        }

        for (id, stick) in self.layout.sticks.iter().enumerate() {
            // Stick ids appear once the device reports at least one of their axes
            let reported = stick.x < sample.axes.len() || stick.y < sample.axes.len();
            if !reported && self.axes.get(id).is_none() {
                continue;
            }
            let x = sample.axis(stick.x);
            let y = -sample.axis(stick.y);
            self.axes.update(id, dt, AxisSample::both(x, y));
        }

        self.buttons
            .active()
            .into_iter()
            .map(InputEvent::Button)
            .chain(self.dpad.active().into_iter().map(InputEvent::Dpad))
            .chain(self.axes.active().into_iter().map(InputEvent::Axes))
            .collect()
    }
}
