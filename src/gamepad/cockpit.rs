//! Synchronous gamepad core
//!
//! Owns the sample source, the connected device and its tracking tables.
//! The async poller drives it; tests and embedders can drive it by hand.

use super::profile::MappingProfile;
use super::source::{DeviceInfo, GamepadSource};
use super::tracking::TrackingTables;
use crate::error::CockpitError;
use crate::event::InputEvent;
use tracing::{debug, info, warn};

pub struct GamepadCockpit {
    source: Box<dyn GamepadSource>,
    connected: Option<usize>,
    /// Set while the connected device returns no samples
    lost: bool,
    tables: TrackingTables,
}

impl GamepadCockpit {
    pub fn new(source: Box<dyn GamepadSource>) -> Self {
        Self {
            source,
            connected: None,
            lost: false,
            tables: TrackingTables::new(MappingProfile::default()),
        }
    }

    pub fn devices(&mut self) -> Vec<DeviceInfo> {
        self.source.devices()
    }

    pub fn connected(&self) -> Option<usize> {
        self.connected
    }

    pub fn profile(&self) -> MappingProfile {
        self.tables.profile()
    }

    pub fn tables(&self) -> &TrackingTables {
        &self.tables
    }

    /// Selects `id` under `profile` and starts from fresh tables.
    ///
    /// Unknown ids leave the current connection and its state untouched.
    pub fn connect(&mut self, id: usize, profile: MappingProfile) -> Result<(), CockpitError> {
        let devices = self.source.devices();
        let Some(device) = devices.iter().find(|device| device.id == id) else {
            warn!(
                "Refusing to connect to gamepad {}, known ids: {:?}",
                id,
                devices.iter().map(|d| d.id).collect::<Vec<_>>()
            );
            return Err(CockpitError::InvalidDeviceId(id));
        };

        info!(
            "Connecting to gamepad [{}] {} with profile {}",
            device.id, device.name, profile
        );
        self.connected = Some(id);
        self.lost = false;
        self.tables = TrackingTables::new(profile);
        Ok(())
    }

    /// Samples the connected device once and returns this tick's events.
    ///
    /// A device that disappears and comes back under the same id starts over
    /// with fresh tables under the current profile.
    pub fn poll(&mut self, dt: f64) -> Vec<InputEvent> {
        let Some(id) = self.connected else {
            return Vec::new();
        };
        match self.source.sample(id) {
            Some(sample) => {
                if self.lost {
                    info!("Gamepad {} is back, resetting tracking state", id);
                    self.tables = TrackingTables::new(self.tables.profile());
                    self.lost = false;
                }
                self.tables.apply(dt, &sample)
            }
            None => {
                if !self.lost {
                    warn!("Gamepad {} disconnected", id);
                    self.lost = true;
                }
                debug!("Gamepad {} returned no sample this tick", id);
                Vec::new()
            }
        }
    }

    /// True while the connected device has stopped returning samples.
    pub fn is_lost(&self) -> bool {
        self.lost
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::ButtonStatus;
    use crate::gamepad::source::VirtualSource;

    fn cockpit_with_pad() -> (VirtualSource, GamepadCockpit) {
        let source = VirtualSource::new();
        source.plug(0, "virtual pad");
        let cockpit = GamepadCockpit::new(Box::new(source.clone()));
        (source, cockpit)
    }

    #[test]
    fn poll_without_connection_is_silent() {
        let (source, mut cockpit) = cockpit_with_pad();
        source.set_button(0, 0, true);
        assert!(cockpit.poll(0.05).is_empty());
    }

    #[test]
    fn invalid_id_leaves_state_unchanged() {
        let (source, mut cockpit) = cockpit_with_pad();
        cockpit.connect(0, MappingProfile::Standard).unwrap();
        source.set_button(0, 1, true);
        cockpit.poll(0.05);
        cockpit.poll(0.05);

        let err = cockpit.connect(4, MappingProfile::Alternate).unwrap_err();
        assert!(matches!(err, CockpitError::InvalidDeviceId(4)));
        assert_eq!(cockpit.connected(), Some(0));
        assert_eq!(cockpit.profile(), MappingProfile::Standard);
        assert!(cockpit.tables().buttons().get(1).unwrap().held > 0.0);
    }

    #[test]
    fn profile_switch_discards_held_state() {
        let (source, mut cockpit) = cockpit_with_pad();
        cockpit.connect(0, MappingProfile::Standard).unwrap();
        source.set_button(0, 0, true);

        cockpit.poll(0.0);
        for _ in 0..60 {
            cockpit.poll(0.05);
        }
        let held = cockpit.tables().buttons().get(0).unwrap().held;
        assert!((held - 3.0).abs() < 1e-6);

        cockpit.connect(0, MappingProfile::Alternate).unwrap();
        let events = cockpit.poll(0.05);
        match &events[0] {
            InputEvent::Button(button) => {
                assert_eq!(button.id, 0);
                assert_eq!(button.status, ButtonStatus::Pressed);
                assert_eq!(button.held, 0.0);
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn vanished_device_yields_nothing() {
        let (source, mut cockpit) = cockpit_with_pad();
        cockpit.connect(0, MappingProfile::Standard).unwrap();
        source.unplug(0);
        assert!(cockpit.poll(0.05).is_empty());
        assert!(cockpit.is_lost());
    }

    #[test]
    fn reconnected_device_starts_from_fresh_tables() {
        let (source, mut cockpit) = cockpit_with_pad();
        cockpit.connect(0, MappingProfile::Alternate).unwrap();
        source.set_button(0, 0, true);
        cockpit.poll(0.0);
        for _ in 0..20 {
            cockpit.poll(0.05);
        }
        assert!(cockpit.tables().buttons().get(0).unwrap().held > 0.9);

        source.unplug(0);
        assert!(cockpit.poll(0.05).is_empty());

        source.plug(0, "virtual pad");
        source.set_button(0, 0, true);
        let events = cockpit.poll(0.05);
        assert!(!cockpit.is_lost());
        assert_eq!(cockpit.profile(), MappingProfile::Alternate);
        match &events[0] {
            InputEvent::Button(button) => {
                assert_eq!(button.id, 0);
                assert_eq!(button.status, ButtonStatus::Pressed);
                assert_eq!(button.held, 0.0);
            }
            other => panic!("unexpected event {:?}", other),
        }
    }
}
