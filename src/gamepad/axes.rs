//! Axis / joystick normalizer
//!
//! Dead-zone clamp plus 3-decimal rounding, so float jitter on a resting or
//! steady stick doesn't register as change.

use crate::event::AxesInput;
use std::collections::BTreeMap;
use tracing::debug;

/// Components with a smaller magnitude read as zero
pub const DEAD_ZONE: f64 = 0.05;

/// A partial stick sample. Absent components keep their previous value.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AxisSample {
    pub x: Option<f64>,
    pub y: Option<f64>,
}

impl AxisSample {
    pub fn both(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
        }
    }
}

/// Dead zone, then rounding to 3 decimals.
pub fn normalize_axis(value: f64) -> f64 {
    if !value.is_finite() || value.abs() < DEAD_ZONE {
        0.0
    } else {
        (value * 1000.0).round() / 1000.0
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AxisEntry {
    pub id: usize,
    pub dt: f64,
    pub held: f64,
    pub dx: f64,
    pub dy: f64,
}

#[derive(Clone, Debug, Default)]
pub struct AxisTracker {
    entries: BTreeMap<usize, AxisEntry>,
}

impl AxisTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalizes and stores the components present in `sample`.
    ///
    /// Absent components keep their previous value. `held` grows by `dt` while
    /// the normalized position stays put and resets to 0 when either present
    /// component changes.
    pub fn update(&mut self, id: usize, dt: f64, sample: AxisSample) {
        let entry = self.entries.entry(id).or_insert_with(|| {
            debug!("Tracking joystick {}", id);
            AxisEntry {
                id,
                dt: 0.0,
                held: 0.0,
                dx: 0.0,
                dy: 0.0,
            }
        });

        entry.dt = dt;
        let mut changed = false;
        if let Some(x) = sample.x {
            let dx = normalize_axis(x);
            changed |= dx != entry.dx;
            entry.dx = dx;
        }
        if let Some(y) = sample.y {
            let dy = normalize_axis(y);
            changed |= dy != entry.dy;
            entry.dy = dy;
        }

        if changed {
            entry.held = 0.0;
        } else {
            entry.held += dt;
        }
    }

    pub fn get(&self, id: usize) -> Option<&AxisEntry> {
        self.entries.get(&id)
    }

    /// Copies of every stick outside the dead zone, in id order.
    pub fn active(&self) -> Vec<AxesInput> {
        self.entries
            .values()
            .filter(|entry| entry.dx != 0.0 || entry.dy != 0.0)
            .map(|entry| AxesInput {
                id: entry.id,
                dt: entry.dt,
                held: entry.held,
                dx: entry.dx,
                dy: entry.dy,
            })
            .collect()
    }
}
