//! Button state tracker
//!
//! Per-button lifecycle driven by one boolean sample per tick:
//!
//! ```text
//!            pressed            released
//! (first) ──────────► Pressed ───────────► Released ──► Dead
//!    │                 ▲   │ pressed          │ pressed   │
//!    │ released        │   └──(held += dt)    │           │
//!    ▼                 └──────────────────────┴───────────┘
//!   Dead
//! ```
//!
//! `Released` lives exactly one tick, so consumers see one release per cycle.

use crate::event::{ButtonInput, ButtonStatus};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ButtonPhase {
    Pressed,
    Released,
    /// Released and already reported; suppressed until the next press
    Dead,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ButtonEntry {
    pub id: usize,
    pub dt: f64,
    pub held: f64,
    pub phase: ButtonPhase,
}

#[derive(Clone, Debug, Default)]
pub struct ButtonTracker {
    entries: BTreeMap<usize, ButtonEntry>,
}

impl ButtonTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances button `id` by one tick of length `dt` seconds.
    ///
    /// A button seen for the first time starts at `held` 0, either pressed or
    /// dead. While pressed, `held` grows by `dt`; the release tick keeps the
    /// accumulated duration. Pressing again from released or dead restarts at 0.
    pub fn update(&mut self, id: usize, dt: f64, pressed: bool) {
        let entry = match self.entries.entry(id) {
            Entry::Vacant(slot) => {
                let phase = if pressed {
                    ButtonPhase::Pressed
                } else {
                    ButtonPhase::Dead
                };
                debug!("Tracking button {} (first phase {:?})", id, phase);
                slot.insert(ButtonEntry {
                    id,
                    dt: 0.0,
                    held: 0.0,
                    phase,
                });
                return;
            }
            Entry::Occupied(slot) => slot.into_mut(),
        };

        match (entry.phase, pressed) {
            (ButtonPhase::Pressed, still_pressed) => {
                entry.dt = dt;
                entry.held += dt;
                if !still_pressed {
                    entry.phase = ButtonPhase::Released;
                }
            }
            (_, true) => {
                entry.dt = 0.0;
                entry.held = 0.0;
                entry.phase = ButtonPhase::Pressed;
            }
            (_, false) => {
                entry.dt = 0.0;
                entry.held = 0.0;
                entry.phase = ButtonPhase::Dead;
            }
        }
    }

    /// Ids of every button tracked so far, ascending.
    pub fn ids(&self) -> impl Iterator<Item = usize> + '_ {
        self.entries.keys().copied()
    }

    pub fn get(&self, id: usize) -> Option<&ButtonEntry> {
        self.entries.get(&id)
    }

    /// Copies of every non-dead entry, in id order.
    pub fn active(&self) -> Vec<ButtonInput> {
        self.entries
            .values()
            .filter_map(|entry| {
                let status = match entry.phase {
                    ButtonPhase::Pressed => ButtonStatus::Pressed,
                    ButtonPhase::Released => ButtonStatus::Released,
                    ButtonPhase::Dead => return None,
                };
                Some(ButtonInput {
                    id: entry.id,
                    dt: entry.dt,
                    held: entry.held,
                    status,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f64 = 0.05;

    #[test]
    fn first_sample_not_pressed_is_dead() {
        let mut tracker = ButtonTracker::new();
        tracker.update(3, DT, false);
        assert_eq!(tracker.get(3).unwrap().phase, ButtonPhase::Dead);
        assert!(tracker.active().is_empty());
    }

    #[test]
    fn press_then_release_reports_each_once() {
        let mut tracker = ButtonTracker::new();

        tracker.update(0, DT, true);
        let pressed = tracker.active();
        assert_eq!(pressed.len(), 1);
        assert_eq!(pressed[0].status, ButtonStatus::Pressed);
        assert_eq!(pressed[0].held, 0.0);

        tracker.update(0, DT, false);
        let released = tracker.active();
        assert_eq!(released.len(), 1);
        assert_eq!(released[0].status, ButtonStatus::Released);

        for _ in 0..5 {
            tracker.update(0, DT, false);
            assert!(tracker.active().is_empty());
        }
    }

    #[test]
    fn held_accumulates_and_freezes_on_release() {
        let mut tracker = ButtonTracker::new();
        tracker.update(1, DT, true);
        let mut last = tracker.get(1).unwrap().held;
        for _ in 0..4 {
            tracker.update(1, DT, true);
            let held = tracker.get(1).unwrap().held;
            assert!(held > last);
            last = held;
        }

        tracker.update(1, DT, false);
        let entry = tracker.get(1).unwrap();
        assert_eq!(entry.phase, ButtonPhase::Released);
        assert!((entry.held - 5.0 * DT).abs() < 1e-9);
        assert_eq!(entry.dt, DT);
    }

    #[test]
    fn press_after_release_rearms_from_zero() {
        let mut tracker = ButtonTracker::new();
        tracker.update(2, DT, true);
        tracker.update(2, DT, true);
        tracker.update(2, DT, false);
        tracker.update(2, DT, true);

        let entry = tracker.get(2).unwrap();
        assert_eq!(entry.phase, ButtonPhase::Pressed);
        assert_eq!(entry.held, 0.0);
        assert_eq!(entry.dt, 0.0);
    }

    #[test]
    fn active_is_ordered_by_id() {
        let mut tracker = ButtonTracker::new();
        for id in [7, 2, 5] {
            tracker.update(id, DT, true);
        }
        let ids: Vec<usize> = tracker.active().iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![2, 5, 7]);
    }
}
