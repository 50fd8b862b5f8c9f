//! Directional pad normalizer
//!
//! Two raw shapes resolve into one of nine lookup slots (eight directions plus
//! neutral): four discrete booleans, or a single axis that encodes every
//! direction as a position in `[-1, 1]`. Both feed the same held-duration
//! state machine.

use crate::event::{DPadInput, Direction};
use std::collections::BTreeMap;
use tracing::debug;

/// Slot used when nothing is pressed
pub const NEUTRAL_SLOT: usize = 8;

const DIAGONAL: f64 = 0.7071;

/// Lookup slots, clockwise from north. Index order is part of the contract:
/// the encoded-axis quantizer addresses this table directly.
pub const DPAD_LOOKUP: [(Option<Direction>, f64, f64); 9] = [
    (Some(Direction::N), 0.0, 1.0),
    (Some(Direction::NE), DIAGONAL, DIAGONAL),
    (Some(Direction::E), 1.0, 0.0),
    (Some(Direction::SE), DIAGONAL, -DIAGONAL),
    (Some(Direction::S), 0.0, -1.0),
    (Some(Direction::SW), -DIAGONAL, -DIAGONAL),
    (Some(Direction::W), -1.0, 0.0),
    (Some(Direction::NW), -DIAGONAL, DIAGONAL),
    (None, 0.0, 0.0),
];

/// Width of one bin on the encoded axis
const ENCODED_BIN: f64 = 2.0 / 7.0;

/// Resolves four booleans to a lookup slot.
///
/// Diagonals win over single directions; up/down win over left/right; left
/// wins over right when both are held with a vertical.
pub fn resolve_direction(up: bool, down: bool, left: bool, right: bool) -> usize {
    if up {
        if left {
            7
        } else if right {
            1
        } else {
            0
        }
    } else if down {
        if left {
            5
        } else if right {
            3
        } else {
            4
        }
    } else if left {
        6
    } else if right {
        2
    } else {
        NEUTRAL_SLOT
    }
}

/// Quantizes a single-axis hardware encoding to a lookup slot.
///
/// `round((value + 1) / (2/7))`: -1.0 is north and each bin steps clockwise.
/// Anything that lands outside 0..8 (including the hardware's resting value
/// of 9/7) is neutral.
pub fn resolve_encoded_direction(value: f64) -> usize {
    let index = ((value + 1.0) / ENCODED_BIN).round();
    if index.is_finite() && (0.0..NEUTRAL_SLOT as f64).contains(&index) {
        index as usize
    } else {
        NEUTRAL_SLOT
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DPadEntry {
    pub id: usize,
    pub dt: f64,
    pub held: f64,
    /// `None` while neutral
    pub direction: Option<Direction>,
    pub dx: f64,
    pub dy: f64,
}

#[derive(Clone, Debug, Default)]
pub struct DPadTracker {
    entries: BTreeMap<usize, DPadEntry>,
}

impl DPadTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discrete up/down/left/right sample.
    pub fn update(&mut self, id: usize, dt: f64, up: bool, down: bool, left: bool, right: bool) {
        self.apply_slot(id, dt, resolve_direction(up, down, left, right));
    }

    /// Single-axis encoded sample.
    pub fn update_encoded(&mut self, id: usize, dt: f64, value: f64) {
        self.apply_slot(id, dt, resolve_encoded_direction(value));
    }

    /// Centers `id` for this tick, as if nothing were pressed.
    pub fn update_neutral(&mut self, id: usize, dt: f64) {
        self.apply_slot(id, dt, NEUTRAL_SLOT);
    }

    fn apply_slot(&mut self, id: usize, dt: f64, slot: usize) {
        let (direction, dx, dy) = DPAD_LOOKUP[slot.min(NEUTRAL_SLOT)];
        let entry = self.entries.entry(id).or_insert_with(|| {
            debug!("Tracking dpad {}", id);
            DPadEntry {
                id,
                dt: 0.0,
                held: 0.0,
                direction: None,
                dx: 0.0,
                dy: 0.0,
            }
        });

        entry.dt = dt;
        if entry.direction == direction {
            entry.held += dt;
        } else {
            entry.held = 0.0;
        }
        entry.direction = direction;
        entry.dx = dx;
        entry.dy = dy;
    }

    pub fn get(&self, id: usize) -> Option<&DPadEntry> {
        self.entries.get(&id)
    }

    /// Copies of every dpad pointing somewhere, in id order.
    pub fn active(&self) -> Vec<DPadInput> {
        self.entries
            .values()
            .filter_map(|entry| {
                entry.direction.map(|direction| DPadInput {
                    id: entry.id,
                    dt: entry.dt,
                    held: entry.held,
                    direction,
                    dx: entry.dx,
                    dy: entry.dy,
                })
            })
            .collect()
    }
}
