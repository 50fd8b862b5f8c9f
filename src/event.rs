//! Semantic input events
//!
//! Every normalizer in the crate produces [`InputEvent`] values. Raw samples
//! never leave the normalizers; consumers only see de-duplicated, timed events.
//!
//! ```text
//! Button  ─┐
//! DPad    ─┤
//! Axes    ─┼──► InputEvent ──► EventStream ──► subscribers
//! Key     ─┤
//! Pointer ─┘
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// One normalized input occurrence, tagged by device kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum InputEvent {
    Button(ButtonInput),
    Dpad(DPadInput),
    Axes(AxesInput),
    Key(KeyInput),
    Pointer(PointerInput),
}

impl InputEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            InputEvent::Button(_) => "button",
            InputEvent::Dpad(_) => "dpad",
            InputEvent::Axes(_) => "axes",
            InputEvent::Key(_) => "key",
            InputEvent::Pointer(_) => "pointer",
        }
    }
}

/// Emitted button status. The internal `dead` phase is never observable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonStatus {
    Pressed,
    Released,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ButtonInput {
    pub id: usize,
    /// Seconds since the previous tick
    pub dt: f64,
    /// Seconds the status has stayed unchanged
    pub held: f64,
    pub status: ButtonStatus,
}

/// One of the eight named compass directions.
///
/// Neutral has no variant here: a dpad at rest is never emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::N => "N",
            Direction::NE => "NE",
            Direction::E => "E",
            Direction::SE => "SE",
            Direction::S => "S",
            Direction::SW => "SW",
            Direction::W => "W",
            Direction::NW => "NW",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DPadInput {
    pub id: usize,
    pub dt: f64,
    pub held: f64,
    pub direction: Direction,
    pub dx: f64,
    pub dy: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxesInput {
    pub id: usize,
    pub dt: f64,
    pub held: f64,
    pub dx: f64,
    pub dy: f64,
}

/// Lifecycle tag of a key hold sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyPhase {
    Press,
    Held,
    Release,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyInput {
    pub key: String,
    pub dt: f64,
    pub held: f64,
    pub event: KeyPhase,
    /// Snapshot of every key held at emission time
    pub keys_held: BTreeSet<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerAction {
    Press,
    Drag,
    Move,
    Release,
}

/// Logical pointer buttons, valued as their bit in a button mask
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PointerButton {
    None = 0,
    Primary = 1,
    Secondary = 2,
    Auxiliary = 4,
    Back = 8,
    Forward = 16,
}

impl PointerButton {
    pub fn code(self) -> u8 {
        self as u8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointerInput {
    pub action: PointerAction,
    pub button: PointerButton,
    pub pos: Position,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_button_codes_match_mask_bits() {
        assert_eq!(PointerButton::None.code(), 0);
        assert_eq!(PointerButton::Primary.code(), 1);
        assert_eq!(PointerButton::Secondary.code(), 2);
        assert_eq!(PointerButton::Auxiliary.code(), 4);
        assert_eq!(PointerButton::Back.code(), 8);
        assert_eq!(PointerButton::Forward.code(), 16);
    }

    #[test]
    fn kind_names_follow_variant() {
        let event = InputEvent::Axes(AxesInput {
            id: 0,
            dt: 0.05,
            held: 0.0,
            dx: 0.5,
            dy: 0.0,
        });
        assert_eq!(event.kind(), "axes");
        assert_eq!(Direction::SW.to_string(), "SW");
    }
}
