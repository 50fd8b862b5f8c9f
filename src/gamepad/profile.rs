//! Mapping profiles
//!
//! A profile decides which physical button and axis indices feed the logical
//! buttons, dpad and sticks. Indices follow the W3C "standard gamepad" layout.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MappingProfile {
    /// Dpad on buttons 12..=15, right stick on axes 2/3
    #[default]
    Standard,
    /// Dpad encoded on axis 9, right stick on axes 2/5 (8BitDo style)
    Alternate,
}

impl MappingProfile {
    pub fn index(self) -> u8 {
        match self {
            MappingProfile::Standard => 0,
            MappingProfile::Alternate => 1,
        }
    }

    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(MappingProfile::Standard),
            1 => Some(MappingProfile::Alternate),
            _ => None,
        }
    }

    pub fn layout(self) -> ProfileLayout {
        match self {
            MappingProfile::Standard => ProfileLayout {
                dpad_buttons: Some(DPadButtons {
                    up: 12,
                    down: 13,
                    left: 14,
                    right: 15,
                }),
                encoded_dpad_axis: None,
                sticks: [StickAxes { x: 0, y: 1 }, StickAxes { x: 2, y: 3 }],
            },
            MappingProfile::Alternate => ProfileLayout {
                dpad_buttons: None,
                encoded_dpad_axis: Some(9),
                sticks: [StickAxes { x: 0, y: 1 }, StickAxes { x: 2, y: 5 }],
            },
        }
    }
}

impl Display for MappingProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MappingProfile::Standard => write!(f, "Standard"),
            MappingProfile::Alternate => write!(f, "Alternate"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DPadButtons {
    pub up: usize,
    pub down: usize,
    pub left: usize,
    pub right: usize,
}

impl DPadButtons {
    pub fn contains(&self, index: usize) -> bool {
        [self.up, self.down, self.left, self.right].contains(&index)
    }
}

/// Physical axis indices of one logical stick. `y` is reported down-positive
/// by the hardware and gets flipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StickAxes {
    pub x: usize,
    pub y: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfileLayout {
    /// Buttons reserved for the dpad and skipped by generic button scanning
    pub dpad_buttons: Option<DPadButtons>,
    /// Axis carrying the single-value dpad encoding
    pub encoded_dpad_axis: Option<usize>,
    pub sticks: [StickAxes; 2],
}

impl ProfileLayout {
    pub fn is_reserved_button(&self, index: usize) -> bool {
        self.dpad_buttons
            .map(|dpad| dpad.contains(index))
            .unwrap_or(false)
    }
}
