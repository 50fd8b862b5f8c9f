//! Pointer button classifier
//!
//! Keeps a pressed flag per logical button and classifies each raw occurrence:
//!
//! - down: one `press` per button in the mask
//! - move: one `drag` per button in the mask, or a single buttonless `move`
//! - up: one `release` for the resolved native button

use super::buttons::{map_native_button, pressed_buttons, SUPPORTED_BUTTONS};
use crate::event::{InputEvent, PointerAction, PointerButton, PointerInput, Position};
use crate::stream::EventStream;
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawPointerKind {
    Down { buttons: u16 },
    Move { buttons: u16 },
    Up { button: i16 },
}

/// A native pointer occurrence in page coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawPointerEvent {
    pub kind: RawPointerKind,
    pub page: Position,
}

impl RawPointerEvent {
    pub fn down(buttons: u16, x: f64, y: f64) -> Self {
        Self {
            kind: RawPointerKind::Down { buttons },
            page: Position { x, y },
        }
    }

    pub fn moved(buttons: u16, x: f64, y: f64) -> Self {
        Self {
            kind: RawPointerKind::Move { buttons },
            page: Position { x, y },
        }
    }

    pub fn up(button: i16, x: f64, y: f64) -> Self {
        Self {
            kind: RawPointerKind::Up { button },
            page: Position { x, y },
        }
    }
}

/// Origin of the surface that receives pointer input
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerSurface {
    pub offset_x: f64,
    pub offset_y: f64,
}

impl PointerSurface {
    pub fn new(offset_x: f64, offset_y: f64) -> Self {
        Self { offset_x, offset_y }
    }

    pub fn relative(&self, page: Position) -> Position {
        Position {
            x: page.x - self.offset_x,
            y: page.y - self.offset_y,
        }
    }
}

#[derive(Debug)]
pub struct PointerClassifier {
    surface: PointerSurface,
    pressed: BTreeMap<PointerButton, bool>,
    stream: Option<EventStream>,
}

impl PointerClassifier {
    pub fn new(surface: PointerSurface) -> Self {
        let pressed = std::iter::once(PointerButton::None)
            .chain(SUPPORTED_BUTTONS)
            .map(|button| (button, false))
            .collect();
        Self {
            surface,
            pressed,
            stream: None,
        }
    }

    /// Also publishes every classified event to `stream`.
    pub fn with_stream(mut self, stream: EventStream) -> Self {
        self.stream = Some(stream);
        self
    }

    pub fn is_pressed(&self, button: PointerButton) -> bool {
        self.pressed.get(&button).copied().unwrap_or(false)
    }

    /// Classifies one raw occurrence into pointer events, in button-bit order.
    pub fn handle(&mut self, raw: &RawPointerEvent) -> Vec<InputEvent> {
        let pos = self.surface.relative(raw.page);
        let classified: Vec<(PointerAction, PointerButton)> = match raw.kind {
            RawPointerKind::Down { buttons } => pressed_buttons(buttons)
                .into_iter()
                .map(|button| {
                    self.pressed.insert(button, true);
                    (PointerAction::Press, button)
                })
                .collect(),
            RawPointerKind::Move { buttons } => {
                let dragging = pressed_buttons(buttons);
                if dragging.is_empty() {
                    vec![(PointerAction::Move, PointerButton::None)]
                } else {
                    dragging
                        .into_iter()
                        .map(|button| (PointerAction::Drag, button))
                        .collect()
                }
            }
            RawPointerKind::Up { button } => {
                let button = map_native_button(button);
                self.pressed.insert(button, false);
                vec![(PointerAction::Release, button)]
            }
        };

        let events: Vec<InputEvent> = classified
            .into_iter()
            .map(|(action, button)| InputEvent::Pointer(PointerInput { action, button, pos }))
            .collect();
        debug!("Classified {:?} into {} pointer events", raw.kind, events.len());

        if let Some(stream) = &self.stream {
            stream.publish_all(events.iter().cloned());
        }
        events
    }
}

impl Default for PointerClassifier {
    fn default() -> Self {
        Self::new(PointerSurface::default())
    }
}
