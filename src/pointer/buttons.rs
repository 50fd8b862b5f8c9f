//! Button lookup tables
//!
//! Two encodings reach the classifier. Down and move occurrences carry a
//! bitmask of every button currently down; up occurrences carry the single
//! native index of the button that changed, numbered differently.

use crate::event::PointerButton;

/// Mask bits in the order they are fanned out.
pub const SUPPORTED_BUTTONS: [PointerButton; 5] = [
    PointerButton::Primary,
    PointerButton::Secondary,
    PointerButton::Auxiliary,
    PointerButton::Back,
    PointerButton::Forward,
];

/// Native button index → logical button.
///
/// | native | logical   |
/// |--------|-----------|
/// | 0      | Primary   |
/// | 1      | Auxiliary |
/// | 2      | Secondary |
/// | 3      | Back      |
/// | 4      | Forward   |
/// | other  | None      |
pub fn map_native_button(native: i16) -> PointerButton {
    match native {
        0 => PointerButton::Primary,
        1 => PointerButton::Auxiliary,
        2 => PointerButton::Secondary,
        3 => PointerButton::Back,
        4 => PointerButton::Forward,
        _ => PointerButton::None,
    }
}

/// Every supported button whose bit is set in `mask`. Unknown bits are ignored.
pub fn pressed_buttons(mask: u16) -> Vec<PointerButton> {
    SUPPORTED_BUTTONS
        .iter()
        .copied()
        .filter(|button| mask & u16::from(button.code()) != 0)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn native_table_matches_logical_codes() {
        let codes: Vec<u8> = (0..6).map(|n| map_native_button(n).code()).collect();
        assert_eq!(codes, vec![1, 4, 2, 8, 16, 0]);
        assert_eq!(map_native_button(-1), PointerButton::None);
    }

    #[test]
    fn mask_fans_out_in_table_order() {
        assert!(pressed_buttons(0).is_empty());
        assert_eq!(
            pressed_buttons(0b1_0011),
            vec![
                PointerButton::Primary,
                PointerButton::Secondary,
                PointerButton::Forward
            ]
        );
        assert!(pressed_buttons(0b10_0000).is_empty());
    }
}
