//! Hotkey event decoding (type 0x01, code 0x_D).
//!
//! Hotkey events bind, extend, or recall a control group. The hotkey index
//! is the high nibble of the code.
//!
//! # Format
//!
//! ```text
//! [action: 2 bits] [mode: 2 bits] [mode payload]
//! ```
//!
//! The mode payload uses the same grammar as selection events, see
//! [`SelectionTransform`].

use super::selection::SelectionTransform;
use super::types::{Event, EventHeader, EventKind};
use crate::binary::ByteCursor;
use crate::error::{ParserError, Result};
use serde::Serialize;
use std::fmt;

/// Control group operation selected by the 2-bit action field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HotkeyAction {
    /// Assign the active selection to the group (Ctrl+N).
    Set,
    /// Add the active selection to the group (Shift+N).
    Add,
    /// Recall the group (N).
    Get,
}

impl HotkeyAction {
    /// Maps the wire value, `None` for unassigned values.
    #[must_use]
    pub fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            0 => Some(HotkeyAction::Set),
            1 => Some(HotkeyAction::Add),
            2 => Some(HotkeyAction::Get),
            _ => None,
        }
    }
}

impl fmt::Display for HotkeyAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HotkeyAction::Set => write!(f, "Set"),
            HotkeyAction::Add => write!(f, "Add to"),
            HotkeyAction::Get => write!(f, "Get"),
        }
    }
}

/// Payload shared by the three hotkey events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HotkeyEvent {
    /// Control group index (0-9).
    pub hotkey: u8,

    /// Update applied when the group is written or recalled.
    pub overlay: SelectionTransform,
}

/// Decodes a hotkey record body.
///
/// # Errors
///
/// - `ParserError::UnhandledShape` if the action field is 3; the overlay
///   payload is consumed first so the reported cursor position is exact
/// - `ParserError::UnexpectedEof` if the body is truncated
pub fn decode_hotkey(cursor: &mut ByteCursor<'_>, header: EventHeader) -> Result<Event> {
    let hotkey = header.sub_target();
    let action = cursor.shift(2)?;
    let mode = cursor.shift(2)?;
    let overlay = SelectionTransform::read(cursor, mode)?;

    let Some(action) = HotkeyAction::from_bits(action) else {
        log::debug!("unassigned hotkey action {action}: {header}");
        return Err(ParserError::unhandled_shape(&header, action));
    };

    let payload = HotkeyEvent { hotkey, overlay };
    let kind = match action {
        HotkeyAction::Set => EventKind::SetToHotkey(payload),
        HotkeyAction::Add => EventKind::AddToHotkey(payload),
        HotkeyAction::Get => EventKind::GetHotkey(payload),
    };
    Ok(Event::new(header, kind))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binary::Bitmask;

    fn header(hotkey: u8) -> EventHeader {
        EventHeader::new(200, 3, 0x01, hotkey << 4 | 0x0D)
    }

    fn decode(data: &[u8], hotkey: u8) -> (Result<Event>, usize) {
        let mut cursor = ByteCursor::new(data);
        let result = decode_hotkey(&mut cursor, header(hotkey));
        (result, cursor.position())
    }

    #[test]
    fn test_hotkey_set() {
        let data: &[u8] = &[0b0000_0000];
        let (result, consumed) = decode(data, 1);
        assert_eq!(consumed, 1);
        assert_eq!(
            result.unwrap().kind,
            EventKind::SetToHotkey(HotkeyEvent {
                hotkey: 1,
                overlay: SelectionTransform::None,
            })
        );
    }

    #[test]
    fn test_hotkey_add_with_deselect_overlay() {
        // action 1, mode 2
        let data: &[u8] = &[0b0000_1001, 0x02, 0x00, 0x05];
        let (result, consumed) = decode(data, 4);
        assert_eq!(consumed, 4);
        assert_eq!(
            result.unwrap().kind,
            EventKind::AddToHotkey(HotkeyEvent {
                hotkey: 4,
                overlay: SelectionTransform::DeselectByIndex(vec![0, 5]),
            })
        );
    }

    #[test]
    fn test_hotkey_get_with_mask_overlay() {
        // action 2, mode 1
        let data: &[u8] = &[0b0000_0110, 0x03, 0b101];
        let (result, consumed) = decode(data, 9);
        assert_eq!(consumed, 3);
        assert_eq!(
            result.unwrap().kind,
            EventKind::GetHotkey(HotkeyEvent {
                hotkey: 9,
                overlay: SelectionTransform::Mask(Bitmask::from_bytes(3, vec![0b101])),
            })
        );
    }

    #[test]
    fn test_hotkey_replace_overlay() {
        // action 0, mode 3
        let data: &[u8] = &[0b0000_1100, 0x01, 0x02];
        let (result, consumed) = decode(data, 0);
        assert_eq!(consumed, 3);
        assert!(matches!(
            result.unwrap().kind,
            EventKind::SetToHotkey(HotkeyEvent {
                overlay: SelectionTransform::ReplaceByIndex(_),
                ..
            })
        ));
    }

    #[test]
    fn test_hotkey_unassigned_action() {
        let data: &[u8] = &[0b0000_0011];
        let (result, consumed) = decode(data, 2);
        assert_eq!(consumed, 1);
        assert!(matches!(
            result,
            Err(ParserError::UnhandledShape { flag: 3, code: 0x2D, .. })
        ));
    }

    #[test]
    fn test_hotkey_truncated() {
        let (result, _) = decode(&[], 0);
        assert!(matches!(result, Err(ParserError::UnexpectedEof { .. })));
    }

    #[test]
    fn test_action_from_bits() {
        assert_eq!(HotkeyAction::from_bits(0), Some(HotkeyAction::Set));
        assert_eq!(HotkeyAction::from_bits(2), Some(HotkeyAction::Get));
        assert_eq!(HotkeyAction::from_bits(3), None);
        assert_eq!(HotkeyAction::Add.to_string(), "Add to");
    }
}
