//! Camera movement decoding (type 0x03).
//!
//! None of the four camera record shapes are decoded beyond their length.
//! Each shape keeps its own variant so that field decoding can be added later
//! without changing the event types.
//!
//! | Code | Shape | Body |
//! |------|-------|------|
//! | 0x87 | [`CameraShape::Fixed`] | 8 bytes |
//! | 0x08 | [`CameraShape::Sized`] | `[len: 2 BE]` then `(len & 0x0F) * 8` bytes |
//! | 0x18 | [`CameraShape::Bulk`] | 162 bytes |
//! | 0x_1 | [`CameraShape::Position`] | 3 bytes, flag byte, optional tails |

use super::types::{Event, EventHeader, EventKind};
use crate::binary::{ByteCursor, Endian};
use crate::error::Result;
use serde::Serialize;

/// Which camera record shape was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CameraShape {
    /// Code 0x87.
    Fixed,
    /// Code 0x08, length given by a nibble.
    Sized,
    /// Code 0x18.
    Bulk,
    /// Codes with low nibble 0x1.
    Position,
}

/// Body length of a [`CameraShape::Fixed`] record.
pub const FIXED_LEN: usize = 8;

/// Body length of a [`CameraShape::Bulk`] record.
pub const BULK_LEN: usize = 162;

fn camera_event(header: EventHeader, shape: CameraShape) -> Event {
    Event::new(header, EventKind::CameraMovement(shape))
}

/// Decodes a camera record with code 0x87.
///
/// # Errors
///
/// Returns `ParserError::UnexpectedEof` if the body is truncated.
pub fn decode_camera_fixed(cursor: &mut ByteCursor<'_>, header: EventHeader) -> Result<Event> {
    cursor.skip(FIXED_LEN)?;
    Ok(camera_event(header, CameraShape::Fixed))
}

/// Decodes a camera record with code 0x08.
///
/// # Errors
///
/// Returns `ParserError::UnexpectedEof` if the body is truncated.
pub fn decode_camera_sized(cursor: &mut ByteCursor<'_>, header: EventHeader) -> Result<Event> {
    let blocks = usize::from(cursor.read_short(Endian::Big)? & 0x0F);
    cursor.skip(blocks * 8)?;
    Ok(camera_event(header, CameraShape::Sized))
}

/// Decodes a camera record with code 0x18.
///
/// # Errors
///
/// Returns `ParserError::UnexpectedEof` if the body is truncated.
pub fn decode_camera_bulk(cursor: &mut ByteCursor<'_>, header: EventHeader) -> Result<Event> {
    cursor.skip(BULK_LEN)?;
    Ok(camera_event(header, CameraShape::Bulk))
}

/// Decodes a camera record with a code whose low nibble is 0x1.
///
/// After 3 bytes comes a flag byte. Bit 0x10 means one more byte and a new
/// flag byte follow, then bit 0x20 of the latest flag means the same again,
/// then bit 0x40 of the latest flag means a 2-byte tail.
///
/// # Errors
///
/// Returns `ParserError::UnexpectedEof` if the body is truncated.
pub fn decode_camera_position(cursor: &mut ByteCursor<'_>, header: EventHeader) -> Result<Event> {
    cursor.skip(3)?;
    let mut flag = cursor.read_byte()?;

    if flag & 0x10 != 0 {
        cursor.skip(1)?;
        flag = cursor.read_byte()?;
    }
    if flag & 0x20 != 0 {
        cursor.skip(1)?;
        flag = cursor.read_byte()?;
    }
    if flag & 0x40 != 0 {
        cursor.skip(2)?;
    }

    Ok(camera_event(header, CameraShape::Position))
}
