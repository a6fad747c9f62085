//! Lifecycle markers and fixed-length records of unknown meaning.
//!
//! Opaque records exist only to keep the cursor in step with the stream.
//! Each known length gets its own [`OpaqueRecord`] variant rather than a
//! shared catch-all, so a record can gain real fields later without changing
//! the event types.

use super::types::{Event, EventHeader, EventKind};
use crate::binary::ByteCursor;
use crate::error::Result;
use serde::Serialize;

/// A skipped record shape, named by its `(type, code)` key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OpaqueRecord {
    /// Type 0x02, code 0x06.
    Type2Code06,
    /// Type 0x02, code 0x07.
    Type2Code07,
    /// Type 0x02, code 0x0E.
    Type2Code0E,
    /// Type 0x04, code 0x16.
    Type4Code16,
    /// Type 0x04, code 0xC6.
    Type4CodeC6,
    /// Type 0x04, code 0x87 or 0x18.
    Type4Code87,
    /// Type 0x04, code 0x00.
    Type4Code00,
    /// Type 0x04, codes with low nibble 0x2.
    Type4Low2,
    /// Type 0x04, codes with low nibble 0xC. No body.
    Type4LowC,
}

impl OpaqueRecord {
    /// Returns the body length in bytes.
    #[must_use]
    pub fn body_len(self) -> usize {
        match self {
            OpaqueRecord::Type2Code06 => 8,
            OpaqueRecord::Type2Code07 | OpaqueRecord::Type2Code0E | OpaqueRecord::Type4Code87 => 4,
            OpaqueRecord::Type4Code16 => 24,
            OpaqueRecord::Type4CodeC6 => 16,
            OpaqueRecord::Type4Code00 => 10,
            OpaqueRecord::Type4Low2 => 2,
            OpaqueRecord::Type4LowC => 0,
        }
    }

    /// Skips the record body and wraps the header.
    ///
    /// # Errors
    ///
    /// Returns `ParserError::UnexpectedEof` if the body is truncated.
    pub fn decode(self, cursor: &mut ByteCursor<'_>, header: EventHeader) -> Result<Event> {
        log::debug!("skipping {} bytes of {self:?}: {header}", self.body_len());
        cursor.skip(self.body_len())?;
        Ok(Event::new(header, EventKind::Unknown(self)))
    }
}

/// Decodes a player join record. No body.
///
/// # Errors
///
/// Never fails; the signature matches the other decoders.
pub fn decode_join(_cursor: &mut ByteCursor<'_>, header: EventHeader) -> Result<Event> {
    Ok(Event::new(header, EventKind::PlayerJoin))
}

/// Decodes a game start record. No body.
///
/// # Errors
///
/// Never fails; the signature matches the other decoders.
pub fn decode_start(_cursor: &mut ByteCursor<'_>, header: EventHeader) -> Result<Event> {
    Ok(Event::new(header, EventKind::GameStart))
}

/// Decodes a player leave record. No body.
///
/// # Errors
///
/// Never fails; the signature matches the other decoders.
pub fn decode_leave(_cursor: &mut ByteCursor<'_>, header: EventHeader) -> Result<Event> {
    Ok(Event::new(header, EventKind::PlayerLeave))
}
