//! Resource transfer decoding (type 0x01, code 0x_F).
//!
//! # Format
//!
//! ```text
//! [??: 1] [minerals block: 4] [vespene block: 4] [??: 8]
//! ```
//!
//! Each block is a big-endian `u32` holding a packed amount: the high 24
//! bits are a base, bits 4-7 (kept in place, so a multiple of 16) are a
//! multiplier, and the low nibble is added on top.

use super::types::{Event, EventHeader, EventKind};
use crate::binary::{ByteCursor, Endian};
use crate::error::Result;
use serde::Serialize;
use std::fmt;

/// Total body length of a transfer record.
pub const TRANSFER_BODY_LEN: usize = 17;

/// Resources given from one player to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResourceTransferEvent {
    /// Recipient player index (high nibble of the code).
    pub target: u8,

    /// Minerals sent.
    pub minerals: u32,

    /// Vespene gas sent.
    pub vespene: u32,
}

impl fmt::Display for ResourceTransferEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Send {} minerals, {} vespene to player {}",
            self.minerals, self.vespene, self.target
        )
    }
}

/// Decodes a packed resource amount.
///
/// `amount = (block >> 8) * (block & 0xF0) + (block & 0x0F)`. The product
/// cannot overflow: the base is at most 24 bits and the multiplier at most 240.
///
/// # Example
///
/// ```
/// use sc2_events::events::decode_resource_block;
///
/// assert_eq!(decode_resource_block(0x0000_6414), 100 * 16 + 4);
/// ```
#[must_use]
pub fn decode_resource_block(block: u32) -> u32 {
    let base = block >> 8;
    let multiplier = block & 0xF0;
    let extension = block & 0x0F;
    base * multiplier + extension
}

fn read_resource(cursor: &mut ByteCursor<'_>) -> Result<u32> {
    Ok(decode_resource_block(cursor.read_int(Endian::Big)?))
}

/// Decodes a resource transfer record body.
///
/// # Errors
///
/// Returns `ParserError::UnexpectedEof` if the body is truncated.
pub fn decode_transfer(cursor: &mut ByteCursor<'_>, header: EventHeader) -> Result<Event> {
    let target = header.sub_target();
    cursor.skip(1)?;
    let minerals = read_resource(cursor)?;
    let vespene = read_resource(cursor)?;
    cursor.skip(8)?;

    Ok(Event::new(
        header,
        EventKind::ResourceTransfer(ResourceTransferEvent {
            target,
            minerals,
            vespene,
        }),
    ))
}
