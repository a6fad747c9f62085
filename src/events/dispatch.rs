//! Dispatch table from record `(type, code)` keys to decoders.
//!
//! The table is a static list scanned in order; the first entry whose type
//! matches and whose code predicate accepts the code wins. Decoders contain
//! no fallback logic of their own.

use super::ability::decode_ability;
use super::camera::{
    decode_camera_bulk, decode_camera_fixed, decode_camera_position, decode_camera_sized,
};
use super::hotkey::decode_hotkey;
use super::selection::decode_selection;
use super::transfer::decode_transfer;
use super::types::{Event, EventHeader};
use super::unknown::{decode_join, decode_leave, decode_start, OpaqueRecord};
use crate::binary::ByteCursor;
use crate::error::{ParserError, Result};

/// Signature shared by every record decoder.
pub type Decoder = fn(&mut ByteCursor<'_>, EventHeader) -> Result<Event>;

/// Predicate over the record code.
#[derive(Debug, Clone, Copy)]
enum CodeMatch {
    Exact(u8),
    AnyOf(&'static [u8]),
    LowNibble(u8),
    /// Low nibble equal, high nibble at most the bound.
    LowNibbleUpTo { low: u8, max_high: u8 },
}

impl CodeMatch {
    fn matches(self, code: u8) -> bool {
        match self {
            CodeMatch::Exact(c) => code == c,
            CodeMatch::AnyOf(codes) => codes.contains(&code),
            CodeMatch::LowNibble(low) => code & 0x0F == low,
            CodeMatch::LowNibbleUpTo { low, max_high } => code & 0x0F == low && code >> 4 <= max_high,
        }
    }
}

/// What runs for a matched record.
#[derive(Debug, Clone, Copy)]
pub enum RecordDecoder {
    /// A decoder function.
    Function(Decoder),
    /// A fixed-length skip.
    Opaque(OpaqueRecord),
}

impl RecordDecoder {
    /// Runs the decoder on a record body.
    ///
    /// # Errors
    ///
    /// Propagates the decoder's error.
    pub fn decode(self, cursor: &mut ByteCursor<'_>, header: EventHeader) -> Result<Event> {
        match self {
            RecordDecoder::Function(decoder) => decoder(cursor, header),
            RecordDecoder::Opaque(record) => record.decode(cursor, header),
        }
    }
}

struct Registration {
    record_type: u8,
    code: CodeMatch,
    decoder: RecordDecoder,
}

const fn function(record_type: u8, code: CodeMatch, decoder: Decoder) -> Registration {
    Registration {
        record_type,
        code,
        decoder: RecordDecoder::Function(decoder),
    }
}

const fn opaque(record_type: u8, code: CodeMatch, record: OpaqueRecord) -> Registration {
    Registration {
        record_type,
        code,
        decoder: RecordDecoder::Opaque(record),
    }
}

static REGISTRY: &[Registration] = &[
    // Setup
    function(0x00, CodeMatch::AnyOf(&[0x0B, 0x0C, 0x2C]), decode_join),
    function(0x00, CodeMatch::Exact(0x05), decode_start),
    // Actions
    function(0x01, CodeMatch::Exact(0x09), decode_leave),
    function(0x01, CodeMatch::LowNibbleUpTo { low: 0x0B, max_high: 0x09 }, decode_ability),
    function(0x01, CodeMatch::LowNibbleUpTo { low: 0x0C, max_high: 0x0A }, decode_selection),
    function(0x01, CodeMatch::LowNibbleUpTo { low: 0x0D, max_high: 0x09 }, decode_hotkey),
    function(0x01, CodeMatch::LowNibbleUpTo { low: 0x0F, max_high: 0x09 }, decode_transfer),
    // Unknown, type 2
    opaque(0x02, CodeMatch::Exact(0x06), OpaqueRecord::Type2Code06),
    opaque(0x02, CodeMatch::Exact(0x07), OpaqueRecord::Type2Code07),
    opaque(0x02, CodeMatch::Exact(0x0E), OpaqueRecord::Type2Code0E),
    // Camera
    function(0x03, CodeMatch::Exact(0x87), decode_camera_fixed),
    function(0x03, CodeMatch::Exact(0x08), decode_camera_sized),
    function(0x03, CodeMatch::Exact(0x18), decode_camera_bulk),
    function(0x03, CodeMatch::LowNibble(0x01), decode_camera_position),
    // Unknown, type 4
    opaque(0x04, CodeMatch::Exact(0x16), OpaqueRecord::Type4Code16),
    opaque(0x04, CodeMatch::Exact(0xC6), OpaqueRecord::Type4CodeC6),
    opaque(0x04, CodeMatch::AnyOf(&[0x87, 0x18]), OpaqueRecord::Type4Code87),
    opaque(0x04, CodeMatch::Exact(0x00), OpaqueRecord::Type4Code00),
    opaque(0x04, CodeMatch::LowNibble(0x02), OpaqueRecord::Type4Low2),
    opaque(0x04, CodeMatch::LowNibble(0x0C), OpaqueRecord::Type4LowC),
];

/// Looks up the decoder registered for a `(type, code)` pair.
#[must_use]
pub fn lookup(record_type: u8, code: u8) -> Option<RecordDecoder> {
    REGISTRY
        .iter()
        .find(|r| r.record_type == record_type && r.code.matches(code))
        .map(|r| r.decoder)
}

/// Decodes one record body with the decoder registered for its header.
///
/// # Errors
///
/// - `ParserError::UnknownRecord` if no decoder is registered
/// - any error from the decoder itself
pub fn decode_record(cursor: &mut ByteCursor<'_>, header: EventHeader) -> Result<Event> {
    let Some(decoder) = lookup(header.record_type, header.code) else {
        log::debug!("no decoder registered: {header}");
        return Err(ParserError::UnknownRecord {
            record_type: header.record_type,
            code: header.code,
        });
    };
    decoder.decode(cursor, header)
}
