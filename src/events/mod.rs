//! Game event decoding for StarCraft II replay action streams.
//!
//! This module turns the records of a game events buffer into typed
//! [`Event`] values: unit commands, selection and hotkey updates, resource
//! transfers, camera movements, and lifecycle markers.
//!
//! # Overview
//!
//! Each record starts with a header carrying a frame delta, the player id,
//! a 3-bit record type, and a code byte. The `(type, code)` pair selects a
//! decoder from a static table; the decoder consumes exactly the record body
//! and returns one event. Decoders keep no state between records.
//!
//! # Record Types
//!
//! | Type | Code | Description |
//! |------|------|-------------|
//! | 0x00 | 0x0B, 0x0C, 0x2C | Player join |
//! | 0x00 | 0x05 | Game start |
//! | 0x01 | 0x09 | Player leave |
//! | 0x01 | 0x_B | Ability |
//! | 0x01 | 0x_C | Selection |
//! | 0x01 | 0x_D | Hotkey |
//! | 0x01 | 0x_F | Resource transfer |
//! | 0x02 | 0x06, 0x07, 0x0E | Unknown, fixed length |
//! | 0x03 | 0x87, 0x08, 0x18, 0x_1 | Camera movement |
//! | 0x04 | various | Unknown, fixed length |
//!
//! # Example
//!
//! ```
//! use sc2_events::events::{EventStream, EventStatistics};
//!
//! fn summarize(data: &[u8]) -> sc2_events::Result<EventStatistics> {
//!     let mut stats = EventStatistics::new();
//!     for result in EventStream::new(data) {
//!         stats.record(&result?);
//!     }
//!     Ok(stats)
//! }
//!
//! let stats = summarize(&[0x04, 0x01, 0x05]).unwrap();
//! assert_eq!(stats.lifecycle_events, 1);
//! ```

mod ability;
mod camera;
mod dispatch;
mod hotkey;
mod parser;
mod selection;
mod transfer;
mod types;
mod unknown;

pub use ability::{decode_ability, AbilityEvent};
pub use camera::{
    decode_camera_bulk, decode_camera_fixed, decode_camera_position, decode_camera_sized,
    CameraShape,
};
pub use dispatch::{decode_record, lookup, Decoder, RecordDecoder};
pub use hotkey::{decode_hotkey, HotkeyAction, HotkeyEvent};
pub use parser::{decode_all, EventStatistics, EventStream};
pub use selection::{decode_selection, SelectionEvent, SelectionTransform};
pub use transfer::{decode_resource_block, decode_transfer, ResourceTransferEvent};
pub use types::{Event, EventHeader, EventKind, ObjectRef};
pub use unknown::{decode_join, decode_leave, decode_start, OpaqueRecord};
