//! # SC2 Events
//!
//! A decoder for the per-player action stream of StarCraft II replays.
//!
//! The game events file of a replay is a sequence of binary records, each
//! describing one player action: ability use, unit selection, hotkey
//! assignment, resource transfer, camera movement, or an internal record of
//! unknown meaning. This library turns that byte stream into typed events.
//!
//! ## Quick Start
//!
//! ```no_run
//! use sc2_events::events::{EventKind, EventStream};
//! use sc2_events::error::Result;
//!
//! fn print_commands(data: &[u8]) -> Result<()> {
//!     for result in EventStream::new(data) {
//!         let event = result?;
//!         if let EventKind::Ability(ability) = &event.kind {
//!             println!("P{} @{}: {}", event.player_id(), event.frame(), ability);
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Module Overview
//!
//! - [`error`] - Error types and result alias for decoding operations
//! - [`binary`] - Byte cursor with sub-byte reads and domain field readers
//! - [`events`] - Event types, record decoders, dispatch, and stream iteration
//! - [`tracker`] - Selection and control group state derived from events
//!
//! ## Stream Invariant
//!
//! Every decoder consumes exactly the bytes of its record. A single
//! miscounted skip desynchronizes every later record, so unknown shapes are
//! reported as errors instead of being skipped.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod binary;
pub mod error;
pub mod events;
pub mod tracker;

// Re-export commonly used types at the crate root
pub use binary::{Bitmask, ByteCursor, Coordinate, Endian};
pub use error::{ParserError, Result};
pub use events::{
    decode_all, AbilityEvent, CameraShape, Event, EventHeader, EventKind, EventStatistics,
    EventStream, HotkeyEvent, ObjectRef, OpaqueRecord, ResourceTransferEvent, SelectionEvent,
    SelectionTransform,
};
pub use tracker::SelectionTracker;
