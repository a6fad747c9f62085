//! Event stream iteration and statistics.
//!
//! This module provides the `EventStream` for decoding every record of a
//! game events buffer in order.

use super::dispatch::decode_record;
use super::types::{Event, EventHeader, EventKind};
use crate::binary::ByteCursor;
use crate::error::{ParserError, Result};
use std::collections::{HashMap, HashSet};

/// Iterator over the records of a game events buffer.
///
/// # Record Structure
///
/// ```text
/// [frame delta: 1-4 bytes] [player: 5 bits | type: 3 bits] [code: 1] [body...]
/// ```
///
/// The frame delta is added to a running frame counter. On the first error
/// the iterator yields a `ParserError::StreamAborted` carrying the offset of
/// the failing record and the last header that decoded, then stops.
///
/// # Example
///
/// ```
/// use sc2_events::events::{EventKind, EventStream};
///
/// // delta 1, player 2 / type 0, game start
/// let data = [0x04, 0x02, 0x05];
/// let events: Vec<_> = EventStream::new(&data).collect::<Result<_, _>>().unwrap();
///
/// assert_eq!(events.len(), 1);
/// assert_eq!(events[0].header.frame, 1);
/// assert_eq!(events[0].kind, EventKind::GameStart);
/// ```
pub struct EventStream<'a> {
    /// Cursor over the whole buffer.
    cursor: ByteCursor<'a>,

    /// Running frame counter.
    frame: u32,

    /// Header of the last record that decoded cleanly.
    last_header: Option<EventHeader>,

    /// Whether iteration has finished.
    finished: bool,
}

impl<'a> EventStream<'a> {
    /// Creates a new stream over a game events buffer.
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            cursor: ByteCursor::new(data),
            frame: 0,
            last_header: None,
            finished: false,
        }
    }

    /// Returns the current offset in the data.
    #[must_use]
    pub fn current_offset(&self) -> usize {
        self.cursor.position()
    }

    /// Returns the remaining bytes to decode.
    #[must_use]
    pub fn remaining_bytes(&self) -> usize {
        self.cursor.remaining()
    }

    /// Returns whether iteration is finished.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Returns the header of the last record that decoded cleanly.
    #[must_use]
    pub fn last_header(&self) -> Option<EventHeader> {
        self.last_header
    }

    fn read_header(&mut self) -> Result<EventHeader> {
        let delta = self.cursor.read_timestamp()?;
        let player_id = self.cursor.shift(5)?;
        let record_type = self.cursor.shift(3)?;
        let code = self.cursor.read_byte()?;
        Ok(EventHeader::new(
            self.frame.saturating_add(delta),
            player_id,
            record_type,
            code,
        ))
    }

    fn decode_next(&mut self) -> Result<Event> {
        let header = self.read_header()?;
        let event = decode_record(&mut self.cursor, header)?;
        self.frame = header.frame;
        self.last_header = Some(header);
        log::trace!("decoded {event}");
        Ok(event)
    }
}

impl Iterator for EventStream<'_> {
    type Item = Result<Event>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished || self.cursor.is_empty() {
            return None;
        }

        let offset = self.cursor.position();
        match self.decode_next() {
            Ok(event) => Some(Ok(event)),
            Err(e) => {
                self.finished = true;
                log::warn!("event stream aborted at offset {offset}: {e}");
                Some(Err(ParserError::StreamAborted {
                    offset,
                    last_header: self.last_header,
                    source: Box::new(e),
                }))
            }
        }
    }
}

/// Decodes a whole game events buffer.
///
/// # Errors
///
/// Returns `ParserError::StreamAborted` for the first record that fails.
pub fn decode_all(data: &[u8]) -> Result<Vec<Event>> {
    EventStream::new(data).collect()
}

/// Statistics about events decoded from a replay.
#[derive(Debug, Default, Clone)]
pub struct EventStatistics {
    /// Total number of events decoded.
    pub total_events: u32,

    /// Join, leave, and game start markers.
    pub lifecycle_events: u32,

    /// Number of ability events (all shapes).
    pub ability_events: u32,

    /// Ability events that are plain moves.
    pub move_commands: u32,

    /// Number of selection events.
    pub selection_events: u32,

    /// Number of hotkey events.
    pub hotkey_events: u32,

    /// Number of resource transfers.
    pub transfer_events: u32,

    /// Number of camera movements.
    pub camera_events: u32,

    /// Number of opaque records.
    pub unknown_events: u32,

    /// Events per player (keyed by player ID).
    pub events_per_player: HashMap<u8, u32>,

    /// Unique ability codes seen.
    pub unique_ability_codes: HashSet<u32>,

    /// Frame of the last event recorded.
    pub last_frame: u32,
}

impl EventStatistics {
    /// Creates new empty statistics.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an event in the statistics.
    pub fn record(&mut self, event: &Event) {
        self.total_events += 1;
        *self.events_per_player.entry(event.player_id()).or_insert(0) += 1;
        self.last_frame = self.last_frame.max(event.frame());

        match &event.kind {
            EventKind::PlayerJoin | EventKind::GameStart | EventKind::PlayerLeave => {
                self.lifecycle_events += 1;
            }
            EventKind::Ability(ability) => {
                self.ability_events += 1;
                match ability.ability() {
                    Some(code) => {
                        self.unique_ability_codes.insert(code);
                    }
                    None => self.move_commands += 1,
                }
            }
            EventKind::Selection(_) => self.selection_events += 1,
            EventKind::SetToHotkey(_) | EventKind::AddToHotkey(_) | EventKind::GetHotkey(_) => {
                self.hotkey_events += 1;
            }
            EventKind::ResourceTransfer(_) => self.transfer_events += 1,
            EventKind::CameraMovement(_) => self.camera_events += 1,
            EventKind::Unknown(_) => self.unknown_events += 1,
        }
    }

    /// Returns the number of unique ability codes.
    #[must_use]
    pub fn unique_ability_count(&self) -> usize {
        self.unique_ability_codes.len()
    }

    /// Returns the share of opaque records among all events.
    #[must_use]
    pub fn unknown_rate(&self) -> f64 {
        if self.total_events == 0 {
            0.0
        } else {
            f64::from(self.unknown_events) / f64::from(self.total_events)
        }
    }
}

impl<'a> Extend<&'a Event> for EventStatistics {
    fn extend<I: IntoIterator<Item = &'a Event>>(&mut self, iter: I) {
        for event in iter {
            self.record(event);
        }
    }
}
