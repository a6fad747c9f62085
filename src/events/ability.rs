//! Ability event decoding (type 0x01, code 0x_B).
//!
//! Unit commands come in three unrelated payload grammars selected by the
//! top three bits of the `action_type` byte:
//!
//! | Bit | Grammar |
//! |-----|---------|
//! | 0x20 | Command card ability, with a second-level dispatch on 6 ability flag bits |
//! | 0x40 | Move to a location |
//! | 0x80 | Right-click on a target object |
//!
//! # Format
//!
//! ```text
//! [flag: 1] [action_type: 1] [payload...]
//!
//! 0x20, cancel (flag 0x19/0x29):  [ability: 2] [ability ext: 1] [object id: 4]
//! 0x20, otherwise:                [ability: 2] [ability flags: 6 bits]
//!     flags & 0x10:                   [coordinate: 4] [??: 4]
//!     flags & 0x20:                   [??: 2] [object id: 4] [object type: 2] [??: 10]
//! 0x40:                           [coordinate: 4] [??: 5]
//! 0x80:                           [ability: 2] [object id: 4] [object type: 2] [??: 10]
//! ```

use super::types::{Event, EventHeader, EventKind, ObjectRef};
use crate::binary::{ByteCursor, Coordinate, Endian};
use crate::error::{ParserError, Result};
use serde::Serialize;
use std::fmt;

/// Bit of `action_type` selecting a command card ability.
pub const COMMAND_CARD: u8 = 0x20;

/// Bit of `action_type` selecting a move to a location.
pub const MOVE_LOCATION: u8 = 0x40;

/// Bit of `action_type` selecting a right-click on a target.
pub const TARGET_CLICK: u8 = 0x80;

/// Flag bytes marking a cancel.
pub const CANCEL_FLAGS: [u8; 2] = [0x29, 0x19];

/// A decoded unit command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AbilityEvent {
    /// Ability without a target.
    Plain {
        /// Packed ability code (up to 3 bytes).
        ability: u32,
    },

    /// Ability aimed at the ground.
    Location {
        /// Packed ability code; `None` for a plain move.
        ability: Option<u32>,
        /// Target position.
        location: Coordinate,
    },

    /// Ability aimed at an object.
    Target {
        /// Packed ability code.
        ability: u32,
        /// Targeted object.
        target: ObjectRef,
    },
}

impl AbilityEvent {
    /// Returns the packed ability code, if the command carries one.
    #[must_use]
    pub fn ability(&self) -> Option<u32> {
        match self {
            AbilityEvent::Plain { ability } | AbilityEvent::Target { ability, .. } => {
                Some(*ability)
            }
            AbilityEvent::Location { ability, .. } => *ability,
        }
    }

    /// Returns the name of this ability shape.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            AbilityEvent::Plain { .. } => "Ability",
            AbilityEvent::Location { .. } => "LocationAbility",
            AbilityEvent::Target { .. } => "TargetAbility",
        }
    }
}

impl fmt::Display for AbilityEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbilityEvent::Plain { ability } => write!(f, "Ability 0x{ability:06X}"),
            AbilityEvent::Location {
                ability: Some(ability),
                location,
            } => write!(f, "Ability 0x{ability:06X} at {location}"),
            AbilityEvent::Location {
                ability: None,
                location,
            } => write!(f, "Move to {location}"),
            AbilityEvent::Target { ability, target } => {
                write!(f, "Ability 0x{ability:04X} on {target}")
            }
        }
    }
}

/// Second-level shape of a command card ability, from the 6 ability flag bits.
///
/// The location bit wins when both target bits are set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CommandCardShape {
    Plain,
    Location,
    Target,
}

impl CommandCardShape {
    fn from_flags(ability_flags: u8) -> Self {
        match ability_flags & 0x30 {
            0x00 => CommandCardShape::Plain,
            0x20 => CommandCardShape::Target,
            _ => CommandCardShape::Location,
        }
    }
}

/// Reads a 2-byte ability id as `byte0 << 8 | byte1`.
fn read_ability_id(cursor: &mut ByteCursor<'_>) -> Result<u32> {
    Ok(u32::from(cursor.read_short(Endian::Big)?))
}

fn read_target(cursor: &mut ByteCursor<'_>) -> Result<ObjectRef> {
    let id = cursor.read_object_id()?;
    let object_type = cursor.read_object_type(false)?;
    Ok(ObjectRef::new(id, object_type))
}

/// Decodes an ability record body.
///
/// # Errors
///
/// - `ParserError::UnhandledShape` if `action_type` has none of the three
///   selector bits set; the flag reported is the `action_type` byte
/// - `ParserError::UnexpectedEof` if the body is truncated
pub fn decode_ability(cursor: &mut ByteCursor<'_>, header: EventHeader) -> Result<Event> {
    let flag = cursor.read_byte()?;
    let action_type = cursor.read_byte()?;

    let ability = if action_type & COMMAND_CARD != 0 {
        decode_command_card(cursor, flag)?
    } else if action_type & MOVE_LOCATION != 0 {
        let location = cursor.read_coordinate()?;
        cursor.skip(5)?;
        AbilityEvent::Location {
            ability: None,
            location,
        }
    } else if action_type & TARGET_CLICK != 0 {
        let ability = read_ability_id(cursor)?;
        let target = read_target(cursor)?;
        cursor.skip(10)?;
        AbilityEvent::Target { ability, target }
    } else {
        log::debug!("ability record with no selector bits: {header}, action type 0x{action_type:02X}");
        return Err(ParserError::unhandled_shape(&header, action_type));
    };

    Ok(Event::new(header, EventKind::Ability(ability)))
}

fn decode_command_card(cursor: &mut ByteCursor<'_>, flag: u8) -> Result<AbilityEvent> {
    let ability = read_ability_id(cursor)?;

    if CANCEL_FLAGS.contains(&flag) {
        let ability = ability << 8 | u32::from(cursor.read_byte()?);
        // Id of the object being cancelled; not exposed yet.
        let _created_id = cursor.read_object_id()?;
        return Ok(AbilityEvent::Plain { ability });
    }

    let ability_flags = cursor.shift(6)?;
    let ability = ability << 8 | u32::from(ability_flags);

    Ok(match CommandCardShape::from_flags(ability_flags) {
        CommandCardShape::Plain => AbilityEvent::Plain { ability },
        CommandCardShape::Location => {
            let location = cursor.read_coordinate()?;
            cursor.skip(4)?;
            AbilityEvent::Location {
                ability: Some(ability),
                location,
            }
        }
        CommandCardShape::Target => {
            // Unconfirmed 2-byte field ahead of the target.
            cursor.skip(2)?;
            let target = read_target(cursor)?;
            cursor.skip(10)?;
            AbilityEvent::Target { ability, target }
        }
    })
}
