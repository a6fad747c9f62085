//! Core event types and structures.
//!
//! This module defines the `Event` struct, the record header every event
//! carries, and the `EventKind` enum over all decoded payloads.

use super::ability::AbilityEvent;
use super::camera::CameraShape;
use super::hotkey::HotkeyEvent;
use super::selection::SelectionEvent;
use super::transfer::ResourceTransferEvent;
use super::unknown::OpaqueRecord;
use serde::Serialize;
use std::fmt;

/// The four header fields every record carries.
///
/// `record_type` and `code` jointly select the decoder that ran and are kept
/// on the event so downstream consumers can tell record shapes apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct EventHeader {
    /// Game tick at which the record was issued.
    pub frame: u32,

    /// Player who issued the record.
    pub player_id: u8,

    /// Record type (3 bits on the wire).
    pub record_type: u8,

    /// Record code.
    pub code: u8,
}

impl EventHeader {
    /// Creates a new header.
    #[must_use]
    pub fn new(frame: u32, player_id: u8, record_type: u8, code: u8) -> Self {
        Self {
            frame,
            player_id,
            record_type,
            code,
        }
    }

    /// Returns the high nibble of the code.
    ///
    /// Several records use it as a sub-target: the selection bank, the
    /// hotkey index, or the resource transfer recipient.
    #[must_use]
    pub fn sub_target(&self) -> u8 {
        self.code >> 4
    }
}

impl fmt::Display for EventHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "frame {} player {} type 0x{:02X} code 0x{:02X}",
            self.frame, self.player_id, self.record_type, self.code
        )
    }
}

/// An in-game object as referenced by selections and targeted abilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ObjectRef {
    /// Object id.
    pub id: u32,
    /// Object type tag.
    pub object_type: u32,
}

impl ObjectRef {
    /// Creates a new object reference.
    #[must_use]
    pub fn new(id: u32, object_type: u32) -> Self {
        Self { id, object_type }
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:08X}:{:06X}", self.id, self.object_type)
    }
}

/// A decoded record from the game events stream.
///
/// Events are immutable once built by their decoder.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    /// Header fields of the record.
    pub header: EventHeader,

    /// Decoded payload.
    pub kind: EventKind,
}

impl Event {
    /// Creates a new event.
    #[must_use]
    pub fn new(header: EventHeader, kind: EventKind) -> Self {
        Self { header, kind }
    }

    /// Returns the player who issued this event.
    #[must_use]
    pub fn player_id(&self) -> u8 {
        self.header.player_id
    }

    /// Returns the frame at which this event was issued.
    #[must_use]
    pub fn frame(&self) -> u32 {
        self.header.frame
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[P{} @{}] {}",
            self.header.player_id, self.header.frame, self.kind
        )
    }
}

/// Enumeration of all decoded event payloads.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum EventKind {
    /// A player joined the lobby (type 0x00).
    PlayerJoin,

    /// The game started (type 0x00, code 0x05).
    GameStart,

    /// A player left the game (type 0x01, code 0x09).
    PlayerLeave,

    /// Unit command (type 0x01, code 0x_B).
    Ability(AbilityEvent),

    /// Selection update (type 0x01, code 0x_C).
    Selection(SelectionEvent),

    /// Assign the active selection to a hotkey.
    SetToHotkey(HotkeyEvent),

    /// Add the active selection to a hotkey.
    AddToHotkey(HotkeyEvent),

    /// Recall a hotkey into the active selection.
    GetHotkey(HotkeyEvent),

    /// Resources given to another player (type 0x01, code 0x_F).
    ResourceTransfer(ResourceTransferEvent),

    /// Camera movement (type 0x03). Payload is skipped.
    CameraMovement(CameraShape),

    /// Record of known length and unknown meaning.
    Unknown(OpaqueRecord),
}

impl EventKind {
    /// Returns the name of this event kind.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            EventKind::PlayerJoin => "PlayerJoin",
            EventKind::GameStart => "GameStart",
            EventKind::PlayerLeave => "PlayerLeave",
            EventKind::Ability(ability) => ability.type_name(),
            EventKind::Selection(_) => "Selection",
            EventKind::SetToHotkey(_) => "SetToHotkey",
            EventKind::AddToHotkey(_) => "AddToHotkey",
            EventKind::GetHotkey(_) => "GetHotkey",
            EventKind::ResourceTransfer(_) => "ResourceTransfer",
            EventKind::CameraMovement(_) => "CameraMovement",
            EventKind::Unknown(_) => "Unknown",
        }
    }

    /// Returns whether this is a hotkey event of any action.
    #[must_use]
    pub fn is_hotkey(&self) -> bool {
        matches!(
            self,
            EventKind::SetToHotkey(_) | EventKind::AddToHotkey(_) | EventKind::GetHotkey(_)
        )
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::Ability(ability) => write!(f, "{ability}"),
            EventKind::Selection(sel) => write!(f, "{sel}"),
            EventKind::SetToHotkey(hk) => write!(f, "Set hotkey {}", hk.hotkey),
            EventKind::AddToHotkey(hk) => write!(f, "Add to hotkey {}", hk.hotkey),
            EventKind::GetHotkey(hk) => write!(f, "Get hotkey {}", hk.hotkey),
            EventKind::ResourceTransfer(transfer) => write!(f, "{transfer}"),
            EventKind::CameraMovement(shape) => write!(f, "Camera ({shape:?})"),
            EventKind::Unknown(record) => write!(f, "Unknown ({record:?})"),
            other => write!(f, "{}", other.type_name()),
        }
    }
}
