//! Selection and control group tracking.
//!
//! Selection and hotkey events only carry deltas. [`SelectionTracker`]
//! replays them in order and keeps, for each player, the objects in every
//! selection bank: banks 0-9 are control groups and bank 10 is the active
//! selection.
//!
//! # Example
//!
//! ```
//! use sc2_events::events::decode_all;
//! use sc2_events::tracker::SelectionTracker;
//!
//! # fn main() -> sc2_events::Result<()> {
//! # let data: &[u8] = &[];
//! let mut tracker = SelectionTracker::new();
//! for event in decode_all(data)? {
//!     tracker.apply(&event);
//! }
//! assert!(tracker.active(1).is_empty());
//! # Ok(())
//! # }
//! ```

use crate::events::{Event, EventKind, HotkeyEvent, ObjectRef, SelectionEvent};
use std::collections::HashMap;

/// Index of the active selection bank.
pub const ACTIVE_BANK: usize = 10;

/// Number of selection banks per player.
pub const BANK_COUNT: usize = 11;

/// Selection banks of one player.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerSelection {
    banks: [Vec<ObjectRef>; BANK_COUNT],
}

impl PlayerSelection {
    /// Returns the objects in a bank, empty for an out-of-range index.
    #[must_use]
    pub fn bank(&self, index: usize) -> &[ObjectRef] {
        self.banks.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns the active selection.
    #[must_use]
    pub fn active(&self) -> &[ObjectRef] {
        &self.banks[ACTIVE_BANK]
    }

    fn apply_selection(&mut self, sel: &SelectionEvent) {
        let Some(bank) = self.banks.get_mut(usize::from(sel.bank)) else {
            log::debug!("selection bank {} out of range", sel.bank);
            return;
        };
        let mut next = sel.transform.apply(bank.as_slice());
        next.extend_from_slice(&sel.objects);
        *bank = next;
    }

    fn group_index(hk: &HotkeyEvent) -> Option<usize> {
        let index = usize::from(hk.hotkey);
        if index < ACTIVE_BANK {
            Some(index)
        } else {
            log::debug!("hotkey {} out of range", hk.hotkey);
            None
        }
    }

    fn set_hotkey(&mut self, hk: &HotkeyEvent) {
        if let Some(index) = Self::group_index(hk) {
            self.banks[index] = hk.overlay.apply(self.active());
        }
    }

    fn add_to_hotkey(&mut self, hk: &HotkeyEvent) {
        if let Some(index) = Self::group_index(hk) {
            let added = hk.overlay.apply(self.active());
            let group = &mut self.banks[index];
            for object in added {
                if !group.contains(&object) {
                    group.push(object);
                }
            }
        }
    }

    fn get_hotkey(&mut self, hk: &HotkeyEvent) {
        if let Some(index) = Self::group_index(hk) {
            self.banks[ACTIVE_BANK] = hk.overlay.apply(self.banks[index].as_slice());
        }
    }
}

/// Replays selection and hotkey events per player.
#[derive(Debug, Clone, Default)]
pub struct SelectionTracker {
    players: HashMap<u8, PlayerSelection>,
}

impl SelectionTracker {
    /// Creates an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one event. Events other than selections and hotkeys are ignored.
    pub fn apply(&mut self, event: &Event) {
        match &event.kind {
            EventKind::Selection(sel) => self.player_mut(event.player_id()).apply_selection(sel),
            EventKind::SetToHotkey(hk) => self.player_mut(event.player_id()).set_hotkey(hk),
            EventKind::AddToHotkey(hk) => self.player_mut(event.player_id()).add_to_hotkey(hk),
            EventKind::GetHotkey(hk) => self.player_mut(event.player_id()).get_hotkey(hk),
            _ => {}
        }
    }

    fn player_mut(&mut self, player_id: u8) -> &mut PlayerSelection {
        self.players.entry(player_id).or_default()
    }

    /// Returns the tracked banks of a player, if any event touched them.
    #[must_use]
    pub fn player(&self, player_id: u8) -> Option<&PlayerSelection> {
        self.players.get(&player_id)
    }

    /// Returns the active selection of a player.
    #[must_use]
    pub fn active(&self, player_id: u8) -> &[ObjectRef] {
        self.player(player_id)
            .map(PlayerSelection::active)
            .unwrap_or(&[])
    }

    /// Returns the objects in a player's control group.
    #[must_use]
    pub fn hotkey(&self, player_id: u8, hotkey: u8) -> &[ObjectRef] {
        self.player(player_id)
            .map(|p| p.bank(usize::from(hotkey)))
            .unwrap_or(&[])
    }
}
