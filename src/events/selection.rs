//! Selection event decoding (type 0x01, code 0x_C).
//!
//! Selection events update one selection bank: an optional transform of the
//! objects already in the bank, followed by newly selected objects. The
//! transform grammar is shared with hotkey events.
//!
//! # Format
//!
//! ```text
//! [??: 1] [mode: 2 bits] [mode payload]
//! [type count: 1] ([object type: 3] [repeat: 1]) * type count
//! [id count: 1] [object id: 4] * id count
//! ```
//!
//! | Mode | Payload | Transform |
//! |------|---------|-----------|
//! | 0 | none | none |
//! | 1 | bitmask | keep objects whose bit is set |
//! | 2 | `[count: 1] [index: 1] * count` | remove objects at these indices |
//! | 3 | `[count: 1] [index: 1] * count` | keep exactly the objects at these indices |

use super::types::{Event, EventHeader, EventKind, ObjectRef};
use crate::binary::{Bitmask, ByteCursor};
use crate::error::Result;
use serde::Serialize;
use std::fmt;

/// A deselect or overlay update applied to a previously tracked selection.
///
/// Decoders only capture the transform; downstream trackers evaluate it
/// with [`SelectionTransform::apply`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SelectionTransform {
    /// Leave the prior selection untouched.
    None,

    /// Keep the objects whose bit is set.
    Mask(Bitmask),

    /// Remove the objects at these positions.
    DeselectByIndex(Vec<u8>),

    /// The new selection is exactly the objects at these positions.
    ReplaceByIndex(Vec<u8>),
}

impl SelectionTransform {
    /// Reads the mode payload for a 2-bit mode selector.
    ///
    /// Only the low 2 bits of `mode` are considered.
    ///
    /// # Errors
    ///
    /// Returns `ParserError::UnexpectedEof` if the payload is truncated.
    pub fn read(cursor: &mut ByteCursor<'_>, mode: u8) -> Result<Self> {
        Ok(match mode & 0x03 {
            1 => SelectionTransform::Mask(cursor.read_bitmask()?),
            2 => SelectionTransform::DeselectByIndex(read_indices(cursor)?),
            3 => SelectionTransform::ReplaceByIndex(read_indices(cursor)?),
            _ => SelectionTransform::None,
        })
    }

    /// Applies the transform to a prior selection.
    ///
    /// Indices that fall outside `prior` are ignored. `ReplaceByIndex`
    /// yields objects in the order the indices are listed.
    ///
    /// # Example
    ///
    /// ```
    /// use sc2_events::binary::Bitmask;
    /// use sc2_events::events::SelectionTransform;
    ///
    /// let prior = ['a', 'b', 'c', 'd'];
    /// let mask = SelectionTransform::Mask(Bitmask::from_bytes(4, vec![0b1010]));
    /// assert_eq!(mask.apply(&prior), vec!['b', 'd']);
    ///
    /// let replace = SelectionTransform::ReplaceByIndex(vec![2, 0]);
    /// assert_eq!(replace.apply(&prior), vec!['c', 'a']);
    /// ```
    #[must_use]
    pub fn apply<T: Clone>(&self, prior: &[T]) -> Vec<T> {
        match self {
            SelectionTransform::None => prior.to_vec(),
            SelectionTransform::Mask(mask) => prior
                .iter()
                .enumerate()
                .filter(|(i, _)| mask.is_set(*i))
                .map(|(_, item)| item.clone())
                .collect(),
            SelectionTransform::DeselectByIndex(indices) => prior
                .iter()
                .enumerate()
                .filter(|(i, _)| !indices.iter().any(|&idx| usize::from(idx) == *i))
                .map(|(_, item)| item.clone())
                .collect(),
            SelectionTransform::ReplaceByIndex(indices) => indices
                .iter()
                .filter_map(|&idx| prior.get(usize::from(idx)).cloned())
                .collect(),
        }
    }

    /// Returns whether this transform leaves the prior selection untouched.
    #[must_use]
    pub fn is_none(&self) -> bool {
        matches!(self, SelectionTransform::None)
    }
}

fn read_indices(cursor: &mut ByteCursor<'_>) -> Result<Vec<u8>> {
    let count = cursor.read_byte()?;
    (0..count).map(|_| cursor.read_byte()).collect()
}

/// Reads the run-length type list and the id list and pairs them up.
///
/// Types are expanded by their repeat counts and zipped positionally with the
/// ids. The format does not guarantee the two lists agree in length; extra
/// entries on either side are dropped.
fn read_objects(cursor: &mut ByteCursor<'_>) -> Result<Vec<ObjectRef>> {
    let type_count = cursor.read_byte()?;
    let mut types = Vec::new();
    for _ in 0..type_count {
        let object_type = cursor.read_object_type(true)?;
        let repeat = cursor.read_byte()?;
        types.extend(std::iter::repeat(object_type).take(usize::from(repeat)));
    }

    let id_count = cursor.read_byte()?;
    let ids = (0..id_count)
        .map(|_| cursor.read_object_id())
        .collect::<Result<Vec<_>>>()?;

    Ok(ids
        .into_iter()
        .zip(types)
        .map(|(id, object_type)| ObjectRef::new(id, object_type))
        .collect())
}

/// A selection bank update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectionEvent {
    /// Selection bank (high nibble of the code).
    pub bank: u8,

    /// Newly selected objects in wire order.
    pub objects: Vec<ObjectRef>,

    /// Update applied to the bank before the new objects are added.
    pub transform: SelectionTransform,
}

impl SelectionEvent {
    /// Returns the number of newly selected objects.
    #[must_use]
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }
}

impl fmt::Display for SelectionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Select {} object(s) in bank {}",
            self.objects.len(),
            self.bank
        )?;
        if !self.transform.is_none() {
            write!(f, " after {:?}", self.transform)?;
        }
        Ok(())
    }
}

/// Decodes a selection record body.
///
/// # Errors
///
/// Returns `ParserError::UnexpectedEof` if the body is truncated.
pub fn decode_selection(cursor: &mut ByteCursor<'_>, header: EventHeader) -> Result<Event> {
    let bank = header.sub_target();
    // Leading byte of unknown purpose.
    cursor.skip(1)?;

    let mode = cursor.shift(2)?;
    let transform = SelectionTransform::read(cursor, mode)?;
    let objects = read_objects(cursor)?;

    Ok(Event::new(
        header,
        EventKind::Selection(SelectionEvent {
            bank,
            objects,
            transform,
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParserError;

    fn header(bank: u8) -> EventHeader {
        EventHeader::new(64, 2, 0x01, bank << 4 | 0x0C)
    }

    fn decode(data: &[u8], bank: u8) -> (SelectionEvent, usize) {
        let mut cursor = ByteCursor::new(data);
        let event = decode_selection(&mut cursor, header(bank)).unwrap();
        match event.kind {
            EventKind::Selection(sel) => (sel, cursor.position()),
            other => panic!("Expected selection, got {other:?}"),
        }
    }

    #[test]
    fn test_selection_no_transform() {
        #[rustfmt::skip]
        let data: &[u8] = &[
            0xAA,                         // unknown
            0x00,                         // mode 0
            0x02,                         // 2 type runs
            0x00, 0x2F, 0x01, 0x02,       // type 0x2F01 x2
            0x00, 0x30, 0x00, 0x01,       // type 0x3000 x1
            0x03,                         // 3 ids
            0x00, 0x00, 0x00, 0x01,
            0x00, 0x00, 0x00, 0x02,
            0x00, 0x00, 0x00, 0x03,
        ];

        let (sel, consumed) = decode(data, 10);
        assert_eq!(consumed, data.len());
        assert_eq!(sel.bank, 10);
        assert_eq!(sel.transform, SelectionTransform::None);
        assert_eq!(
            sel.objects,
            vec![
                ObjectRef::new(1, 0x2F01),
                ObjectRef::new(2, 0x2F01),
                ObjectRef::new(3, 0x3000),
            ]
        );
    }

    #[test]
    fn test_selection_mask_mode() {
        #[rustfmt::skip]
        let data: &[u8] = &[
            0x00,
            0x01,             // mode 1
            0x05, 0b10101,    // 5-bit mask
            0x00,             // no types
            0x00,             // no ids
        ];

        let (sel, consumed) = decode(data, 0);
        assert_eq!(consumed, 6);
        assert!(sel.objects.is_empty());
        assert_eq!(
            sel.transform,
            SelectionTransform::Mask(Bitmask::from_bytes(5, vec![0b10101]))
        );
    }

    #[test]
    fn test_selection_deselect_and_replace_modes() {
        let data: &[u8] = &[0x00, 0x02, 0x02, 0x01, 0x03, 0x00, 0x00];
        let (sel, consumed) = decode(data, 1);
        assert_eq!(consumed, 7);
        assert_eq!(sel.transform, SelectionTransform::DeselectByIndex(vec![1, 3]));

        let data: &[u8] = &[0x00, 0x03, 0x01, 0x04, 0x00, 0x00];
        let (sel, consumed) = decode(data, 1);
        assert_eq!(consumed, 6);
        assert_eq!(sel.transform, SelectionTransform::ReplaceByIndex(vec![4]));
    }

    #[test]
    fn test_mode_uses_low_two_bits_only() {
        // upper bits of the mode byte are discarded by the next aligned read
        let data: &[u8] = &[0x00, 0b1111_1100, 0x00, 0x00];
        let (sel, consumed) = decode(data, 0);
        assert_eq!(consumed, 4);
        assert!(sel.transform.is_none());
    }

    #[test]
    fn test_selection_mismatched_lists() {
        #[rustfmt::skip]
        let data: &[u8] = &[
            0x00, 0x00,
            0x01, 0x00, 0x10, 0x00, 0x01, // one object type
            0x02,                         // but two ids
            0x00, 0x00, 0x00, 0x07,
            0x00, 0x00, 0x00, 0x08,
        ];
        let (sel, consumed) = decode(data, 0);
        assert_eq!(consumed, data.len());
        assert_eq!(sel.objects, vec![ObjectRef::new(7, 0x1000)]);
    }

    #[test]
    fn test_selection_truncated() {
        let data: &[u8] = &[0x00, 0x00, 0x01, 0x00];
        let mut cursor = ByteCursor::new(data);
        let result = decode_selection(&mut cursor, header(0));
        assert!(matches!(result, Err(ParserError::UnexpectedEof { .. })));
    }

    #[test]
    fn test_apply_transforms() {
        let prior = [10, 20, 30, 40, 50];

        assert_eq!(SelectionTransform::None.apply(&prior), prior.to_vec());

        let mask = SelectionTransform::Mask(Bitmask::from_bytes(5, vec![0b10011]));
        assert_eq!(mask.apply(&prior), vec![10, 20, 50]);

        let deselect = SelectionTransform::DeselectByIndex(vec![0, 4, 9]);
        assert_eq!(deselect.apply(&prior), vec![20, 30, 40]);

        let replace = SelectionTransform::ReplaceByIndex(vec![3, 1, 7]);
        assert_eq!(replace.apply(&prior), vec![40, 20]);
    }

    #[test]
    fn test_mask_shorter_than_selection_drops_tail() {
        let prior = ['a', 'b', 'c'];
        let mask = SelectionTransform::Mask(Bitmask::from_bytes(2, vec![0xFF]));
        assert_eq!(mask.apply(&prior), vec!['a', 'b']);
    }
}
