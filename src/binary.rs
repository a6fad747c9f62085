//! Binary reading utilities for decoding game event records.
//!
//! This module provides [`ByteCursor`], a forward-only reader over a byte
//! buffer. It offers byte-aligned integer reads with explicit endianness,
//! a sub-byte "shift" reader for packed bit fields, and the fixed-width
//! domain reads (coordinates, object ids, object types, bitmasks) that the
//! event decoders are built from. All reads perform bounds checking and
//! return [`ParserError::UnexpectedEof`] instead of panicking.
//!
//! # Cursor state
//!
//! The cursor is `{position, bit_offset}`. `shift` consumes bits
//! least-significant first from the most recently loaded byte and loads a
//! new byte only when `bit_offset` is zero. Every byte-aligned read first
//! flushes the sub-byte state: unread bits of a partially consumed byte are
//! discarded and `bit_offset` returns to zero.
//!
//! # Example
//!
//! ```
//! use sc2_events::binary::{ByteCursor, Endian};
//!
//! let data = [0x34, 0x12, 0x12, 0x34, 0b1011_0110];
//! let mut cursor = ByteCursor::new(&data);
//!
//! assert_eq!(cursor.read_short(Endian::Little).unwrap(), 0x1234);
//! assert_eq!(cursor.read_short(Endian::Big).unwrap(), 0x1234);
//!
//! // Two packed fields from the same byte
//! assert_eq!(cursor.shift(2).unwrap(), 0b10);
//! assert_eq!(cursor.shift(2).unwrap(), 0b01);
//! assert!(cursor.is_empty());
//! ```

use crate::error::{ParserError, Result};
use serde::Serialize;
use std::fmt;

/// Byte order for multi-byte reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Endian {
    /// Least significant byte first. The default for most fields.
    #[default]
    Little,
    /// Most significant byte first.
    Big,
}

/// Forward-only reader over a byte buffer with a sub-byte bit cursor.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    position: usize,
    bit_offset: u8,
    loaded: u8,
}

impl<'a> ByteCursor<'a> {
    /// Width of an object id field in bytes.
    pub const OBJECT_ID_WIDTH: usize = 4;

    /// Width of an object type field without modifier in bytes.
    pub const OBJECT_TYPE_WIDTH: usize = 2;

    /// Width of a coordinate field in bytes.
    pub const COORDINATE_WIDTH: usize = 4;

    /// Creates a cursor positioned at the start of `data`.
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            position: 0,
            bit_offset: 0,
            loaded: 0,
        }
    }

    /// Returns the byte position of the next unread byte.
    ///
    /// A partially consumed shift byte counts as read.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Returns the number of bits already taken from the loaded byte.
    #[must_use]
    pub fn bit_offset(&self) -> u8 {
        self.bit_offset
    }

    /// Returns the number of unread bytes.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    /// Returns whether every byte has been read.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Discards the rest of a partially consumed shift byte.
    fn flush_bits(&mut self) {
        self.bit_offset = 0;
    }

    /// Takes the next `len` bytes after flushing the bit cursor.
    ///
    /// On failure the cursor does not move.
    fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        self.flush_bits();
        let end = self.position + len;
        if end > self.data.len() {
            return Err(ParserError::unexpected_eof(end, self.data.len()));
        }
        let slice = &self.data[self.position..end];
        self.position = end;
        Ok(slice)
    }

    /// Reads a single byte.
    ///
    /// # Errors
    ///
    /// Returns `ParserError::UnexpectedEof` if no bytes remain.
    pub fn read_byte(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    /// Reads a 16-bit integer in the given byte order.
    ///
    /// # Errors
    ///
    /// Returns `ParserError::UnexpectedEof` if fewer than 2 bytes remain.
    pub fn read_short(&mut self, endian: Endian) -> Result<u16> {
        let b = self.take(2)?;
        let bytes = [b[0], b[1]];
        Ok(match endian {
            Endian::Little => u16::from_le_bytes(bytes),
            Endian::Big => u16::from_be_bytes(bytes),
        })
    }

    /// Reads a 32-bit integer in the given byte order.
    ///
    /// # Errors
    ///
    /// Returns `ParserError::UnexpectedEof` if fewer than 4 bytes remain.
    ///
    /// # Example
    ///
    /// ```
    /// use sc2_events::binary::{ByteCursor, Endian};
    ///
    /// let data = [0x01, 0x02, 0x03, 0x04];
    /// assert_eq!(ByteCursor::new(&data).read_int(Endian::Big).unwrap(), 0x0102_0304);
    /// assert_eq!(ByteCursor::new(&data).read_int(Endian::Little).unwrap(), 0x0403_0201);
    /// ```
    pub fn read_int(&mut self, endian: Endian) -> Result<u32> {
        let b = self.take(4)?;
        let bytes = [b[0], b[1], b[2], b[3]];
        Ok(match endian {
            Endian::Little => u32::from_le_bytes(bytes),
            Endian::Big => u32::from_be_bytes(bytes),
        })
    }

    /// Advances past `len` bytes without interpreting them.
    ///
    /// # Errors
    ///
    /// Returns `ParserError::UnexpectedEof` if fewer than `len` bytes remain.
    pub fn skip(&mut self, len: usize) -> Result<()> {
        self.take(len).map(|_| ())
    }

    /// Reads `bits` bits (1-8) from the sub-byte cursor.
    ///
    /// Bits are taken least-significant first. A new byte is loaded only when
    /// the current one is exhausted, so consecutive calls share a byte until
    /// all 8 bits are used. A request that crosses into the next byte takes
    /// the remaining bits of the current byte as the low bits of the result.
    ///
    /// # Errors
    ///
    /// - `ParserError::InvalidShift` if `bits` is 0 or greater than 8
    /// - `ParserError::UnexpectedEof` if a new byte is needed and none remain
    pub fn shift(&mut self, bits: u8) -> Result<u8> {
        if bits == 0 || bits > 8 {
            return Err(ParserError::InvalidShift { bits });
        }

        let mut value: u16 = 0;
        let mut filled = 0u8;
        while filled < bits {
            if self.bit_offset == 0 {
                if self.position >= self.data.len() {
                    return Err(ParserError::unexpected_eof(
                        self.position + 1,
                        self.data.len(),
                    ));
                }
                self.loaded = self.data[self.position];
                self.position += 1;
            }
            let take = (8 - self.bit_offset).min(bits - filled);
            let mask = (1u16 << take) - 1;
            let chunk = (u16::from(self.loaded) >> self.bit_offset) & mask;
            value |= chunk << filled;
            filled += take;
            self.bit_offset = (self.bit_offset + take) % 8;
        }

        // bits <= 8, so the value always fits
        Ok((value & 0xFF) as u8)
    }

    /// Reads a length-prefixed bitmask.
    ///
    /// The first byte is the number of bits, followed by `ceil(len / 8)`
    /// bytes holding the bits least-significant first.
    ///
    /// # Errors
    ///
    /// Returns `ParserError::UnexpectedEof` if the mask is truncated.
    pub fn read_bitmask(&mut self) -> Result<Bitmask> {
        let len = usize::from(self.read_byte()?);
        let bytes = self.take(len.div_ceil(8))?;
        Ok(Bitmask {
            len,
            bytes: bytes.to_vec(),
        })
    }

    /// Reads a 4-byte fixed-point map coordinate.
    ///
    /// # Errors
    ///
    /// Returns `ParserError::UnexpectedEof` if fewer than 4 bytes remain.
    pub fn read_coordinate(&mut self) -> Result<Coordinate> {
        let x = self.read_short(Endian::Big)?;
        let y = self.read_short(Endian::Big)?;
        Ok(Coordinate { x, y })
    }

    /// Reads a 4-byte big-endian object id.
    ///
    /// # Errors
    ///
    /// Returns `ParserError::UnexpectedEof` if fewer than 4 bytes remain.
    pub fn read_object_id(&mut self) -> Result<u32> {
        self.read_int(Endian::Big)
    }

    /// Reads an object type.
    ///
    /// The base type is a 2-byte big-endian value. With `read_modifier` set a
    /// trailing modifier byte is appended as the low byte, making the field
    /// 3 bytes wide.
    ///
    /// # Errors
    ///
    /// Returns `ParserError::UnexpectedEof` if the field is truncated.
    pub fn read_object_type(&mut self, read_modifier: bool) -> Result<u32> {
        let base = u32::from(self.read_short(Endian::Big)?);
        if read_modifier {
            Ok(base << 8 | u32::from(self.read_byte()?))
        } else {
            Ok(base)
        }
    }

    /// Reads a variable-length frame delta.
    ///
    /// The low 2 bits of the first byte give the number of extension bytes
    /// (0-3) that follow; the high 6 bits are the most significant part of
    /// the value. Extension bytes are big-endian.
    ///
    /// # Errors
    ///
    /// Returns `ParserError::UnexpectedEof` if the field is truncated.
    ///
    /// # Example
    ///
    /// ```
    /// use sc2_events::binary::ByteCursor;
    ///
    /// // 0x05 = value 1 with one extension byte
    /// let data = [0x05, 0x10];
    /// assert_eq!(ByteCursor::new(&data).read_timestamp().unwrap(), 0x110);
    /// ```
    pub fn read_timestamp(&mut self) -> Result<u32> {
        let first = self.read_byte()?;
        let extra = usize::from(first & 0x03);
        let mut value = u32::from(first >> 2);
        for &b in self.take(extra)? {
            value = value << 8 | u32::from(b);
        }
        Ok(value)
    }
}

/// A length-prefixed set of bits read from the stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bitmask {
    len: usize,
    bytes: Vec<u8>,
}

impl Bitmask {
    /// Builds a bitmask from raw bytes holding `len` bits.
    #[must_use]
    pub fn from_bytes(len: usize, bytes: Vec<u8>) -> Self {
        Self { len, bytes }
    }

    /// Returns the number of bits in the mask.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns whether the mask holds no bits.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns whether bit `index` is set. Bits beyond `len` are never set.
    #[must_use]
    pub fn is_set(&self, index: usize) -> bool {
        index < self.len
            && self
                .bytes
                .get(index / 8)
                .is_some_and(|b| (b >> (index % 8)) & 1 == 1)
    }

    /// Iterates over the indices of set bits in ascending order.
    pub fn set_indices(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.len).filter(move |&i| self.is_set(i))
    }
}

/// Map position in 8.8 fixed point.
///
/// Each axis is stored as a big-endian `u16`: the high byte is the whole
/// map cell and the low byte the fraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Coordinate {
    /// Raw fixed-point X.
    pub x: u16,
    /// Raw fixed-point Y.
    pub y: u16,
}

impl Coordinate {
    /// Number of fractional bits per axis.
    pub const FRACTION_BITS: u32 = 8;

    /// Creates a coordinate from raw fixed-point values.
    #[must_use]
    pub fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }

    /// Returns X in map cells.
    #[must_use]
    pub fn x_cells(&self) -> f32 {
        f32::from(self.x) / (1u32 << Self::FRACTION_BITS) as f32
    }

    /// Returns Y in map cells.
    #[must_use]
    pub fn y_cells(&self) -> f32 {
        f32::from(self.y) / (1u32 << Self::FRACTION_BITS) as f32
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x_cells(), self.y_cells())
    }
}
