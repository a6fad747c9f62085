//! Error types for the game event decoder.
//!
//! This module defines the error hierarchy for every failure that can occur
//! while decoding an action stream: running out of bytes, record shapes the
//! decoder does not know, and stream-level aborts that carry diagnostics about
//! the last record that decoded cleanly.

use crate::events::EventHeader;
use thiserror::Error;

/// The main error type for game event decoding.
///
/// Decoders never try to recover locally. Every variant propagates to the
/// stream-level caller, which decides whether to abort the replay.
///
/// # Example
///
/// ```
/// use sc2_events::error::{ParserError, Result};
///
/// fn example_operation() -> Result<()> {
///     Err(ParserError::UnhandledShape {
///         record_type: 0x01,
///         code: 0x0B,
///         flag: 0x00,
///     })
/// }
///
/// assert!(example_operation().is_err());
/// ```
#[derive(Error, Debug)]
pub enum ParserError {
    /// An I/O error occurred while reading the events file.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The data ended before the requested bytes could be read.
    ///
    /// `expected` is the absolute buffer length a read needed and
    /// `available` is the actual buffer length.
    #[error("Unexpected end of data: expected {expected} bytes, but only {available} available")]
    UnexpectedEof {
        /// The number of bytes that were expected to be available.
        expected: usize,
        /// The actual number of bytes available.
        available: usize,
    },

    /// A sub-byte read asked for a width outside `1..=8` bits.
    #[error("Invalid shift width: {bits} bits (must be 1-8)")]
    InvalidShift {
        /// The requested bit count.
        bits: u8,
    },

    /// A flag or mode combination inside a known record that no branch covers.
    ///
    /// Dropping such a record would desynchronize the cursor for the rest of
    /// the stream, so it is always reported.
    #[error("Unhandled record shape: type 0x{record_type:02X}, code 0x{code:02X}, flag 0x{flag:02X}")]
    UnhandledShape {
        /// Record type from the header.
        record_type: u8,
        /// Record code from the header.
        code: u8,
        /// The flag, mode, or action value that selected no branch.
        flag: u8,
    },

    /// No decoder is registered for this `(type, code)` pair.
    #[error("No decoder registered for type 0x{record_type:02X}, code 0x{code:02X}")]
    UnknownRecord {
        /// Record type from the header.
        record_type: u8,
        /// Record code from the header.
        code: u8,
    },

    /// Decoding of a whole stream stopped at a record.
    ///
    /// Carries the offset where the failing record started and the header of
    /// the last record that decoded cleanly.
    #[error("Event stream aborted at offset {offset} (last decoded: {}): {source}", describe_last(.last_header))]
    StreamAborted {
        /// Byte offset of the record that failed.
        offset: usize,
        /// Header of the last successfully decoded record, if any.
        last_header: Option<EventHeader>,
        /// The underlying decode failure.
        #[source]
        source: Box<ParserError>,
    },
}

impl ParserError {
    /// Creates an `UnexpectedEof` error with the given sizes.
    ///
    /// # Arguments
    ///
    /// * `expected` - The number of bytes that were needed
    /// * `available` - The number of bytes actually available
    #[must_use]
    pub fn unexpected_eof(expected: usize, available: usize) -> Self {
        ParserError::UnexpectedEof {
            expected,
            available,
        }
    }

    /// Creates an `UnhandledShape` error for the record described by `header`.
    #[must_use]
    pub fn unhandled_shape(header: &EventHeader, flag: u8) -> Self {
        ParserError::UnhandledShape {
            record_type: header.record_type,
            code: header.code,
            flag,
        }
    }

    /// Returns whether the error means the buffer ran out of bytes,
    /// looking through a `StreamAborted` wrapper.
    #[must_use]
    pub fn is_exhaustion(&self) -> bool {
        match self {
            ParserError::UnexpectedEof { .. } => true,
            ParserError::StreamAborted { source, .. } => source.is_exhaustion(),
            _ => false,
        }
    }
}

fn describe_last(last: &Option<EventHeader>) -> String {
    match last {
        Some(header) => header.to_string(),
        None => "none".to_string(),
    }
}

/// A specialized Result type for decoding operations.
pub type Result<T> = std::result::Result<T, ParserError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parser_error_display() {
        let err = ParserError::IoError(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "file not found",
        ));
        assert!(err.to_string().contains("I/O error"));

        let err = ParserError::unexpected_eof(128, 64);
        assert!(err.to_string().contains("expected 128 bytes"));
        assert!(err.to_string().contains("64 available"));

        let err = ParserError::InvalidShift { bits: 9 };
        assert!(err.to_string().contains("9 bits"));

        let err = ParserError::UnhandledShape {
            record_type: 1,
            code: 0x1B,
            flag: 0x03,
        };
        assert_eq!(
            err.to_string(),
            "Unhandled record shape: type 0x01, code 0x1B, flag 0x03"
        );

        let err = ParserError::UnknownRecord {
            record_type: 5,
            code: 0xAA,
        };
        assert!(err.to_string().contains("type 0x05, code 0xAA"));
    }

    #[test]
    fn test_stream_aborted_display() {
        let err = ParserError::StreamAborted {
            offset: 42,
            last_header: Some(EventHeader::new(16, 2, 1, 0x0B)),
            source: Box::new(ParserError::unexpected_eof(50, 45)),
        };
        let text = err.to_string();
        assert!(text.contains("offset 42"));
        assert!(text.contains("frame 16"));
        assert!(text.contains("expected 50 bytes"));

        let err = ParserError::StreamAborted {
            offset: 0,
            last_header: None,
            source: Box::new(ParserError::unexpected_eof(1, 0)),
        };
        assert!(err.to_string().contains("last decoded: none"));
    }

    #[test]
    fn test_is_exhaustion() {
        assert!(ParserError::unexpected_eof(4, 2).is_exhaustion());
        assert!(!ParserError::InvalidShift { bits: 0 }.is_exhaustion());

        let wrapped = ParserError::StreamAborted {
            offset: 3,
            last_header: None,
            source: Box::new(ParserError::unexpected_eof(4, 3)),
        };
        assert!(wrapped.is_exhaustion());
    }

    #[test]
    fn test_unhandled_shape_helper() {
        let header = EventHeader::new(100, 3, 1, 0x2D);
        match ParserError::unhandled_shape(&header, 3) {
            ParserError::UnhandledShape {
                record_type,
                code,
                flag,
            } => {
                assert_eq!(record_type, 1);
                assert_eq!(code, 0x2D);
                assert_eq!(flag, 3);
            }
            _ => panic!("Expected UnhandledShape variant"),
        }
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ParserError>();
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::Other, "test error");
        let parser_err: ParserError = io_err.into();
        assert!(matches!(parser_err, ParserError::IoError(_)));
    }
}
