//! Forward-only byte cursor used to decode script bytecode.
//!
//! This module provides the [`crate::file::parser::Parser`] type, a cursor over a byte slice with
//! bounds-checked, little-endian typed reads. Decoding a script is a single forward pass: the
//! instruction decoder reads a header, then each operand reads its type tag, an optional length
//! byte and its payload. The parser never moves backwards and never reads past the end; a read
//! that does not fit fails with [`crate::Error::TruncatedInput`] and leaves the position where
//! it was.
//!
//! # Usage Examples
//!
//! ```rust
//! use scmscope::Parser;
//!
//! let data = [0x04, 0x00, 0x03, 0x07, 0x00];
//! let mut parser = Parser::new(&data);
//!
//! let header = parser.read_le::<u16>()?;
//! assert_eq!(header, 0x0004);
//!
//! let tag = parser.read_le::<u8>()?;
//! let payload = parser.read_bytes(2)?;
//! assert_eq!((tag, payload), (0x03, &[0x07, 0x00][..]));
//! assert!(!parser.has_more_data());
//! # Ok::<(), scmscope::Error>(())
//! ```

use crate::{
    file::io::{read_le_at, ScmIO},
    Error, Result,
};

/// A forward-only binary data parser over a script's bytes.
///
/// The parser maintains an internal position cursor and provides bounds checking
/// to prevent buffer overruns when reading malformed or truncated data.
pub struct Parser<'a> {
    /// The binary data being parsed
    data: &'a [u8],
    /// Current position within the data buffer
    position: usize,
}

impl<'a> Parser<'a> {
    /// Create a new [`crate::file::parser::Parser`] from a byte slice.
    ///
    /// # Arguments
    /// * `data` - The byte slice to read from
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Parser { data, position: 0 }
    }

    /// Returns the length of the underlying data buffer.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the parser has no data.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns `true` if there is more data available to parse.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use scmscope::Parser;
    /// let data = [0x01, 0x02];
    /// let mut parser = Parser::new(&data);
    /// assert!(parser.has_more_data());
    ///
    /// let _value = parser.read_le::<u16>()?;
    /// assert!(!parser.has_more_data());
    /// # Ok::<(), scmscope::Error>(())
    /// ```
    #[must_use]
    pub fn has_more_data(&self) -> bool {
        self.position < self.data.len()
    }

    /// Get the current position of the parser within the data buffer.
    #[must_use]
    pub fn pos(&self) -> usize {
        self.position
    }

    /// Number of bytes left between the current position and the end of the data.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    /// Get access to the underlying data buffer.
    #[must_use]
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Peek at the next byte without advancing the position.
    ///
    /// # Errors
    /// Returns [`crate::Error::TruncatedInput`] if position is at the end of the data.
    pub fn peek_byte(&self) -> Result<u8> {
        match self.data.get(self.position) {
            Some(byte) => Ok(*byte),
            None => Err(self.truncated(1)),
        }
    }

    /// Read a value of type `T` in little-endian format and advance past it.
    ///
    /// # Errors
    /// Returns [`crate::Error::TruncatedInput`] if reading `T` would exceed the data length.
    pub fn read_le<T: ScmIO>(&mut self) -> Result<T> {
        read_le_at::<T>(self.data, &mut self.position)
    }

    /// Read exactly `count` raw bytes and advance past them.
    ///
    /// # Errors
    /// Returns [`crate::Error::TruncatedInput`] if fewer than `count` bytes remain.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use scmscope::Parser;
    /// let data = [b'H', b'I', 0x00];
    /// let mut parser = Parser::new(&data);
    ///
    /// assert_eq!(parser.read_bytes(2)?, b"HI");
    /// assert!(parser.read_bytes(2).is_err());
    /// assert_eq!(parser.pos(), 2);
    /// # Ok::<(), scmscope::Error>(())
    /// ```
    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8]> {
        if count > self.remaining() {
            return Err(self.truncated(count));
        }

        let bytes = &self.data[self.position..self.position + count];
        self.position += count;
        Ok(bytes)
    }

    fn truncated(&self, requested: usize) -> Error {
        Error::TruncatedInput {
            offset: self.position,
            requested,
            available: self.remaining(),
        }
    }
}
