// a3mx: Reconstruct multiple sequence alignments from compressed A3M data.
//
// Copyright 2026 Tommi Mäklin [tommi@maklin.fi].
//
// Copyrights in this project are retained by contributors. No copyright assignment
// is required to contribute to this project.
//
// Except as otherwise noted (below and/or in individual files), this
// project is licensed under the Apache License, Version 2.0
// <LICENSE-APACHE> or <http://www.apache.org/licenses/LICENSE-2.0> or
// the MIT license, <LICENSE-MIT> or <http://opensource.org/licenses/MIT>,
// at your option.
//

//! Bounds-checked reads from a byte buffer.
//!
//! Compressed A3M data is a back-to-back byte stream with no padding or
//! alignment, so a corrupt length field in one record silently shifts the
//! reading frame of everything after it. [ByteCursor] keeps the read
//! position explicit and fails with [TruncatedInput] instead of reading
//! past the end of the buffer.

/// Error returned when a read would run past the end of the input buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TruncatedInput;

impl std::fmt::Display for TruncatedInput {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "Input ends in the middle of a record")
    }
}

impl std::error::Error for TruncatedInput {}

/// Read position into a byte buffer; advances monotonically, never wraps.
pub struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        ByteCursor { data, pos: 0 }
    }

    /// Number of bytes left to read.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    /// Returns the next byte without consuming it.
    pub fn peek(&self) -> Option<u8> {
        self.data.get(self.pos).copied()
    }

    /// Consumes and returns the next `count` bytes.
    pub fn take(&mut self, count: usize) -> Result<&'a [u8], TruncatedInput> {
        if count > self.remaining() {
            return Err(TruncatedInput);
        }
        let bytes = &self.data[self.pos..self.pos + count];
        self.pos += count;
        Ok(bytes)
    }

    /// Consumes and returns everything up to and including the next `byte`.
    pub fn take_through(&mut self, byte: u8) -> Result<&'a [u8], TruncatedInput> {
        match self.data[self.pos..].iter().position(|x| *x == byte) {
            Some(offset) => self.take(offset + 1),
            None => Err(TruncatedInput),
        }
    }

    pub fn read_u8(&mut self) -> Result<u8, TruncatedInput> {
        Ok(self.take(1)?[0])
    }

    /// Reads one byte as a two's-complement signed value.
    pub fn read_i8(&mut self) -> Result<i8, TruncatedInput> {
        Ok(self.take(1)?[0] as i8)
    }
}
