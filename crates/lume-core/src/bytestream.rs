/*
 * Copyright (c) 2026.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! A simple implementation of a bytestream reader.
//!
//! The reader wraps an in-memory byte slice and tracks a cursor
//! position, which is what the token-level parsers in the format
//! crates are built on top of.
//!
//! Reads past the end of the stream are well defined: `get_u8`
//! returns `0` and leaves the cursor in place, so parsing loops
//! gate on [`eof`](ByteReader::eof) rather than on sentinel values.

/// An encapsulation of a bytestream
///
/// The lifetime parameter comes from the slice the
/// reader borrows its bytes from.
pub struct ByteReader<'a> {
    /// Data stream
    stream:   &'a [u8],
    position: usize
}

impl<'a> ByteReader<'a> {
    /// Create a new reader positioned at the start of `stream`
    pub const fn new(stream: &'a [u8]) -> ByteReader<'a> {
        ByteReader { stream, position: 0 }
    }

    /// Return the length of the underlying stream
    pub const fn len(&self) -> usize {
        self.stream.len()
    }

    /// Return true if the underlying stream has no bytes
    pub const fn is_empty(&self) -> bool {
        self.stream.is_empty()
    }

    /// Return the current cursor position
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Return the number of bytes between the cursor and
    /// the end of the stream
    pub const fn remaining(&self) -> usize {
        // Must be saturating to prevent underflow
        self.stream.len().saturating_sub(self.position)
    }

    /// Return true if the cursor is at or past the end of the stream
    pub const fn eof(&self) -> bool {
        self.position >= self.stream.len()
    }

    /// Return true if at least `num` bytes remain
    pub const fn has(&self, num: usize) -> bool {
        self.remaining() >= num
    }

    /// Move the cursor `num` bytes forward
    pub fn skip(&mut self, num: usize) {
        self.position = self.position.saturating_add(num);
    }

    /// Move the cursor `num` bytes backward, stopping at the start
    pub fn rewind(&mut self, num: usize) {
        self.position = self.position.saturating_sub(num);
    }

    /// Read a single byte and advance the cursor
    ///
    /// Returns `0` without advancing when the stream is exhausted,
    /// callers that need to tell the difference should check
    /// [`eof`](ByteReader::eof) first.
    pub fn get_u8(&mut self) -> u8 {
        match self.stream.get(self.position) {
            Some(byte) => {
                self.position += 1;
                *byte
            }
            None => 0
        }
    }

    /// Return every byte from the cursor to the end of the stream
    /// without moving the cursor
    pub fn remaining_bytes(&self) -> &'a [u8] {
        &self.stream[self.stream.len().min(self.position)..]
    }

    /// Advance the cursor while `func` returns true for the byte
    /// under it
    ///
    /// The cursor is left on the first byte that failed the
    /// predicate, or at the end of the stream.
    pub fn skip_until_false<F: Fn(u8) -> bool>(&mut self, func: F) {
        while !self.eof() {
            let byte = self.get_u8();

            if !(func)(byte) {
                // go back one step, we hit something the predicate rejected
                self.rewind(1);
                break;
            }
        }
    }
}

#[test]
fn get_u8_advances_and_zeroes_at_eof() {
    let mut reader = ByteReader::new(b"ab");

    assert_eq!(reader.get_u8(), b'a');
    assert_eq!(reader.get_u8(), b'b');
    assert!(reader.eof());
    // exhausted reads return zero and stay in place
    assert_eq!(reader.get_u8(), 0);
    assert_eq!(reader.position(), 2);
}

#[test]
fn rewind_saturates_at_start() {
    let mut reader = ByteReader::new(b"xyz");

    reader.skip(2);
    reader.rewind(10);
    assert_eq!(reader.position(), 0);
    assert_eq!(reader.remaining(), 3);
}

#[test]
fn skip_until_false_stops_on_rejected_byte() {
    let mut reader = ByteReader::new(b"   17");

    reader.skip_until_false(|x| x.is_ascii_whitespace());
    assert_eq!(reader.get_u8(), b'1');
}

#[test]
fn remaining_bytes_does_not_advance() {
    let mut reader = ByteReader::new(b"12 34");

    reader.skip(3);
    assert_eq!(reader.remaining_bytes(), b"34");
    assert_eq!(reader.position(), 3);
}
