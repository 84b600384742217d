//! Input line shared by the key producer and the line reader.
//!
//! The buffer is circular with four unwrapped indices:
//!
//! - `r`: next byte handed to the reader
//! - `w`: end of the committed lines, start of the line being edited
//! - `e`: caret
//! - `rightmost`: end of the line being edited
//!
//! `[r, w)` is readable, `[w, rightmost)` is the live line and `[e,
//! rightmost)` is the tail right of the caret. The methods here only move
//! bytes and indices; echoing is done by [`crate::editor::LineEditor`].

use crate::circular::CircularBuffer;
use crate::error::InvariantViolation;

/// Default input line capacity
pub const INPUT_CAPACITY: usize = 128;

pub struct InputLine<const C: usize = INPUT_CAPACITY> {
    buf: CircularBuffer<u8, C>,
    pub(crate) r: usize,
    pub(crate) w: usize,
    pub(crate) e: usize,
    pub(crate) rightmost: usize,
}

impl<const C: usize> Default for InputLine<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const C: usize> InputLine<C> {
    pub const fn new() -> Self {
        Self {
            buf: CircularBuffer::new(0),
            r: 0,
            w: 0,
            e: 0,
            rightmost: 0,
        }
    }

    pub const fn capacity(&self) -> usize {
        C
    }

    /// Length of the line being edited
    pub fn len(&self) -> usize {
        self.rightmost - self.w
    }

    pub fn is_empty(&self) -> bool {
        self.rightmost == self.w
    }

    /// Caret position relative to the start of the line being edited
    pub fn caret(&self) -> usize {
        self.e - self.w
    }

    pub fn tail_len(&self) -> usize {
        self.rightmost - self.e
    }

    pub fn caret_at_start(&self) -> bool {
        self.e == self.w
    }

    pub fn caret_at_end(&self) -> bool {
        self.e == self.rightmost
    }

    /// Bytes that can still be typed before the reader drains the buffer
    pub fn room(&self) -> usize {
        C - (self.rightmost - self.r)
    }

    pub fn is_full(&self) -> bool {
        self.room() == 0
    }

    /// Committed bytes not yet taken by the reader
    pub fn readable(&self) -> usize {
        self.w - self.r
    }

    pub fn has_data(&self) -> bool {
        self.r != self.w
    }

    /// Byte at `offset` from the start of the line being edited
    pub fn byte_at(&self, offset: usize) -> u8 {
        self.buf.get(self.w + offset)
    }

    /// The line being edited as at most two slices
    pub fn line_slices(&self) -> (&[u8], &[u8]) {
        self.buf.slices(self.w, self.rightmost)
    }

    /// Copy the line being edited into `dst`, returning the copied length.
    pub fn copy_line(&self, dst: &mut [u8]) -> usize {
        let (first, second) = self.line_slices();
        let n1 = first.len().min(dst.len());
        dst[..n1].copy_from_slice(&first[..n1]);
        let n2 = second.len().min(dst.len() - n1);
        dst[n1..n1 + n2].copy_from_slice(&second[..n2]);
        n1 + n2
    }

    pub fn check(&self) -> Result<(), InvariantViolation> {
        let Self {
            r, w, e, rightmost, ..
        } = *self;

        if r > w {
            Err(InvariantViolation::ReadPastCommit { r, w })
        } else if w > e {
            Err(InvariantViolation::CommitPastCaret { w, e })
        } else if e > rightmost {
            Err(InvariantViolation::CaretPastEnd { e, rightmost })
        } else if rightmost - r > C {
            Err(InvariantViolation::Overflow {
                r,
                rightmost,
                capacity: C,
            })
        } else {
            Ok(())
        }
    }

    /// Insert `byte` at the caret, shifting the tail one slot right.
    pub(crate) fn insert(&mut self, byte: u8) -> bool {
        if self.is_full() {
            return false;
        }

        self.buf.copy_within(self.e, self.e + 1, self.tail_len());
        self.buf.set(self.e, byte);
        self.e += 1;
        self.rightmost += 1;

        true
    }

    /// Remove the byte left of the caret, shifting the tail one slot left.
    pub(crate) fn remove_before_caret(&mut self) -> bool {
        if self.caret_at_start() {
            return false;
        }

        self.buf.copy_within(self.e, self.e - 1, self.tail_len());
        self.e -= 1;
        self.rightmost -= 1;

        true
    }

    /// Remove `[w, e)`, moving the tail to the start of the line. Returns
    /// the number of removed bytes.
    pub(crate) fn remove_before_line_start(&mut self) -> usize {
        let removed = self.caret();

        self.buf.copy_within(self.e, self.w, self.tail_len());
        self.e = self.w;
        self.rightmost -= removed;

        removed
    }

    pub(crate) fn move_caret_left(&mut self) -> bool {
        if self.caret_at_start() {
            false
        } else {
            self.e -= 1;
            true
        }
    }

    /// Advance the caret, returning the byte it passed over.
    pub(crate) fn move_caret_right(&mut self) -> Option<u8> {
        if self.caret_at_end() {
            None
        } else {
            let byte = self.buf.get(self.e);
            self.e += 1;
            Some(byte)
        }
    }

    /// Replace the line being edited with `content` and put the caret at
    /// its end. The content is truncated to leave one free slot, so the
    /// next key still reaches the forced commit. Returns the stored length.
    pub(crate) fn replace_line(&mut self, content: &[u8]) -> usize {
        let room = C - (self.w - self.r);
        let len = content.len().min(room.saturating_sub(1));

        for (i, &b) in content[..len].iter().enumerate() {
            self.buf.set(self.w + i, b);
        }

        self.rightmost = self.w + len;
        self.e = self.rightmost;

        len
    }

    /// Append `byte` after the line end regardless of the caret.
    pub(crate) fn push_end(&mut self, byte: u8) -> bool {
        if self.is_full() {
            return false;
        }

        self.buf.set(self.rightmost, byte);
        self.rightmost += 1;
        self.e = self.rightmost;

        true
    }

    /// Hand the line being edited to the reader.
    pub(crate) fn commit(&mut self) {
        self.e = self.rightmost;
        self.w = self.rightmost;
    }

    pub(crate) fn pop_front(&mut self) -> Option<u8> {
        if self.has_data() {
            let byte = self.buf.get(self.r);
            self.r += 1;
            Some(byte)
        } else {
            None
        }
    }

    /// Give the last taken byte back to the reader side.
    pub(crate) fn unread(&mut self) {
        self.r -= 1;
    }

    /// Pull all indices back by a multiple of the capacity so they stay
    /// small. Storage positions are unchanged.
    pub(crate) fn rebase(&mut self) {
        let base = self.r - self.r % C;

        self.r -= base;
        self.w -= base;
        self.e -= base;
        self.rightmost -= base;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::vec::Vec;

    fn line<const C: usize>(input: &InputLine<C>) -> Vec<u8> {
        let mut dst = [0; C];
        let len = input.copy_line(&mut dst);
        dst[..len].to_vec()
    }

    fn type_str<const C: usize>(input: &mut InputLine<C>, s: &str) {
        for b in s.bytes() {
            assert!(input.insert(b));
        }
    }

    #[test]
    fn insert_and_remove() {
        let mut input: InputLine<16> = InputLine::new();

        type_str(&mut input, "abc");
        assert_eq!(line(&input), b"abc");
        assert_eq!(input.caret(), 3);

        assert!(input.move_caret_left());
        assert!(input.move_caret_left());
        assert!(input.insert(b'X'));

        assert_eq!(line(&input), b"aXbc");
        assert_eq!(input.caret(), 2);
        assert_eq!(input.tail_len(), 2);

        assert!(input.remove_before_caret());
        assert_eq!(line(&input), b"abc");
        assert_eq!(input.caret(), 1);

        assert_eq!(input.move_caret_right(), Some(b'b'));
        assert_eq!(input.move_caret_right(), Some(b'c'));
        assert_eq!(input.move_caret_right(), None);

        input.check().unwrap();
    }

    #[test]
    fn kill_before_caret() {
        let mut input: InputLine<16> = InputLine::new();

        type_str(&mut input, "rm -rf /");
        for _ in 0..5 {
            input.move_caret_left();
        }

        assert_eq!(input.remove_before_line_start(), 3);
        assert_eq!(line(&input), b"-rf /");
        assert!(input.caret_at_start());
    }

    #[test]
    fn full_buffer_rejects_input() {
        let mut input: InputLine<4> = InputLine::new();

        type_str(&mut input, "abcd");
        assert!(input.is_full());
        assert!(!input.insert(b'e'));
        assert!(!input.push_end(b'\n'));

        input.commit();
        assert_eq!(input.readable(), 4);
        assert!(input.is_full());

        assert_eq!(input.pop_front(), Some(b'a'));
        assert_eq!(input.room(), 1);
        assert!(input.insert(b'e'));
        assert_eq!(line(&input), b"e");
    }

    #[test]
    fn wraps_around_capacity() {
        let mut input: InputLine<8> = InputLine::new();

        type_str(&mut input, "hello\n");
        input.commit();
        while input.pop_front().is_some() {}

        type_str(&mut input, "world");
        assert_eq!(input.line_slices(), (&b"wo"[..], &b"rld"[..]));

        for _ in 0..3 {
            input.move_caret_left();
        }
        assert!(input.insert(b'_'));
        assert_eq!(line(&input), b"wo_rld");

        input.rebase();
        assert_eq!(input.r, 6);
        assert_eq!(line(&input), b"wo_rld");
        input.check().unwrap();
    }

    #[test]
    fn replace_line_truncates_to_room() {
        let mut input: InputLine<8> = InputLine::new();

        type_str(&mut input, "abc\n");
        input.commit();
        type_str(&mut input, "x");

        assert_eq!(input.replace_line(b"0123456789"), 3);
        assert_eq!(line(&input), b"012");
        assert!(input.caret_at_end());
        assert_eq!(input.room(), 1);
    }

    #[test]
    fn detects_broken_indices() {
        let mut input: InputLine<8> = InputLine::new();

        input.e = 3;
        assert_eq!(
            input.check(),
            Err(InvariantViolation::CaretPastEnd { e: 3, rightmost: 0 })
        );

        input.rightmost = 9;
        assert_eq!(
            input.check(),
            Err(InvariantViolation::Overflow {
                r: 0,
                rightmost: 9,
                capacity: 8
            })
        );

        input.r = 1;
        assert_eq!(
            input.check(),
            Err(InvariantViolation::ReadPastCommit { r: 1, w: 0 })
        );
    }
}
