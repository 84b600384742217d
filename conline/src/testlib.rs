use std::string::String;
use std::vec::Vec;

use crate::input::ControlKey;
use crate::render::{Glyph, RenderSink};

use ControlKey::*;

pub mod keys {
    pub const UP: u8 = 0xe2;
    pub const DOWN: u8 = 0xe3;
    pub const LEFT: u8 = 0xe4;
    pub const RIGHT: u8 = 0xe5;
    pub const KILL: u8 = 0x15;
    pub const BACKSPACE: u8 = 0x7f;
    pub const EOF: u8 = 0x04;
    pub const PROCDUMP: u8 = 0x10;
}

/// Screen model replaying glyphs: one row per line, `\n` starts a new row.
pub struct MockScreen {
    rows: Vec<Vec<u8>>,
    pub column: usize,
    pub glyphs: usize,
}

impl MockScreen {
    pub fn new() -> Self {
        Self {
            rows: vec![Vec::new()],
            column: 0,
            glyphs: 0,
        }
    }

    fn cell(&mut self, column: usize) -> &mut u8 {
        let row = self.rows.last_mut().unwrap();

        if row.len() <= column {
            row.resize(column + 1, b' ');
        }

        &mut row[column]
    }

    fn move_left(&mut self) {
        assert!(self.column > 0, "cursor moved left of column 0");
        self.column -= 1;
    }

    pub fn advance(&mut self, glyph: Glyph) {
        self.glyphs += 1;

        match glyph {
            Glyph::Char(b'\n') => {
                self.rows.push(Vec::new());
                self.column = 0;
            }
            Glyph::Char(byte) => {
                *self.cell(self.column) = byte;
                self.column += 1;
            }
            Glyph::EraseLast => {
                self.move_left();
                *self.cell(self.column) = b' ';
            }
            Glyph::CursorLeft => self.move_left(),
        }
    }

    fn row_as_string(row: &[u8]) -> String {
        String::from_utf8(row.to_vec())
            .unwrap()
            .trim_end_matches(' ')
            .into()
    }

    /// Row holding the cursor, without trailing blanks
    pub fn current_line(&self) -> String {
        Self::row_as_string(self.rows.last().unwrap())
    }

    pub fn screen_as_string(&self) -> String {
        self.rows
            .iter()
            .map(|row| Self::row_as_string(row))
            .collect::<Vec<String>>()
            .join("\n")
    }
}

impl RenderSink for MockScreen {
    fn emit(&mut self, glyph: Glyph) {
        self.advance(glyph);
    }
}

pub trait AsKeyVec {
    fn as_key_vec(self) -> Vec<u8>;
}

impl AsKeyVec for &str {
    fn as_key_vec(self) -> Vec<u8> {
        self.bytes().collect()
    }
}

impl AsKeyVec for u8 {
    fn as_key_vec(self) -> Vec<u8> {
        vec![self]
    }
}

impl AsKeyVec for ControlKey {
    fn as_key_vec(self) -> Vec<u8> {
        vec![self.into()]
    }
}

impl<const N: usize> AsKeyVec for [u8; N] {
    fn as_key_vec(self) -> Vec<u8> {
        self.to_vec()
    }
}

impl<const N: usize> AsKeyVec for [ControlKey; N] {
    fn as_key_vec(self) -> Vec<u8> {
        self.into_iter().map(|c| c.into()).collect()
    }
}

impl<const N: usize> AsKeyVec for [&str; N] {
    fn as_key_vec(self) -> Vec<u8> {
        self.into_iter().flat_map(|s| s.bytes()).collect()
    }
}

/// Builder for mixed key sequences
pub struct KeySequence {
    items: Vec<u8>,
}

impl KeySequence {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn add(mut self, input: impl AsKeyVec) -> Self {
        self.items.extend(input.as_key_vec());
        self
    }

    pub fn submit(self) -> Self {
        self.add(LineFeed)
    }
}

impl AsKeyVec for KeySequence {
    fn as_key_vec(self) -> Vec<u8> {
        self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_screen() {
        let mut screen = MockScreen::new();

        for &b in b"abc" {
            screen.emit(Glyph::Char(b));
        }
        screen.emit(Glyph::EraseLast);
        screen.emit(Glyph::CursorLeft);
        screen.emit(Glyph::Char(b'X'));

        assert_eq!(screen.current_line(), "aX");
        assert_eq!(screen.column, 2);

        screen.emit(Glyph::Char(b'\n'));
        assert_eq!(screen.screen_as_string(), "aX\n");
        assert_eq!(screen.glyphs, 7);
    }

    #[test]
    fn key_sequences() {
        let keys = KeySequence::new()
            .add("ab")
            .add([keys::LEFT; 2])
            .add(CtrlU)
            .submit()
            .as_key_vec();

        assert_eq!(keys, [b'a', b'b', 0xe4, 0xe4, 0x15, b'\n']);
    }
}
