//! In-place line editing.
//!
//! Every operation changes the [`InputLine`] first and then emits the
//! glyphs that bring the screen in line with it, one glyph per changed
//! cell, left to right.

use crate::history::HistoryRing;
use crate::line_buffer::InputLine;
use crate::render::{Glyph, RenderSink};

/// Effect of one editing operation
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Edit {
    Changed,
    Unchanged,
    /// The live line was handed to the reader.
    Committed,
}

/// Editing operations over borrowed console state
pub struct LineEditor<'a, S: RenderSink, const C: usize, const N: usize> {
    line: &'a mut InputLine<C>,
    history: &'a mut HistoryRing<N, C>,
    sink: &'a mut S,
}

impl<'a, S: RenderSink, const C: usize, const N: usize> LineEditor<'a, S, C, N> {
    pub fn new(
        line: &'a mut InputLine<C>,
        history: &'a mut HistoryRing<N, C>,
        sink: &'a mut S,
    ) -> Self {
        Self {
            line,
            history,
            sink,
        }
    }

    pub fn line(&self) -> &InputLine<C> {
        &*self.line
    }

    pub fn history(&self) -> &HistoryRing<N, C> {
        &*self.history
    }

    fn emit_n(&mut self, glyph: Glyph, count: usize) {
        for _ in 0..count {
            self.sink.emit(glyph);
        }
    }

    // Paint line bytes [from, to), relative to the line start.
    fn paint(&mut self, from: usize, to: usize) {
        for offset in from..to {
            self.sink.emit(Glyph::Char(self.line.byte_at(offset)));
        }
    }

    pub fn insert_printable(&mut self, byte: u8) -> Edit {
        if !self.line.insert(byte) {
            log::warn!("input buffer full, dropping key {:#04x}", byte);
            return Edit::Unchanged;
        }

        self.sink.emit(Glyph::Char(byte));

        let caret = self.line.caret();
        let tail = self.line.tail_len();

        self.paint(caret, caret + tail);
        self.emit_n(Glyph::CursorLeft, tail);

        if self.line.is_full() {
            log::debug!("input buffer full, committing {} bytes", self.line.len());
            self.commit(None)
        } else {
            Edit::Changed
        }
    }

    pub fn backspace(&mut self) -> Edit {
        if self.line.caret_at_start() {
            return Edit::Unchanged;
        }

        if self.line.caret_at_end() {
            self.line.remove_before_caret();
            self.sink.emit(Glyph::EraseLast);
            return Edit::Changed;
        }

        self.line.remove_before_caret();
        self.sink.emit(Glyph::CursorLeft);

        let caret = self.line.caret();
        let tail = self.line.tail_len();

        self.paint(caret, caret + tail);
        self.sink.emit(Glyph::Char(b' '));
        self.emit_n(Glyph::CursorLeft, tail + 1);

        Edit::Changed
    }

    /// Delete everything between the line start and the caret.
    pub fn kill_line(&mut self) -> Edit {
        if self.line.caret_at_start() {
            return Edit::Unchanged;
        }

        if self.line.caret_at_end() {
            while self.line.remove_before_caret() {
                self.sink.emit(Glyph::EraseLast);
            }

            return Edit::Changed;
        }

        let killed = self.line.caret();

        self.emit_n(Glyph::CursorLeft, killed);
        self.line.remove_before_line_start();

        let len = self.line.len();

        self.paint(0, len);
        self.emit_n(Glyph::Char(b' '), killed);
        self.emit_n(Glyph::CursorLeft, len + killed);

        Edit::Changed
    }

    pub fn move_left(&mut self) -> Edit {
        if self.line.move_caret_left() {
            self.sink.emit(Glyph::CursorLeft);
            Edit::Changed
        } else {
            Edit::Unchanged
        }
    }

    pub fn move_right(&mut self) -> Edit {
        match self.line.move_caret_right() {
            Some(byte) => {
                self.sink.emit(Glyph::Char(byte));
                Edit::Changed
            }
            None => Edit::Unchanged,
        }
    }

    pub fn history_prev(&mut self) -> Edit {
        let Self {
            line,
            history,
            sink,
        } = self;

        match history.browse_older(|draft| line.copy_line(draft)) {
            Some(entry) => {
                show(&mut **line, &mut **sink, entry);
                Edit::Changed
            }
            None => Edit::Unchanged,
        }
    }

    pub fn history_next(&mut self) -> Edit {
        let Self {
            line,
            history,
            sink,
        } = self;

        match history.browse_newer() {
            Some(entry) => {
                show(&mut **line, &mut **sink, entry);
                Edit::Changed
            }
            None => Edit::Unchanged,
        }
    }

    /// Finalize the live line, appending `terminator` when there is room
    /// for it. Only a newline terminator is echoed.
    pub fn submit(&mut self, terminator: u8) -> Edit {
        self.commit(Some(terminator))
    }

    fn commit(&mut self, terminator: Option<u8>) -> Edit {
        while let Some(byte) = self.line.move_caret_right() {
            self.sink.emit(Glyph::Char(byte));
        }

        if !self.line.is_empty() {
            let line = &*self.line;
            self.history.record_with(|entry| line.copy_line(entry));
        }

        if let Some(terminator) = terminator {
            if self.line.push_end(terminator) {
                if terminator == b'\n' {
                    self.sink.emit(Glyph::Char(b'\n'));
                }
            } else {
                log::warn!("input buffer full, committing line without terminator");
            }
        }

        log::debug!("committed line of {} bytes", self.line.len());

        self.line.commit();
        self.history.end_browse();

        Edit::Committed
    }
}

// Replace the shown line with `content`, leaving the caret at its end.
fn show<S: RenderSink, const C: usize>(line: &mut InputLine<C>, sink: &mut S, content: &[u8]) {
    let shown = line.len();

    for _ in 0..line.caret() {
        sink.emit(Glyph::CursorLeft);
    }

    let len = line.replace_line(content);

    for offset in 0..len {
        sink.emit(Glyph::Char(line.byte_at(offset)));
    }

    let stale = shown.saturating_sub(len);

    for _ in 0..stale {
        sink.emit(Glyph::Char(b' '));
    }
    for _ in 0..stale {
        sink.emit(Glyph::CursorLeft);
    }
}
