//! Key dispatch

use crate::editor::{Edit, LineEditor};
use crate::input::{Key, EOF_MARKER};
use crate::render::RenderSink;

/// Outcome of dispatching one key
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Dispatch {
    Changed,
    Unchanged,
    /// A line was handed to the reader.
    Committed,
    /// The key asks for a process listing, to be done outside the lock.
    ProcessList,
    Ignored,
}

impl From<Edit> for Dispatch {
    fn from(edit: Edit) -> Self {
        match edit {
            Edit::Changed => Dispatch::Changed,
            Edit::Unchanged => Dispatch::Unchanged,
            Edit::Committed => Dispatch::Committed,
        }
    }
}

/// Run the editing operation bound to `key`.
pub fn dispatch<S: RenderSink, const C: usize, const N: usize>(
    editor: &mut LineEditor<'_, S, C, N>,
    key: Key,
) -> Dispatch {
    let result = match key {
        Key::Printable(byte) => editor.insert_printable(byte).into(),
        Key::Backspace => editor.backspace().into(),
        Key::KillLine => editor.kill_line().into(),
        Key::CursorLeft => editor.move_left().into(),
        Key::CursorRight => editor.move_right().into(),
        Key::HistoryPrev => editor.history_prev().into(),
        Key::HistoryNext => editor.history_next().into(),
        Key::Submit => editor.submit(b'\n').into(),
        Key::EndOfInput => editor.submit(EOF_MARKER).into(),
        Key::ProcessListRequest => Dispatch::ProcessList,
        Key::Ignored(_) => Dispatch::Ignored,
    };

    log::trace!("{:?} -> {:?}", key, result);

    result
}

/// Summary of one producer pass over a key source
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub struct Interrupt {
    /// Keys taken from the source
    pub keys: usize,
    /// Lines committed to the reader
    pub lines: usize,
    /// A process listing was requested. The caller runs it after the
    /// console lock has been released.
    pub process_list: bool,
}

impl Interrupt {
    pub(crate) fn record(&mut self, dispatch: Dispatch) {
        self.keys += 1;

        match dispatch {
            Dispatch::Committed => self.lines += 1,
            Dispatch::ProcessList => self.process_list = true,
            _ => (),
        }
    }
}
