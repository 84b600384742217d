//! Key codes and key sources.

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Key codes with an editing meaning. Arrow codes are the ones the
/// keyboard driver produces for the extended scan codes.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Eq, PartialEq, Copy, Clone, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum ControlKey {
    CtrlD = 0x04,
    CtrlH = 0x08,
    LineFeed = 0x0a,
    CarriageReturn = 0x0d,
    CtrlP = 0x10,
    CtrlU = 0x15,
    DEL = 0x7f,
    Up = 0xe2,
    Down = 0xe3,
    Left = 0xe4,
    Right = 0xe5,
}

/// End-of-input marker as stored in the input line
pub const EOF_MARKER: u8 = ControlKey::CtrlD as u8;

/// Decoded key
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum Key {
    Printable(u8),
    Backspace,
    KillLine,
    CursorLeft,
    CursorRight,
    HistoryPrev,
    HistoryNext,
    Submit,
    EndOfInput,
    ProcessListRequest,
    Ignored(u8),
}

impl Key {
    pub fn new(code: u8) -> Self {
        match ControlKey::try_from(code) {
            Ok(control) => match control {
                ControlKey::CtrlD => Key::EndOfInput,
                ControlKey::CtrlH | ControlKey::DEL => Key::Backspace,
                ControlKey::LineFeed | ControlKey::CarriageReturn => Key::Submit,
                ControlKey::CtrlP => Key::ProcessListRequest,
                ControlKey::CtrlU => Key::KillLine,
                ControlKey::Up => Key::HistoryPrev,
                ControlKey::Down => Key::HistoryNext,
                ControlKey::Left => Key::CursorLeft,
                ControlKey::Right => Key::CursorRight,
            },
            Err(_) => match code {
                b'\t' | 0x20..=0x7e => Key::Printable(code),
                _ => Key::Ignored(code),
            },
        }
    }
}

impl From<u8> for Key {
    fn from(code: u8) -> Self {
        Self::new(code)
    }
}

/// Producer of pending key codes
///
/// Polled until it returns `None`, meaning no more keys are available right
/// now.
pub trait KeySource {
    fn next_key(&mut self) -> Option<u8>;
}

impl<F: FnMut() -> Option<u8>> KeySource for F {
    fn next_key(&mut self) -> Option<u8> {
        self()
    }
}

/// Key source over any byte iterator
pub struct KeyIter<I: Iterator<Item = u8>>(pub I);

impl<I: Iterator<Item = u8>> KeySource for KeyIter<I> {
    fn next_key(&mut self) -> Option<u8> {
        self.0.next()
    }
}

/// Key source reading a serial port while it reports pending data
pub struct SerialKeys<R: embedded_io::Read + embedded_io::ReadReady> {
    input: R,
}

impl<R: embedded_io::Read + embedded_io::ReadReady> SerialKeys<R> {
    pub fn new(input: R) -> Self {
        Self { input }
    }

    pub fn take(self) -> R {
        self.input
    }
}

impl<R: embedded_io::Read + embedded_io::ReadReady> KeySource for SerialKeys<R> {
    fn next_key(&mut self) -> Option<u8> {
        use embedded_io::Error;

        match self.input.read_ready() {
            Ok(true) => (),
            Ok(false) => return None,
            Err(err) => {
                log::warn!("key source failed: {:?}", err.kind());
                return None;
            }
        }

        let mut buf = [0; 1];

        match self.input.read(&mut buf) {
            Ok(1) => Some(buf[0]),
            Ok(_) => None,
            Err(err) => {
                log::warn!("key source failed: {:?}", err.kind());
                None
            }
        }
    }
}

#[cfg(any(test, feature = "embedded"))]
pub mod embedded {
    //! Key source for non-blocking reads. Requires feature `embedded`.

    use super::KeySource;

    /// Wraps a non-blocking read, e.g. a UART receive register.
    /// `WouldBlock` and errors both end the poll.
    pub struct NbKeys<F>(pub F);

    impl<E, F> KeySource for NbKeys<F>
    where
        F: FnMut() -> nb::Result<u8, E>,
    {
        fn next_key(&mut self) -> Option<u8> {
            match (self.0)() {
                Ok(byte) => Some(byte),
                Err(nb::Error::WouldBlock) => None,
                Err(nb::Error::Other(_)) => {
                    log::warn!("key source failed");
                    None
                }
            }
        }
    }
}
