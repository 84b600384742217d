//! Console line discipline
//!
//! [`Console`] ties the input line, the history and the render sink
//! together behind one lock. The interrupt handler feeds it keys with
//! [`Console::interrupt`]; readers block in [`Console::read_line`] until a
//! line has been committed.

use core::fmt;
use core::sync::atomic::{AtomicBool, Ordering};

use spin::MutexGuard;

use crate::dispatch::{dispatch, Dispatch, Interrupt};
use crate::editor::LineEditor;
use crate::error::{ConsoleError, HistoryError, InvariantViolation};
use crate::history::{HistoryRing, HISTORY_CAPACITY};
use crate::input::{Key, KeySource, EOF_MARKER};
use crate::line_buffer::{InputLine, INPUT_CAPACITY};
use crate::render::{Glyph, RenderSink};
use crate::sync::{Cancellation, SpinQueue, SyncChannel, WaitQueue};

/// State guarded by the console lock
pub struct ConsoleState<S: RenderSink, const C: usize, const N: usize> {
    pub line: InputLine<C>,
    pub history: HistoryRing<N, C>,
    pub sink: S,
}

impl<S: RenderSink, const C: usize, const N: usize> ConsoleState<S, C, N> {
    pub fn editor(&mut self) -> LineEditor<'_, S, C, N> {
        LineEditor::new(&mut self.line, &mut self.history, &mut self.sink)
    }
}

// Raw output straight to the sink, bypassing the line state.
struct SinkWriter<'a, S: RenderSink>(&'a mut S);

impl<'a, S: RenderSink> fmt::Write for SinkWriter<'a, S> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for byte in s.bytes() {
            self.0.emit(Glyph::Char(byte));
        }

        Ok(())
    }
}

/// Line-editing console
///
/// # Example
/// ```
/// use conline::{Console, KeyIter, SpinQueue, Glyph};
/// use core::sync::atomic::AtomicBool;
///
/// let console: Console<_, _> = Console::new(|_: Glyph| {}, SpinQueue::new());
///
/// console.interrupt(&mut KeyIter(b"ls -l\n".iter().copied()));
///
/// let mut line = [0; 128];
/// let len = console.read_line(&mut line, &AtomicBool::new(false)).unwrap();
///
/// assert_eq!(&line[..len], b"ls -l\n");
/// ```
pub struct Console<
    S: RenderSink,
    Q: WaitQueue = SpinQueue,
    const C: usize = INPUT_CAPACITY,
    const N: usize = HISTORY_CAPACITY,
> {
    channel: SyncChannel<ConsoleState<S, C, N>, Q>,
    halted: AtomicBool,
}

impl<S: RenderSink, Q: WaitQueue, const C: usize, const N: usize> Console<S, Q, C, N> {
    pub const fn new(sink: S, queue: Q) -> Self {
        Self {
            channel: SyncChannel::new(
                ConsoleState {
                    line: InputLine::new(),
                    history: HistoryRing::new(),
                    sink,
                },
                queue,
            ),
            halted: AtomicBool::new(false),
        }
    }

    pub fn is_halted(&self) -> bool {
        self.halted.load(Ordering::SeqCst)
    }

    fn check_halted(&self) -> Result<(), ConsoleError> {
        if self.is_halted() {
            Err(ConsoleError::Halted)
        } else {
            Ok(())
        }
    }

    /// Stop the console after an internal consistency failure.
    ///
    /// Readers blocked in [`Console::read_line`] return
    /// [`ConsoleError::Halted`] and later calls fail the same way.
    pub fn halt(&self, violation: InvariantViolation) -> ! {
        self.halted.store(true, Ordering::SeqCst);

        log::error!("console halted: {}", violation);

        if let Some(mut state) = self.channel.try_lock() {
            let _ = fmt::write(
                &mut SinkWriter(&mut state.sink),
                format_args!("console halted: {}\n", violation),
            );
        }

        self.channel.notify();

        panic!("console halted: {}", violation);
    }

    /// Handle pending keys. Called from the keyboard or UART interrupt.
    ///
    /// The whole pass runs under the console lock. A process listing
    /// request is only reported in the returned [`Interrupt`].
    pub fn interrupt(&self, keys: &mut impl KeySource) -> Interrupt {
        let mut summary = Interrupt::default();

        if self.is_halted() {
            return summary;
        }

        let mut state = self.channel.lock();
        let mut violation = state.line.check().err();

        if violation.is_none() {
            let mut editor = state.editor();

            while let Some(code) = keys.next_key() {
                let result = dispatch(&mut editor, Key::new(code));

                summary.record(result);

                if result == Dispatch::Committed {
                    self.channel.notify();
                }

                if let Err(err) = editor.line().check() {
                    violation = Some(err);
                    break;
                }
            }
        }

        drop(state);

        if let Some(violation) = violation {
            self.halt(violation);
        }

        if summary.lines > 0 {
            log::debug!("{} line(s) ready, waking readers", summary.lines);
        }

        summary
    }

    /// Read committed input into `dst`, blocking until a line is
    /// available.
    ///
    /// Returns at the end of a line, at end of input, when `dst` is full
    /// or when the committed input runs out after some bytes were
    /// delivered. An end-of-input marker following delivered bytes is left
    /// for the next call, which then returns 0.
    pub fn read_line(
        &self,
        dst: &mut [u8],
        cancel: &impl Cancellation,
    ) -> Result<usize, ConsoleError> {
        self.check_halted()?;

        if dst.is_empty() {
            return Ok(0);
        }

        let cancelled = || self.is_halted() || cancel.is_cancelled();

        let mut state = self
            .channel
            .wait_while(self.channel.lock(), &cancelled, |state| {
                !state.line.has_data()
            })
            .map_err(|err| if self.is_halted() { ConsoleError::Halted } else { err })?;

        let mut len = 0;

        while len < dst.len() {
            let byte = match state.line.pop_front() {
                Some(byte) => byte,
                None => break,
            };

            if byte == EOF_MARKER {
                if len > 0 {
                    state.line.unread();
                }
                break;
            }

            dst[len] = byte;
            len += 1;

            if byte == b'\n' {
                break;
            }
        }

        if !state.line.has_data() {
            state.line.rebase();
        }

        self.release_checked(state)?;

        Ok(len)
    }

    fn release_checked(
        &self,
        state: MutexGuard<'_, ConsoleState<S, C, N>>,
    ) -> Result<(), ConsoleError> {
        let result = state.line.check();
        drop(state);

        match result {
            Ok(()) => Ok(()),
            Err(violation) => self.halt(violation),
        }
    }

    /// Wake blocked readers so they re-check their cancellation.
    pub fn wake_readers(&self) {
        self.channel.notify();
    }

    /// Write `bytes` to the sink as they are, without touching the line
    /// being edited.
    pub fn write(&self, bytes: &[u8]) -> Result<usize, ConsoleError> {
        self.check_halted()?;

        self.channel.with_lock(|state| {
            for &byte in bytes {
                state.sink.emit(Glyph::Char(byte));
            }
        });

        Ok(bytes.len())
    }

    /// Formatted output, written under one lock acquisition.
    pub fn print(&self, args: fmt::Arguments<'_>) {
        if self.is_halted() {
            return;
        }

        self.channel.with_lock(|state| {
            let _ = fmt::write(&mut SinkWriter(&mut state.sink), args);
        });
    }

    pub fn writer(&self) -> ConsoleWriter<'_, S, Q, C, N> {
        ConsoleWriter(self)
    }

    /// Copy the history entry `recency` lines back (0 is the newest) into
    /// `dst`, returning the copied length.
    pub fn history_at(&self, recency: usize, dst: &mut [u8]) -> Result<usize, HistoryError> {
        self.channel.with_lock(|state| {
            let entry = state.history.get(recency)?;
            let len = entry.len().min(dst.len());

            dst[..len].copy_from_slice(&entry.as_bytes()[..len]);

            Ok(len)
        })
    }

    pub fn with_lock<R>(&self, body: impl FnOnce(&mut ConsoleState<S, C, N>) -> R) -> R {
        self.channel.with_lock(body)
    }
}

/// [`fmt::Write`] adapter for [`Console::write`]
pub struct ConsoleWriter<'a, S: RenderSink, Q: WaitQueue, const C: usize, const N: usize>(
    &'a Console<S, Q, C, N>,
);

impl<'a, S: RenderSink, Q: WaitQueue, const C: usize, const N: usize> fmt::Write
    for ConsoleWriter<'a, S, Q, C, N>
{
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.0.write(s.as_bytes()).map(|_| ()).map_err(|_| fmt::Error)
    }
}
