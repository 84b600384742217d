//! Conline is a `#[no_std]` console line discipline for kernels and
//! bare-metal monitors. It sits between the keyboard or UART interrupt and
//! the processes reading the console, turning key codes into committed
//! lines.
//!
//! Features:
//! - In-place editing: insert and backspace anywhere in the line, cursor
//!   left/right, kill to line start
//! - Line history with a fixed number of entries, browsed with up/down
//! - No allocation, capacities are const generics
//! - Blocking readers with cancellation, without losing wake-ups
//! - Output agnostic, rendering goes through [`render::RenderSink`]
//!
//! The interrupt handler calls [`Console::interrupt`] with a
//! [`input::KeySource`] and readers call [`Console::read_line`]. Both
//! sides share one spin lock. Readers sleep on a [`sync::WaitQueue`],
//! which busy waits by default and uses a condition variable with the
//! `std` feature.
//!
//! Consoles can be built using [`builder::ConsoleBuilder`].
//!
//! # Example
//! ```
//! use conline::{builder::ConsoleBuilder, Console, Glyph, KeyIter};
//! use core::sync::atomic::AtomicBool;
//!
//! let mut echo = Vec::new();
//! let console: Console<_> = ConsoleBuilder::from_sink(|glyph: Glyph| {
//!     if let Glyph::Char(byte) = glyph {
//!         echo.push(byte);
//!     }
//! })
//! .build();
//!
//! // "lx", backspace, "s"
//! console.interrupt(&mut KeyIter([b'l', b'x', 0x7f, b's', b'\n'].into_iter()));
//!
//! let mut line = [0; 128];
//! let len = console.read_line(&mut line, &AtomicBool::new(false)).unwrap();
//! assert_eq!(&line[..len], b"ls\n");
//!
//! drop(console);
//! assert_eq!(echo, b"lxs\n");
//! ```

#![no_std]

#[cfg(any(test, doc, feature = "std"))]
#[macro_use]
extern crate std;

pub mod builder;
pub mod circular;
mod console;
pub mod dispatch;
pub mod editor;
pub mod error;
pub mod history;
pub mod input;
pub mod line_buffer;
pub mod render;
pub mod sync;

#[cfg(test)]
pub(crate) mod testlib;

pub use console::{Console, ConsoleState, ConsoleWriter};
pub use dispatch::{Dispatch, Interrupt};
pub use error::{ConsoleError, HistoryError, InvariantViolation};
pub use history::{HistoryRing, HISTORY_CAPACITY};
pub use input::{Key, KeyIter, KeySource, SerialKeys};
pub use line_buffer::{InputLine, INPUT_CAPACITY};
pub use render::{Glyph, RenderSink, SerialSink};
pub use sync::{Cancellation, SpinQueue, SyncChannel, WaitQueue};
