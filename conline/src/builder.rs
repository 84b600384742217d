//! Builder for consoles

use crate::console::Console;
use crate::render::RenderSink;
use crate::sync::{SpinQueue, WaitQueue};

/// Builder for [`Console`].
///
/// # Example
/// ```
/// use conline::{builder::ConsoleBuilder, Console, Glyph, SpinQueue};
///
/// let console: Console<_, SpinQueue, 64, 8> = ConsoleBuilder::from_sink(|_: Glyph| {})
///     .with_wait_queue(SpinQueue::new())
///     .build();
/// ```
pub struct ConsoleBuilder<S: RenderSink, Q: WaitQueue> {
    sink: S,
    queue: Q,
}

impl<S: RenderSink> ConsoleBuilder<S, SpinQueue> {
    /// Create builder for console rendering to `sink`, with readers busy
    /// waiting on a [`SpinQueue`].
    pub fn from_sink(sink: S) -> Self {
        ConsoleBuilder {
            sink,
            queue: SpinQueue::new(),
        }
    }
}

impl<S: RenderSink, Q: WaitQueue> ConsoleBuilder<S, Q> {
    /// Replace the wait queue, e.g. with
    /// [`CondvarQueue`](crate::sync::std_sync::CondvarQueue) on hosted
    /// targets.
    pub fn with_wait_queue<Q2: WaitQueue>(self, queue: Q2) -> ConsoleBuilder<S, Q2> {
        ConsoleBuilder {
            sink: self.sink,
            queue,
        }
    }

    /// Build [`Console`] with input capacity `C` and history capacity `N`.
    /// Is equivalent of calling [`Console::new()`].
    pub fn build<const C: usize, const N: usize>(self) -> Console<S, Q, C, N> {
        Console::new(self.sink, self.queue)
    }
}
