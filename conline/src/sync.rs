//! Locking and blocking between the key producer and line readers.
//!
//! The producer runs in interrupt context and must never sleep, so the
//! lock is a spin lock. Readers sleep on a [`WaitQueue`] outside the lock.
//! A reader takes a ticket while still holding the lock and sleeps only
//! until the queue has moved past that ticket, so a wake-up issued between
//! releasing the lock and going to sleep is never lost.

use core::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use spin::{Mutex, MutexGuard};

use crate::error::ConsoleError;

/// Sleep/wake mechanism for blocked readers
pub trait WaitQueue {
    /// Current generation. Taken with the console lock held.
    fn ticket(&self) -> usize;

    /// Block until the queue has been woken after `ticket` was taken. May
    /// return spuriously.
    fn sleep(&self, ticket: usize);

    fn wake_all(&self);
}

/// Busy-waiting queue for `no_std` targets
pub struct SpinQueue {
    generation: AtomicUsize,
}

impl SpinQueue {
    pub const fn new() -> Self {
        Self {
            generation: AtomicUsize::new(0),
        }
    }
}

impl Default for SpinQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl WaitQueue for SpinQueue {
    fn ticket(&self) -> usize {
        self.generation.load(Ordering::SeqCst)
    }

    fn sleep(&self, ticket: usize) {
        while self.generation.load(Ordering::SeqCst) == ticket {
            core::hint::spin_loop();
        }
    }

    fn wake_all(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(any(test, feature = "std"))]
pub mod std_sync {
    //! Wait queue for hosted targets. Requires feature `std`.

    use std::sync::{Condvar, Mutex, PoisonError};

    use super::WaitQueue;

    /// Wait queue parking readers on a [`Condvar`]
    pub struct CondvarQueue {
        generation: Mutex<usize>,
        condvar: Condvar,
    }

    impl CondvarQueue {
        pub const fn new() -> Self {
            Self {
                generation: Mutex::new(0),
                condvar: Condvar::new(),
            }
        }
    }

    impl Default for CondvarQueue {
        fn default() -> Self {
            Self::new()
        }
    }

    impl WaitQueue for CondvarQueue {
        fn ticket(&self) -> usize {
            *self
                .generation
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
        }

        fn sleep(&self, ticket: usize) {
            let mut generation = self
                .generation
                .lock()
                .unwrap_or_else(PoisonError::into_inner);

            while *generation == ticket {
                generation = self
                    .condvar
                    .wait(generation)
                    .unwrap_or_else(PoisonError::into_inner);
            }
        }

        fn wake_all(&self) {
            let mut generation = self
                .generation
                .lock()
                .unwrap_or_else(PoisonError::into_inner);

            *generation = generation.wrapping_add(1);
            self.condvar.notify_all();
        }
    }
}

/// Termination check for a blocked reader
///
/// Polled each time the reader is about to sleep and after every wake-up.
pub trait Cancellation {
    fn is_cancelled(&self) -> bool;
}

impl Cancellation for AtomicBool {
    fn is_cancelled(&self) -> bool {
        self.load(Ordering::SeqCst)
    }
}

impl<F: Fn() -> bool> Cancellation for F {
    fn is_cancelled(&self) -> bool {
        self()
    }
}

/// Spin lock over shared state plus a wait queue for sleepers
pub struct SyncChannel<T, Q: WaitQueue> {
    state: Mutex<T>,
    queue: Q,
}

impl<T, Q: WaitQueue> SyncChannel<T, Q> {
    pub const fn new(state: T, queue: Q) -> Self {
        Self {
            state: Mutex::new(state),
            queue,
        }
    }

    pub fn lock(&self) -> MutexGuard<'_, T> {
        self.state.lock()
    }

    pub fn try_lock(&self) -> Option<MutexGuard<'_, T>> {
        self.state.try_lock()
    }

    /// Run `body` with the lock held.
    pub fn with_lock<R>(&self, body: impl FnOnce(&mut T) -> R) -> R {
        let mut guard = self.state.lock();
        body(&mut *guard)
    }

    /// Sleep while `blocked` holds, giving up the lock while asleep.
    /// Returns the reacquired guard once `blocked` is false, or
    /// [`ConsoleError::Cancelled`] if `cancel` fires first.
    pub fn wait_while<'a>(
        &'a self,
        mut guard: MutexGuard<'a, T>,
        cancel: &impl Cancellation,
        mut blocked: impl FnMut(&mut T) -> bool,
    ) -> Result<MutexGuard<'a, T>, ConsoleError> {
        while blocked(&mut *guard) {
            let ticket = self.queue.ticket();

            if cancel.is_cancelled() {
                return Err(ConsoleError::Cancelled);
            }

            drop(guard);
            self.queue.sleep(ticket);
            guard = self.state.lock();
        }

        Ok(guard)
    }

    /// Wake every sleeper so it re-checks its condition.
    pub fn notify(&self) {
        self.queue.wake_all();
    }

    pub fn queue(&self) -> &Q {
        &self.queue
    }
}
