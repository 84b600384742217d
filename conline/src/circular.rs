//! Wrap-aware storage shared by the input line and the history ring.
//!
//! Callers address slots with logical, monotonically increasing indices and
//! never reduce them modulo the capacity themselves.

use core::ops::Range;

#[cfg_attr(test, derive(Debug, PartialEq, Eq))]
enum CircularRange {
    Consecutive(Range<usize>),
    Split(Range<usize>, Range<usize>),
}

impl CircularRange {
    fn new(start: usize, end: usize, capacity: usize) -> Self {
        assert!(start <= end);
        assert!(end - start <= capacity);

        let len = end - start;

        if len == 0 {
            return Self::Consecutive(0..0);
        }

        let first = start % capacity;

        if first + len <= capacity {
            Self::Consecutive(first..first + len)
        } else {
            Self::Split(first..capacity, 0..(first + len - capacity))
        }
    }

    fn get_ranges(&self) -> (Range<usize>, Range<usize>) {
        match self {
            CircularRange::Consecutive(range) => (range.clone(), 0..0),
            CircularRange::Split(range1, range2) => (range1.clone(), range2.clone()),
        }
    }
}

/// Fixed capacity array addressed by unwrapped indices
pub struct CircularBuffer<T, const C: usize> {
    slots: [T; C],
}

impl<T: Copy, const C: usize> CircularBuffer<T, C> {
    pub const fn new(fill: T) -> Self {
        Self { slots: [fill; C] }
    }
}

impl<T, const C: usize> CircularBuffer<T, C> {
    pub const fn capacity(&self) -> usize {
        C
    }

    fn wrap(index: usize) -> usize {
        index % C
    }

    pub fn slot(&self, index: usize) -> &T {
        &self.slots[Self::wrap(index)]
    }

    pub fn slot_mut(&mut self, index: usize) -> &mut T {
        &mut self.slots[Self::wrap(index)]
    }

    /// Slots `[start, end)` as at most two consecutive slices.
    pub fn slices(&self, start: usize, end: usize) -> (&[T], &[T]) {
        let (range1, range2) = CircularRange::new(start, end, C).get_ranges();

        (&self.slots[range1], &self.slots[range2])
    }
}

impl<T: Copy, const C: usize> CircularBuffer<T, C> {
    pub fn get(&self, index: usize) -> T {
        *self.slot(index)
    }

    pub fn set(&mut self, index: usize, value: T) {
        *self.slot_mut(index) = value;
    }

    /// Copy `[src, src + len)` to `[dst, dst + len)`. Overlapping spans are
    /// handled in either direction.
    pub fn copy_within(&mut self, src: usize, dst: usize, len: usize) {
        if dst > src {
            for i in (0..len).rev() {
                self.set(dst + i, self.get(src + i));
            }
        } else {
            for i in 0..len {
                self.set(dst + i, self.get(src + i));
            }
        }
    }
}
