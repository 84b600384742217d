//! Line history

use crate::circular::CircularBuffer;
use crate::error::HistoryError;
use crate::line_buffer::INPUT_CAPACITY;

/// Default number of remembered lines
pub const HISTORY_CAPACITY: usize = 16;

/// Snapshot of a finalized line
#[derive(Copy, Clone)]
pub struct HistoryEntry<const C: usize> {
    bytes: [u8; C],
    len: usize,
}

impl<const C: usize> HistoryEntry<C> {
    const EMPTY: Self = Self {
        bytes: [0; C],
        len: 0,
    };

    fn fill(&mut self, f: impl FnOnce(&mut [u8]) -> usize) {
        self.len = f(&mut self.bytes).min(C);
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Bounded FIFO of past lines with a browse cursor.
///
/// Browsing starts with the first [`HistoryRing::browse_older`], which
/// saves the unsent line as a draft, and ends when
/// [`HistoryRing::browse_newer`] steps past the newest entry, handing the
/// draft back.
pub struct HistoryRing<const N: usize = HISTORY_CAPACITY, const C: usize = INPUT_CAPACITY> {
    entries: CircularBuffer<HistoryEntry<C>, N>,
    // Lines recorded since creation; the newest sits at `recorded - 1`.
    recorded: usize,
    len: usize,
    position: Option<usize>,
    draft: HistoryEntry<C>,
}

impl<const N: usize, const C: usize> Default for HistoryRing<N, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize, const C: usize> HistoryRing<N, C> {
    pub const fn new() -> Self {
        Self {
            entries: CircularBuffer::new(HistoryEntry::EMPTY),
            recorded: 0,
            len: 0,
            position: None,
            draft: HistoryEntry::EMPTY,
        }
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Store `content` as the newest entry, evicting the oldest when full.
    pub fn record(&mut self, content: &[u8]) {
        self.record_with(|entry| {
            let len = content.len().min(entry.len());
            entry[..len].copy_from_slice(&content[..len]);
            len
        });
    }

    /// Like [`HistoryRing::record`], with `fill` writing the content into
    /// the entry and returning its length.
    pub fn record_with(&mut self, fill: impl FnOnce(&mut [u8]) -> usize) {
        if N == 0 {
            return;
        }

        if self.len == N {
            log::debug!("history full, evicting oldest entry");
        } else {
            self.len += 1;
        }

        let entry = self.entries.slot_mut(self.recorded);
        entry.fill(fill);
        log::debug!("recorded history entry of {} bytes", entry.len());

        self.recorded += 1;
    }

    /// Entry `offset` steps back from the newest one.
    pub fn get(&self, offset: usize) -> Result<&HistoryEntry<C>, HistoryError> {
        if offset >= N {
            Err(HistoryError::OutsideCapacity {
                index: offset,
                capacity: N,
            })
        } else if offset >= self.len {
            Err(HistoryError::NotRecorded {
                index: offset,
                recorded: self.len,
            })
        } else {
            Ok(self.entries.slot(self.recorded - 1 - offset))
        }
    }

    /// Entries from newest to oldest
    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry<C>> + '_ {
        (0..self.len).filter_map(|offset| self.get(offset).ok())
    }

    pub fn is_browsing(&self) -> bool {
        self.position.is_some()
    }

    /// Position of the entry being shown, counted back from the newest
    pub fn position(&self) -> Option<usize> {
        self.position
    }

    /// Step one entry older. On the first step `save_draft` is called to
    /// copy the unsent line into the draft slot. Returns `None` when there
    /// is nothing older to show.
    pub fn browse_older(&mut self, save_draft: impl FnOnce(&mut [u8]) -> usize) -> Option<&[u8]> {
        let position = match self.position {
            None if self.is_empty() => return None,
            None => {
                self.draft.fill(save_draft);
                0
            }
            Some(position) if position + 1 < self.len => position + 1,
            Some(_) => return None,
        };

        self.position = Some(position);
        self.get(position).ok().map(|entry| entry.as_bytes())
    }

    /// Step one entry newer. Stepping past the newest entry ends browsing
    /// and returns the draft. Returns `None` when not browsing.
    pub fn browse_newer(&mut self) -> Option<&[u8]> {
        match self.position? {
            0 => {
                self.position = None;
                Some(self.draft.as_bytes())
            }
            position => {
                self.position = Some(position - 1);
                self.get(position - 1).ok().map(|entry| entry.as_bytes())
            }
        }
    }

    pub fn end_browse(&mut self) {
        self.position = None;
    }
}
