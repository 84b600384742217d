//! Error types

use core::fmt;

/// Errors crossing the console boundary
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ConsoleError {
    /// The reader's owning context was marked for termination while it
    /// waited for a line.
    Cancelled,
    /// The console hit an internal consistency failure and stopped.
    Halted,
}

impl fmt::Display for ConsoleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConsoleError::Cancelled => f.write_str("read cancelled"),
            ConsoleError::Halted => f.write_str("console halted"),
        }
    }
}

impl embedded_io::Error for ConsoleError {
    fn kind(&self) -> embedded_io::ErrorKind {
        match *self {
            ConsoleError::Cancelled => embedded_io::ErrorKind::Interrupted,
            ConsoleError::Halted => embedded_io::ErrorKind::Other,
        }
    }
}

/// History lookup failure
///
/// An index can be structurally invalid (the ring could never hold an
/// entry that old) or merely unpopulated (the ring has not yet recorded that
/// many lines).
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum HistoryError {
    OutsideCapacity { index: usize, capacity: usize },
    NotRecorded { index: usize, recorded: usize },
}

impl fmt::Display for HistoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            HistoryError::OutsideCapacity { index, capacity } => write!(
                f,
                "history index {} outside capacity {}",
                index, capacity
            ),
            HistoryError::NotRecorded { index, recorded } => write!(
                f,
                "history index {} not recorded ({} entries)",
                index, recorded
            ),
        }
    }
}

impl embedded_io::Error for HistoryError {
    fn kind(&self) -> embedded_io::ErrorKind {
        match *self {
            HistoryError::OutsideCapacity { .. } => embedded_io::ErrorKind::InvalidInput,
            HistoryError::NotRecorded { .. } => embedded_io::ErrorKind::NotFound,
        }
    }
}

/// Broken relationship between the input line indices
///
/// Expected order is `r <= w <= e <= rightmost <= r + capacity`. Any of these
/// is a programming error and halts the console.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum InvariantViolation {
    ReadPastCommit { r: usize, w: usize },
    CommitPastCaret { w: usize, e: usize },
    CaretPastEnd { e: usize, rightmost: usize },
    Overflow { r: usize, rightmost: usize, capacity: usize },
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            InvariantViolation::ReadPastCommit { r, w } => {
                write!(f, "read index {} past commit index {}", r, w)
            }
            InvariantViolation::CommitPastCaret { w, e } => {
                write!(f, "commit index {} past caret {}", w, e)
            }
            InvariantViolation::CaretPastEnd { e, rightmost } => {
                write!(f, "caret {} past end of line {}", e, rightmost)
            }
            InvariantViolation::Overflow {
                r,
                rightmost,
                capacity,
            } => write!(
                f,
                "line end {} more than {} bytes past read index {}",
                rightmost, capacity, r
            ),
        }
    }
}

#[cfg(feature = "std")]
mod feature_std {
    use super::*;

    impl std::error::Error for ConsoleError {}
    impl std::error::Error for HistoryError {}
    impl std::error::Error for InvariantViolation {}
}
