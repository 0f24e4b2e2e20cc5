//! Error types for cursor operations.

use thiserror::Error;

/// Errors returned by [`Cursor`](crate::list::cursor::Cursor) operations.
///
/// Every check happens before the list or the cursor is touched, so an
/// operation that returns an error leaves both exactly as they were.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The list was structurally modified since this cursor last saw it.
    ///
    /// The cursor is stale for good: drop it and obtain a fresh one.
    #[error("list was modified since the cursor was synchronized (expected mod count {expected}, found {found})")]
    ConcurrentModification {
        /// Modification count the cursor was synchronized to
        expected: u64,
        /// Modification count of the list at the time of the call
        found: u64,
    },

    /// There is no element in the requested direction.
    #[error("no element in the requested direction")]
    NoSuchElement,

    /// There is no traversed element pending for `remove` or `set`.
    #[error("no element to update: call `next` or `previous` first, and do not remove twice or after `add`")]
    IllegalState,
}

/// A `Result` alias with [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;
