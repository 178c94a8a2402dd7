//! Error types for completion cells
//!
//! Two families of errors exist and they never mix:
//!
//! | Type | Returned by | Meaning |
//! |------|-------------|---------|
//! | [`TransitionError`] | `succeed`, `fail`, `cancel` | contract violation by the caller |
//! | [`WaitError`] | `get`, `get_timeout`, awaiters | the outcome seen by a waiter |
//!
//! Structural errors are only ever returned to the direct caller of the
//! violating operation. They are never delivered through callbacks.

use thiserror::Error;

/// Rejection of a terminal transition on a cell that already left `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum TransitionError {
    /// The cell already succeeded or failed
    #[error("future is already completed")]
    AlreadyCompleted,

    /// The cell was canceled
    #[error("future is already canceled")]
    AlreadyCanceled,
}

impl TransitionError {
    /// Check if the rejected cell had been canceled.
    pub fn is_canceled(&self) -> bool {
        matches!(self, TransitionError::AlreadyCanceled)
    }
}

/// Result type for terminal transitions.
pub type TransitionResult<T = ()> = std::result::Result<T, TransitionError>;

/// Outcome reported to a waiter that did not receive a value.
///
/// `E` is the caller-supplied application error carried by a failed cell.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WaitError<E> {
    /// The cell was canceled before it produced a value
    #[error("future was canceled")]
    Canceled,

    /// A time-bounded wait gave up before the cell completed
    #[error("timed out waiting for future")]
    Timeout,

    /// The cell failed with an application error
    #[error("future failed: {0}")]
    Failed(E),
}

impl<E> WaitError<E> {
    /// Check if this is a cancellation.
    pub fn is_canceled(&self) -> bool {
        matches!(self, WaitError::Canceled)
    }

    /// Check if this is a timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, WaitError::Timeout)
    }

    /// Borrow the application error, if any.
    pub fn failure(&self) -> Option<&E> {
        match self {
            WaitError::Failed(e) => Some(e),
            _ => None,
        }
    }

    /// Take the application error, if any.
    pub fn into_failure(self) -> Option<E> {
        match self {
            WaitError::Failed(e) => Some(e),
            _ => None,
        }
    }

    /// Map the application error, keeping `Canceled` and `Timeout` as they are.
    pub fn map_failure<F, O>(self, op: O) -> WaitError<F>
    where
        O: FnOnce(E) -> F,
    {
        match self {
            WaitError::Canceled => WaitError::Canceled,
            WaitError::Timeout => WaitError::Timeout,
            WaitError::Failed(e) => WaitError::Failed(op(e)),
        }
    }
}

/// Result type for waits on a cell.
pub type WaitResult<T, E> = std::result::Result<T, WaitError<E>>;
