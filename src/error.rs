//! Unified error type for Manana.
//!
//! The crates underneath use two precise error types: `TransitionError` for
//! rejected `succeed` / `fail` / `cancel` calls and `WaitError<E>` for what a
//! waiter observes. This module folds both into one type for applications
//! that just want `?` to work, at the cost of rendering application errors
//! to text.

use manana_core::{TransitionError, WaitError};
use std::fmt::Display;
use thiserror::Error;

/// All Manana errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A terminal transition was rejected
    #[error("transition rejected: {0}")]
    Transition(#[from] TransitionError),

    /// The future was canceled
    #[error("future was canceled")]
    Canceled,

    /// A bounded wait timed out
    #[error("timed out waiting for future")]
    Timeout,

    /// The future failed with an application error
    #[error("future failed: {0}")]
    Failed(String),
}

/// Result type for Manana operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check if this is a timeout.
    ///
    /// A timed-out wait may be retried: the future itself is unaffected.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout)
    }

    /// Check if the future was canceled, either observed by a waiter or as
    /// the reason a transition was rejected.
    pub fn is_canceled(&self) -> bool {
        matches!(
            self,
            Error::Canceled | Error::Transition(TransitionError::AlreadyCanceled)
        )
    }

    /// Check if this is a contract violation by the caller.
    pub fn is_transition(&self) -> bool {
        matches!(self, Error::Transition(_))
    }
}

// Convert from waiter outcomes
impl<E: Display> From<WaitError<E>> for Error {
    fn from(e: WaitError<E>) -> Self {
        match e {
            WaitError::Canceled => Error::Canceled,
            WaitError::Timeout => Error::Timeout,
            WaitError::Failed(inner) => Error::Failed(inner.to_string()),
        }
    }
}
