//! Consumer side of a completion cell
//!
//! # Delivery Rules
//!
//! | Cell state when subscribing | `on_success` | `on_fail` | `on_complete` |
//! |-----------------------------|--------------|-----------|---------------|
//! | Pending | queued | queued | queued |
//! | Succeeded | delivered now | dropped | delivered now |
//! | Failed | dropped | delivered now | delivered now |
//! | Canceled | dropped | dropped | dropped |
//!
//! "Delivered now" still means off the caller's stack, on the cell's spawner.
//! Canceling a cell drops every queued callback without running it; waiters
//! learn about cancellation through `get`, `is_canceled` or the awaiter.

use crate::awaiter::FutureAwaiter;
use crate::cell::Cell;
use crate::signal::CancelSignal;
use manana_core::{FutureStatus, TransitionResult, WaitResult};
use std::fmt;
use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;

/// Handle that observes a cell.
///
/// Clones share the same cell.
pub struct Future<T, E> {
    cell: Arc<Cell<T, E>>,
}

impl<T, E> Future<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    pub(crate) fn from_cell(cell: Arc<Cell<T, E>>) -> Self {
        Self { cell }
    }

    pub(crate) fn cell(&self) -> &Arc<Cell<T, E>> {
        &self.cell
    }

    // =========================================================================
    // Callbacks
    // =========================================================================

    /// Run `callback` with the value once the cell succeeds.
    pub fn on_success<F>(&self, callback: F) -> &Self
    where
        F: FnOnce(T) + Send + 'static,
    {
        self.cell.on_success(Box::new(callback));
        self
    }

    /// Run `callback` with the error once the cell fails.
    ///
    /// Never runs for a canceled cell.
    pub fn on_fail<F>(&self, callback: F) -> &Self
    where
        F: FnOnce(E) + Send + 'static,
    {
        self.cell.on_fail(Box::new(callback));
        self
    }

    /// Run `callback` once the cell succeeds or fails.
    ///
    /// Never runs for a canceled cell.
    pub fn on_complete<F>(&self, callback: F) -> &Self
    where
        F: FnOnce(Result<T, E>) + Send + 'static,
    {
        self.cell.on_complete(Box::new(callback));
        self
    }

    // =========================================================================
    // Waiting
    // =========================================================================

    /// Block until the cell reaches a terminal state.
    ///
    /// Blocks forever if the cell never completes. Use
    /// [`get_timeout`](Self::get_timeout) for a bounded wait.
    pub fn get(&self) -> WaitResult<T, E> {
        self.cell.wait()
    }

    /// Block until the cell reaches a terminal state or `timeout` elapses.
    ///
    /// A timeout only stops this caller from waiting; the cell and the work
    /// behind it are left untouched.
    pub fn get_timeout(&self, timeout: Duration) -> WaitResult<T, E> {
        self.cell.wait_timeout(timeout)
    }

    /// Outcome if the cell is terminal, `None` while it is pending.
    pub fn try_get(&self) -> Option<WaitResult<T, E>> {
        self.cell.try_get()
    }

    /// `std::future::Future` resolving to the same outcome as [`get`](Self::get).
    pub fn awaiter(&self) -> FutureAwaiter<T, E> {
        FutureAwaiter::new(Arc::clone(&self.cell))
    }

    // =========================================================================
    // Status and cancellation
    // =========================================================================

    /// Check if the cell reached any terminal state, including `Canceled`.
    pub fn is_completed(&self) -> bool {
        self.cell.status().is_completed()
    }

    /// Check if the cell was canceled.
    pub fn is_canceled(&self) -> bool {
        self.cell.status().is_canceled()
    }

    /// Current status of the cell.
    pub fn status(&self) -> FutureStatus {
        self.cell.status()
    }

    /// Cancel the cell. See [`Promise::cancel`](crate::Promise::cancel).
    pub fn cancel(&self) -> TransitionResult {
        self.cell.cancel()
    }

    /// The cell's cancellation signal.
    pub fn cancel_signal(&self) -> CancelSignal {
        self.cell.signal().clone()
    }

    /// Label given to the cell at construction, if any.
    pub fn label(&self) -> Option<&str> {
        self.cell.label()
    }
}

impl<T, E> Clone for Future<T, E> {
    fn clone(&self) -> Self {
        Self {
            cell: Arc::clone(&self.cell),
        }
    }
}

impl<T, E> IntoFuture for Future<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    type Output = WaitResult<T, E>;
    type IntoFuture = FutureAwaiter<T, E>;

    fn into_future(self) -> Self::IntoFuture {
        FutureAwaiter::new(self.cell)
    }
}

impl<T, E> fmt::Debug for Future<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Future")
            .field("label", &self.cell.label())
            .field("status", &self.cell.status())
            .finish()
    }
}
