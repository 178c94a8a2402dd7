use crate::cell::Cell;
use manana_core::WaitResult;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

/// Future that waits for a cell to reach a terminal state.
///
/// Resolves to the same outcome a blocking `get` would return, including
/// `WaitError::Canceled` for a canceled cell. Can be polled repeatedly and
/// used in `tokio::select!`; waker deduplication inside the cell lock keeps
/// repeated polls from growing the waker list.
#[must_use = "futures do nothing unless polled"]
pub struct FutureAwaiter<T, E> {
    cell: Arc<Cell<T, E>>,
}

impl<T, E> FutureAwaiter<T, E> {
    pub(crate) fn new(cell: Arc<Cell<T, E>>) -> Self {
        Self { cell }
    }
}

impl<T, E> Future for FutureAwaiter<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    type Output = WaitResult<T, E>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match self.cell.poll_outcome(cx.waker()) {
            Some(outcome) => Poll::Ready(outcome),
            None => Poll::Pending,
        }
    }
}

impl<T, E> fmt::Debug for FutureAwaiter<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FutureAwaiter")
            .field("label", &self.cell.label())
            .field("status", &self.cell.status())
            .finish()
    }
}
