//! Cancellation signal
//!
//! Every cell owns one [`CancelSignal`]. It is tripped exactly once, when the
//! cell is canceled, and never by success or failure. Background work holds a
//! clone and polls or waits on it to learn that its result is no longer
//! wanted. Tripping the signal does not stop anything by itself: cancellation
//! is cooperative.

use parking_lot::{Condvar, Mutex};
use smallvec::SmallVec;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll, Waker};
use std::time::{Duration, Instant};

/// Readable and awaitable indicator that background work should stop.
#[derive(Clone)]
pub struct CancelSignal {
    inner: Arc<SignalInner>,
}

struct SignalInner {
    canceled: AtomicBool,
    wakers: Mutex<SmallVec<[Waker; 1]>>,
    tripped: Condvar,
}

impl CancelSignal {
    pub(crate) fn new() -> Self {
        Self {
            inner: Arc::new(SignalInner {
                canceled: AtomicBool::new(false),
                wakers: Mutex::new(SmallVec::new()),
                tripped: Condvar::new(),
            }),
        }
    }

    /// Trip the signal. Idempotent.
    pub(crate) fn trip(&self) {
        let wakers = {
            let mut wakers = self.inner.wakers.lock();
            self.inner.canceled.store(true, Ordering::Release);
            std::mem::take(&mut *wakers)
        };
        self.inner.tripped.notify_all();
        for waker in wakers {
            waker.wake();
        }
    }

    /// Check whether the owning cell was canceled.
    pub fn is_canceled(&self) -> bool {
        self.inner.canceled.load(Ordering::Acquire)
    }

    /// Block the calling thread until the owning cell is canceled.
    ///
    /// Blocks forever if the cell completes normally.
    pub fn wait(&self) {
        let mut guard = self.inner.wakers.lock();
        while !self.is_canceled() {
            self.inner.tripped.wait(&mut guard);
        }
    }

    /// Block until the owning cell is canceled or `timeout` elapses.
    ///
    /// Returns `true` if the cell was canceled.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let deadline = match Instant::now().checked_add(timeout) {
            Some(deadline) => deadline,
            None => {
                self.wait();
                return true;
            }
        };

        let mut guard = self.inner.wakers.lock();
        while !self.is_canceled() {
            if self.inner.tripped.wait_until(&mut guard, deadline).timed_out() {
                return self.is_canceled();
            }
        }
        true
    }

    /// Future that resolves once the owning cell is canceled.
    pub fn canceled(&self) -> Canceled {
        Canceled {
            signal: self.clone(),
        }
    }
}

impl fmt::Debug for CancelSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancelSignal")
            .field("canceled", &self.is_canceled())
            .finish()
    }
}

/// Future returned by [`CancelSignal::canceled`].
#[must_use = "futures do nothing unless polled"]
#[derive(Debug)]
pub struct Canceled {
    signal: CancelSignal,
}

impl Future for Canceled {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.signal.is_canceled() {
            return Poll::Ready(());
        }

        let mut wakers = self.signal.inner.wakers.lock();
        // Re-check under the lock: trip() flips the flag while holding it.
        if self.signal.is_canceled() {
            return Poll::Ready(());
        }
        if !wakers.iter().any(|w| w.will_wake(cx.waker())) {
            wakers.push(cx.waker().clone());
        }
        Poll::Pending
    }
}
