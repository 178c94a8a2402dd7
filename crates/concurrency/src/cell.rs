//! Completion cell
//!
//! The shared inner of every [`Promise`](crate::Promise) /
//! [`Future`](crate::Future) pair.
//!
//! ## State Machine
//!
//! ```text
//!            succeed(v)
//!          ┌────────────► Succeeded(v)
//!          │  fail(e)
//! Pending ─┼────────────► Failed(e)
//!          │  cancel()
//!          └────────────► Canceled
//! ```
//!
//! Every other transition is rejected with a [`TransitionError`].
//!
//! ## Transition Sequence
//!
//! ```text
//! 1. lock
//! 2. ensure_pending()            - reject if terminal
//! 3. store terminal state
//! 4. swap observer lists out     - later subscribers see the terminal state
//! 5. unlock
//! 6. notify blocked waiters, wake async awaiters
//! 7. dispatch callback groups    - one spawned task per group
//! 8. run terminal hooks
//! ```
//!
//! Steps 2-4 form the single critical section that makes a transition and a
//! concurrent subscription linearizable: the subscriber either runs before
//! step 2 (and is drained in step 4) or after step 5 (and sees the terminal
//! state, so it is delivered immediately).

use crate::dispatch::{self, dispatch_group, dispatch_one};
use crate::signal::CancelSignal;
use crate::state::{Callback, CellState, Observers, TerminalHook};
use manana_core::{FutureStatus, Spawn, TransitionResult, WaitError, WaitResult};
use parking_lot::{Condvar, Mutex};
use std::sync::Arc;
use std::task::Waker;
use std::time::{Duration, Instant};

struct Inner<T, E> {
    state: CellState<T, E>,
    observers: Observers<T, E>,
}

pub(crate) struct Cell<T, E> {
    inner: Mutex<Inner<T, E>>,
    completed: Condvar,
    signal: CancelSignal,
    spawner: Arc<dyn Spawn>,
    label: Option<Arc<str>>,
}

impl<T, E> Cell<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    pub(crate) fn new(spawner: Arc<dyn Spawn>, label: Option<Arc<str>>) -> Self {
        Self {
            inner: Mutex::new(Inner {
                state: CellState::Pending,
                observers: Observers::default(),
            }),
            completed: Condvar::new(),
            signal: CancelSignal::new(),
            spawner,
            label,
        }
    }

    pub(crate) fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    #[cfg(test)]
    pub(crate) fn spawner(&self) -> &Arc<dyn Spawn> {
        &self.spawner
    }

    pub(crate) fn signal(&self) -> &CancelSignal {
        &self.signal
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Publish a value or an application error.
    pub(crate) fn complete(&self, result: Result<T, E>) -> TransitionResult {
        let mut observers = {
            let mut inner = self.inner.lock();
            inner.state.ensure_pending()?;
            inner.state = match &result {
                Ok(value) => CellState::Succeeded(value.clone()),
                Err(error) => CellState::Failed(error.clone()),
            };
            std::mem::take(&mut inner.observers)
        };

        self.completed.notify_all();
        observers.wake_all();

        tracing::debug!(
            label = self.label().unwrap_or("-"),
            status = if result.is_ok() { "Succeeded" } else { "Failed" },
            callbacks = observers.callback_count(),
            "Future completed"
        );

        let hooks = std::mem::take(&mut observers.hooks);
        match result {
            Ok(value) => {
                let complete = std::mem::take(&mut observers.complete);
                dispatch_group(
                    self.spawner.as_ref(),
                    self.label.clone(),
                    dispatch::COMPLETE,
                    complete,
                    Ok(value.clone()),
                );
                let success = std::mem::take(&mut observers.success);
                dispatch_group(
                    self.spawner.as_ref(),
                    self.label.clone(),
                    dispatch::SUCCESS,
                    success,
                    value.clone(),
                );
                for hook in hooks {
                    hook(Ok(value.clone()));
                }
            }
            Err(error) => {
                let complete = std::mem::take(&mut observers.complete);
                dispatch_group(
                    self.spawner.as_ref(),
                    self.label.clone(),
                    dispatch::COMPLETE,
                    complete,
                    Err(error.clone()),
                );
                let failure = std::mem::take(&mut observers.failure);
                dispatch_group(
                    self.spawner.as_ref(),
                    self.label.clone(),
                    dispatch::FAILURE,
                    failure,
                    error.clone(),
                );
                for hook in hooks {
                    hook(Err(WaitError::Failed(error.clone())));
                }
            }
        }
        Ok(())
    }

    /// Move to `Canceled`, dropping every pending callback unfired.
    pub(crate) fn cancel(&self) -> TransitionResult {
        let mut observers = {
            let mut inner = self.inner.lock();
            inner.state.ensure_pending()?;
            inner.state = CellState::Canceled;
            std::mem::take(&mut inner.observers)
        };

        self.signal.trip();
        self.completed.notify_all();
        observers.wake_all();

        tracing::debug!(
            label = self.label().unwrap_or("-"),
            dropped_callbacks = observers.callback_count(),
            "Future canceled"
        );

        for hook in std::mem::take(&mut observers.hooks) {
            hook(Err(WaitError::Canceled));
        }
        Ok(())
    }

    // =========================================================================
    // Subscriptions
    // =========================================================================

    pub(crate) fn on_success(&self, callback: Callback<T>) {
        let mut inner = self.inner.lock();
        match &inner.state {
            CellState::Pending => {
                inner.observers.success.push(callback);
                tracing::trace!(label = self.label().unwrap_or("-"), "on_success registered");
            }
            CellState::Succeeded(value) => {
                let value = value.clone();
                drop(inner);
                self.deliver_late(dispatch::SUCCESS, callback, value);
            }
            CellState::Failed(_) | CellState::Canceled => {}
        }
    }

    pub(crate) fn on_fail(&self, callback: Callback<E>) {
        let mut inner = self.inner.lock();
        match &inner.state {
            CellState::Pending => {
                inner.observers.failure.push(callback);
                tracing::trace!(label = self.label().unwrap_or("-"), "on_fail registered");
            }
            CellState::Failed(error) => {
                let error = error.clone();
                drop(inner);
                self.deliver_late(dispatch::FAILURE, callback, error);
            }
            CellState::Succeeded(_) | CellState::Canceled => {}
        }
    }

    pub(crate) fn on_complete(&self, callback: Callback<Result<T, E>>) {
        let mut inner = self.inner.lock();
        let result = match &inner.state {
            CellState::Pending => {
                inner.observers.complete.push(callback);
                tracing::trace!(label = self.label().unwrap_or("-"), "on_complete registered");
                return;
            }
            CellState::Succeeded(value) => Ok(value.clone()),
            CellState::Failed(error) => Err(error.clone()),
            CellState::Canceled => return,
        };
        drop(inner);
        self.deliver_late(dispatch::COMPLETE, callback, result);
    }

    /// Observe every terminal transition, cancellation included. Runs inline,
    /// either on the transitioning thread or right here if already terminal.
    pub(crate) fn on_terminal(&self, hook: TerminalHook<T, E>) {
        let outcome = {
            let mut inner = self.inner.lock();
            match inner.state.outcome() {
                Some(outcome) => outcome,
                None => {
                    inner.observers.hooks.push(hook);
                    return;
                }
            }
        };
        hook(outcome);
    }

    fn deliver_late<A: Send + 'static>(&self, kind: &'static str, callback: Callback<A>, arg: A) {
        tracing::trace!(
            label = self.label().unwrap_or("-"),
            callback = kind,
            "Future already completed - delivering immediately"
        );
        dispatch_one(self.spawner.as_ref(), self.label.clone(), kind, callback, arg);
    }

    // =========================================================================
    // Queries and waits
    // =========================================================================

    pub(crate) fn status(&self) -> FutureStatus {
        self.inner.lock().state.status()
    }

    pub(crate) fn try_get(&self) -> Option<WaitResult<T, E>> {
        self.inner.lock().state.outcome()
    }

    /// Poll from an async awaiter: the outcome if terminal, otherwise the
    /// waker is queued for the transition.
    pub(crate) fn poll_outcome(&self, waker: &Waker) -> Option<WaitResult<T, E>> {
        let mut inner = self.inner.lock();
        let outcome = inner.state.outcome();
        if outcome.is_none() {
            inner.observers.register_waker(waker);
        }
        outcome
    }

    pub(crate) fn wait(&self) -> WaitResult<T, E> {
        let mut inner = self.inner.lock();
        loop {
            if let Some(outcome) = inner.state.outcome() {
                return outcome;
            }
            self.completed.wait(&mut inner);
        }
    }

    /// Wait at most `timeout`. Never alters the cell.
    pub(crate) fn wait_timeout(&self, timeout: Duration) -> WaitResult<T, E> {
        let deadline = match Instant::now().checked_add(timeout) {
            Some(deadline) => deadline,
            None => return self.wait(),
        };

        let mut inner = self.inner.lock();
        loop {
            if let Some(outcome) = inner.state.outcome() {
                return outcome;
            }
            if self.completed.wait_until(&mut inner, deadline).timed_out() {
                return inner.state.outcome().unwrap_or(Err(WaitError::Timeout));
            }
        }
    }
}
