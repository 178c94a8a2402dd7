//! Cell state and observer lists
//!
//! Both live behind the cell's single mutex. Observers are only ever pushed
//! while the state is `Pending`, and the whole list is swapped out in the
//! same critical section that commits the terminal transition, so a
//! subscriber either lands in the list that gets drained or sees the
//! terminal state and is delivered immediately. Never both, never neither.

use manana_core::{FutureStatus, TransitionError, TransitionResult, WaitError, WaitResult};
use smallvec::SmallVec;
use std::task::Waker;

pub(crate) type Callback<A> = Box<dyn FnOnce(A) + Send + 'static>;

/// Callbacks of one kind, in registration order.
pub(crate) type CallbackGroup<A> = SmallVec<[Callback<A>; 2]>;

/// Crate-internal observer fired on every terminal transition, cancellation
/// included. Runs on the thread that committed the transition.
pub(crate) type TerminalHook<T, E> = Box<dyn FnOnce(WaitResult<T, E>) + Send + 'static>;

/// Single-assignment state of a cell.
pub(crate) enum CellState<T, E> {
    Pending,
    Succeeded(T),
    Failed(E),
    Canceled,
}

impl<T: Clone, E: Clone> CellState<T, E> {
    pub(crate) fn status(&self) -> FutureStatus {
        match self {
            CellState::Pending => FutureStatus::Pending,
            CellState::Succeeded(_) => FutureStatus::Succeeded,
            CellState::Failed(_) => FutureStatus::Failed,
            CellState::Canceled => FutureStatus::Canceled,
        }
    }

    /// Reject any transition out of a terminal state.
    pub(crate) fn ensure_pending(&self) -> TransitionResult {
        match self {
            CellState::Pending => Ok(()),
            CellState::Succeeded(_) | CellState::Failed(_) => {
                Err(TransitionError::AlreadyCompleted)
            }
            CellState::Canceled => Err(TransitionError::AlreadyCanceled),
        }
    }

    /// What a waiter observes, or `None` while pending.
    pub(crate) fn outcome(&self) -> Option<WaitResult<T, E>> {
        match self {
            CellState::Pending => None,
            CellState::Succeeded(v) => Some(Ok(v.clone())),
            CellState::Failed(e) => Some(Err(WaitError::Failed(e.clone()))),
            CellState::Canceled => Some(Err(WaitError::Canceled)),
        }
    }
}

/// Everything waiting on a pending cell.
pub(crate) struct Observers<T, E> {
    pub(crate) success: CallbackGroup<T>,
    pub(crate) failure: CallbackGroup<E>,
    pub(crate) complete: CallbackGroup<Result<T, E>>,
    pub(crate) hooks: SmallVec<[TerminalHook<T, E>; 1]>,
    pub(crate) wakers: SmallVec<[Waker; 1]>,
}

impl<T, E> Observers<T, E> {
    pub(crate) fn callback_count(&self) -> usize {
        self.success.len() + self.failure.len() + self.complete.len()
    }

    /// Register an async waker, skipping it if an equivalent one is queued.
    pub(crate) fn register_waker(&mut self, waker: &Waker) {
        if !self.wakers.iter().any(|w| w.will_wake(waker)) {
            self.wakers.push(waker.clone());
        }
    }

    pub(crate) fn wake_all(&mut self) {
        for waker in self.wakers.drain(..) {
            waker.wake();
        }
    }
}

// Manual impl: derive would demand `T: Default, E: Default`.
impl<T, E> Default for Observers<T, E> {
    fn default() -> Self {
        Self {
            success: SmallVec::new(),
            failure: SmallVec::new(),
            complete: SmallVec::new(),
            hooks: SmallVec::new(),
            wakers: SmallVec::new(),
        }
    }
}
