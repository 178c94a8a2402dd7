//! Wrapping synchronous work
//!
//! ## Execution Sequence
//!
//! ```text
//! 1. Create an empty cell on the chosen spawner
//! 2. Spawn a task that runs the closure with the cell's CancelSignal
//! 3. Return the consumer handle immediately
//! 4. Task publishes Ok / Err into the cell
//!    - cell already canceled: result discarded (debug log)
//!    - closure panicked: cell canceled (error log)
//! ```
//!
//! If the spawner rejects the task in step 2, the closure is dropped unrun
//! and the cell is canceled (error log). Work is never run on the caller's
//! stack, so a closure blocked on its signal cannot wedge `run`.

use manana_concurrency::{CancelSignal, Future, Promise};
use manana_core::panic::panic_message;
use manana_core::{default_spawner, Spawn};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// Run `work` in the background on the default spawner.
pub fn run<T, E, F>(work: F) -> Future<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
    F: FnOnce() -> Result<T, E> + Send + 'static,
{
    run_on(default_spawner(), work)
}

/// Run `work` in the background on `spawner`.
pub fn run_on<T, E, F>(spawner: Arc<dyn Spawn>, work: F) -> Future<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
    F: FnOnce() -> Result<T, E> + Send + 'static,
{
    run_with_signal_on(spawner, move |_| work())
}

/// Run cancellation-aware `work` in the background on the default spawner.
///
/// `work` receives the cell's [`CancelSignal`] and should stop early once it
/// is tripped. Whatever it returns after that point is discarded.
///
/// # Example
///
/// ```
/// use manana_executor::run_with_signal;
/// use manana_core::WaitError;
/// use std::time::Duration;
///
/// let future = run_with_signal(|signal| {
///     // Pretend to work until somebody cancels us.
///     signal.wait();
///     Ok::<u32, String>(0)
/// });
///
/// future.cancel().unwrap();
/// assert_eq!(future.get_timeout(Duration::from_secs(1)), Err(WaitError::Canceled));
/// ```
pub fn run_with_signal<T, E, F>(work: F) -> Future<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
    F: FnOnce(&CancelSignal) -> Result<T, E> + Send + 'static,
{
    run_with_signal_on(default_spawner(), work)
}

/// Run cancellation-aware `work` in the background on `spawner`.
///
/// The returned cell also dispatches its callbacks on `spawner`.
pub fn run_with_signal_on<T, E, F>(spawner: Arc<dyn Spawn>, work: F) -> Future<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
    F: FnOnce(&CancelSignal) -> Result<T, E> + Send + 'static,
{
    let promise = Promise::<T, E>::builder()
        .spawner(Arc::clone(&spawner))
        .build();
    let future = promise.future();

    let spawned = spawner.spawn(Box::new(move || {
        let signal = promise.cancel_signal();
        match panic::catch_unwind(AssertUnwindSafe(|| work(&signal))) {
            Ok(result) => {
                if let Err(e) = promise.complete(result) {
                    tracing::debug!(error = %e, "Background result discarded");
                }
            }
            Err(payload) => {
                tracing::error!(
                    panic = panic_message(payload.as_ref()),
                    "Background work panicked - canceling future"
                );
                if let Err(e) = promise.cancel() {
                    tracing::debug!(error = %e, "Panicked work outcome already settled");
                }
            }
        }
    }));

    if let Err(e) = spawned {
        tracing::error!(error = %e, "Background work could not be spawned - canceling future");
        drop(e.into_task());
        if let Err(e) = future.cancel() {
            tracing::debug!(error = %e, "Unspawned work outcome already settled");
        }
    }

    future
}
