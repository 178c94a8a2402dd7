//! Producer side of a completion cell

use crate::cell::Cell;
use crate::future::Future;
use crate::signal::CancelSignal;
use manana_core::{default_spawner, FutureStatus, Spawn, TransitionResult};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// Create an empty cell and return its producer and consumer handles.
///
/// # Example
///
/// ```
/// use manana_concurrency::promise;
///
/// let (producer, future) = promise::<u32, String>();
/// producer.succeed(42).unwrap();
/// assert_eq!(future.get(), Ok(42));
/// ```
pub fn promise<T, E>() -> (Promise<T, E>, Future<T, E>)
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    let promise = Promise::new();
    let future = promise.future();
    (promise, future)
}

/// Handle that can complete a cell.
///
/// Clones share the same cell. Any number of clones may race to complete it;
/// exactly one transition wins and every other attempt gets a
/// [`TransitionError`](manana_core::TransitionError).
pub struct Promise<T, E> {
    cell: Arc<Cell<T, E>>,
}

impl<T, E> Promise<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    /// Create an empty cell on the default spawner.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Create a builder for cell configuration.
    ///
    /// # Example
    ///
    /// ```
    /// use manana_concurrency::Promise;
    ///
    /// let promise = Promise::<String, String>::builder()
    ///     .label("fetch-profile")
    ///     .build();
    /// assert_eq!(promise.future().label(), Some("fetch-profile"));
    /// ```
    pub fn builder() -> PromiseBuilder<T, E> {
        PromiseBuilder::new()
    }

    /// Complete the cell with a value.
    ///
    /// # Errors
    ///
    /// - `AlreadyCompleted` if the cell already succeeded or failed
    /// - `AlreadyCanceled` if the cell was canceled
    pub fn succeed(&self, value: T) -> TransitionResult {
        self.cell.complete(Ok(value))
    }

    /// Complete the cell with an application error.
    ///
    /// Same rejection rules as [`succeed`](Self::succeed).
    pub fn fail(&self, error: E) -> TransitionResult {
        self.cell.complete(Err(error))
    }

    /// Complete the cell from a `Result`.
    pub fn complete(&self, result: Result<T, E>) -> TransitionResult {
        self.cell.complete(result)
    }

    /// Cancel the cell.
    ///
    /// Pending callbacks are dropped without running and the cancellation
    /// signal is tripped.
    pub fn cancel(&self) -> TransitionResult {
        self.cell.cancel()
    }

    /// Consumer handle for this cell.
    pub fn future(&self) -> Future<T, E> {
        Future::from_cell(Arc::clone(&self.cell))
    }

    /// Signal the background work should watch to learn it was canceled.
    pub fn cancel_signal(&self) -> CancelSignal {
        self.cell.signal().clone()
    }

    /// Check if the cell reached any terminal state.
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
}

impl<T, E> Clone for Promise<T, E> {
    fn clone(&self) -> Self {
        Self {
            cell: Arc::clone(&self.cell),
        }
    }
}

impl<T, E> Default for Promise<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, E> fmt::Debug for Promise<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Promise")
            .field("label", &self.cell.label())
            .field("status", &self.cell.status())
            .finish()
    }
}

/// Builder for cell configuration.
pub struct PromiseBuilder<T, E> {
    label: Option<Arc<str>>,
    spawner: Option<Arc<dyn Spawn>>,
    _marker: PhantomData<fn() -> (T, E)>,
}

impl<T, E> PromiseBuilder<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            label: None,
            spawner: None,
            _marker: PhantomData,
        }
    }

    /// Name the cell. The label is attached to every log event it emits.
    pub fn label(mut self, label: impl Into<Arc<str>>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Run callbacks on `spawner` instead of the process-wide default.
    pub fn spawner(mut self, spawner: Arc<dyn Spawn>) -> Self {
        self.spawner = Some(spawner);
        self
    }

    /// Build the cell and return its producer handle.
    pub fn build(self) -> Promise<T, E> {
        let spawner = self.spawner.unwrap_or_else(default_spawner);
        Promise {
            cell: Arc::new(Cell::new(spawner, self.label)),
        }
    }
}

impl<T, E> Default for PromiseBuilder<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
