//! Join combinator
//!
//! [`all`] composes N cells into one derived cell:
//! - succeeds with every value, in input order, once all inputs succeed
//! - fails with the first application error to arrive (not necessarily the
//!   lowest index); later errors are absorbed by the derived cell's own
//!   single-assignment rule
//! - is canceled if any input is canceled
//!
//! Canceling the derived cell from outside forwards the cancellation to every
//! input that is still pending. A cancellation that arrives from an input
//! stops at the derived cell: sibling inputs may be shared with other
//! consumers and are left alone, the same as when an input fails.
//!
//! Inputs are only ever observed through terminal hooks; no two cells are
//! ever locked together.

use crate::cell::Cell;
use crate::future::Future;
use crate::promise::Promise;
use manana_core::{default_spawner, Spawn, TransitionResult, WaitError};
use parking_lot::Mutex;
use smallvec::SmallVec;
use std::sync::{Arc, Weak};
use std::thread::{self, ThreadId};

const JOIN_LABEL: &str = "all";

/// Join `futures` on the default spawner.
///
/// # Example
///
/// ```
/// use manana_concurrency::{all, promise};
///
/// let (a, fa) = promise::<&'static str, String>();
/// let (b, fb) = promise::<&'static str, String>();
/// let joined = all(vec![fa, fb]);
///
/// b.succeed("b").unwrap();
/// a.succeed("a").unwrap();
/// assert_eq!(joined.get(), Ok(vec!["a", "b"]));
/// ```
pub fn all<T, E, I>(futures: I) -> Future<Vec<T>, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
    I: IntoIterator<Item = Future<T, E>>,
{
    all_with(default_spawner(), futures)
}

/// Join `futures`, running the derived cell's callbacks on `spawner`.
pub fn all_with<T, E, I>(spawner: Arc<dyn Spawn>, futures: I) -> Future<Vec<T>, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
    I: IntoIterator<Item = Future<T, E>>,
{
    let inputs: Vec<Future<T, E>> = futures.into_iter().collect();
    let derived = Promise::<Vec<T>, E>::builder()
        .label(JOIN_LABEL)
        .spawner(spawner)
        .build();
    let output = derived.future();

    if inputs.is_empty() {
        if let Err(e) = derived.succeed(Vec::new()) {
            tracing::trace!(error = %e, "Empty join already settled");
        }
        return output;
    }

    let input_cancels = Arc::new(InputCancels::default());
    forward_cancellation(&output, &inputs, Arc::clone(&input_cancels));

    let slots = Arc::new(Mutex::new(Slots::new(inputs.len())));
    for (index, input) in inputs.iter().enumerate() {
        let derived = derived.clone();
        let slots = Arc::clone(&slots);
        let input_cancels = Arc::clone(&input_cancels);
        input.cell().on_terminal(Box::new(move |outcome| match outcome {
            Ok(value) => {
                let filled = slots.lock().fill(index, value);
                if let Some(values) = filled {
                    if let Err(e) = derived.succeed(values) {
                        tracing::trace!(error = %e, "Join result discarded");
                    }
                }
            }
            Err(WaitError::Failed(error)) => {
                if let Err(e) = derived.fail(error) {
                    tracing::trace!(index, error = %e, "Join input failure absorbed");
                }
            }
            Err(WaitError::Canceled) | Err(WaitError::Timeout) => {
                if let Err(e) = input_cancels.cancel(&derived) {
                    tracing::trace!(index, error = %e, "Join input cancellation absorbed");
                }
            }
        }));
    }

    output
}

/// Cancel still-pending inputs when the derived cell is canceled from
/// outside the join.
///
/// Inputs are held weakly so a derived cell that outlives its inputs does not
/// keep them alive, and so the input -> derived hooks never form a cycle.
fn forward_cancellation<T, E>(
    output: &Future<Vec<T>, E>,
    inputs: &[Future<T, E>],
    input_cancels: Arc<InputCancels>,
) where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    let weak_inputs: Vec<Weak<Cell<T, E>>> =
        inputs.iter().map(|f| Arc::downgrade(f.cell())).collect();
    output.cell().on_terminal(Box::new(move |outcome| {
        if !matches!(outcome, Err(WaitError::Canceled)) {
            return;
        }
        if input_cancels.on_current_thread() {
            tracing::debug!("Join canceled by an input - siblings left untouched");
            return;
        }
        let mut forwarded = 0usize;
        for input in weak_inputs.iter().filter_map(Weak::upgrade) {
            if input.cancel().is_ok() {
                forwarded += 1;
            }
        }
        tracing::debug!(forwarded, "Join canceled - forwarded to pending inputs");
    }));
}

/// Threads currently canceling the derived cell because an input was
/// canceled.
///
/// Terminal hooks run inline on the thread that commits the transition, so
/// the forwarding hook can tell an input-driven cancellation from an
/// external one by checking whether its own thread is registered here.
#[derive(Default)]
struct InputCancels {
    threads: Mutex<SmallVec<[ThreadId; 1]>>,
}

impl InputCancels {
    fn cancel<T, E>(&self, derived: &Promise<Vec<T>, E>) -> TransitionResult
    where
        T: Clone + Send + 'static,
        E: Clone + Send + 'static,
    {
        let current = thread::current().id();
        self.threads.lock().push(current);
        let result = derived.cancel();
        let mut threads = self.threads.lock();
        if let Some(pos) = threads.iter().position(|id| *id == current) {
            threads.swap_remove(pos);
        }
        result
    }

    fn on_current_thread(&self) -> bool {
        let current = thread::current().id();
        self.threads.lock().contains(&current)
    }
}

/// Positional result buffer.
struct Slots<T> {
    values: Vec<Option<T>>,
    remaining: usize,
}

impl<T> Slots<T> {
    fn new(len: usize) -> Self {
        Self {
            values: (0..len).map(|_| None).collect(),
            remaining: len,
        }
    }

    /// Record the value for `index`. Returns the full buffer once every slot
    /// is filled.
    fn fill(&mut self, index: usize, value: T) -> Option<Vec<T>> {
        if self.values[index].replace(value).is_none() {
            self.remaining -= 1;
        }
        if self.remaining == 0 {
            Some(self.values.drain(..).flatten().collect())
        } else {
            None
        }
    }
}
