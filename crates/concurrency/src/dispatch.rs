//! Callback dispatch
//!
//! A drained callback group becomes one task on the cell's spawner. Inside
//! the task callbacks run sequentially in registration order, and each one is
//! isolated with `catch_unwind` so a panicking callback cannot starve the
//! rest of its group.
//!
//! If the spawner rejects the task, the callbacks run inline on the calling
//! thread (logged at `warn`).

use crate::state::CallbackGroup;
use manana_core::panic::panic_message;
use manana_core::{Spawn, Task};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// Callback group names used in log events.
pub(crate) const SUCCESS: &str = "on_success";
pub(crate) const FAILURE: &str = "on_fail";
pub(crate) const COMPLETE: &str = "on_complete";

/// Run every callback of `group` with a clone of `arg`, off the caller's stack.
pub(crate) fn dispatch_group<A>(
    spawner: &dyn Spawn,
    label: Option<Arc<str>>,
    kind: &'static str,
    group: CallbackGroup<A>,
    arg: A,
) where
    A: Clone + Send + 'static,
{
    if group.is_empty() {
        return;
    }
    let task_label = label.clone();
    submit(
        spawner,
        label.as_deref(),
        kind,
        Box::new(move || {
            for callback in group {
                let arg = arg.clone();
                invoke(task_label.as_deref(), kind, move || callback(arg));
            }
        }),
    );
}

/// Run a single late-subscribed callback off the caller's stack.
pub(crate) fn dispatch_one<A>(
    spawner: &dyn Spawn,
    label: Option<Arc<str>>,
    kind: &'static str,
    callback: Box<dyn FnOnce(A) + Send + 'static>,
    arg: A,
) where
    A: Send + 'static,
{
    let task_label = label.clone();
    submit(
        spawner,
        label.as_deref(),
        kind,
        Box::new(move || invoke(task_label.as_deref(), kind, move || callback(arg))),
    );
}

fn submit(spawner: &dyn Spawn, label: Option<&str>, kind: &'static str, task: Task) {
    if let Err(e) = spawner.spawn(task) {
        tracing::warn!(
            label = label.unwrap_or("-"),
            callback = kind,
            error = %e,
            "Spawner rejected callback task - running inline"
        );
        (e.into_task())();
    }
}

fn invoke<F: FnOnce()>(label: Option<&str>, kind: &'static str, f: F) {
    if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(f)) {
        tracing::error!(
            label = label.unwrap_or("-"),
            callback = kind,
            panic = panic_message(payload.as_ref()),
            "Future callback panicked"
        );
    }
}
