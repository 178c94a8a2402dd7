//! Comprehensive Future/Promise Test Suite
//!
//! Black-box tests through the public `manana` facade.
//!
//! ## Test Organization
//!
//! - `basic_ops` - single-assignment transitions and queries
//! - `callbacks` - subscription before/after completion, ordering
//! - `cancellation` - canceled cells, signals, silent callbacks
//! - `timeout` - bounded waits
//! - `concurrency` - racing producers, subscribers and waiters
//! - `join` - the `all` combinator
//! - `executor` - wrapping synchronous work

use manana::prelude::*;
use manana::{Spawn, Task};
use std::sync::mpsc::Receiver;
use std::sync::Arc;
use std::time::Duration;

mod callbacks;
mod executor;
mod timeout;

// =============================================================================
// Test Utilities
// =============================================================================

/// Upper bound for anything that is expected to happen "soon".
pub const SOON: Duration = Duration::from_secs(5);

/// Window used to assert that nothing else arrives.
pub const QUIET: Duration = Duration::from_millis(100);

/// Install a fmt subscriber once so `RUST_LOG`-style debugging works in tests.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// Spawner that runs tasks on the calling thread.
pub fn inline_spawner() -> Arc<dyn Spawn> {
    Arc::new(|task: Task| task())
}

/// Create a labeled promise on the default spawner.
pub fn labeled<T, E>(label: &str) -> Promise<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    Promise::builder().label(label).build()
}

/// Receive exactly `n` messages, then assert the channel stays quiet.
pub fn recv_exactly<T: std::fmt::Debug>(rx: &Receiver<T>, n: usize) -> Vec<T> {
    let got: Vec<T> = (0..n)
        .map(|i| {
            rx.recv_timeout(SOON)
                .unwrap_or_else(|e| panic!("message {} of {} never arrived: {}", i + 1, n, e))
        })
        .collect();
    if let Ok(extra) = rx.recv_timeout(QUIET) {
        panic!("unexpected extra delivery: {:?}", extra);
    }
    got
}

/// Assert the channel receives nothing within the quiet window.
pub fn assert_silent<T: std::fmt::Debug>(rx: &Receiver<T>) {
    if let Ok(msg) = rx.recv_timeout(QUIET) {
        panic!("unexpected delivery: {:?}", msg);
    }
}
