//! Completion cells for manana
//!
//! This crate implements the single-assignment Future/Promise primitive:
//! - [`Promise`]: producer handle (`succeed` / `fail` / `cancel`)
//! - [`Future`]: consumer handle (callbacks, blocking and timed waits, cancel)
//! - [`FutureAwaiter`]: `std::future::Future` view of a cell
//! - [`CancelSignal`]: cooperative cancellation indicator for background work
//! - [`all`]: join combinator over many cells
//!
//! Each cell is guarded by one mutex covering its state, stored outcome and
//! observer lists. Callbacks always run off the completing thread, on the
//! cell's [`Spawn`](manana_core::Spawn) implementation.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod awaiter;
mod cell;
mod dispatch;
pub mod future;
pub mod join;
pub mod promise;
pub mod signal;
mod state;

pub use awaiter::FutureAwaiter;
pub use future::Future;
pub use join::{all, all_with};
pub use promise::{promise, Promise, PromiseBuilder};
pub use signal::{CancelSignal, Canceled};
