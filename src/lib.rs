//! # Manana
//!
//! Single-assignment futures and promises for synchronous Rust code.
//!
//! Manana lets blocking work run in the background while callers block for
//! the result, poll for completion, register callbacks, `.await` it from
//! async code, or cancel it.
//!
//! ## Quick Start
//!
//! ```
//! use manana::prelude::*;
//! use std::time::Duration;
//!
//! // Wrap synchronous work
//! let size = run(|| Ok::<usize, String>("hello".len()));
//!
//! // React to the outcome
//! size.on_success(|n| println!("got {n} bytes"));
//!
//! // Or block for it
//! assert_eq!(size.get_timeout(Duration::from_secs(5)), Ok(5));
//! ```
//!
//! ## Producing Results By Hand
//!
//! ```
//! use manana::prelude::*;
//!
//! let (producer, future) = promise::<u32, String>();
//! producer.succeed(7)?;
//!
//! // Single assignment: the second transition is rejected
//! assert!(producer.fail("too late".into()).is_err());
//! assert_eq!(future.get(), Ok(7));
//! # Ok::<(), manana::Error>(())
//! ```
//!
//! ## Components
//!
//! - [`Promise`] / [`Future`] - producer and consumer handles of a completion cell
//! - [`all`] - join many futures into one
//! - [`CancelSignal`] - cooperative cancellation for background work
//! - [`run`] / [`run_with_signal`] - wrap synchronous functions
//! - [`Spawn`] - plug in the execution environment

#![warn(missing_docs)]

mod error;

pub mod prelude;

// Re-export main entry points
pub use error::{Error, Result};

// Completion cells
pub use manana_concurrency::{
    all, all_with, promise, CancelSignal, Canceled, Future, FutureAwaiter, Promise,
    PromiseBuilder,
};

// Background execution
pub use manana_executor::{run, run_on, run_with_signal, run_with_signal_on};
#[cfg(feature = "tokio")]
pub use manana_executor::TokioSpawner;

// Core types
pub use manana_core::{
    default_spawner, FutureStatus, Spawn, SpawnError, Task, ThreadSpawner, ThreadSpawnerBuilder,
    TransitionError, TransitionResult, WaitError, WaitResult,
};
