//! Background execution for manana futures
//!
//! Wraps synchronous functions into [`Future`](manana_concurrency::Future)s:
//!
//! ```
//! use manana_executor::run;
//!
//! let answer = run(|| Ok::<_, String>(6 * 7));
//! assert_eq!(answer.get(), Ok(42));
//! ```
//!
//! The work itself runs on a [`Spawn`](manana_core::Spawn) implementation:
//! the process-wide default thread spawner, or any spawner passed to the
//! `*_on` variants. With the `tokio` feature, [`TokioSpawner`] runs work on a
//! tokio runtime's blocking pool.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod run;
#[cfg(feature = "tokio")]
mod tokio_spawner;

pub use run::{run, run_on, run_with_signal, run_with_signal_on};
#[cfg(feature = "tokio")]
pub use tokio_spawner::TokioSpawner;
