//! Core types for manana futures
//!
//! This crate defines the pieces shared by every other crate in the workspace:
//! - [`TransitionError`] / [`WaitError`]: the error taxonomy
//! - [`FutureStatus`]: non-blocking status snapshot of a completion cell
//! - [`Spawn`]: the host-provided capability that runs work off the caller's stack
//! - [`ThreadSpawner`]: the default thread-per-task spawner

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod panic;
pub mod spawn;
pub mod status;

pub use error::{TransitionError, TransitionResult, WaitError, WaitResult};
pub use spawn::{default_spawner, Spawn, SpawnError, Task, ThreadSpawner, ThreadSpawnerBuilder};
pub use status::FutureStatus;
