//! Convenient imports for Manana.
//!
//! This module re-exports the most commonly used types so you can get started
//! with a single import:
//!
//! ```
//! use manana::prelude::*;
//!
//! let (producer, future) = promise::<u32, String>();
//! producer.succeed(1).unwrap();
//! assert_eq!(future.get(), Ok(1));
//! ```

// Completion cells
pub use crate::{all, promise, CancelSignal, Future, Promise};

// Background execution
pub use crate::{run, run_with_signal};

// Error handling
pub use crate::error::{Error, Result};
pub use crate::{FutureStatus, TransitionError, WaitError};
