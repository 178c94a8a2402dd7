//! Tokio-backed spawner

use manana_core::{Spawn, SpawnError, Task};
use tokio::runtime::Handle;

/// Spawner that runs tasks on a tokio runtime's blocking thread pool.
///
/// Tasks may block (callbacks and wrapped synchronous work usually do), so
/// they go through `spawn_blocking` rather than onto the async workers.
#[derive(Debug, Clone)]
pub struct TokioSpawner {
    handle: Handle,
}

impl TokioSpawner {
    /// Create a spawner bound to `handle`.
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Create a spawner bound to the runtime of the calling context.
    ///
    /// Returns `None` outside a tokio runtime.
    pub fn current() -> Option<Self> {
        Handle::try_current().ok().map(Self::new)
    }
}

impl Spawn for TokioSpawner {
    fn spawn(&self, task: Task) -> Result<(), SpawnError> {
        // The JoinHandle is not needed: outcomes travel through the cell.
        drop(self.handle.spawn_blocking(task));
        Ok(())
    }
}
