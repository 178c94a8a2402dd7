//! The spawn capability
//!
//! Completion cells never run callbacks on the stack of the thread that
//! completes them. Instead they hand a [`Task`] to a [`Spawn`] implementation
//! supplied by the host environment. The crate ships [`ThreadSpawner`], which
//! runs every task on a fresh OS thread; other crates plug in their own
//! runtime (see `manana-executor` for a tokio-backed spawner).
//!
//! # Thread Safety
//!
//! Spawners are shared between every cell built with them, so they must be
//! `Send + Sync`. A spawner must never run a task while holding a lock that
//! the task itself could take.
//!
//! # Spawn Failure
//!
//! A spawner that cannot schedule a task hands it back inside a
//! [`SpawnError`] instead of running it on the caller's stack. The caller
//! decides what to do with it: cells run the callbacks inline (logged at
//! `warn`), while `manana-executor` cancels the cell rather than running
//! blocking work inside `run`.

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::fmt;
use std::io;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use thiserror::Error;

/// Unit of work handed to a [`Spawn`] implementation.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Capability to run a task on an independently scheduled execution unit.
pub trait Spawn: Send + Sync + 'static {
    /// Schedule `task` to run. Must not run it on the caller's stack unless
    /// the implementation documents that it does.
    ///
    /// # Errors
    ///
    /// Returns the task, unrun, inside a [`SpawnError`] if it could not be
    /// scheduled.
    fn spawn(&self, task: Task) -> Result<(), SpawnError>;
}

impl<F> Spawn for F
where
    F: Fn(Task) + Send + Sync + 'static,
{
    fn spawn(&self, task: Task) -> Result<(), SpawnError> {
        self(task);
        Ok(())
    }
}

/// A task that a [`Spawn`] implementation could not schedule.
#[derive(Error)]
#[error("failed to spawn task: {source}")]
pub struct SpawnError {
    task: Task,
    #[source]
    source: io::Error,
}

impl SpawnError {
    /// Wrap a rejected `task` together with the reason it was rejected.
    pub fn new(task: Task, source: io::Error) -> Self {
        Self { task, source }
    }

    /// Take back the task that was never run.
    pub fn into_task(self) -> Task {
        self.task
    }
}

impl fmt::Debug for SpawnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpawnError")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

const DEFAULT_NAME_PREFIX: &str = "manana-worker";

static DEFAULT_SPAWNER: Lazy<Arc<dyn Spawn>> = Lazy::new(|| Arc::new(ThreadSpawner::new()));

/// Process-wide spawner used by cells that were not configured with one.
pub fn default_spawner() -> Arc<dyn Spawn> {
    Arc::clone(&DEFAULT_SPAWNER)
}

/// Spawner that runs every task on its own named OS thread.
///
/// If the OS refuses to create a thread the task is returned in a
/// [`SpawnError`], so a task is never lost.
pub struct ThreadSpawner {
    name_prefix: Arc<str>,
    stack_size: Option<usize>,
    next_id: AtomicU64,
}

impl ThreadSpawner {
    /// Create a spawner with default settings.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Create a builder for spawner configuration.
    ///
    /// # Example
    ///
    /// ```
    /// use manana_core::ThreadSpawner;
    ///
    /// let spawner = ThreadSpawner::builder()
    ///     .name_prefix("downloads")
    ///     .stack_size(256 * 1024)
    ///     .build();
    /// assert_eq!(spawner.name_prefix(), "downloads");
    /// ```
    pub fn builder() -> ThreadSpawnerBuilder {
        ThreadSpawnerBuilder::new()
    }

    /// Prefix used for the names of spawned threads.
    pub fn name_prefix(&self) -> &str {
        &self.name_prefix
    }

    /// Number of tasks handed to this spawner so far.
    pub fn spawned(&self) -> u64 {
        self.next_id.load(Ordering::Relaxed)
    }
}

impl Default for ThreadSpawner {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ThreadSpawner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThreadSpawner")
            .field("name_prefix", &self.name_prefix)
            .field("stack_size", &self.stack_size)
            .field("spawned", &self.spawned())
            .finish()
    }
}

impl Spawn for ThreadSpawner {
    fn spawn(&self, task: Task) -> Result<(), SpawnError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let mut builder = thread::Builder::new().name(format!("{}-{}", self.name_prefix, id));
        if let Some(size) = self.stack_size {
            builder = builder.stack_size(size);
        }

        // Builder::spawn consumes the closure even on failure, so park the
        // task where the error path can still reach it.
        let slot = Arc::new(Mutex::new(Some(task)));
        let thread_slot = Arc::clone(&slot);
        let spawned = builder.spawn(move || {
            if let Some(task) = thread_slot.lock().take() {
                task();
            }
        });

        match spawned {
            Ok(_) => Ok(()),
            Err(e) => {
                tracing::debug!(thread_id = id, error = %e, "Failed to spawn worker thread");
                // A failed spawn drops the closure unrun, so the task is
                // still parked in the slot.
                let task = slot.lock().take();
                task.map_or(Ok(()), |task| Err(SpawnError::new(task, e)))
            }
        }
    }
}

/// Builder for [`ThreadSpawner`] configuration.
#[derive(Debug, Clone)]
pub struct ThreadSpawnerBuilder {
    name_prefix: String,
    stack_size: Option<usize>,
}

impl ThreadSpawnerBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            name_prefix: DEFAULT_NAME_PREFIX.to_string(),
            stack_size: None,
        }
    }

    /// Set the prefix of spawned thread names (`{prefix}-{n}`).
    pub fn name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.name_prefix = prefix.into();
        self
    }

    /// Set the stack size of spawned threads, in bytes.
    pub fn stack_size(mut self, bytes: usize) -> Self {
        self.stack_size = Some(bytes);
        self
    }

    /// Build the spawner.
    pub fn build(self) -> ThreadSpawner {
        ThreadSpawner {
            name_prefix: Arc::from(self.name_prefix),
            stack_size: self.stack_size,
            next_id: AtomicU64::new(0),
        }
    }
}

impl Default for ThreadSpawnerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
