//! Restartable background task
//!
//! A `TaskSlot` owns at most one running task. Restarting aborts the previous
//! task and hands the new one a fresh generation number, which it attaches to
//! every action it dispatches so reducers can tell current results from late
//! ones.

use std::future::Future;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

#[derive(Debug, Default)]
pub struct TaskSlot {
    generation: u64,
    handle: Option<JoinHandle<()>>,
}

impl TaskSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Abort the running task, if any, and spawn `make(generation)`.
    ///
    /// `make` runs synchronously before the future is spawned, so anything it
    /// dispatches is queued ahead of the task's own results.
    pub fn restart<F, Fut>(&mut self, runtime: &Handle, make: F) -> u64
    where
        F: FnOnce(u64) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        self.generation += 1;
        let future = make(self.generation);
        self.handle = Some(runtime.spawn(future));
        self.generation
    }

    pub fn cancel(&mut self) {
        if self.is_running() {
            log::debug!("Aborting task of generation {}", self.generation);
        }
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for TaskSlot {
    fn drop(&mut self) {
        self.cancel();
    }
}
