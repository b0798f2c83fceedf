use crate::domain::ports::{TaskDispatcher, TaskFuture};
use crate::utils::error::Result;
use std::sync::Mutex;

/// Production dispatcher: hands the task to the async runtime and moves on.
/// Failures are logged and swallowed; deferred work is best-effort.
#[derive(Debug, Default)]
pub struct SpawnDispatcher;

impl SpawnDispatcher {
    pub fn new() -> Self {
        Self
    }
}

impl TaskDispatcher for SpawnDispatcher {
    fn dispatch(&self, label: &'static str, task: TaskFuture) {
        tracing::debug!("dispatching deferred task: {}", label);
        tokio::spawn(async move {
            match task.await {
                Ok(()) => tracing::debug!("deferred task {} completed", label),
                Err(e) => tracing::error!("deferred task {} failed: {}", label, e),
            }
        });
    }
}

/// Holds dispatched tasks until someone drains them. Lets tests and the
/// smoke CLI run deferred work deterministically instead of racing a
/// detached spawn.
#[derive(Default)]
pub struct BufferDispatcher {
    queue: Mutex<Vec<(&'static str, TaskFuture)>>,
}

impl BufferDispatcher {
    pub fn new() -> Self {
        Self {
            queue: Mutex::new(Vec::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.queue.lock().expect("dispatcher queue poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run every buffered task to completion, in dispatch order, and
    /// return each task's outcome alongside its label.
    pub async fn drain(&self) -> Vec<(&'static str, Result<()>)> {
        let tasks = {
            let mut queue = self.queue.lock().expect("dispatcher queue poisoned");
            std::mem::take(&mut *queue)
        };

        let mut results = Vec::with_capacity(tasks.len());
        for (label, task) in tasks {
            let outcome = task.await;
            if let Err(e) = &outcome {
                tracing::error!("deferred task {} failed: {}", label, e);
            }
            results.push((label, outcome));
        }
        results
    }
}

impl TaskDispatcher for BufferDispatcher {
    fn dispatch(&self, label: &'static str, task: TaskFuture) {
        tracing::debug!("buffering deferred task: {}", label);
        self.queue
            .lock()
            .expect("dispatcher queue poisoned")
            .push((label, task));
    }
}
