//! Worker pool — long-lived workers that drain the work queue one task at a time.
//!
//! Each worker loops forever: dequeue, claim the record in the store, run the
//! step computation, then retire the record. A worker that panics mid-task
//! stops for good and leaves its record `InProcess` in the store; nothing
//! reclaims it.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::TaskContext;
use super::model::TaskRecord;
use crate::error::TaskError;

/// Handle to a running pool of workers.
pub struct WorkerPool {
    workers: Vec<(String, JoinHandle<()>)>,
}

impl WorkerPool {
    /// Spawn `size` workers sharing `ctx`.
    pub fn spawn(ctx: Arc<TaskContext>, size: usize) -> Self {
        let workers = (0..size)
            .map(|i| {
                let name = format!("worker-{i}");
                let handle = tokio::spawn(run_worker(name.clone(), Arc::clone(&ctx)));
                (name, handle)
            })
            .collect();

        info!(workers = size, "Worker pool started");
        Self { workers }
    }

    /// Number of workers spawned.
    pub fn size(&self) -> usize {
        self.workers.len()
    }

    /// Wait for every worker to exit, logging the ones that died.
    ///
    /// Workers never return on their own, so this only completes once all of
    /// them have panicked or been aborted.
    pub async fn join(self) {
        let (names, handles): (Vec<_>, Vec<_>) = self.workers.into_iter().unzip();
        let results = futures::future::join_all(handles).await;
        for (name, result) in names.iter().zip(results) {
            match result {
                Ok(()) => warn!(worker = %name, "Worker exited"),
                Err(e) if e.is_cancelled() => debug!(worker = %name, "Worker aborted"),
                Err(e) => error!(worker = %name, error = %e, "Worker died; pool degraded"),
            }
        }
    }

    /// Watch the pool for the life of the process. Never returns.
    ///
    /// Losing every worker is logged but does not stop the caller: stuck
    /// records stay visible and new tasks keep queueing.
    pub async fn supervise(self) {
        if self.size() > 0 {
            self.join().await;
            error!("All workers stopped; tasks will no longer be processed");
        }
        std::future::pending::<()>().await;
    }

    /// Abort every worker. Records they were processing stay in the store.
    pub fn abort(&self) {
        for (_, handle) in &self.workers {
            handle.abort();
        }
    }
}

async fn run_worker(name: String, ctx: Arc<TaskContext>) {
    debug!(worker = %name, "Worker waiting for tasks");
    loop {
        let record = ctx.queue.dequeue().await;
        let task_id = record.id;
        if let Err(e) = process(&ctx, &name, record).await {
            warn!(worker = %name, task_id, error = %e, "Task abandoned");
        }
    }
}

/// Run one dequeued task to completion.
///
/// Fails only this task if its record disappears from the store.
pub async fn process(
    ctx: &TaskContext,
    worker: &str,
    record: TaskRecord,
) -> Result<(), TaskError> {
    let id = record.id;
    let params = record.params();

    ctx.store.update(id, TaskRecord::mark_in_process).await?;
    info!(worker, task_id = id, count = params.count, "Task claimed");

    let delay = params.step_delay();
    for n in 0..params.count {
        let value = params.value_at(n);
        ctx.store
            .update(id, |r| r.current_value = Some(value))
            .await?;
        debug!(worker, task_id = id, step = n, value, "Step computed");

        // Also waits after the last step.
        tokio::time::sleep(delay).await;
    }

    ctx.store.delete(id).await;
    info!(worker, task_id = id, "Task completed");
    Ok(())
}
