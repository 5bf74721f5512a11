//! Task system — admission, queueing, background workers, and progress polling.
//!
//! Core components:
//! - `model` — Task record, status, and validated request parameters
//! - `ids` — Strictly increasing id issuance
//! - `store` — Shared id → record map (source of truth for task state)
//! - `queue` — Unbounded FIFO between admission and workers
//! - `worker` — Fixed pool of workers running the step computation
//! - `routes` — HTTP endpoints

pub mod ids;
pub mod model;
pub mod queue;
pub mod routes;
pub mod store;
pub mod worker;

use std::sync::Arc;

use tracing::info;

pub use ids::IdGenerator;
pub use model::{TaskParams, TaskRecord, TaskStatus};
pub use queue::WorkQueue;
pub use store::TaskStore;
pub use worker::WorkerPool;

/// Shared state of the task system, built once at startup and handed to the
/// HTTP layer and every worker.
#[derive(Debug, Default)]
pub struct TaskContext {
    pub ids: IdGenerator,
    pub store: TaskStore,
    pub queue: WorkQueue,
}

impl TaskContext {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Admit a validated task: assign its id and queue position, register it in
    /// the store, and hand it to the workers. Returns the record as admitted.
    pub async fn admit(&self, params: TaskParams) -> TaskRecord {
        let slot = self.queue.lock().await;
        let id = self.ids.next_id();
        let record = TaskRecord::new(id, slot.position(), params);

        self.store.insert(record.clone()).await;
        slot.push(record.clone());

        info!(
            task_id = record.id,
            number_in_queue = record.number_in_queue,
            count = record.count,
            interval = record.interval,
            "Task admitted"
        );

        record
    }
}
