//! Task store — id → live task record, shared by the HTTP layer and all workers.

use std::collections::BTreeMap;

use tokio::sync::RwLock;

use super::model::TaskRecord;
use crate::error::TaskError;

/// Concurrent map of tracked tasks, ordered by id.
///
/// Locks are held for a single access only, never across a worker's step delay,
/// so snapshots interleave freely with running computations.
#[derive(Debug, Default)]
pub struct TaskStore {
    records: RwLock<BTreeMap<u64, TaskRecord>>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert (or replace) a record.
    pub async fn insert(&self, record: TaskRecord) {
        self.records.write().await.insert(record.id, record);
    }

    /// Get a copy of a record by id.
    pub async fn get(&self, id: u64) -> Option<TaskRecord> {
        self.records.read().await.get(&id).cloned()
    }

    /// Mutate a record in place.
    pub async fn update<F, R>(&self, id: u64, f: F) -> Result<R, TaskError>
    where
        F: FnOnce(&mut TaskRecord) -> R,
    {
        let mut records = self.records.write().await;
        let record = records.get_mut(&id).ok_or(TaskError::NotFound { id })?;
        Ok(f(record))
    }

    /// Remove a record. Returns it if it was still tracked.
    pub async fn delete(&self, id: u64) -> Option<TaskRecord> {
        self.records.write().await.remove(&id)
    }

    /// All tracked records, ascending by id.
    pub async fn snapshot(&self) -> Vec<TaskRecord> {
        self.records.read().await.values().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}
