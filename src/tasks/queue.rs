//! Work queue — unbounded FIFO hand-off between admission and the worker pool.

use std::collections::VecDeque;

use tokio::sync::{Mutex, MutexGuard, Notify};
use tracing::debug;

use super::model::TaskRecord;

/// Unbounded FIFO of admitted tasks awaiting a worker.
///
/// Holds copies of records; the store stays authoritative for task state.
#[derive(Debug, Default)]
pub struct WorkQueue {
    items: Mutex<VecDeque<TaskRecord>>,
    notify: Notify,
}

/// Exclusive access to the tail of the queue.
///
/// Admission holds this while it reads the queue position, registers the
/// record and pushes it, so concurrent admissions observe distinct positions.
pub struct EnqueueGuard<'a> {
    items: MutexGuard<'a, VecDeque<TaskRecord>>,
    notify: &'a Notify,
}

impl EnqueueGuard<'_> {
    /// Position a task pushed now would take (queue length + 1).
    pub fn position(&self) -> usize {
        self.items.len() + 1
    }

    /// Push a record and wake one waiting worker.
    pub fn push(mut self, record: TaskRecord) {
        debug!(task_id = record.id, depth = self.items.len() + 1, "Task enqueued");
        self.items.push_back(record);
        self.notify.notify_one();
    }
}

impl WorkQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock the queue for an admission.
    pub async fn lock(&self) -> EnqueueGuard<'_> {
        EnqueueGuard {
            items: self.items.lock().await,
            notify: &self.notify,
        }
    }

    /// Append a record. Never blocks on capacity.
    pub async fn enqueue(&self, record: TaskRecord) {
        self.lock().await.push(record);
    }

    /// Take the oldest record, waiting until one is available.
    pub async fn dequeue(&self) -> TaskRecord {
        loop {
            let notified = self.notify.notified();
            if let Some(record) = self.items.lock().await.pop_front() {
                return record;
            }
            notified.await;
        }
    }

    /// Take the oldest record if there is one.
    pub async fn try_dequeue(&self) -> Option<TaskRecord> {
        self.items.lock().await.pop_front()
    }

    /// Number of tasks waiting for a worker.
    pub async fn len(&self) -> usize {
        self.items.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.lock().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::tasks::model::TaskParams;

    fn make_record(id: u64) -> TaskRecord {
        let params = TaskParams {
            count: 1,
            delta: 1.0,
            start: 0,
            interval: 0.0,
        };
        TaskRecord::new(id, 1, params)
    }

    #[tokio::test]
    async fn fifo_order() {
        let queue = WorkQueue::new();
        for id in 1..=3 {
            queue.enqueue(make_record(id)).await;
        }
        assert_eq!(queue.len().await, 3);

        assert_eq!(queue.dequeue().await.id, 1);
        assert_eq!(queue.dequeue().await.id, 2);
        assert_eq!(queue.dequeue().await.id, 3);
        assert!(queue.is_empty().await);
        assert!(queue.try_dequeue().await.is_none());
    }

    #[tokio::test]
    async fn position_tracks_length() {
        let queue = WorkQueue::new();
        let guard = queue.lock().await;
        assert_eq!(guard.position(), 1);
        guard.push(make_record(1));

        let guard = queue.lock().await;
        assert_eq!(guard.position(), 2);
        guard.push(make_record(2));

        queue.try_dequeue().await;
        assert_eq!(queue.lock().await.position(), 2);
    }

    #[tokio::test]
    async fn dequeue_waits_for_enqueue() {
        let queue = Arc::new(WorkQueue::new());

        let waiter = {
            let queue = Arc::clone(&queue);
            tokio::spawn(async move { queue.dequeue().await })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        queue.enqueue(make_record(42)).await;
        let record = tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("dequeue never woke")
            .unwrap();
        assert_eq!(record.id, 42);
    }

    #[tokio::test]
    async fn each_record_goes_to_one_waiter() {
        let queue = Arc::new(WorkQueue::new());
        let mut waiters = Vec::new();
        for _ in 0..3 {
            let queue = Arc::clone(&queue);
            waiters.push(tokio::spawn(async move { queue.dequeue().await.id }));
        }

        for id in 1..=3 {
            queue.enqueue(make_record(id)).await;
        }

        let mut got = Vec::new();
        for waiter in waiters {
            got.push(
                tokio::time::timeout(Duration::from_secs(1), waiter)
                    .await
                    .expect("waiter starved")
                    .unwrap(),
            );
        }
        got.sort();
        assert_eq!(got, vec![1, 2, 3]);
    }
}
