//! Task data model — the tracked record, its status, and validated request parameters.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{FieldError, FieldReason, ValidationError};

/// Status of a tracked task.
///
/// There is no terminal variant: a finished task is removed from the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TaskStatus {
    /// Waiting in the work queue.
    #[serde(rename = "In queue")]
    InQueue,
    /// Claimed by a worker and being computed.
    #[serde(rename = "In process")]
    InProcess,
}

/// Validated parameters of a task-creation request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaskParams {
    /// Number of computation steps.
    pub count: i64,
    /// Increment applied per step.
    pub delta: f64,
    /// First value of the sequence.
    pub start: i64,
    /// Seconds to wait after each step.
    pub interval: f64,
}

impl TaskParams {
    /// Validate raw query parameters, reporting every offending field at once.
    pub fn from_query(query: &HashMap<String, String>) -> Result<Self, ValidationError> {
        let mut errors = Vec::new();

        let count = parse_int(query, "count", &mut errors);
        let delta = parse_float(query, "delta", &mut errors);
        let start = parse_int(query, "start", &mut errors);
        let interval = parse_float(query, "interval", &mut errors).and_then(|v| {
            match Duration::try_from_secs_f64(v) {
                Ok(_) => Some(v),
                Err(_) if v < 0.0 => {
                    errors.push(FieldError::new("interval", FieldReason::Negative));
                    None
                }
                Err(_) => {
                    errors.push(FieldError::new("interval", FieldReason::OutOfRange));
                    None
                }
            }
        });

        match (count, delta, start, interval) {
            (Some(count), Some(delta), Some(start), Some(interval)) if errors.is_empty() => {
                Ok(Self {
                    count,
                    delta,
                    start,
                    interval,
                })
            }
            _ => Err(ValidationError::new(errors)),
        }
    }

    /// Delay a worker waits after each step.
    pub fn step_delay(&self) -> Duration {
        Duration::try_from_secs_f64(self.interval).unwrap_or(Duration::ZERO)
    }

    /// Value of the sequence at 0-indexed step `n`.
    pub fn value_at(&self, n: i64) -> f64 {
        self.start as f64 + self.delta * n as f64
    }
}

fn parse_int(
    query: &HashMap<String, String>,
    field: &'static str,
    errors: &mut Vec<FieldError>,
) -> Option<i64> {
    let Some(raw) = query.get(field) else {
        errors.push(FieldError::new(field, FieldReason::Missing));
        return None;
    };
    match raw.trim().parse::<i64>() {
        Ok(v) => Some(v),
        Err(_) => {
            errors.push(FieldError::new(field, FieldReason::NotAnInteger));
            None
        }
    }
}

fn parse_float(
    query: &HashMap<String, String>,
    field: &'static str,
    errors: &mut Vec<FieldError>,
) -> Option<f64> {
    let Some(raw) = query.get(field) else {
        errors.push(FieldError::new(field, FieldReason::Missing));
        return None;
    };
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Some(v),
        Ok(_) => {
            errors.push(FieldError::new(field, FieldReason::NotFinite));
            None
        }
        Err(_) => {
            errors.push(FieldError::new(field, FieldReason::NotANumber));
            None
        }
    }
}

/// A tracked task and its progress.
///
/// Field order is the JSON field order. Unset optional fields serialize as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskRecord {
    /// Unique, strictly increasing identifier.
    pub id: u64,
    /// Queue position observed at admission. Goes stale as earlier tasks finish.
    pub number_in_queue: usize,
    /// Current status.
    pub status: TaskStatus,
    pub count: i64,
    pub delta: f64,
    pub start: i64,
    pub interval: f64,
    /// Last computed value; `None` until the first step runs.
    pub current_value: Option<f64>,
    /// When a worker claimed the task; `None` while queued.
    pub date: Option<DateTime<Utc>>,
}

impl TaskRecord {
    /// Create a queued record from validated parameters.
    pub fn new(id: u64, number_in_queue: usize, params: TaskParams) -> Self {
        Self {
            id,
            number_in_queue,
            status: TaskStatus::InQueue,
            count: params.count,
            delta: params.delta,
            start: params.start,
            interval: params.interval,
            current_value: None,
            date: None,
        }
    }

    /// The computation parameters carried by this record.
    pub fn params(&self) -> TaskParams {
        TaskParams {
            count: self.count,
            delta: self.delta,
            start: self.start,
            interval: self.interval,
        }
    }

    /// Mark the record as claimed by a worker.
    pub fn mark_in_process(&mut self) {
        self.status = TaskStatus::InProcess;
        self.date = Some(Utc::now());
    }
}
