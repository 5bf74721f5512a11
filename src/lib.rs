//! seqtask — HTTP-admitted task queue drained by a fixed worker pool.

pub mod config;
pub mod error;
pub mod tasks;
