//! Configuration types.

use clap::Parser;

/// Default number of background workers.
pub const DEFAULT_WORKERS: usize = 3;

/// Server configuration, read once at startup from CLI flags or environment.
#[derive(Debug, Clone, Parser)]
#[command(name = "seqtask")]
#[command(about = "Queue arithmetic-sequence tasks over HTTP and poll their progress")]
#[command(version)]
pub struct ServerConfig {
    /// Number of background workers draining the task queue.
    #[arg(short, long, default_value_t = DEFAULT_WORKERS, env = "SEQTASK_WORKERS")]
    pub workers: usize,

    /// Host/IP to listen on.
    #[arg(long, default_value = "localhost", env = "SEQTASK_HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(short, long, default_value_t = 8000, env = "SEQTASK_PORT")]
    pub port: u16,
}

impl ServerConfig {
    /// Address to bind, as `host:port`.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            host: "localhost".to_string(),
            port: 8000,
        }
    }
}
