use std::future::IntoFuture;

use clap::Parser;

use seqtask::config::ServerConfig;
use seqtask::error::ConfigError;
use seqtask::tasks::routes::task_routes;
use seqtask::tasks::{TaskContext, WorkerPool};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = ServerConfig::parse();

    eprintln!("seqtask v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Workers: {}", config.workers);
    eprintln!("   Create: http://{}/create_task", config.bind_addr());
    eprintln!("   States: http://{}/states\n", config.bind_addr());

    let ctx = TaskContext::new();
    let pool = WorkerPool::spawn(ctx.clone(), config.workers);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|source| ConfigError::Bind {
            addr: addr.clone(),
            source,
        })?;
    tracing::info!(addr = %addr, "HTTP server started");

    let app = task_routes(ctx);
    tokio::select! {
        result = axum::serve(listener, app).into_future() => result?,
        _ = pool.supervise() => {}
        _ = tokio::signal::ctrl_c() => tracing::info!("Shutting down"),
    }

    Ok(())
}
