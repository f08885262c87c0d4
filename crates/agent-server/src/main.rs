//! agent-crew HTTP server
//!
//! # Usage
//!
//! ```bash
//! export OPENAI_API_KEY="sk-..."
//! cargo run --bin agent-server -- --port 5000
//!
//! curl -X POST http://localhost:5000/process \
//!      -H 'Content-Type: application/json' \
//!      -d '{"prompt": "climate change"}'
//! ```

use agent_server::{AppState, CrewService, router};
use agent_utils::Config;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "agent-server")]
#[command(about = "HTTP service running a research, analysis and writing crew", long_about = None)]
struct Args {
    /// Interface to bind (overrides HOST)
    #[arg(long)]
    host: Option<String>,

    /// Port to bind (overrides PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Env file to load before reading the environment
    #[arg(long)]
    env_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = Config::load(args.env_file.as_deref())?;
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }

    agent_utils::init_tracing(&config.log_format);
    info!(
        model = %config.model,
        api_base = %config.openai_api_base,
        verbose = config.verbose,
        "Starting {}",
        config.service_name
    );

    let service = CrewService::from_config(&config)?;
    let app = router(AppState::new(Arc::new(service), config.service_name.clone()));

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
