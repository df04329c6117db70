use anyhow::Context;
use clap::Parser;
use dotenvy::dotenv;
use tracing::info;

use scoreboard::logging::{init_tracing, shutdown_tracer};
use scoreboard::metrics::{init_metrics, metrics_app};
use scoreboard::router::init_router;
use scoreboard::state::init_app_state;
use scoreboard_config::ServerConfig;

#[derive(Parser, Debug)]
#[command(name = "scoreboard", version, about = "Scoreboard competition API server")]
struct Cli {
    /// Address to listen on
    #[arg(long, env = "BIND_ADDR")]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let cli = Cli::parse();

    init_tracing().context("failed to initialize logging")?;

    let server_config = ServerConfig::from_env();
    let bind_addr = cli.bind.unwrap_or_else(|| server_config.bind_addr.clone());

    let state = init_app_state()
        .await
        .context("failed to open document store")?;
    let mut app = init_router(state).context("invalid endpoint registry")?;

    let metrics_handle = init_metrics(server_config.observability_enabled)
        .context("failed to install metrics recorder")?;
    if let Some(handle) = metrics_handle {
        app = app.merge(metrics_app(handle));
    }

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    info!(address = %bind_addr, "Server running");
    info!("Swagger UI available at http://{}/swagger-ui", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    shutdown_tracer().await;
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}
