use clap::Parser;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use rai_ops_gateway::config::{Args, Limits};
use rai_ops_gateway::coordinator::RequestCoordinator;
use rai_ops_gateway::handlers;
use rai_ops_gateway::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("rai_ops_gateway=info,info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(true).init();

    let args = Args::parse();
    let limits = Limits::from(&args);

    let coordinator = RequestCoordinator::with_reference_collaborators(limits)?;
    let state = Arc::new(AppState::new(coordinator));
    let app = handlers::router(state);

    let addr = format!("0.0.0.0:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(port = args.port, "gateway listening");
    info!(
        rate_limit = limits.max_requests_per_window,
        rate_window_secs = limits.window.as_secs(),
        latency_window = limits.latency_window,
        recent_capacity = limits.recent_capacity,
        percentile_method = ?limits.percentile_method,
        "limits"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
