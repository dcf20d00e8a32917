use std::net::SocketAddr;

use take_me_home::config::AppConfig;
use take_me_home::web::{AppState, create_router};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env();
    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));

    let state = AppState::new(config);
    let app = create_router(state);

    info!(%addr, "Take Me Home listening");
    info!("  GET  /v1/health        - Health check");
    info!("  GET  /v1/routes        - Evaluate candidate routes (?depart_at=YYYY-MM-DDTHH:MM)");
    info!("  GET  /v1/routes/live   - Evaluate ferry routes from live data");
    info!("  POST /v1/plans/score   - Score a travel plan");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    axum::serve(listener, app).await.expect("Server error");
}
