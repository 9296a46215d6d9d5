use anyhow::Context as _;
use sea_orm::Database;
use tracing::info;

use campus_attendance::config::AttendanceConfig;
use campus_attendance::infra::codec::ChaChaPayloadCodec;
use campus_attendance::router::build_router;
use campus_attendance::state::AppState;
use campus_auth_types::identity::AccessTokenSecret;
use campus_core::tracing::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AttendanceConfig::from_env().context("load attendance config")?;

    let db = Database::connect(&config.database_url)
        .await
        .context("connect to database")?;

    let state = AppState {
        db,
        access_token_secret: AccessTokenSecret::new(config.jwt_secret),
        codec: ChaChaPayloadCodec::new(&config.qr_secret),
    };

    let router = build_router(state);
    let http_addr = format!("0.0.0.0:{}", config.attendance_port);
    let listener = tokio::net::TcpListener::bind(&http_addr)
        .await
        .with_context(|| format!("bind {http_addr}"))?;

    info!("attendance service listening on {http_addr}");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serve http")?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        return std::future::pending().await;
    }
    info!("shutdown signal received");
}
