use anyhow::Context;

use leadblocks_api::auth::TokenService;
use leadblocks_api::config::AppConfig;
use leadblocks_api::database::Database;
use leadblocks_api::{build_router, init_tracing, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up JWT_SECRET, DATABASE_PATH, etc.
    let _ = dotenvy::dotenv();
    init_tracing("info,tower_http=info");

    let config = AppConfig::from_env();
    tracing::info!("Starting LeadBlocks API in {:?} mode", config.environment);

    let db = Database::open(&config.database)
        .await
        .with_context(|| format!("failed to open database at {}", config.database.path.display()))?;

    db.seed_admin(config.security.password_cost).await?;

    let tokens = TokenService::from_config(&config.security);
    let bind_addr = config.bind_addr();
    let app = build_router(AppState::new(db.clone(), tokens, config));

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    tracing::info!("LeadBlocks API listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    db.close().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
