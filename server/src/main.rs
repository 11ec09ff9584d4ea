use std::net::SocketAddr;

use anyhow::Context;
use tokio::net::TcpListener;
use todo_server::{telemetry, AppState, Config, PgStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    telemetry::init_subscriber(env!("CARGO_PKG_NAME"), "info")?;

    let config = Config::from_env().context("invalid configuration")?;
    let store = PgStore::connect(&config.database)
        .await
        .context("connect db failed")?;
    store.migrate().await.context("failed to migrate database")?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.app_port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, env = %config.app_env, "listening");

    todo_server::run(listener, AppState::new(store, config.app_env)).await?;
    Ok(())
}
