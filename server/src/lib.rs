//! HTTP service for a paginated list of todo items backed by PostgreSQL.
//!
//! # Overview
//! `router` binds the CRUD handlers under `/api/todos`, a liveness check at
//! `/api/health`, and a blanket CORS policy. Durable state lives behind the
//! [`TodoStore`] trait; the binary wires in [`PgStore`], tests use
//! [`MemoryStore`].
//!
//! # Design
//! - The store handle is built once at startup and injected through
//!   [`AppState`]; handlers never reach for globals.
//! - Handlers are generic over the store so the router can be exercised with
//!   `tower::ServiceExt::oneshot` without a database.
//! - Every client-facing error is a short fixed message; internal detail is
//!   logged, never returned.

pub mod config;
pub mod error;
pub mod router;
pub mod state;
pub mod store;
pub mod telemetry;
pub mod todo;

pub use config::{Config, ConfigError, DatabaseConfig};
pub use error::ApiError;
pub use router::router;
pub use state::AppState;
pub use store::{MemoryStore, PgStore, StoreError, TodoStore};
pub use todo::{CreateTodoRequest, Todo, TodoPage, UpdateTodoRequest};

use tokio::net::TcpListener;

/// Serve the API on `listener` until the process receives Ctrl-C.
pub async fn run<S: TodoStore>(
    listener: TcpListener,
    state: AppState<S>,
) -> Result<(), std::io::Error> {
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::info!("shutdown signal received");
    } else {
        // No signal handler available; keep serving.
        std::future::pending::<()>().await;
    }
}
