//! Route table, health check, and cross-cutting middleware.

use std::time::Instant;

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, patch},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::{error::ApiError, state::AppState, store::TodoStore, todo::handler};

const ALLOW_HEADERS: &str = "Content-Type, Authorization";
const ALLOW_METHODS: &str = "GET, POST, PUT, PATCH, DELETE, OPTIONS";

/// Body of `GET /api/health`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HealthStatus {
    pub ok: bool,
    pub env: String,
}

pub fn router<S: TodoStore>(state: AppState<S>) -> Router {
    Router::new()
        .route("/api/health", get(health::<S>))
        .route(
            "/api/todos",
            get(handler::list::<S>).post(handler::create::<S>),
        )
        .route(
            "/api/todos/{id}",
            patch(handler::update::<S>).delete(handler::delete::<S>),
        )
        .fallback(not_found)
        .layer(middleware::from_fn(cors))
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

async fn health<S: TodoStore>(State(state): State<AppState<S>>) -> Json<HealthStatus> {
    Json(HealthStatus {
        ok: true,
        env: state.env.to_string(),
    })
}

async fn not_found() -> ApiError {
    ApiError::NotFound
}

/// Permit any origin on every response. Preflight requests are answered
/// here and never reach a handler.
async fn cors(request: Request, next: Next) -> Response {
    let mut response = if request.method() == Method::OPTIONS {
        StatusCode::NO_CONTENT.into_response()
    } else {
        next.run(request).await
    };

    let headers = response.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOW_HEADERS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOW_METHODS),
    );
    response
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let started = Instant::now();

    let response = next.run(request).await;

    tracing::info!(
        %method,
        %path,
        status = response.status().as_u16(),
        latency_ms = started.elapsed().as_secs_f64() * 1000.0,
        "request"
    );
    response
}
