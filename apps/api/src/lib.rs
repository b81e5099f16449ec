//! # Bookstore API
//!
//! REST backend for the bookstore admin frontend.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  HTTP ──► TraceLayer ──► CorsLayer ──► timeout (408) ──► Router         │
//! │                                                           │             │
//! │           /api/books      ──► routes::books               │             │
//! │           /api/customers  ──► routes::customers     ◄─────┘             │
//! │           /api/sales      ──► routes::sales                             │
//! │           /api/dashboard  ──► routes::dashboard                         │
//! │           /healthz        ──► SELECT 1                                  │
//! │                                   │                                     │
//! │                                   ▼                                     │
//! │                         bookstore-db repositories                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The router is built by [`build_router`] so integration tests can drive it
//! with `tower::ServiceExt::oneshot` against an in-memory database.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::error_handling::HandleErrorLayer;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{BoxError, Router};
use bookstore_db::Database;
use tower::timeout::error::Elapsed;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing_subscriber::EnvFilter;

pub use config::{ConfigError, LogFormat, ServerConfig};
pub use error::{ApiError, ApiResult, ErrorCode};

/// Shared state handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(db: Database, config: ServerConfig) -> Self {
        AppState {
            db,
            config: Arc::new(config),
        }
    }
}

/// Builds the full application router with middleware attached.
pub fn build_router(state: AppState) -> Router {
    let timeout = state.config.request_timeout();

    Router::new()
        .route("/healthz", get(healthz))
        .nest("/api/books", routes::books::router())
        .nest("/api/customers", routes::customers::router())
        .nest("/api/sales", routes::sales::router())
        .nest("/api/dashboard", routes::dashboard::router())
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_middleware_error))
                .timeout(timeout),
        )
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(tracing::Level::INFO))
                .on_response(DefaultOnResponse::new().level(tracing::Level::INFO)),
        )
}

/// Turns middleware failures into the usual `{message, code}` body.
async fn handle_middleware_error(err: BoxError) -> ApiError {
    if err.is::<Elapsed>() {
        tracing::warn!("Request timed out");
        ApiError::timeout()
    } else {
        tracing::error!(error = %err, "Unhandled middleware error");
        ApiError::internal()
    }
}

async fn healthz(State(state): State<AppState>) -> (StatusCode, &'static str) {
    if state.db.health_check().await {
        (StatusCode::OK, "ok")
    } else {
        tracing::warn!("Health check failed: database unreachable");
        (StatusCode::SERVICE_UNAVAILABLE, "database unavailable")
    }
}

/// Initializes the tracing subscriber.
///
/// `RUST_LOG` overrides the default filter.
pub fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,bookstore=debug,sqlx=warn,tower_http=info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    match format {
        LogFormat::Pretty => builder.pretty().init(),
        LogFormat::Json => builder.json().init(),
    }
}
