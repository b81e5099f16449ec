//! Dashboard handlers.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use bookstore_core::DashboardStats;

use crate::error::ApiResult;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/stats", get(stats))
}

async fn stats(State(state): State<AppState>) -> ApiResult<Json<DashboardStats>> {
    let stats = state.db.dashboard().stats().await?;
    Ok(Json(stats))
}
