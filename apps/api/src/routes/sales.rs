//! Sale handlers.
//!
//! Stock reconciliation happens inside the repository transaction; these
//! handlers only parse input and map errors.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use bookstore_core::validation::resolve_page_window;
use bookstore_core::{NewSale, Sale, SaleDetail, UpdateSale, DEFAULT_RECENT_SALES, MAX_PAGE_SIZE};
use serde::Deserialize;

use super::MessageResponse;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_sales).post(create_sale))
        .route("/recent", get(recent_sales))
        .route("/{id}", get(get_sale).put(update_sale).delete(delete_sale))
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    #[serde(default)]
    pub limit: Option<u32>,
}

async fn list_sales(
    State(state): State<AppState>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<Sale>>> {
    let Query(query) = query?;
    let window = resolve_page_window(query.page, query.limit);

    let sales = state.db.sales().list(window).await?;
    Ok(Json(sales))
}

async fn recent_sales(
    State(state): State<AppState>,
    query: Result<Query<RecentQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<SaleDetail>>> {
    let Query(query) = query?;
    let limit = query
        .limit
        .unwrap_or(DEFAULT_RECENT_SALES)
        .clamp(1, MAX_PAGE_SIZE);

    let sales = state.db.sales().recent(limit).await?;
    Ok(Json(sales))
}

async fn get_sale(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Sale>> {
    state
        .db
        .sales()
        .get_by_id(&id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Sale"))
}

async fn create_sale(
    State(state): State<AppState>,
    payload: Result<Json<NewSale>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Sale>)> {
    let Json(input) = payload?;

    let sale = state.db.sales().create(&input).await?;
    Ok((StatusCode::CREATED, Json(sale)))
}

async fn update_sale(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateSale>, JsonRejection>,
) -> ApiResult<Json<Sale>> {
    let Json(input) = payload?;

    let sale = state.db.sales().update(&id, &input).await?;
    Ok(Json(sale))
}

async fn delete_sale(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    state.db.sales().delete(&id).await?;
    Ok(Json(MessageResponse::new("Sale removed")))
}
