//! Book handlers.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use bookstore_core::validation::{
    resolve_page_window, validate_book, validate_search_query, validate_threshold,
};
use bookstore_core::{Book, BookInput, ListQuery};
use serde::Deserialize;

use super::MessageResponse;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_books).post(create_book))
        .route("/low-stock", get(low_stock))
        .route("/{id}", get(get_book).put(update_book).delete(delete_book))
}

#[derive(Debug, Deserialize)]
pub struct LowStockQuery {
    #[serde(default)]
    pub threshold: Option<i64>,
}

async fn list_books(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<Book>>> {
    let Query(query) = query?;
    let search = validate_search_query(query.search.as_deref())?;
    let window = resolve_page_window(query.page, query.limit);

    let books = state.db.books().list(search.as_deref(), window).await?;
    Ok(Json(books))
}

async fn get_book(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Book>> {
    state
        .db
        .books()
        .get_by_id(&id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Book"))
}

async fn create_book(
    State(state): State<AppState>,
    payload: Result<Json<BookInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Book>)> {
    let Json(input) = payload?;
    let input = input.normalized();
    validate_book(&input)?;

    let book = state.db.books().insert(&input).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<BookInput>, JsonRejection>,
) -> ApiResult<Json<Book>> {
    let Json(input) = payload?;
    let input = input.normalized();
    validate_book(&input)?;

    let book = state.db.books().update(&id, &input).await?;
    Ok(Json(book))
}

async fn delete_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    state.db.books().delete(&id).await?;
    Ok(Json(MessageResponse::new("Book removed")))
}

async fn low_stock(
    State(state): State<AppState>,
    query: Result<Query<LowStockQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<Book>>> {
    let Query(query) = query?;
    let threshold = query.threshold.unwrap_or(state.config.low_stock_threshold);
    validate_threshold(threshold)?;

    let books = state.db.books().low_stock(threshold).await?;
    Ok(Json(books))
}
