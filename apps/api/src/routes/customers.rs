//! Customer handlers.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use bookstore_core::validation::{resolve_page_window, validate_customer, validate_search_query};
use bookstore_core::{Customer, CustomerInput, ListQuery};

use super::MessageResponse;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_customers).post(create_customer))
        .route(
            "/{id}",
            get(get_customer).put(update_customer).delete(delete_customer),
        )
}

async fn list_customers(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<Customer>>> {
    let Query(query) = query?;
    let search = validate_search_query(query.search.as_deref())?;
    let window = resolve_page_window(query.page, query.limit);

    let customers = state.db.customers().list(search.as_deref(), window).await?;
    Ok(Json(customers))
}

async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Customer>> {
    state
        .db
        .customers()
        .get_by_id(&id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Customer"))
}

async fn create_customer(
    State(state): State<AppState>,
    payload: Result<Json<CustomerInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Customer>)> {
    let Json(input) = payload?;
    let input = input.normalized();
    validate_customer(&input)?;

    let customer = state.db.customers().insert(&input).await?;
    Ok((StatusCode::CREATED, Json(customer)))
}

async fn update_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<CustomerInput>, JsonRejection>,
) -> ApiResult<Json<Customer>> {
    let Json(input) = payload?;
    let input = input.normalized();
    validate_customer(&input)?;

    let customer = state.db.customers().update(&id, &input).await?;
    Ok(Json(customer))
}

async fn delete_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    state.db.customers().delete(&id).await?;
    Ok(Json(MessageResponse::new("Customer removed")))
}
