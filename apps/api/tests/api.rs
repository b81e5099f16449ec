//! HTTP integration tests.
//!
//! Each test builds the full router over a fresh in-memory database and
//! drives it with `oneshot`.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use bookstore_api::{build_router, AppState, ServerConfig};
use bookstore_db::{Database, DbConfig};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn setup_app() -> Router {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    build_router(AppState::new(db, ServerConfig::default()))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    (status, value)
}

fn book_body(isbn: &str, price_cents: i64, stock: i64) -> Value {
    json!({
        "title": "Pride and Prejudice",
        "author": "Jane Austen",
        "isbn": isbn,
        "priceCents": price_cents,
        "stock": stock,
        "category": "Classics"
    })
}

async fn create_book(app: &Router, isbn: &str, price_cents: i64, stock: i64) -> String {
    let (status, book) = send(app, "POST", "/api/books", Some(book_body(isbn, price_cents, stock))).await;
    assert_eq!(status, StatusCode::CREATED, "{book}");
    book["id"].as_str().unwrap().to_string()
}

async fn create_customer(app: &Router, email: &str) -> String {
    let (status, customer) = send(
        app,
        "POST",
        "/api/customers",
        Some(json!({ "name": "Ada Lovelace", "email": email })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{customer}");
    customer["id"].as_str().unwrap().to_string()
}

async fn stock_of(app: &Router, book_id: &str) -> i64 {
    let (_, book) = send(app, "GET", &format!("/api/books/{book_id}"), None).await;
    book["stock"].as_i64().unwrap()
}

#[tokio::test]
async fn test_healthz() {
    let app = setup_app().await;
    let (status, body) = send(&app, "GET", "/healthz", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("ok".to_string()));
}

#[tokio::test]
async fn test_sale_lifecycle_reconciles_stock() {
    let app = setup_app().await;
    let book_id = create_book(&app, "0306406152", 1000, 5).await;
    let customer_id = create_customer(&app, "ada@example.com").await;

    let (status, sale) = send(
        &app,
        "POST",
        "/api/sales",
        Some(json!({ "bookId": book_id, "customerId": customer_id, "quantity": 3 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(sale["amountCents"], 3000);
    assert_eq!(stock_of(&app, &book_id).await, 2);

    let sale_id = sale["id"].as_str().unwrap().to_string();

    let (status, updated) = send(
        &app,
        "PUT",
        &format!("/api/sales/{sale_id}"),
        Some(json!({ "quantity": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["amountCents"], 1000);
    assert_eq!(stock_of(&app, &book_id).await, 4);

    let (status, body) = send(&app, "DELETE", &format!("/api/sales/{sale_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Sale removed");
    assert_eq!(stock_of(&app, &book_id).await, 5);

    let (status, body) = send(&app, "GET", &format!("/api/sales/{sale_id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Sale not found");
}

#[tokio::test]
async fn test_oversell_rejected() {
    let app = setup_app().await;
    let book_id = create_book(&app, "0306406152", 1000, 2).await;
    let customer_id = create_customer(&app, "ada@example.com").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/sales",
        Some(json!({ "bookId": book_id, "customerId": customer_id, "quantity": 3 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Not enough stock. Available: 2, Requested: 3");
    assert_eq!(body["code"], "INSUFFICIENT_STOCK");
    assert_eq!(stock_of(&app, &book_id).await, 2);

    let (_, sales) = send(&app, "GET", "/api/sales", None).await;
    assert_eq!(sales.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_sale_references_must_exist() {
    let app = setup_app().await;
    let book_id = create_book(&app, "0306406152", 1000, 2).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/sales",
        Some(json!({ "bookId": "nope", "customerId": "nope", "quantity": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Book not found");

    let (status, body) = send(
        &app,
        "POST",
        "/api/sales",
        Some(json!({ "bookId": book_id, "customerId": "nope", "quantity": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Customer not found");
    assert_eq!(stock_of(&app, &book_id).await, 2);
}

#[tokio::test]
async fn test_duplicates_rejected() {
    let app = setup_app().await;
    create_book(&app, "0306406152", 1000, 1).await;
    create_customer(&app, "ada@example.com").await;

    let (status, body) = send(&app, "POST", "/api/books", Some(book_body("0306406152", 500, 1))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Book with this ISBN already exists");

    let (status, body) = send(
        &app,
        "POST",
        "/api/customers",
        Some(json!({ "name": "Ada", "email": "ADA@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Customer with this email already exists");
}

#[tokio::test]
async fn test_book_crud() {
    let app = setup_app().await;
    let id = create_book(&app, "0306406152", 1000, 1).await;

    let mut replacement = book_body("0306406152", 1250, 7);
    replacement["title"] = json!("Emma");
    let (status, book) = send(&app, "PUT", &format!("/api/books/{id}"), Some(replacement)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(book["title"], "Emma");
    assert_eq!(book["priceCents"], 1250);

    let (status, body) = send(&app, "DELETE", &format!("/api/books/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Book removed");

    let (status, body) = send(&app, "DELETE", &format!("/api/books/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Book not found");
}

#[tokio::test]
async fn test_validation_errors() {
    let app = setup_app().await;

    let (status, body) = send(&app, "POST", "/api/books", Some(book_body("12345", 1000, 1))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, _) = send(&app, "POST", "/api/books", Some(book_body("0306406152", -1, 1))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        "POST",
        "/api/customers",
        Some(json!({ "name": "Ada", "email": "not-an-email" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, body) = send(&app, "POST", "/api/customers", Some(json!({ "name": 7 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_list_search_and_pagination() {
    let app = setup_app().await;
    for (i, isbn) in ["0306406152", "0140449132", "9780141439518"].iter().enumerate() {
        let mut body = book_body(isbn, 1000, i as i64);
        body["title"] = json!(format!("Volume {}", i + 1));
        let (status, _) = send(&app, "POST", "/api/books", Some(body)).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, all) = send(&app, "GET", "/api/books", None).await;
    assert_eq!(all.as_array().unwrap().len(), 3);

    let (_, page) = send(&app, "GET", "/api/books?page=2&limit=2", None).await;
    let page = page.as_array().unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0]["title"], "Volume 3");

    let (_, found) = send(&app, "GET", "/api/books?search=volume%202", None).await;
    assert_eq!(found.as_array().unwrap().len(), 1);

    let (status, _) = send(&app, "GET", "/api/books?page=abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, low) = send(&app, "GET", "/api/books/low-stock?threshold=1", None).await;
    let low = low.as_array().unwrap();
    assert_eq!(low.len(), 2);
    assert_eq!(low[0]["stock"], 0);
}

#[tokio::test]
async fn test_dashboard_and_recent() {
    let app = setup_app().await;
    let book_id = create_book(&app, "0306406152", 1250, 10).await;
    let customer_id = create_customer(&app, "ada@example.com").await;

    for quantity in [1, 2] {
        let (status, _) = send(
            &app,
            "POST",
            "/api/sales",
            Some(json!({ "bookId": book_id, "customerId": customer_id, "quantity": quantity })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, stats) = send(&app, "GET", "/api/dashboard/stats", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        stats,
        json!({ "totalBooks": 1, "totalSales": 2, "totalCustomers": 1, "totalRevenueCents": 3750 })
    );

    let (_, recent) = send(&app, "GET", "/api/sales/recent?limit=1", None).await;
    let recent = recent.as_array().unwrap();
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0]["bookTitle"], "Pride and Prejudice");
    assert_eq!(recent[0]["customerName"], "Ada Lovelace");
}
