//! Routes and the JSON envelope.
//!
//! Successful responses are `{"success": true, "message"?: ..., ...payload}`;
//! errors are rendered by [`ApiError`].

mod accounts;
mod carts;
mod extract;
mod orders;
mod payments;
mod products;
mod wishlists;


use axum::http::StatusCode;
use axum::routing::get;
use axum::{middleware, Json, Router};
use serde_json::{json, Map, Value};

use crate::logging::log_requests;
use crate::{ApiError, AppState};

pub use extract::Auth;

pub(crate) type ApiResult = Result<Json<Value>, ApiError>;

/// Build the full application router.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/health", get(health))
        .nest("/auth", accounts::routes())
        .nest("/products", products::routes())
        .nest("/cart", carts::routes())
        .nest("/wishlist", wishlists::routes())
        .nest("/orders", orders::routes())
        .nest("/payment", payments::routes());

    Router::new()
        .nest("/api", api)
        .fallback(not_found)
        .layer(middleware::from_fn(log_requests))
        .with_state(state)
}

pub(crate) fn success(payload: Value) -> Json<Value> {
    envelope(None, payload)
}

pub(crate) fn success_with(message: &str, payload: Value) -> Json<Value> {
    envelope(Some(message), payload)
}

fn envelope(message: Option<&str>, payload: Value) -> Json<Value> {
    let mut body = Map::new();
    body.insert("success".to_string(), Value::Bool(true));
    if let Some(message) = message {
        body.insert("message".to_string(), Value::from(message));
    }
    if let Value::Object(fields) = payload {
        body.extend(fields);
    }
    Json(Value::Object(body))
}

async fn health() -> Json<Value> {
    success_with(
        "Storefront API is running",
        json!({ "timestamp": chrono::Utc::now() }),
    )
}

async fn not_found() -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "success": false, "message": "Route not found" })),
    )
}
