use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;

use super::{success, success_with, ApiResult, Auth};
use crate::services::AddToCartRequest;
use crate::AppState;

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(show).delete(clear))
        .route("/summary", get(summary))
        .route("/add", post(add))
        .route("/:item_id", put(update).delete(remove))
}

#[derive(Deserialize)]
struct QuantityUpdate {
    quantity: i64,
}

async fn show(State(state): State<AppState>, Auth(user): Auth) -> ApiResult {
    let cart = state.carts.get(&user.id).await?;
    Ok(success(json!({ "cart": cart })))
}

async fn summary(State(state): State<AppState>, Auth(user): Auth) -> ApiResult {
    let summary = state.carts.summary(&user.id).await?;
    Ok(success(json!({ "summary": summary })))
}

async fn add(
    State(state): State<AppState>,
    Auth(user): Auth,
    body: Result<Json<AddToCartRequest>, JsonRejection>,
) -> ApiResult {
    let Json(request) = body?;
    let cart = state.carts.add(&user.id, request).await?;
    Ok(success_with("Item added to cart", json!({ "cart": cart })))
}

async fn update(
    State(state): State<AppState>,
    Auth(user): Auth,
    Path(item_id): Path<String>,
    body: Result<Json<QuantityUpdate>, JsonRejection>,
) -> ApiResult {
    let Json(update) = body?;
    let cart = state
        .carts
        .update_quantity(&user.id, &item_id, update.quantity)
        .await?;
    Ok(success_with("Cart updated", json!({ "cart": cart })))
}

async fn remove(
    State(state): State<AppState>,
    Auth(user): Auth,
    Path(item_id): Path<String>,
) -> ApiResult {
    let cart = state.carts.remove(&user.id, &item_id).await?;
    Ok(success_with("Item removed from cart", json!({ "cart": cart })))
}

async fn clear(State(state): State<AppState>, Auth(user): Auth) -> ApiResult {
    state.carts.clear(&user.id).await?;
    Ok(success_with("Cart cleared", json!({})))
}
