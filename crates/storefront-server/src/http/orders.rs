use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, patch};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use storefront_commerce::OrderId;

use super::{success, success_with, ApiResult, Auth};
use crate::services::CreateOrderRequest;
use crate::{ApiError, AppState};

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/:id", get(show))
        .route("/:id/status", patch(update_status))
        .route("/:id/cancel", patch(cancel))
}

#[derive(Deserialize)]
struct StatusUpdate {
    status: String,
}

async fn create(
    State(state): State<AppState>,
    Auth(user): Auth,
    body: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let Json(request) = body?;
    let order = state.orders.create_order(&user, request).await?;
    Ok((
        StatusCode::CREATED,
        success_with("Order created successfully", json!({ "order": order })),
    ))
}

async fn list(State(state): State<AppState>, Auth(user): Auth) -> ApiResult {
    let orders = state.orders.list_orders(&user).await?;
    Ok(success(json!({ "count": orders.len(), "orders": orders })))
}

async fn show(
    State(state): State<AppState>,
    Auth(user): Auth,
    Path(id): Path<String>,
) -> ApiResult {
    let order = state.orders.get_order(&user, &OrderId::new(id)).await?;
    Ok(success(json!({ "order": order })))
}

async fn update_status(
    State(state): State<AppState>,
    Auth(user): Auth,
    Path(id): Path<String>,
    body: Result<Json<StatusUpdate>, JsonRejection>,
) -> ApiResult {
    let Json(update) = body?;
    let order = state
        .orders
        .update_status(&user, &OrderId::new(id), &update.status)
        .await?;
    Ok(success_with("Order status updated", json!({ "order": order })))
}

async fn cancel(
    State(state): State<AppState>,
    Auth(user): Auth,
    Path(id): Path<String>,
) -> ApiResult {
    let order = state.orders.cancel_order(&user, &OrderId::new(id)).await?;
    Ok(success_with(
        "Order cancelled successfully",
        json!({ "order": order }),
    ))
}
