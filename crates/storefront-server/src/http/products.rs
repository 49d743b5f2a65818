use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, patch};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use storefront_commerce::ProductId;

use super::{success, success_with, ApiResult, Auth};
use crate::services::{NewProduct, ProductUpdate};
use crate::{ApiError, AppState};

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/categories/list", get(categories))
        .route("/:id", get(show).put(update).delete(remove))
        .route("/:id/stock", patch(update_stock))
}

#[derive(Deserialize)]
struct StockUpdate {
    stock: i64,
}

async fn list(State(state): State<AppState>) -> ApiResult {
    let products = state.catalog.list_products().await?;
    Ok(success(json!({ "count": products.len(), "products": products })))
}

async fn show(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult {
    let product = state.catalog.get_product(&ProductId::new(id)).await?;
    Ok(success(json!({ "product": product })))
}

async fn categories(State(state): State<AppState>) -> ApiResult {
    let categories = state.catalog.categories().await?;
    Ok(success(json!({ "categories": categories })))
}

async fn create(
    State(state): State<AppState>,
    Auth(user): Auth,
    body: Result<Json<NewProduct>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let Json(input) = body?;
    let product = state.catalog.create_product(&user, input).await?;
    Ok((
        StatusCode::CREATED,
        success_with("Product created", json!({ "product": product })),
    ))
}

async fn update_stock(
    State(state): State<AppState>,
    Auth(user): Auth,
    Path(id): Path<String>,
    body: Result<Json<StockUpdate>, JsonRejection>,
) -> ApiResult {
    let Json(update) = body?;
    let product = state
        .catalog
        .update_stock(&user, &ProductId::new(id), update.stock)
        .await?;
    Ok(success_with("Stock updated", json!({ "product": product })))
}

async fn update(
    State(state): State<AppState>,
    Auth(user): Auth,
    Path(id): Path<String>,
    body: Result<Json<ProductUpdate>, JsonRejection>,
) -> ApiResult {
    let Json(update) = body?;
    let product = state
        .catalog
        .update_product(&user, &ProductId::new(id), update)
        .await?;
    Ok(success_with(
        "Product updated successfully",
        json!({ "product": product }),
    ))
}

async fn remove(
    State(state): State<AppState>,
    Auth(user): Auth,
    Path(id): Path<String>,
) -> ApiResult {
    state
        .catalog
        .delete_product(&user, &ProductId::new(id))
        .await?;
    Ok(success_with("Product deleted successfully", json!({})))
}
