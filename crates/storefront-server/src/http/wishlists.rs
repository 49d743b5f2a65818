use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use storefront_commerce::ProductId;

use super::{success, success_with, ApiResult, Auth};
use crate::AppState;

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(show).delete(clear))
        .route("/add", post(add))
        .route("/toggle", post(toggle))
        .route("/check/:product_id", get(check))
        .route("/:product_id", delete(remove))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductRef {
    product_id: ProductId,
}

async fn show(State(state): State<AppState>, Auth(user): Auth) -> ApiResult {
    let wishlist = state.wishlists.get(&user.id).await?;
    Ok(success(json!({ "wishlist": wishlist })))
}

async fn add(
    State(state): State<AppState>,
    Auth(user): Auth,
    body: Result<Json<ProductRef>, JsonRejection>,
) -> ApiResult {
    let Json(body) = body?;
    let wishlist = state.wishlists.add(&user.id, body.product_id).await?;
    Ok(success_with("Added to wishlist", json!({ "wishlist": wishlist })))
}

async fn toggle(
    State(state): State<AppState>,
    Auth(user): Auth,
    body: Result<Json<ProductRef>, JsonRejection>,
) -> ApiResult {
    let Json(body) = body?;
    let saved = state.wishlists.toggle(&user.id, body.product_id).await?;
    let message = if saved {
        "Added to wishlist"
    } else {
        "Removed from wishlist"
    };
    Ok(success_with(message, json!({ "inWishlist": saved })))
}

async fn check(
    State(state): State<AppState>,
    Auth(user): Auth,
    Path(product_id): Path<String>,
) -> ApiResult {
    let saved = state
        .wishlists
        .contains(&user.id, &ProductId::new(product_id))
        .await?;
    Ok(success(json!({ "inWishlist": saved })))
}

async fn remove(
    State(state): State<AppState>,
    Auth(user): Auth,
    Path(product_id): Path<String>,
) -> ApiResult {
    let wishlist = state
        .wishlists
        .remove(&user.id, &ProductId::new(product_id))
        .await?;
    Ok(success_with("Removed from wishlist", json!({ "wishlist": wishlist })))
}

async fn clear(State(state): State<AppState>, Auth(user): Auth) -> ApiResult {
    state.wishlists.clear(&user.id).await?;
    Ok(success_with("Wishlist cleared", json!({})))
}
