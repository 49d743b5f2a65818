use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{json, Value};
use storefront_commerce::account::ProfileUpdate;

use super::{success, success_with, ApiResult, Auth};
use crate::services::{LoginRequest, SignupRequest};
use crate::{ApiError, AppState};

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/me", get(me))
        .route("/profile", put(update_profile))
}

async fn signup(
    State(state): State<AppState>,
    body: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let Json(request) = body?;
    let session = state.accounts.signup(request).await?;
    Ok((
        StatusCode::CREATED,
        success_with(
            "User registered successfully",
            json!({ "token": session.token, "user": session.user }),
        ),
    ))
}

async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult {
    let Json(request) = body?;
    let session = state.accounts.login(request).await?;
    Ok(success_with(
        "Login successful",
        json!({ "token": session.token, "user": session.user }),
    ))
}

async fn me(State(state): State<AppState>, Auth(user): Auth) -> ApiResult {
    let profile = state.accounts.me(&user.id).await?;
    Ok(success(json!({ "user": profile })))
}

async fn update_profile(
    State(state): State<AppState>,
    Auth(user): Auth,
    body: Result<Json<ProfileUpdate>, JsonRejection>,
) -> ApiResult {
    let Json(update) = body?;
    let profile = state.accounts.update_profile(&user.id, update).await?;
    Ok(success_with(
        "Profile updated successfully",
        json!({ "user": profile }),
    ))
}
