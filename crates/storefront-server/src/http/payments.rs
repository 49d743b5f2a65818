use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use storefront_commerce::checkout::PaymentMethod;

use super::{success, success_with, ApiResult, Auth};
use crate::{ApiError, AppState};

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route("/stripe/create-intent", post(create_intent))
        .route("/stripe/confirm", post(confirm_intent))
        .route("/razorpay/create-order", post(create_regional_order))
        .route("/razorpay/verify", post(verify_regional))
        .route("/cod", post(cash_on_delivery))
        .route("/refund", post(refund))
        .route("/methods", get(methods))
        .route("/status/:payment_id", get(status))
}

#[derive(Deserialize)]
struct AmountRequest {
    amount: f64,
    currency: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfirmRequest {
    #[serde(default)]
    payment_intent_id: String,
}

/// Field names as posted by the regional checkout widget.
#[derive(Deserialize)]
struct VerifyRequest {
    #[serde(default)]
    razorpay_order_id: String,
    #[serde(default)]
    razorpay_payment_id: String,
    #[serde(default)]
    razorpay_signature: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CodRequest {
    amount: f64,
    #[serde(default)]
    order_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RefundRequest {
    #[serde(default)]
    payment_id: String,
    amount: Option<f64>,
    gateway: String,
}

#[derive(Deserialize)]
struct StatusQuery {
    gateway: Option<String>,
}

fn parse_gateway(gateway: Option<&str>) -> Result<PaymentMethod, ApiError> {
    gateway
        .and_then(|g| g.parse().ok())
        .filter(|m| *m != PaymentMethod::Cod)
        .ok_or_else(|| ApiError::Validation("Invalid payment gateway".to_string()))
}

async fn create_intent(
    State(state): State<AppState>,
    Auth(_): Auth,
    body: Result<Json<AmountRequest>, JsonRejection>,
) -> ApiResult {
    let Json(request) = body?;
    let intent = state
        .payments
        .create_card_intent(request.amount, request.currency.as_deref())
        .await?;
    Ok(success(json!({
        "clientSecret": intent.client_secret,
        "paymentIntentId": intent.id,
    })))
}

async fn confirm_intent(
    State(state): State<AppState>,
    Auth(_): Auth,
    body: Result<Json<ConfirmRequest>, JsonRejection>,
) -> ApiResult {
    let Json(request) = body?;
    let payment = state.payments.confirm_card(&request.payment_intent_id).await?;
    Ok(success_with(
        "Payment confirmed",
        json!({ "paymentIntent": payment }),
    ))
}

async fn create_regional_order(
    State(state): State<AppState>,
    Auth(_): Auth,
    body: Result<Json<AmountRequest>, JsonRejection>,
) -> ApiResult {
    let Json(request) = body?;
    let order = state
        .payments
        .create_regional_order(request.amount, request.currency.as_deref())
        .await?;
    Ok(success(json!({ "keyId": order.key_id, "order": order })))
}

async fn verify_regional(
    State(state): State<AppState>,
    Auth(_): Auth,
    body: Result<Json<VerifyRequest>, JsonRejection>,
) -> ApiResult {
    let Json(request) = body?;
    let payment = state
        .payments
        .verify_regional(
            &request.razorpay_order_id,
            &request.razorpay_payment_id,
            &request.razorpay_signature,
        )
        .await?;
    Ok(success_with(
        "Payment verified successfully",
        json!({ "payment": payment }),
    ))
}

async fn cash_on_delivery(
    State(state): State<AppState>,
    Auth(_): Auth,
    body: Result<Json<CodRequest>, JsonRejection>,
) -> ApiResult {
    let Json(request) = body?;
    let confirmation = state
        .payments
        .cash_on_delivery(request.amount, &request.order_id)?;
    Ok(success_with(
        "Cash on Delivery order confirmed",
        json!({ "paymentInfo": confirmation }),
    ))
}

async fn refund(
    State(state): State<AppState>,
    Auth(user): Auth,
    body: Result<Json<RefundRequest>, JsonRejection>,
) -> ApiResult {
    user.require_admin()?;
    let Json(request) = body?;
    let method = parse_gateway(Some(request.gateway.as_str()))?;
    let refund = state
        .payments
        .refund(method, &request.payment_id, request.amount)
        .await?;
    Ok(success_with(
        "Refund processed successfully",
        json!({ "refund": refund }),
    ))
}

async fn methods(State(state): State<AppState>) -> ApiResult {
    Ok(success(json!({ "methods": state.payments.methods() })))
}

async fn status(
    State(state): State<AppState>,
    Auth(_): Auth,
    Path(payment_id): Path<String>,
    Query(query): Query<StatusQuery>,
) -> ApiResult {
    let method = parse_gateway(query.gateway.as_deref())?;
    let payment = state.payments.status(method, &payment_id).await?;
    Ok(success(json!({ "payment": payment })))
}
