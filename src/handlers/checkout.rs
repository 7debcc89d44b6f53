//! Checkout endpoints: order creation, details and poll-driven status.

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::domain::{NewOrder, OrderStatus};
use crate::error::AppError;
use crate::provider::{ChargeRequest, PaymentProvider};
use crate::store::{ChargeAttachment, OrderStore};
use crate::validation;
use crate::AppState;

/// Charge lifetime presented to the customer.
const CHARGE_TTL_MINUTES: i64 = 30;

#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub document: String,
    /// Amount in cents; the configured product price when omitted.
    pub amount: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub id: Uuid,
    pub transaction_id: String,
    pub pix_code: String,
    pub pix_qr_code_image: String,
    pub amount: i64,
    pub status: OrderStatus,
    pub expires_at: DateTime<Utc>,
}

pub async fn create_order(
    State(state): State<AppState>,
    Json(request): Json<CheckoutRequest>,
) -> Result<impl IntoResponse, AppError> {
    validation::validate_name(&request.name)?;
    validation::validate_email(&request.email)?;
    validation::validate_phone(&request.phone)?;
    validation::validate_document(&request.document)?;

    let price = request.amount.unwrap_or(state.config.product_price);
    validation::validate_amount(price)?;

    let order = state
        .store
        .create(NewOrder {
            customer_name: validation::sanitize_string(&request.name),
            customer_email: validation::sanitize_string(&request.email),
            customer_phone: validation::sanitize_string(&request.phone),
            customer_document: validation::sanitize_string(&request.document),
            product_name: state.config.product_name.clone(),
            product_price: price,
            reference: format!("ORDER-{}", Utc::now().timestamp_millis()),
        })
        .await?;

    // Charge creation failure is fatal to the checkout; the pending order
    // stays behind without a transaction id.
    let charge = state
        .provider
        .create_charge(&ChargeRequest {
            name: order.customer_name.clone(),
            email: order.customer_email.clone(),
            phone: order.customer_phone.clone(),
            document: order.customer_document.clone(),
            description: state.config.product_description.clone(),
            amount_cents: price,
            reference: order.id.to_string(),
            extra: format!("checkout-{}", order.id),
        })
        .await?;

    let expires_at = Utc::now() + Duration::minutes(CHARGE_TTL_MINUTES);
    let order = state
        .store
        .attach_charge(
            order.id,
            ChargeAttachment {
                transaction_id: charge.transaction_id,
                pix_code: charge.pix_code,
                pix_qr_code_image: charge.pix_qr_code_image,
                expires_at,
            },
        )
        .await?;

    tracing::info!(order_id = %order.id, amount = price, "checkout order created");

    let response = CheckoutResponse {
        id: order.id,
        transaction_id: order.transaction_id.unwrap_or_default(),
        pix_code: order.pix_code.unwrap_or_default(),
        pix_qr_code_image: order.pix_qr_code_image.unwrap_or_default(),
        amount: order.product_price,
        status: order.status,
        expires_at,
    };

    Ok(Json(json!({ "success": true, "order": response })))
}

pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let order = state
        .store
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("order {id} not found")))?;

    Ok(Json(json!({
        "success": true,
        "order": {
            "id": order.id,
            "transactionId": order.transaction_id,
            "status": order.status,
            "pixCode": order.pix_code,
            "pixQrCodeImage": order.pix_qr_code_image,
            "productName": order.product_name,
            "productPrice": order.product_price,
            "expiresAt": order.expires_at,
            "paidAt": order.paid_at,
            "createdAt": order.created_at,
        },
    })))
}

/// Poll path: reconciles against the provider and returns the resulting
/// status. A provider outage degrades to the last persisted status.
pub async fn get_order_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let view = state.lifecycle.reconcile(id).await?;
    Ok(Json(json!({ "success": true, "order": view })))
}
