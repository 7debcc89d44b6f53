//! Provider webhook ingestion.
//!
//! The provider pushes status changes with a bearer token in the
//! Authorization header. An unauthenticated request is rejected before any
//! lookup, so it can never mutate an order. Forwarding problems never reach
//! the provider: once the transition is durable the webhook reports success.

use axum::{
    extract::State,
    http::HeaderMap,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use crate::error::AppError;
use crate::security;
use crate::store::OrderStore;
use crate::AppState;

/// Provider webhook payload. Only the transaction id and status drive the
/// lifecycle; the rest is carried for logging.
#[derive(Debug, Deserialize)]
pub struct WebhookPayload {
    pub transaction_id: String,
    pub status: String,
    #[serde(default)]
    pub transaction_amount: Option<String>,
    #[serde(default)]
    pub transaction_e2e_id: Option<String>,
    #[serde(default)]
    pub transaction_operation: Option<String>,
    #[serde(default)]
    pub transaction_reference: Option<String>,
    #[serde(default)]
    pub extra: Option<String>,
    #[serde(default)]
    pub date_created: Option<String>,
}

pub async fn payment_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<WebhookPayload>,
) -> Result<impl IntoResponse, AppError> {
    let auth_header = headers
        .get("authorization")
        .and_then(|h| h.to_str().ok());

    if !security::is_authentic(auth_header, &state.config.webhook_secret) {
        tracing::warn!("webhook rejected: invalid bearer token");
        return Err(AppError::Unauthorized("invalid webhook token".to_string()));
    }

    tracing::info!(
        transaction_id = %payload.transaction_id,
        status = %payload.status,
        reference = payload.transaction_reference.as_deref().unwrap_or(""),
        "webhook received"
    );

    let order = state
        .store
        .find_by_transaction(&payload.transaction_id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "no order for transaction {}",
                payload.transaction_id
            ))
        })?;

    let view = state
        .lifecycle
        .apply_raw_status(order.id, &payload.status, Utc::now())
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "webhook processed",
        "order": view,
    })))
}
