//! Order entity. Framework-agnostic representation of a checkout order.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::OrderStatus;

#[derive(Debug, Clone, Serialize)]
pub struct Order {
    pub id: Uuid,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub customer_document: String,
    pub product_name: String,
    /// Price in cents (smallest currency unit). Positive, immutable.
    pub product_price: i64,
    pub reference: String,
    pub status: OrderStatus,
    pub transaction_id: Option<String>,
    pub pix_code: Option<String>,
    pub pix_qr_code_image: Option<String>,
    pub paid_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields captured at checkout submission.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub customer_document: String,
    pub product_name: String,
    pub product_price: i64,
    pub reference: String,
}

impl Order {
    pub fn new(fields: NewOrder) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            customer_name: fields.customer_name,
            customer_email: fields.customer_email,
            customer_phone: fields.customer_phone,
            customer_document: fields.customer_document,
            product_name: fields.product_name,
            product_price: fields.product_price,
            reference: fields.reference,
            status: OrderStatus::Pending,
            transaction_id: None,
            pix_code: None,
            pix_qr_code_image: None,
            paid_at: None,
            expires_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn status_view(&self) -> OrderStatusView {
        OrderStatusView {
            id: self.id,
            status: self.status,
            transaction_id: self.transaction_id.clone(),
            paid_at: self.paid_at,
        }
    }
}

/// The slice of an order reported back after a status update.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatusView {
    pub id: Uuid,
    pub status: OrderStatus,
    pub transaction_id: Option<String>,
    pub paid_at: Option<DateTime<Utc>>,
}
