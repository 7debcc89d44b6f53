//! Forwarding of paid orders to the external admin system.
//!
//! Fire-and-forget: the lifecycle logs failures and keeps going, so a flaky
//! admin system can never fail a webhook or roll back a persisted transition.

pub mod http;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::domain::Order;

pub use http::HttpAdminForwarder;

#[derive(Error, Debug)]
pub enum ForwardError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("admin system returned {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// Ingest payload of the admin order API.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub session_id: String,
    pub payment_status: String,
    pub amount_total: i64,
    pub customer: CustomerSummary,
    pub shipping: ShippingSummary,
    pub items: Vec<ItemSummary>,
    pub shipping_cost: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CustomerSummary {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub cpf: String,
}

/// The checkout collects no address; the admin contract still expects the
/// block, so it goes out empty.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingSummary {
    pub street: String,
    pub number: String,
    pub complement: String,
    pub neighborhood: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ItemSummary {
    pub id: String,
    pub name: String,
    pub price: i64,
    pub quantity: u32,
}

impl OrderSummary {
    pub fn from_paid_order(order: &Order) -> Self {
        Self {
            session_id: order.transaction_id.clone().unwrap_or_default(),
            payment_status: "paid".to_string(),
            amount_total: order.product_price,
            customer: CustomerSummary {
                name: order.customer_name.clone(),
                email: order.customer_email.clone(),
                phone: order.customer_phone.clone(),
                cpf: order.customer_document.clone(),
            },
            shipping: ShippingSummary::default(),
            items: vec![ItemSummary {
                id: "checkout-item".to_string(),
                name: order.product_name.clone(),
                price: order.product_price,
                quantity: 1,
            }],
            shipping_cost: 0,
            created_at: order.paid_at.unwrap_or_else(Utc::now),
        }
    }
}

#[async_trait]
pub trait AdminSink: Send + Sync {
    async fn forward(&self, summary: &OrderSummary) -> Result<(), ForwardError>;
}
