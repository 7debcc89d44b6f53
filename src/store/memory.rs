//! In-memory implementation of `OrderStore`.
//!
//! Backs the test suite and local development without Postgres. A single
//! mutex over the order map gives the same per-order mutual exclusion the
//! Postgres adapter gets from row-level locks.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::domain::{NewOrder, Order, OrderStatus};

use super::{ChargeAttachment, OrderStore, StatusTransition, StoreError, StoreResult};

#[derive(Default)]
pub struct MemoryOrderStore {
    orders: Mutex<HashMap<Uuid, Order>>,
}

impl MemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderStore for MemoryOrderStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn create(&self, fields: NewOrder) -> StoreResult<Order> {
        let order = Order::new(fields);
        let mut orders = self.orders.lock().await;
        orders.insert(order.id, order.clone());
        Ok(order)
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Order>> {
        let orders = self.orders.lock().await;
        Ok(orders.get(&id).cloned())
    }

    async fn find_by_transaction(&self, transaction_id: &str) -> StoreResult<Option<Order>> {
        let orders = self.orders.lock().await;
        Ok(orders
            .values()
            .find(|order| order.transaction_id.as_deref() == Some(transaction_id))
            .cloned())
    }

    async fn attach_charge(&self, id: Uuid, charge: ChargeAttachment) -> StoreResult<Order> {
        let mut orders = self.orders.lock().await;
        let order = orders
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        if order.transaction_id.is_some() {
            return Err(StoreError::Conflict(format!(
                "order {id} already has a charge attached"
            )));
        }

        order.transaction_id = Some(charge.transaction_id);
        order.pix_code = Some(charge.pix_code);
        order.pix_qr_code_image = Some(charge.pix_qr_code_image);
        order.expires_at = Some(charge.expires_at);
        order.updated_at = Utc::now();
        Ok(order.clone())
    }

    async fn apply_status(
        &self,
        id: Uuid,
        new_status: OrderStatus,
        observed_at: DateTime<Utc>,
    ) -> StoreResult<StatusTransition> {
        let mut orders = self.orders.lock().await;
        let order = orders
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        if order.status == new_status {
            return Ok(StatusTransition {
                order: order.clone(),
                changed: false,
                first_paid: false,
            });
        }

        let first_paid = new_status == OrderStatus::Paid && order.paid_at.is_none();
        if first_paid {
            order.paid_at = Some(observed_at);
        }
        order.status = new_status;
        order.updated_at = Utc::now();

        Ok(StatusTransition {
            order: order.clone(),
            changed: true,
            first_paid,
        })
    }
}
