//! Order lifecycle controller.
//!
//! Every externally observed status, whether pushed by the provider webhook
//! or pulled through poll reconciliation, goes through `apply_raw_status`.
//! The store performs the transition atomically and reports whether this
//! application was the edge that first established PAID; only that edge
//! triggers forwarding to the admin system, and forwarding stays best-effort.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::admin::{AdminSink, OrderSummary};
use crate::domain::{OrderStatus, OrderStatusView};
use crate::error::AppError;
use crate::provider::PaymentProvider;
use crate::store::OrderStore;

pub struct OrderLifecycle {
    store: Arc<dyn OrderStore>,
    provider: Arc<dyn PaymentProvider>,
    admin: Arc<dyn AdminSink>,
}

impl OrderLifecycle {
    pub fn new(
        store: Arc<dyn OrderStore>,
        provider: Arc<dyn PaymentProvider>,
        admin: Arc<dyn AdminSink>,
    ) -> Self {
        Self {
            store,
            provider,
            admin,
        }
    }

    /// Applies a raw provider status to an order. Unknown vocabulary maps to
    /// PENDING; any status may overwrite any other (the provider, not this
    /// service, owns the transition graph).
    pub async fn apply_raw_status(
        &self,
        order_id: Uuid,
        raw_status: &str,
        observed_at: DateTime<Utc>,
    ) -> Result<OrderStatusView, AppError> {
        let mapped = OrderStatus::from_provider(raw_status);
        let transition = self.store.apply_status(order_id, mapped, observed_at).await?;

        if transition.changed {
            tracing::info!(
                order_id = %order_id,
                status = %transition.order.status,
                raw = raw_status,
                "order status updated"
            );
        }

        if transition.first_paid {
            let summary = OrderSummary::from_paid_order(&transition.order);
            if let Err(e) = self.admin.forward(&summary).await {
                // Best-effort: the transition is already durable, the caller
                // still gets a success.
                tracing::error!(order_id = %order_id, error = %e, "admin forwarding failed");
            } else {
                tracing::info!(order_id = %order_id, "order forwarded to admin");
            }
        }

        Ok(transition.order.status_view())
    }

    /// Poll path: re-queries the provider for the order's transaction and
    /// feeds the result through `apply_raw_status`. A provider failure leaves
    /// the persisted status untouched and reports the last-known view instead
    /// of propagating the error.
    pub async fn reconcile(&self, order_id: Uuid) -> Result<OrderStatusView, AppError> {
        let order = self
            .store
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("order {order_id} not found")))?;

        let Some(transaction_id) = order.transaction_id.clone() else {
            return Ok(order.status_view());
        };

        match self.provider.get_status(&transaction_id).await {
            Ok(raw) => self.apply_raw_status(order_id, &raw, Utc::now()).await,
            Err(e) => {
                tracing::warn!(
                    order_id = %order_id,
                    transaction_id = %transaction_id,
                    error = %e,
                    "provider status query failed, returning persisted status"
                );
                Ok(order.status_view())
            }
        }
    }
}
