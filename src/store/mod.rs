//! Order persistence. The trait is the seam between the lifecycle logic and
//! the backing database; `apply_status` is the per-order serialization point
//! that makes the first-PAID edge detection safe under concurrent updates.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::{NewOrder, Order, OrderStatus};

pub use memory::MemoryOrderStore;
pub use postgres::PostgresOrderStore;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("order not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("invalid stored status: {0}")]
    InvalidStatus(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Charge data returned by the provider at creation time.
#[derive(Debug, Clone)]
pub struct ChargeAttachment {
    pub transaction_id: String,
    pub pix_code: String,
    pub pix_qr_code_image: String,
    pub expires_at: DateTime<Utc>,
}

/// Outcome of an atomic status application.
///
/// `first_paid` is computed from the same read that decided the write, so two
/// racing PAID signals can never both observe the edge.
#[derive(Debug, Clone)]
pub struct StatusTransition {
    pub order: Order,
    pub changed: bool,
    pub first_paid: bool,
}

#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Cheap connectivity check for health reporting.
    async fn ping(&self) -> StoreResult<()>;

    async fn create(&self, fields: NewOrder) -> StoreResult<Order>;

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Order>>;

    async fn find_by_transaction(&self, transaction_id: &str) -> StoreResult<Option<Order>>;

    /// Records the provider charge on a freshly created order. The
    /// transaction id is immutable once set; a second attach is a conflict.
    async fn attach_charge(&self, id: Uuid, charge: ChargeAttachment) -> StoreResult<Order>;

    /// Applies a mapped status under per-order mutual exclusion.
    ///
    /// Re-applying the current status is a no-op (`changed == false`).
    /// `paid_at` is set on the first transition into PAID and never touched
    /// again, in particular never cleared by a later non-PAID signal.
    async fn apply_status(
        &self,
        id: Uuid,
        new_status: OrderStatus,
        observed_at: DateTime<Utc>,
    ) -> StoreResult<StatusTransition>;
}
