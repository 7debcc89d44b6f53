//! Postgres implementation of `OrderStore`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{NewOrder, Order, OrderStatus};

use super::{ChargeAttachment, OrderStore, StatusTransition, StoreError, StoreResult};

#[derive(Clone)]
pub struct PostgresOrderStore {
    pool: PgPool,
}

impl PostgresOrderStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const ORDER_COLUMNS: &str = "id, customer_name, customer_email, customer_phone, \
     customer_document, product_name, product_price, reference, status, \
     transaction_id, pix_code, pix_qr_code_image, paid_at, expires_at, \
     created_at, updated_at";

#[async_trait]
impl OrderStore for PostgresOrderStore {
    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn create(&self, fields: NewOrder) -> StoreResult<Order> {
        let order = Order::new(fields);
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            r#"
            INSERT INTO orders (
                id, customer_name, customer_email, customer_phone,
                customer_document, product_name, product_price, reference,
                status, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {ORDER_COLUMNS}
            "#
        ))
        .bind(order.id)
        .bind(&order.customer_name)
        .bind(&order.customer_email)
        .bind(&order.customer_phone)
        .bind(&order.customer_document)
        .bind(&order.product_name)
        .bind(order.product_price)
        .bind(&order.reference)
        .bind(order.status.as_str())
        .bind(order.created_at)
        .bind(order.updated_at)
        .fetch_one(&self.pool)
        .await?;

        row.into_domain()
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Order>> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(OrderRow::into_domain).transpose()
    }

    async fn find_by_transaction(&self, transaction_id: &str) -> StoreResult<Option<Order>> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE transaction_id = $1"
        ))
        .bind(transaction_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(OrderRow::into_domain).transpose()
    }

    async fn attach_charge(&self, id: Uuid, charge: ChargeAttachment) -> StoreResult<Order> {
        // Conditional update: only a row without a transaction id qualifies,
        // so the id stays immutable once set.
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            r#"
            UPDATE orders
            SET transaction_id = $2,
                pix_code = $3,
                pix_qr_code_image = $4,
                expires_at = $5,
                updated_at = now()
            WHERE id = $1 AND transaction_id IS NULL
            RETURNING {ORDER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&charge.transaction_id)
        .bind(&charge.pix_code)
        .bind(&charge.pix_qr_code_image)
        .bind(charge.expires_at)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => row.into_domain(),
            None => {
                if self.find_by_id(id).await?.is_some() {
                    Err(StoreError::Conflict(format!(
                        "order {id} already has a charge attached"
                    )))
                } else {
                    Err(StoreError::NotFound(id.to_string()))
                }
            }
        }
    }

    async fn apply_status(
        &self,
        id: Uuid,
        new_status: OrderStatus,
        observed_at: DateTime<Utc>,
    ) -> StoreResult<StatusTransition> {
        // Row-level lock so the edge decision and the write happen against a
        // single consistent read. Two racing PAID signals serialize here; the
        // second one sees PAID already persisted and reports no edge.
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        let current = row.into_domain()?;

        if current.status == new_status {
            tx.commit().await?;
            return Ok(StatusTransition {
                order: current,
                changed: false,
                first_paid: false,
            });
        }

        let first_paid = new_status == OrderStatus::Paid && current.paid_at.is_none();
        let paid_at = if first_paid {
            Some(observed_at)
        } else {
            current.paid_at
        };

        let updated = sqlx::query_as::<_, OrderRow>(&format!(
            r#"
            UPDATE orders
            SET status = $2, paid_at = $3, updated_at = now()
            WHERE id = $1
            RETURNING {ORDER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(new_status.as_str())
        .bind(paid_at)
        .fetch_one(&mut *tx)
        .await?
        .into_domain()?;

        tx.commit().await?;

        Ok(StatusTransition {
            order: updated,
            changed: true,
            first_paid,
        })
    }
}

/// Internal row type for sqlx. Not exposed outside the adapter.
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: Uuid,
    customer_name: String,
    customer_email: String,
    customer_phone: String,
    customer_document: String,
    product_name: String,
    product_price: i64,
    reference: String,
    status: String,
    transaction_id: Option<String>,
    pix_code: Option<String>,
    pix_qr_code_image: Option<String>,
    paid_at: Option<DateTime<Utc>>,
    expires_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl OrderRow {
    fn into_domain(self) -> StoreResult<Order> {
        let status = OrderStatus::from_db(&self.status)
            .ok_or_else(|| StoreError::InvalidStatus(self.status.clone()))?;

        Ok(Order {
            id: self.id,
            customer_name: self.customer_name,
            customer_email: self.customer_email,
            customer_phone: self.customer_phone,
            customer_document: self.customer_document,
            product_name: self.product_name,
            product_price: self.product_price,
            reference: self.reference,
            status,
            transaction_id: self.transaction_id,
            pix_code: self.pix_code,
            pix_qr_code_image: self.pix_qr_code_image,
            paid_at: self.paid_at,
            expires_at: self.expires_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
