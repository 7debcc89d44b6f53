//! Payment provider integration (PIX cashin API).

pub mod client;

use async_trait::async_trait;
use thiserror::Error;

pub use client::PixApiClient;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("transaction not found: {0}")]
    TransactionNotFound(String),

    #[error("provider returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("invalid response from provider: {0}")]
    InvalidResponse(String),

    #[error("circuit breaker open: {0}")]
    CircuitBreakerOpen(String),
}

pub type ProviderResult<T> = Result<T, ProviderError>;

/// Charge creation request. Amount is in cents; the client converts to the
/// major-unit representation the wire format expects.
#[derive(Debug, Clone)]
pub struct ChargeRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub document: String,
    pub description: String,
    pub amount_cents: i64,
    pub reference: String,
    pub extra: String,
}

/// Charge as issued by the provider.
#[derive(Debug, Clone)]
pub struct Charge {
    pub transaction_id: String,
    pub pix_code: String,
    pub pix_qr_code_image: String,
    /// Raw provider status string, mapped downstream.
    pub status: String,
}

#[async_trait]
pub trait PaymentProvider: Send + Sync {
    async fn create_charge(&self, request: &ChargeRequest) -> ProviderResult<Charge>;

    /// Current raw status of a transaction.
    async fn get_status(&self, transaction_id: &str) -> ProviderResult<String>;
}
