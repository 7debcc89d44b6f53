//! HTTP client for the PIX cashin API.

use std::time::Duration;

use async_trait::async_trait;
use failsafe::futures::CircuitBreaker as FuturesCircuitBreaker;
use failsafe::{backoff, failure_policy, Error as FailsafeError, StateMachine};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::ProviderEnvironment;

use super::{Charge, ChargeRequest, PaymentProvider, ProviderError, ProviderResult};

const SANDBOX_BASE_URL: &str = "https://sandbox.receba.online";
const PRODUCTION_BASE_URL: &str = "https://receba.online";

/// HTTP client for the payment provider, with a circuit breaker on
/// consecutive failures so a dead provider fails fast instead of burning the
/// request timeout on every call.
#[derive(Clone)]
pub struct PixApiClient {
    client: Client,
    base_url: String,
    api_key: String,
    platform_id: Option<String>,
    circuit_breaker: StateMachine<failure_policy::ConsecutiveFailures<backoff::EqualJittered>, ()>,
}

impl PixApiClient {
    pub fn new(environment: ProviderEnvironment, api_key: String, platform_id: Option<String>) -> Self {
        let base_url = match environment {
            ProviderEnvironment::Sandbox => SANDBOX_BASE_URL,
            ProviderEnvironment::Production => PRODUCTION_BASE_URL,
        };
        Self::with_base_url(base_url.to_string(), api_key, platform_id)
    }

    /// Builds a client against an explicit base URL. Tests point this at a
    /// local mock server.
    pub fn with_base_url(base_url: String, api_key: String, platform_id: Option<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_default();

        let backoff = backoff::equal_jittered(Duration::from_secs(60), Duration::from_secs(120));
        let policy = failure_policy::consecutive_failures(3, backoff);
        let circuit_breaker = failsafe::Config::new().failure_policy(policy).build();

        PixApiClient {
            client,
            base_url,
            api_key,
            platform_id,
            circuit_breaker,
        }
    }

    pub fn circuit_state(&self) -> &'static str {
        if self.circuit_breaker.is_call_permitted() {
            "closed"
        } else {
            "open"
        }
    }

    async fn guard<T, F>(&self, call: F) -> ProviderResult<T>
    where
        F: std::future::Future<Output = ProviderResult<T>>,
    {
        match self.circuit_breaker.call(call).await {
            Ok(value) => Ok(value),
            Err(FailsafeError::Rejected) => Err(ProviderError::CircuitBreakerOpen(
                "payment provider circuit breaker is open".to_string(),
            )),
            Err(FailsafeError::Inner(e)) => Err(e),
        }
    }
}

#[async_trait]
impl PaymentProvider for PixApiClient {
    async fn create_charge(&self, request: &ChargeRequest) -> ProviderResult<Charge> {
        let url = format!(
            "{}/api/v1/transaction/pix/cashin",
            self.base_url.trim_end_matches('/')
        );
        let payload = CashinPayload {
            name: request.name.clone(),
            email: request.email.clone(),
            phone: request.phone.clone(),
            document: request.document.clone(),
            description: request.description.clone(),
            // The wire format takes the amount in major currency units.
            amount: request.amount_cents as f64 / 100.0,
            reference: request.reference.clone(),
            extra: request.extra.clone(),
            platform: self.platform_id.clone(),
        };
        let client = self.client.clone();
        let api_key = self.api_key.clone();

        let response: CashinResponse = self
            .guard(async move {
                let response = client
                    .post(&url)
                    .bearer_auth(&api_key)
                    .json(&payload)
                    .send()
                    .await?;

                let status = response.status();
                if !status.is_success() {
                    let body = response.text().await.unwrap_or_default();
                    return Err(ProviderError::Api {
                        status: status.as_u16(),
                        body,
                    });
                }

                Ok(response.json::<CashinResponse>().await?)
            })
            .await?;

        let transaction = response.transaction.into_iter().next().ok_or_else(|| {
            ProviderError::InvalidResponse("cashin response carried no transaction".to_string())
        })?;

        Ok(Charge {
            transaction_id: transaction.id,
            pix_code: transaction.qr_code,
            pix_qr_code_image: transaction.qr_code_image,
            status: transaction.status,
        })
    }

    async fn get_status(&self, transaction_id: &str) -> ProviderResult<String> {
        let url = format!(
            "{}/api/v1/transaction/{}",
            self.base_url.trim_end_matches('/'),
            transaction_id
        );
        let client = self.client.clone();
        let api_key = self.api_key.clone();

        // A 404 is a stale id, not provider unhealth: it must not count
        // toward the breaker, so the guarded call reports it as a success
        // and the not-found surfaces afterwards.
        let response: Option<TransactionResponse> = self
            .guard(async move {
                let response = client.get(&url).bearer_auth(&api_key).send().await?;

                if response.status() == 404 {
                    return Ok(None);
                }

                let status = response.status();
                if !status.is_success() {
                    let body = response.text().await.unwrap_or_default();
                    return Err(ProviderError::Api {
                        status: status.as_u16(),
                        body,
                    });
                }

                Ok(Some(response.json::<TransactionResponse>().await?))
            })
            .await?;

        match response {
            Some(response) => Ok(response.transaction.status),
            None => Err(ProviderError::TransactionNotFound(transaction_id.to_string())),
        }
    }
}

#[derive(Debug, Serialize)]
struct CashinPayload {
    name: String,
    email: String,
    phone: String,
    document: String,
    description: String,
    amount: f64,
    reference: String,
    extra: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    platform: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CashinResponse {
    transaction: Vec<CashinTransaction>,
}

#[derive(Debug, Deserialize)]
struct CashinTransaction {
    id: String,
    qr_code: String,
    qr_code_image: String,
    status: String,
}

#[derive(Debug, Deserialize)]
struct TransactionResponse {
    transaction: TransactionBody,
}

#[derive(Debug, Deserialize)]
struct TransactionBody {
    status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(base_url: String) -> PixApiClient {
        PixApiClient::with_base_url(base_url, "test-key".to_string(), None)
    }

    fn charge_request() -> ChargeRequest {
        ChargeRequest {
            name: "Ana Souza".to_string(),
            email: "ana@example.com".to_string(),
            phone: "11999990000".to_string(),
            document: "12345678901".to_string(),
            description: "Premium Bundle".to_string(),
            amount_cents: 5000,
            reference: "order-1".to_string(),
            extra: "checkout-order-1".to_string(),
        }
    }

    #[test]
    fn picks_base_url_from_environment() {
        let sandbox = PixApiClient::new(ProviderEnvironment::Sandbox, "k".to_string(), None);
        assert_eq!(sandbox.base_url, SANDBOX_BASE_URL);

        let production = PixApiClient::new(ProviderEnvironment::Production, "k".to_string(), None);
        assert_eq!(production.base_url, PRODUCTION_BASE_URL);
        assert_eq!(production.circuit_state(), "closed");
    }

    #[tokio::test]
    async fn create_charge_parses_first_transaction() {
        let mut server = mockito::Server::new_async().await;

        let body = r#"{
            "transaction": [{
                "id": "tx-123",
                "qr_code": "00020126pix",
                "qr_code_image": "data:image/png;base64,QR",
                "status": "pending"
            }]
        }"#;

        let mock = server
            .mock("POST", "/api/v1/transaction/pix/cashin")
            .match_header("authorization", "Bearer test-key")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await;

        let client = test_client(server.url());
        let charge = client.create_charge(&charge_request()).await.unwrap();

        mock.assert_async().await;
        assert_eq!(charge.transaction_id, "tx-123");
        assert_eq!(charge.pix_code, "00020126pix");
        assert_eq!(charge.status, "pending");
    }

    #[tokio::test]
    async fn create_charge_surfaces_api_errors() {
        let mut server = mockito::Server::new_async().await;

        let _mock = server
            .mock("POST", "/api/v1/transaction/pix/cashin")
            .with_status(422)
            .with_body(r#"{"error":"invalid document"}"#)
            .create_async()
            .await;

        let client = test_client(server.url());
        let result = client.create_charge(&charge_request()).await;

        assert!(matches!(result, Err(ProviderError::Api { status: 422, .. })));
    }

    #[tokio::test]
    async fn get_status_returns_raw_status() {
        let mut server = mockito::Server::new_async().await;

        let _mock = server
            .mock("GET", "/api/v1/transaction/tx-123")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"transaction": {"status": "paid"}}"#)
            .create_async()
            .await;

        let client = test_client(server.url());
        let status = client.get_status("tx-123").await.unwrap();
        assert_eq!(status, "paid");
    }

    #[tokio::test]
    async fn get_status_maps_404_to_not_found() {
        let mut server = mockito::Server::new_async().await;

        let _mock = server
            .mock("GET", "/api/v1/transaction/missing")
            .with_status(404)
            .create_async()
            .await;

        let client = test_client(server.url());
        let result = client.get_status("missing").await;
        assert!(matches!(result, Err(ProviderError::TransactionNotFound(_))));
    }

    #[tokio::test]
    async fn stale_transaction_polls_do_not_open_the_circuit() {
        let mut server = mockito::Server::new_async().await;

        let _mock = server
            .mock("GET", "/api/v1/transaction/stale")
            .with_status(404)
            .expect_at_least(4)
            .create_async()
            .await;

        // Threshold is 3 consecutive failures; repeated 404 polls must not
        // trip it and must keep reaching the provider.
        let client = test_client(server.url());
        for _ in 0..4 {
            let result = client.get_status("stale").await;
            assert!(matches!(result, Err(ProviderError::TransactionNotFound(_))));
        }

        assert_eq!(client.circuit_state(), "closed");
    }
}
