use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::{AdminSink, ForwardError, OrderSummary};

const FORWARD_TIMEOUT: Duration = Duration::from_secs(10);

pub struct HttpAdminForwarder {
    client: Client,
    base_url: String,
}

impl HttpAdminForwarder {
    pub fn new(base_url: String) -> Self {
        let client = Client::builder()
            .timeout(FORWARD_TIMEOUT)
            .build()
            .unwrap_or_default();

        Self { client, base_url }
    }
}

#[async_trait]
impl AdminSink for HttpAdminForwarder {
    async fn forward(&self, summary: &OrderSummary) -> Result<(), ForwardError> {
        let url = format!(
            "{}/api/orders/ingest-from-shop",
            self.base_url.trim_end_matches('/')
        );

        let response = self.client.post(&url).json(summary).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ForwardError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NewOrder, Order, OrderStatus};
    use chrono::Utc;

    fn paid_order() -> Order {
        let mut order = Order::new(NewOrder {
            customer_name: "Ana Souza".to_string(),
            customer_email: "ana@example.com".to_string(),
            customer_phone: "11999990000".to_string(),
            customer_document: "12345678901".to_string(),
            product_name: "Premium Bundle".to_string(),
            product_price: 5000,
            reference: "ORDER-1".to_string(),
        });
        order.transaction_id = Some("tx-123".to_string());
        order.status = OrderStatus::Paid;
        order.paid_at = Some(Utc::now());
        order
    }

    #[tokio::test]
    async fn forwards_paid_order_summary() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("POST", "/api/orders/ingest-from-shop")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "sessionId": "tx-123",
                "paymentStatus": "paid",
                "amountTotal": 5000,
                "customer": { "cpf": "12345678901" },
            })))
            .with_status(200)
            .create_async()
            .await;

        let forwarder = HttpAdminForwarder::new(server.url());
        let summary = OrderSummary::from_paid_order(&paid_order());
        forwarder.forward(&summary).await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn non_2xx_is_reported_as_rejected() {
        let mut server = mockito::Server::new_async().await;

        let _mock = server
            .mock("POST", "/api/orders/ingest-from-shop")
            .with_status(500)
            .with_body("ingest failed")
            .create_async()
            .await;

        let forwarder = HttpAdminForwarder::new(server.url());
        let summary = OrderSummary::from_paid_order(&paid_order());
        let result = forwarder.forward(&summary).await;

        assert!(matches!(result, Err(ForwardError::Rejected { status: 500, .. })));
    }
}
