use crate::domain::payment::{CustomerCredentials, PaymentSession};
use crate::domain::ports::SessionEndpoint;
use crate::domain::product::MinorUnits;
use crate::error::{AppError, Result};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

/// Client for the backend functions that mint payment credentials.
#[derive(Debug, Clone)]
pub struct HttpSessionEndpoint {
    client: Client,
    base_url: String,
    currency: String,
}

impl HttpSessionEndpoint {
    /// `base_url` is the functions host, e.g.
    /// `https://us-central1-<project>.cloudfunctions.net`.
    pub fn new(base_url: impl Into<String>, currency: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            currency: currency.into(),
        }
    }

    fn url(&self, function: &str) -> String {
        format!("{}/{}", self.base_url, function)
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(AppError::Network(format!("HTTP {}: {}", status, body)));
    }
    serde_json::from_str(&body).map_err(|e| AppError::MalformedResponse(e.to_string()))
}

#[async_trait]
impl SessionEndpoint for HttpSessionEndpoint {
    async fn payment_session(&self, price: MinorUnits, product_id: &str) -> Result<PaymentSession> {
        debug!(%product_id, price = price.value(), "requesting payment intent");
        let response = self
            .client
            .get(self.url("getPaymentIntent"))
            .header("Content-Type", "application/json")
            .query(&[
                ("price", price.value().to_string()),
                ("currency", self.currency.clone()),
                ("productID", product_id.to_string()),
            ])
            .send()
            .await?;
        decode(response).await
    }

    async fn customer_credentials(&self) -> Result<CustomerCredentials> {
        debug!("requesting ephemeral secret");
        let response = self
            .client
            .get(self.url("getEphemeralSecret"))
            .header("Content-Type", "application/json")
            .send()
            .await?;
        decode(response).await
    }
}
