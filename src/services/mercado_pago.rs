use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use thiserror::Error;
use tracing::{error, info};
use uuid::Uuid;

use crate::app::config::Config;
use crate::models::payment::CreatePaymentParams;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Pagamento não encontrado no Mercado Pago")]
    NotFound,
    #[error("{message}")]
    Rejected {
        status: Option<u16>,
        message: String,
        cause: Option<Value>,
    },
    #[error("Falha ao comunicar com o Mercado Pago: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Seam over the payment provider. Production uses [`MercadoPagoClient`];
/// tests substitute in-memory doubles.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    async fn create_payment(&self, params: &CreatePaymentParams) -> Result<Value, ProviderError>;

    /// Authenticated read by id. `access_token` overrides the configured
    /// credential when the caller supplies its own.
    async fn find_payment(
        &self,
        payment_id: &str,
        access_token: Option<&str>,
    ) -> Result<Value, ProviderError>;
}

pub struct MercadoPagoClient {
    client: Client,
    base_url: String,
    access_token: String,
}

impl MercadoPagoClient {
    pub fn new(client: Client, config: &Config) -> Self {
        Self {
            client,
            base_url: config.mp_api_url.trim_end_matches('/').to_string(),
            access_token: config.mp_access_token.clone(),
        }
    }

    fn rejection(status: StatusCode, body: Value) -> ProviderError {
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("Erro desconhecido ao processar PIX")
            .to_string();

        ProviderError::Rejected {
            status: Some(status.as_u16()),
            message,
            cause: Some(body),
        }
    }
}

#[async_trait]
impl PaymentProvider for MercadoPagoClient {
    async fn create_payment(&self, params: &CreatePaymentParams) -> Result<Value, ProviderError> {
        info!(
            "Creating payment at Mercado Pago: amount={} payer={}",
            params.transaction_amount, params.payer.email
        );

        let response = self
            .client
            .post(format!("{}/v1/payments", self.base_url))
            .bearer_auth(&self.access_token)
            // Duplicate submissions of the same HTTP request must not
            // create two real-world charges.
            .header("X-Idempotency-Key", Uuid::new_v4().to_string())
            .json(params)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let body = response.json::<Value>().await.unwrap_or(Value::Null);
        error!("Mercado Pago rejected payment creation: HTTP {}", status);
        Err(Self::rejection(status, body))
    }

    async fn find_payment(
        &self,
        payment_id: &str,
        access_token: Option<&str>,
    ) -> Result<Value, ProviderError> {
        let token = access_token.unwrap_or(&self.access_token);

        let response = self
            .client
            .get(format!("{}/v1/payments/{}", self.base_url, payment_id))
            .bearer_auth(token)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ProviderError::NotFound);
        }
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let body = response.json::<Value>().await.unwrap_or(Value::Null);
        error!("Mercado Pago status lookup failed: HTTP {}", status);
        Err(Self::rejection(status, body))
    }
}
